use crate::core::frame_decoder::SerialFrameDecoder;
use crate::core::router::RouterHandle;
use crate::domain::model::{CommandOrigin, DeviceLink};
use crate::domain::ports::{SerialConnector, SerialStream};
use crate::utils::error::Result;
use tokio::io::{AsyncRead, AsyncReadExt};

const READ_BUFFER_SIZE: usize = 256;

/// Opens the controller with 8N1 framing and no flow control.
#[cfg(feature = "serial")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSerialConnector;

#[cfg(feature = "serial")]
#[async_trait::async_trait]
impl SerialConnector for TokioSerialConnector {
    async fn connect(&self, link: &DeviceLink) -> Result<SerialStream> {
        use tokio_serial::SerialPortBuilderExt;

        let port = tokio_serial::new(link.port_name.as_str(), link.baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()?;

        Ok(Box::new(port))
    }
}

/// 連線一次，失敗時只回報狀態，不重試
pub async fn connect_device(
    connector: &dyn SerialConnector,
    link: &mut DeviceLink,
) -> Option<SerialStream> {
    match connector.connect(link).await {
        Ok(stream) => {
            link.connected = true;
            tracing::info!("🔌 Arduino {} connected", link);
            Some(stream)
        }
        Err(e) => {
            link.connected = false;
            tracing::error!("❌ Failed to connect arduino {}: {}", link, e);
            None
        }
    }
}

/// Feeds the byte stream through the frame decoder and submits each decoded
/// frame as one batch. Returns when the stream reaches EOF.
pub async fn read_serial_stream<R>(mut reader: R, handle: RouterHandle) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut decoder = SerialFrameDecoder::new();
    let mut buf = [0u8; READ_BUFFER_SIZE];

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            tracing::warn!("Serial stream closed by device");
            return Ok(());
        }
        tracing::trace!("Received {} bytes: {:?}", n, String::from_utf8_lossy(&buf[..n]));

        for commands in decoder.feed_frames(&buf[..n]) {
            handle.submit_all(CommandOrigin::Serial, commands).await?;
        }
    }
}
