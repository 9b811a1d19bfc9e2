pub mod settings;
pub mod store;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use settings::SoundboardSettings;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "nippelboard")]
#[command(about = "Soundboard controller: serial buttons and HTTP drive five audio slots")]
pub struct CliConfig {
    /// Path to the TOML settings file
    #[arg(short, long, default_value = "nippelboard.toml")]
    pub config: String,

    /// Override the serial port name (e.g. COM3 or /dev/ttyACM0)
    #[arg(long)]
    pub serial_port: Option<String>,

    /// Override the serial baud rate
    #[arg(long)]
    pub baud_rate: Option<u32>,

    /// Do not open the serial controller
    #[arg(long)]
    pub no_serial: bool,

    /// Override the HTTP listen port
    #[arg(long)]
    pub http_port: Option<u16>,

    /// Override the HTTP bind address
    #[arg(long)]
    pub bind: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 命令列參數優先於設定檔
    pub fn apply_overrides(&self, settings: &mut SoundboardSettings) {
        if let Some(port) = &self.serial_port {
            settings.serial.port_name = port.clone();
            tracing::info!("🔧 Serial port overridden to: {}", port);
        }
        if let Some(baud) = self.baud_rate {
            settings.serial.baud_rate = baud;
            tracing::info!("🔧 Baud rate overridden to: {}", baud);
        }
        if self.no_serial {
            settings.serial.enabled = false;
        }
        if let Some(port) = self.http_port {
            settings.http.port = port;
        }
        if let Some(bind) = &self.bind {
            settings.http.bind_address = bind.clone();
        }
    }
}
