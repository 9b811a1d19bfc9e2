use crate::adapters::{http, observers::LoggingObserver, serial};
use crate::config::settings::SoundboardSettings;
use crate::core::playback::PlaybackController;
use crate::core::router::{self, CommandRouter, RouterHandle, DEFAULT_QUEUE_CAPACITY};
use crate::domain::model::DeviceLink;
use crate::domain::ports::{MediaPlayer, PlaybackObserver, SerialConnector, SettingsStore};
use crate::core::slots::SlotRegistry;
use crate::utils::error::Result;
use std::future::Future;
use std::net::SocketAddr;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Host integration: one router task owns playback state, serial and HTTP
/// only hold [`RouterHandle`]s.
pub struct Soundboard<M: MediaPlayer + 'static> {
    settings: SoundboardSettings,
    router: CommandRouter<M>,
    device: DeviceLink,
}

/// Running soundboard: the router task plus a handle for extra producers.
pub struct RunningSoundboard<M: MediaPlayer + 'static> {
    pub handle: RouterHandle,
    pub device: DeviceLink,
    router_task: JoinHandle<CommandRouter<M>>,
    serial_task: Option<JoinHandle<()>>,
    http_task: Option<JoinHandle<Result<()>>>,
    stop: watch::Sender<bool>,
}

impl<M: MediaPlayer + 'static> Soundboard<M> {
    pub fn new(settings: SoundboardSettings, media: M) -> Self {
        let controller = PlaybackController::new(settings.slot_registry(), media);
        let device = settings.device_link();
        Self {
            settings,
            router: CommandRouter::new(controller),
            device,
        }
    }

    /// Slot assignments are loaded from `store` and written back to it.
    pub fn with_settings_store(mut self, store: impl SettingsStore + 'static) -> Self {
        match store.load_slots() {
            Ok(slots) => {
                *self.router.controller_mut().slots_mut() = SlotRegistry::from_slots(slots);
            }
            Err(e) => tracing::warn!(
                "⚠️ Could not load slot assignments, keeping the configured ones: {}",
                e
            ),
        }
        self.router = self.router.with_settings_store(store);
        self
    }

    pub fn subscribe(&mut self, observer: impl PlaybackObserver + 'static) {
        self.router.controller_mut().subscribe(observer);
    }

    /// 啟動 router 與序列埠讀取 (HTTP 由呼叫端決定是否啟動)
    pub async fn start(mut self, connector: &dyn SerialConnector) -> RunningSoundboard<M> {
        self.router.controller_mut().subscribe(LoggingObserver);

        let (handle, inbox) = router::channel(DEFAULT_QUEUE_CAPACITY);
        let router_task = tokio::spawn(self.router.run(inbox));

        let serial_task = if self.settings.serial.enabled {
            serial::connect_device(connector, &mut self.device)
                .await
                .map(|stream| {
                    let handle = handle.clone();
                    tokio::spawn(async move {
                        if let Err(e) = serial::read_serial_stream(stream, handle).await {
                            tracing::error!("❌ Serial reader stopped: {}", e);
                        }
                    })
                })
        } else {
            tracing::info!("Serial controller disabled");
            None
        };

        let (stop, _) = watch::channel(false);
        RunningSoundboard {
            handle,
            device: self.device,
            router_task,
            serial_task,
            http_task: None,
            stop,
        }
    }

    /// Starts everything and serves HTTP until the server stops or Ctrl-C.
    pub async fn run(self, connector: &dyn SerialConnector) -> Result<()> {
        let addr = self.settings.http_addr()?;
        let mut running = self.start(connector).await;

        if let Err(e) = running.serve_http(addr).await {
            running.shutdown().await;
            return Err(e);
        }

        let result = tokio::select! {
            result = running.http_stopped() => result,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("🛑 Shutdown requested");
                Ok(())
            }
        };

        running.shutdown().await;
        result
    }
}

impl<M: MediaPlayer + 'static> RunningSoundboard<M> {
    /// Binds the HTTP control surface and serves it in the background until
    /// [`shutdown`](Self::shutdown). Returns the bound address.
    pub async fn serve_http(&mut self, addr: SocketAddr) -> Result<SocketAddr> {
        let listener = http::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        self.http_task = Some(tokio::spawn(http::serve(
            listener,
            self.handle.clone(),
            self.stop_signal(),
        )));
        Ok(local_addr)
    }

    /// Resolves once shutdown has been requested.
    fn stop_signal(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut stop = self.stop.subscribe();
        async move {
            // sender 被 drop 也視為停止
            let _ = stop.wait_for(|stopped| *stopped).await;
        }
    }

    /// Waits for the HTTP server to stop on its own; pending if none runs.
    async fn http_stopped(&mut self) -> Result<()> {
        let Some(task) = self.http_task.as_mut() else {
            return std::future::pending().await;
        };
        let result = task.await;
        self.http_task = None;
        match result {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("❌ HTTP server task failed: {}", e);
                Ok(())
            }
        }
    }

    /// Drains HTTP connections, stops the serial reader, closes the queue and
    /// waits for the router.
    ///
    /// Clones of `handle` held outside the soundboard must be dropped first.
    pub async fn shutdown(self) -> Option<CommandRouter<M>> {
        self.stop.send_replace(true);
        if let Some(task) = self.http_task {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!("❌ HTTP server stopped with error: {}", e),
                Err(e) => tracing::error!("❌ HTTP server task failed: {}", e),
            }
        }
        if let Some(task) = self.serial_task {
            task.abort();
        }
        drop(self.handle);

        match self.router_task.await {
            Ok(router) => Some(router),
            Err(e) => {
                tracing::error!("❌ Router task failed: {}", e);
                None
            }
        }
    }
}
