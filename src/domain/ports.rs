use crate::domain::model::{DeviceLink, PlaybackEvent, Slot, VolumeLevel};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;
use tokio::io::AsyncRead;

/// Audio backend that actually renders the selected file.
pub trait MediaPlayer: Send {
    fn play(&mut self, file_path: &Path) -> Result<()>;
    fn set_volume(&mut self, volume: VolumeLevel) -> Result<()>;
}

/// Receives playback state changes (UI, status bar, logging, ...).
pub trait PlaybackObserver: Send {
    fn notify(&mut self, event: &PlaybackEvent);
}

pub trait SettingsStore: Send + Sync {
    fn load_slots(&self) -> Result<Vec<Slot>>;
    fn save_slots(&self, slots: &[Slot]) -> Result<()>;
}

pub type SerialStream = Box<dyn AsyncRead + Unpin + Send>;

#[async_trait]
pub trait SerialConnector: Send + Sync {
    async fn connect(&self, link: &DeviceLink) -> Result<SerialStream>;
}
