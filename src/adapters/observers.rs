use crate::domain::model::PlaybackEvent;
use crate::domain::ports::PlaybackObserver;
use tokio::sync::broadcast;

/// Fans events out to any number of async subscribers (UI bridges, status).
#[derive(Debug, Clone)]
pub struct BroadcastObserver {
    sender: broadcast::Sender<PlaybackEvent>,
}

impl BroadcastObserver {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.sender.subscribe()
    }
}

impl PlaybackObserver for BroadcastObserver {
    fn notify(&mut self, event: &PlaybackEvent) {
        // 沒有訂閱者時 send 會失敗，忽略即可
        let _ = self.sender.send(event.clone());
    }
}

/// Writes every event to the status log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl PlaybackObserver for LoggingObserver {
    fn notify(&mut self, event: &PlaybackEvent) {
        match event {
            PlaybackEvent::ActiveSlotChanged { slot, file_path } => {
                tracing::info!("Active slot is now {} ({})", slot, file_path.display());
            }
            PlaybackEvent::VolumeChanged(volume) => tracing::info!("Volume is now {}%", volume),
            PlaybackEvent::SlotAssigned(slot) => tracing::info!(
                "Slot {} is {}",
                slot.index,
                if slot.is_assigned() { "assigned" } else { "empty" }
            ),
        }
    }
}
