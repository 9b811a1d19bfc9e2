use crate::core::slots::SlotRegistry;
use crate::domain::model::{Command, PlaybackEvent, PlaybackState, SlotIndex, VolumeLevel};
use crate::domain::ports::{MediaPlayer, PlaybackObserver};
use std::path::PathBuf;

/// Owns the authoritative playback state and applies commands to it.
///
/// All methods are synchronous and must be called from a single owner; the
/// [`CommandRouter`](crate::core::router::CommandRouter) task is that owner at runtime.
pub struct PlaybackController<M: MediaPlayer> {
    state: PlaybackState,
    slots: SlotRegistry,
    media: M,
    observers: Vec<Box<dyn PlaybackObserver>>,
}

impl<M: MediaPlayer> PlaybackController<M> {
    pub fn new(slots: SlotRegistry, media: M) -> Self {
        Self {
            state: PlaybackState::default(),
            slots,
            media,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: impl PlaybackObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn slots(&self) -> &SlotRegistry {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut SlotRegistry {
        &mut self.slots
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::SelectSlot(index) => {
                self.apply_select_slot(index);
            }
            Command::SetVolume(level) => self.apply_set_volume(i32::from(level.get())),
        }
    }

    /// 選擇 slot 並播放；未指定檔案的 slot 不改變任何狀態
    ///
    /// Returns whether the active slot changed.
    pub fn apply_select_slot(&mut self, index: SlotIndex) -> bool {
        let Some(file_path) = self.slots.get(index).file_path else {
            tracing::debug!("Slot {} has no file assigned, ignoring", index);
            return false;
        };

        self.state.active_slot = Some(index);
        tracing::info!("▶️ Playing slot {}: {}", index, file_path.display());

        if let Err(e) = self.media.play(&file_path) {
            tracing::warn!("⚠️ Media player failed to play {}: {}", file_path.display(), e);
        }
        self.emit(PlaybackEvent::ActiveSlotChanged {
            slot: index,
            file_path,
        });
        true
    }

    pub fn apply_set_volume(&mut self, level: i32) {
        let volume = self.store_volume(level);
        if let Err(e) = self.media.set_volume(volume) {
            tracing::warn!("⚠️ Media player rejected volume {}: {}", volume, e);
        }
        self.emit(PlaybackEvent::VolumeChanged(volume));
    }

    /// Folds a volume reported by the media backend itself. Observers are
    /// notified, the backend is not told about its own change again.
    pub fn apply_backend_volume(&mut self, level: i32) {
        let volume = self.store_volume(level);
        self.emit(PlaybackEvent::VolumeChanged(volume));
    }

    pub fn assign_slot(&mut self, index: SlotIndex, file_path: Option<PathBuf>) {
        match file_path {
            Some(path) => self.slots.assign(index, path),
            None => self.slots.clear(index),
        }
        let slot = self.slots.get(index);
        tracing::info!(
            "🎵 Slot {} assigned to {}",
            index,
            slot.file_path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<empty>".to_string())
        );
        self.emit(PlaybackEvent::SlotAssigned(slot));
    }

    fn store_volume(&mut self, level: i32) -> VolumeLevel {
        let volume = VolumeLevel::clamped(i64::from(level));
        self.state.volume = volume;
        tracing::debug!("🔊 Volume set to {}", volume);
        volume
    }

    fn emit(&mut self, event: PlaybackEvent) {
        for observer in &mut self.observers {
            observer.notify(&event);
        }
    }
}
