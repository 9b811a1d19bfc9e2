pub mod frame_decoder;
pub mod playback;
pub mod router;
pub mod slots;
pub mod volume;

pub use crate::domain::model::{Command, PlaybackState, Slot, SlotIndex, VolumeLevel};
pub use crate::domain::ports::{MediaPlayer, PlaybackObserver, SettingsStore};
pub use crate::utils::error::Result;
