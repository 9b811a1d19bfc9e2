pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::soundboard::{RunningSoundboard, Soundboard};
pub use config::{settings::SoundboardSettings, store::TomlSettingsStore};
pub use crate::core::{
    frame_decoder::SerialFrameDecoder,
    playback::PlaybackController,
    router::{CommandRouter, RouterHandle},
    slots::SlotRegistry,
};
pub use domain::model::{Command, PlaybackState, Slot, SlotIndex, VolumeLevel};
pub use utils::error::{Result, SoundboardError};
