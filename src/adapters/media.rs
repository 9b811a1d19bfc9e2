use crate::domain::model::VolumeLevel;
use crate::domain::ports::MediaPlayer;
use crate::utils::error::{Result, SoundboardError};
use std::path::{Path, PathBuf};

/// Stand-in backend that only logs what it was asked to do.
///
/// Useful for headless runs and for wiring checks without an audio device.
#[derive(Debug, Clone, Default)]
pub struct TracingMediaPlayer {
    now_playing: Option<PathBuf>,
    volume: VolumeLevel,
}

impl TracingMediaPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_playing(&self) -> Option<&Path> {
        self.now_playing.as_deref()
    }

    pub fn volume(&self) -> VolumeLevel {
        self.volume
    }
}

impl MediaPlayer for TracingMediaPlayer {
    fn play(&mut self, file_path: &Path) -> Result<()> {
        if !file_path.exists() {
            return Err(SoundboardError::MediaError {
                message: format!("{} does not exist", file_path.display()),
            });
        }
        tracing::info!("🎶 play {}", file_path.display());
        self.now_playing = Some(file_path.to_path_buf());
        Ok(())
    }

    fn set_volume(&mut self, volume: VolumeLevel) -> Result<()> {
        tracing::info!("🔈 volume {}%", volume);
        self.volume = volume;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_play_existing_file() {
        let file = NamedTempFile::new().unwrap();
        let mut player = TracingMediaPlayer::new();
        player.play(file.path()).unwrap();
        assert_eq!(player.now_playing(), Some(file.path()));
    }

    #[test]
    fn test_play_missing_file_fails() {
        let mut player = TracingMediaPlayer::new();
        let result = player.play(Path::new("/definitely/not/here.mp3"));
        assert!(matches!(result, Err(SoundboardError::MediaError { .. })));
        assert!(player.now_playing().is_none());
    }

    #[test]
    fn test_set_volume() {
        let mut player = TracingMediaPlayer::new();
        assert_eq!(player.volume(), VolumeLevel::MAX);
        player.set_volume(VolumeLevel::new(30).unwrap()).unwrap();
        assert_eq!(player.volume().get(), 30);
    }
}
