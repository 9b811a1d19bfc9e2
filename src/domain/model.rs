use crate::utils::error::SoundboardError;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// 按鈕 (slot) 數量，固定為 5
pub const SLOT_COUNT: usize = 5;

/// Index of one of the five playback slots. Only `0..=4` can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SlotIndex(u8);

impl SlotIndex {
    pub fn new(index: u8) -> Option<Self> {
        (usize::from(index) < SLOT_COUNT).then_some(Self(index))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn as_usize(self) -> usize {
        usize::from(self.0)
    }

    pub fn all() -> impl Iterator<Item = SlotIndex> {
        (0..SLOT_COUNT as u8).map(SlotIndex)
    }
}

impl TryFrom<i64> for SlotIndex {
    type Error = SoundboardError;

    fn try_from(index: i64) -> Result<Self, Self::Error> {
        u8::try_from(index)
            .ok()
            .and_then(SlotIndex::new)
            .ok_or(SoundboardError::InvalidSlotIndex { index })
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Volume in percent, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct VolumeLevel(u8);

impl VolumeLevel {
    pub const MIN: VolumeLevel = VolumeLevel(0);
    pub const MAX: VolumeLevel = VolumeLevel(100);

    pub fn new(percent: u8) -> Option<Self> {
        (percent <= Self::MAX.0).then_some(Self(percent))
    }

    pub fn clamped(level: i64) -> Self {
        Self(level.clamp(i64::from(Self::MIN.0), i64::from(Self::MAX.0)) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for VolumeLevel {
    fn default() -> Self {
        Self::MAX
    }
}

impl fmt::Display for VolumeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub index: SlotIndex,
    pub file_path: Option<PathBuf>,
}

impl Slot {
    pub fn is_assigned(&self) -> bool {
        self.file_path.is_some()
    }
}

/// Normalized instruction, independent of the channel that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SelectSlot(SlotIndex),
    SetVolume(VolumeLevel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PlaybackState {
    pub active_slot: Option<SlotIndex>,
    pub volume: VolumeLevel,
}

/// 序列埠連線狀態 (唯讀，啟動時由設定決定)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceLink {
    pub connected: bool,
    pub port_name: String,
    pub baud_rate: u32,
}

impl DeviceLink {
    pub fn new(port_name: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            connected: false,
            port_name: port_name.into(),
            baud_rate,
        }
    }
}

impl fmt::Display for DeviceLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.port_name, self.baud_rate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOrigin {
    Serial,
    Http,
    Backend,
    Local,
}

impl fmt::Display for CommandOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandOrigin::Serial => "serial",
            CommandOrigin::Http => "http",
            CommandOrigin::Backend => "backend",
            CommandOrigin::Local => "local",
        };
        f.write_str(name)
    }
}

/// State-change notification delivered to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    ActiveSlotChanged { slot: SlotIndex, file_path: PathBuf },
    VolumeChanged(VolumeLevel),
    SlotAssigned(Slot),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_index_bounds() {
        assert!(SlotIndex::new(0).is_some());
        assert!(SlotIndex::new(4).is_some());
        assert!(SlotIndex::new(5).is_none());
        assert_eq!(SlotIndex::all().count(), SLOT_COUNT);
    }

    #[test]
    fn test_slot_index_try_from() {
        assert_eq!(SlotIndex::try_from(3).unwrap().get(), 3);
        assert!(matches!(
            SlotIndex::try_from(-1),
            Err(SoundboardError::InvalidSlotIndex { index: -1 })
        ));
        assert!(SlotIndex::try_from(300).is_err());
    }

    #[test]
    fn test_volume_level_clamps() {
        assert_eq!(VolumeLevel::clamped(-20), VolumeLevel::MIN);
        assert_eq!(VolumeLevel::clamped(250), VolumeLevel::MAX);
        assert_eq!(VolumeLevel::clamped(42).get(), 42);
        assert!(VolumeLevel::new(101).is_none());
    }

    #[test]
    fn test_initial_playback_state() {
        let state = PlaybackState::default();
        assert_eq!(state.active_slot, None);
        assert_eq!(state.volume.get(), 100);
    }
}
