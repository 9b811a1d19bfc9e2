use crate::core::volume::{device_to_percent, DEVICE_MAX, DEVICE_MIN};
use crate::domain::model::{Command, SlotIndex, SLOT_COUNT};

pub const FRAME_DELIMITER: &[u8] = b"\r\n";
pub const FIELD_SEPARATOR: char = ';';

/// Unterminated input beyond this is treated as line noise and dropped.
pub const MAX_PENDING_BYTES: usize = 256;

/// What the `songId` field of a frame asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SongSelector {
    VolumeOnly,
    Slot(SlotIndex),
}

impl SongSelector {
    /// 0 = 只調音量；1, 2, 4, 8, 16 = slot 0..4；其他值忽略
    fn from_song_id(song_id: i64) -> Option<Self> {
        if song_id == 0 {
            return Some(SongSelector::VolumeOnly);
        }
        let bits = u32::try_from(song_id).ok()?;
        if !bits.is_power_of_two() || (bits.trailing_zeros() as usize) >= SLOT_COUNT {
            return None;
        }
        SlotIndex::new(bits.trailing_zeros() as u8).map(SongSelector::Slot)
    }
}

/// Turns an arbitrarily chunked serial byte stream into commands.
#[derive(Debug, Default)]
pub struct SerialFrameDecoder {
    pending: Vec<u8>,
}

impl SerialFrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk and returns one command batch per complete, valid frame.
    pub fn feed_frames(&mut self, chunk: &[u8]) -> Vec<Vec<Command>> {
        self.pending.extend_from_slice(chunk);

        let mut batches = Vec::new();
        let mut start = 0;
        while let Some(offset) = find_delimiter(&self.pending[start..]) {
            let end = start + offset;
            if let Some(commands) = decode_frame(&self.pending[start..end]) {
                batches.push(commands);
            }
            start = end + FRAME_DELIMITER.len();
        }
        self.pending.drain(..start);

        if self.pending.len() > MAX_PENDING_BYTES {
            tracing::warn!(
                "⚠️ Dropping {} bytes of unterminated serial input",
                self.pending.len()
            );
            self.pending.clear();
        }

        batches
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Command> {
        self.feed_frames(chunk).into_iter().flatten().collect()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

fn find_delimiter(buf: &[u8]) -> Option<usize> {
    buf.windows(FRAME_DELIMITER.len())
        .position(|window| window == FRAME_DELIMITER)
}

/// Decodes a single `songId;rawValue` frame (delimiter already stripped).
pub fn decode_frame(frame: &[u8]) -> Option<Vec<Command>> {
    if frame.is_empty() {
        return None;
    }

    let Ok(text) = std::str::from_utf8(frame) else {
        tracing::debug!("Discarding non UTF-8 frame: {:?}", frame);
        return None;
    };

    let mut fields = text.split(FIELD_SEPARATOR);
    let (Some(song_field), Some(value_field), None) = (fields.next(), fields.next(), fields.next())
    else {
        tracing::debug!("Discarding malformed frame: {:?}", text);
        return None;
    };

    let (Ok(song_id), Ok(raw_value)) = (
        song_field.trim().parse::<i64>(),
        value_field.trim().parse::<i64>(),
    ) else {
        tracing::debug!("Discarding frame with non-integer fields: {:?}", text);
        return None;
    };

    let Some(selector) = SongSelector::from_song_id(song_id) else {
        tracing::debug!("Ignoring frame with unknown songId {}", song_id);
        return None;
    };

    let raw = raw_value.clamp(DEVICE_MIN, DEVICE_MAX) as u8;
    let set_volume = Command::SetVolume(device_to_percent(raw));

    Some(match selector {
        SongSelector::VolumeOnly => vec![set_volume],
        SongSelector::Slot(index) => vec![Command::SelectSlot(index), set_volume],
    })
}
