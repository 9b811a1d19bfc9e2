use crate::domain::model::{Slot, SlotIndex, SLOT_COUNT};
use std::path::PathBuf;

/// The five slot → file bindings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotRegistry {
    paths: [Option<PathBuf>; SLOT_COUNT],
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slots(slots: impl IntoIterator<Item = Slot>) -> Self {
        let mut registry = Self::new();
        for slot in slots {
            if let Some(path) = slot.file_path {
                registry.assign(slot.index, path);
            }
        }
        registry
    }

    pub fn get(&self, index: SlotIndex) -> Slot {
        Slot {
            index,
            file_path: self.paths[index.as_usize()].clone(),
        }
    }

    /// 指定檔案；空路徑等同清除
    pub fn assign(&mut self, index: SlotIndex, file_path: impl Into<PathBuf>) {
        let file_path = file_path.into();
        self.paths[index.as_usize()] = if file_path.as_os_str().is_empty() {
            None
        } else {
            Some(file_path)
        };
    }

    pub fn clear(&mut self, index: SlotIndex) {
        self.paths[index.as_usize()] = None;
    }

    pub fn slots(&self) -> Vec<Slot> {
        SlotIndex::all().map(|index| self.get(index)).collect()
    }
}
