use crate::config::settings::{ButtonsConfig, SoundboardSettings};
use crate::domain::model::Slot;
use crate::domain::ports::SettingsStore;
use crate::utils::error::{Result, SoundboardError};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings file on local disk. Slot assignments are written back into the
/// `[buttons]` table; other sections are preserved.
#[derive(Debug, Clone)]
pub struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 檔案不存在時回傳預設值
    pub fn load_settings(&self) -> Result<SoundboardSettings> {
        if !self.path.exists() {
            tracing::info!(
                "📁 Settings file {} not found, using defaults",
                self.path.display()
            );
            return Ok(SoundboardSettings::default());
        }
        SoundboardSettings::from_file(&self.path)
    }

    pub fn save_settings(&self, settings: &SoundboardSettings) -> Result<()> {
        self.write(&settings.to_toml_string()?)
    }

    fn write(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.path, content)?;
        tracing::debug!("Settings written to {}", self.path.display());
        Ok(())
    }

    /// 原始檔案內容，不做環境變數替換
    fn load_document(&self) -> Result<toml::Table> {
        if !self.path.exists() {
            return Ok(toml::Table::new());
        }
        let content = fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| SoundboardError::ConfigError {
            message: format!(
                "Cannot update {} without expanding its placeholders: {}",
                self.path.display(),
                e
            ),
        })
    }
}

/// `files` entries as written in the file, before substitution.
fn raw_button_files(document: &toml::Table) -> Vec<String> {
    document
        .get("buttons")
        .and_then(|buttons| buttons.get("files"))
        .and_then(|files| files.as_array())
        .map(|files| {
            files
                .iter()
                .map(|file| file.as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}

impl SettingsStore for TomlSettingsStore {
    fn load_slots(&self) -> Result<Vec<Slot>> {
        Ok(self.load_settings()?.buttons.to_slots())
    }

    /// Rewrites only `[buttons] files`. Entries whose expansion is unchanged
    /// keep their `${VAR}` form.
    fn save_slots(&self, slots: &[Slot]) -> Result<()> {
        let mut document = self.load_document()?;
        let previous = raw_button_files(&document);

        let files = ButtonsConfig::from_slots(slots)
            .files
            .into_iter()
            .enumerate()
            .map(|(i, file)| match previous.get(i) {
                Some(raw) if SoundboardSettings::substitute_env_vars(raw) == file => raw.clone(),
                _ => file,
            })
            .map(toml::Value::String)
            .collect();

        let mut buttons = match document.remove("buttons") {
            Some(toml::Value::Table(buttons)) => buttons,
            _ => toml::Table::new(),
        };
        buttons.insert("files".to_string(), toml::Value::Array(files));
        document.insert("buttons".to_string(), toml::Value::Table(buttons));

        let content = toml::to_string_pretty(&document).map_err(|e| SoundboardError::ConfigError {
            message: format!("Failed to serialize settings: {}", e),
        })?;
        self.write(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::SlotIndex;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let store = TomlSettingsStore::new(dir.path().join("missing.toml"));
        assert_eq!(store.load_settings().unwrap(), SoundboardSettings::default());
        assert!(store.load_slots().unwrap().is_empty());
    }

    #[test]
    fn test_save_slots_keeps_other_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("board.toml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[serial]\nport_name = \"COM9\"\nbaud_rate = 57600\n").unwrap();

        let store = TomlSettingsStore::new(&path);
        let slots = vec![
            Slot {
                index: SlotIndex::new(0).unwrap(),
                file_path: None,
            },
            Slot {
                index: SlotIndex::new(1).unwrap(),
                file_path: Some(PathBuf::from("/music/b.mp3")),
            },
        ];
        store.save_slots(&slots).unwrap();

        let settings = store.load_settings().unwrap();
        assert_eq!(settings.serial.port_name, "COM9");
        assert_eq!(settings.serial.baud_rate, 57600);
        assert_eq!(settings.buttons.files, vec!["", "/music/b.mp3"]);
        assert_eq!(store.load_slots().unwrap(), slots);
    }

    #[test]
    fn test_save_slots_keeps_env_placeholders() {
        std::env::set_var("NIPPELBOARD_STORE_MUSIC", "/home/dj/music");
        std::env::set_var("NIPPELBOARD_STORE_PORT", "/dev/ttyUSB3");

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.toml");
        fs::write(
            &path,
            "[serial]\nport_name = \"${NIPPELBOARD_STORE_PORT}\"\n\n\
             [buttons]\nfiles = [\"${NIPPELBOARD_STORE_MUSIC}/a.mp3\"]\n",
        )
        .unwrap();

        let store = TomlSettingsStore::new(&path);
        let mut slots = store.load_slots().unwrap();
        assert_eq!(slots[0].file_path, Some(PathBuf::from("/home/dj/music/a.mp3")));

        slots.push(Slot {
            index: SlotIndex::new(1).unwrap(),
            file_path: Some(PathBuf::from("/tmp/b.mp3")),
        });
        store.save_slots(&slots).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("${NIPPELBOARD_STORE_MUSIC}/a.mp3"));
        assert!(content.contains("${NIPPELBOARD_STORE_PORT}"));
        assert!(content.contains("/tmp/b.mp3"));

        assert_eq!(store.load_slots().unwrap(), slots);
        assert_eq!(store.load_settings().unwrap().serial.port_name, "/dev/ttyUSB3");
    }

    #[test]
    fn test_changed_entry_replaces_placeholder() {
        std::env::set_var("NIPPELBOARD_STORE_JINGLES", "/srv/jingles");

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.toml");
        fs::write(&path, "[buttons]\nfiles = [\"${NIPPELBOARD_STORE_JINGLES}/a.mp3\"]\n").unwrap();

        let store = TomlSettingsStore::new(&path);
        let slots = vec![Slot {
            index: SlotIndex::new(0).unwrap(),
            file_path: Some(PathBuf::from("/srv/other/a.mp3")),
        }];
        store.save_slots(&slots).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("NIPPELBOARD_STORE_JINGLES"));
        assert_eq!(store.load_slots().unwrap(), slots);
    }
}
