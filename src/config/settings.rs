use crate::core::slots::SlotRegistry;
use crate::domain::model::{DeviceLink, Slot, SlotIndex, SLOT_COUNT};
use crate::utils::error::{Result, SoundboardError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const DEFAULT_HTTP_PORT: u16 = 11948;
pub const DEFAULT_BAUD_RATE: u32 = 9600;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundboardSettings {
    pub serial: SerialConfig,
    pub http: HttpConfig,
    pub buttons: ButtonsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    pub enabled: bool,
    pub port_name: String,
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        let port_name = if cfg!(windows) { "COM3" } else { "/dev/ttyACM0" };
        Self {
            enabled: true,
            port_name: port_name.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind_address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

/// 五個按鈕對應的音檔，空字串代表未指定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonsConfig {
    pub files: Vec<String>,
}

impl ButtonsConfig {
    pub fn from_slots(slots: &[Slot]) -> Self {
        let files = slots
            .iter()
            .map(|slot| {
                slot.file_path
                    .as_deref()
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_default()
            })
            .collect();
        Self { files }
    }

    pub fn to_slots(&self) -> Vec<Slot> {
        SlotIndex::all()
            .zip(&self.files)
            .map(|(index, file)| Slot {
                index,
                file_path: (!file.is_empty()).then(|| PathBuf::from(file)),
            })
            .collect()
    }
}

impl SoundboardSettings {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SoundboardError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SoundboardError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SoundboardError::ConfigError {
            message: format!("Failed to serialize settings: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HOME})，未定義的變數保持原樣
    pub(crate) fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR
            .get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        if self.serial.enabled {
            validation::validate_non_empty_string("serial.port_name", &self.serial.port_name)?;
            validation::validate_positive_number(
                "serial.baud_rate",
                u64::from(self.serial.baud_rate),
                1,
            )?;
        }

        validation::validate_ip_address("http.bind_address", &self.http.bind_address)?;
        validation::validate_positive_number("http.port", u64::from(self.http.port), 1)?;

        validation::validate_max_len("buttons.files", &self.buttons.files, SLOT_COUNT)?;
        for (i, file) in self.buttons.files.iter().enumerate() {
            if !file.is_empty() {
                validation::validate_path(&format!("buttons.files[{}]", i), file)?;
            }
        }

        Ok(())
    }

    pub fn device_link(&self) -> DeviceLink {
        DeviceLink::new(self.serial.port_name.clone(), self.serial.baud_rate)
    }

    pub fn slot_registry(&self) -> SlotRegistry {
        SlotRegistry::from_slots(self.buttons.to_slots())
    }

    pub fn http_addr(&self) -> Result<SocketAddr> {
        let ip = validation::validate_ip_address("http.bind_address", &self.http.bind_address)?;
        Ok(SocketAddr::new(ip, self.http.port))
    }
}

impl Validate for SoundboardSettings {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_settings() {
        let toml_content = r#"
[serial]
port_name = "COM7"
baud_rate = 115200

[http]
bind_address = "127.0.0.1"
port = 8080

[buttons]
files = ["/music/horn.mp3", "", "/music/goal.mp3"]
"#;

        let settings = SoundboardSettings::from_toml_str(toml_content).unwrap();

        assert!(settings.serial.enabled);
        assert_eq!(settings.device_link(), DeviceLink::new("COM7", 115200));
        assert_eq!(settings.http_addr().unwrap().to_string(), "127.0.0.1:8080");

        let registry = settings.slot_registry();
        let slots = registry.slots();
        assert_eq!(slots[0].file_path, Some(PathBuf::from("/music/horn.mp3")));
        assert!(!slots[1].is_assigned());
        assert!(slots[2].is_assigned());
        assert!(!slots[4].is_assigned());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings = SoundboardSettings::from_toml_str("").unwrap();
        assert_eq!(settings, SoundboardSettings::default());
        assert_eq!(settings.http.port, DEFAULT_HTTP_PORT);
        assert_eq!(settings.serial.baud_rate, DEFAULT_BAUD_RATE);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("NIPPELBOARD_TEST_MUSIC", "/home/dj/music");

        let toml_content = r#"
[buttons]
files = ["${NIPPELBOARD_TEST_MUSIC}/intro.mp3", "${NIPPELBOARD_UNSET_VAR}/x.mp3"]
"#;

        let settings = SoundboardSettings::from_toml_str(toml_content).unwrap();
        assert_eq!(settings.buttons.files[0], "/home/dj/music/intro.mp3");
        assert_eq!(settings.buttons.files[1], "${NIPPELBOARD_UNSET_VAR}/x.mp3");

        std::env::remove_var("NIPPELBOARD_TEST_MUSIC");
    }

    #[test]
    fn test_config_validation() {
        let too_many = SoundboardSettings::from_toml_str(
            r#"
[buttons]
files = ["a", "b", "c", "d", "e", "f"]
"#,
        )
        .unwrap();
        assert!(too_many.validate().is_err());

        let bad_bind = SoundboardSettings::from_toml_str(
            r#"
[http]
bind_address = "everywhere"
"#,
        )
        .unwrap();
        assert!(bad_bind.validate().is_err());

        let no_port = SoundboardSettings::from_toml_str(
            r#"
[serial]
port_name = ""
"#,
        )
        .unwrap();
        assert!(no_port.validate().is_err());

        let serial_disabled = SoundboardSettings::from_toml_str(
            r#"
[serial]
enabled = false
port_name = ""
"#,
        )
        .unwrap();
        assert!(serial_disabled.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = SoundboardSettings::from_toml_str("[serial\nport_name = 3");
        assert!(matches!(
            result,
            Err(SoundboardError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_settings_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[serial]\nport_name = \"/dev/ttyUSB1\"\n")
            .unwrap();

        let settings = SoundboardSettings::from_file(temp_file.path()).unwrap();
        assert_eq!(settings.serial.port_name, "/dev/ttyUSB1");
    }

    #[test]
    fn test_buttons_round_trip_through_slots() {
        let buttons = ButtonsConfig {
            files: vec!["x.mp3".to_string(), String::new()],
        };
        let rebuilt = ButtonsConfig::from_slots(&buttons.to_slots());
        assert_eq!(rebuilt, buttons);
    }
}
