use thiserror::Error;

#[derive(Error, Debug)]
pub enum SoundboardError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Cannot listen on {addr}: {source}")]
    HttpBindError {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "serial")]
    #[error("Serial port error: {0}")]
    SerialError(#[from] tokio_serial::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Slot index {index} is out of range (expected 0..=4)")]
    InvalidSlotIndex { index: i64 },

    #[error("Media player error: {message}")]
    MediaError { message: String },

    #[error("Command router is no longer running")]
    RouterClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Storage,
    Device,
    Network,
    Playback,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SoundboardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SoundboardError::IoError(_) => ErrorCategory::Storage,
            SoundboardError::HttpBindError { .. } => ErrorCategory::Network,
            #[cfg(feature = "serial")]
            SoundboardError::SerialError(_) => ErrorCategory::Device,
            SoundboardError::ConfigError { .. }
            | SoundboardError::ConfigValidationError { .. }
            | SoundboardError::InvalidConfigValueError { .. }
            | SoundboardError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SoundboardError::InvalidSlotIndex { .. } | SoundboardError::MediaError { .. } => {
                ErrorCategory::Playback
            }
            SoundboardError::RouterClosed => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SoundboardError::InvalidSlotIndex { .. } => ErrorSeverity::Low,
            SoundboardError::MediaError { .. } => ErrorSeverity::Medium,
            #[cfg(feature = "serial")]
            SoundboardError::SerialError(_) => ErrorSeverity::Medium,
            SoundboardError::ConfigError { .. }
            | SoundboardError::ConfigValidationError { .. }
            | SoundboardError::InvalidConfigValueError { .. }
            | SoundboardError::MissingConfigError { .. }
            | SoundboardError::IoError(_) => ErrorSeverity::High,
            SoundboardError::HttpBindError { .. } | SoundboardError::RouterClosed => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the settings file and command line overrides, then restart"
            }
            ErrorCategory::Storage => {
                "Check that the settings file and its directory exist and are readable and writable"
            }
            ErrorCategory::Device => {
                "Check that the controller is plugged in and the port name and baud rate match"
            }
            ErrorCategory::Network => {
                "Make sure the HTTP port is free and the bind address exists on this machine"
            }
            ErrorCategory::Playback => "Assign an audio file to the slot or pick a slot between 0 and 4",
            ErrorCategory::Internal => "Restart the application; the playback task has stopped",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SoundboardError::ConfigValidationError { field, .. }
            | SoundboardError::InvalidConfigValueError { field, .. }
            | SoundboardError::MissingConfigError { field } => {
                format!("Settings problem in '{}': {}", field, self)
            }
            #[cfg(feature = "serial")]
            SoundboardError::SerialError(e) => format!("Could not talk to the controller: {}", e),
            SoundboardError::RouterClosed => "Playback engine stopped unexpectedly".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SoundboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = SoundboardError::MissingConfigError {
            field: "serial.port_name".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("serial.port_name"));
    }

    #[test]
    fn test_router_closed_is_critical() {
        let err = SoundboardError::RouterClosed;
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_io_error_points_at_the_settings_file() {
        let err = SoundboardError::from(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.recovery_suggestion().contains("settings file"));
        assert!(!err.recovery_suggestion().contains("HTTP port"));
    }

    #[test]
    fn test_bind_failure_is_a_network_error() {
        let err = SoundboardError::HttpBindError {
            addr: "127.0.0.1:11948".parse().unwrap(),
            source: std::io::Error::from(std::io::ErrorKind::AddrInUse),
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.to_string().contains("127.0.0.1:11948"));
        assert!(err.recovery_suggestion().contains("HTTP port"));
    }
}
