use crate::utils::error::{Result, SoundboardError};
use std::net::IpAddr;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SoundboardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SoundboardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_ip_address(field_name: &str, address: &str) -> Result<IpAddr> {
    address
        .parse::<IpAddr>()
        .map_err(|e| SoundboardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: address.to_string(),
            reason: format!("Invalid IP address: {}", e),
        })
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(SoundboardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_max_len<T>(field_name: &str, items: &[T], max_len: usize) -> Result<()> {
    if items.len() > max_len {
        return Err(SoundboardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: items.len().to_string(),
            reason: format!("At most {} entries are allowed", max_len),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SoundboardError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("buttons.files[0]", "/music/horn.mp3").is_ok());
        assert!(validate_path("buttons.files[0]", "").is_err());
        assert!(validate_path("buttons.files[0]", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_ip_address() {
        assert!(validate_ip_address("http.bind_address", "0.0.0.0").is_ok());
        assert!(validate_ip_address("http.bind_address", "::1").is_ok());
        assert!(validate_ip_address("http.bind_address", "localhost").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("serial.baud_rate", 9600, 1).is_ok());
        assert!(validate_positive_number("serial.baud_rate", 0, 1).is_err());
    }

    #[test]
    fn test_validate_max_len() {
        assert!(validate_max_len("buttons.files", &[1, 2, 3], 5).is_ok());
        assert!(validate_max_len("buttons.files", &[0; 6], 5).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("serial.port_name", "COM3").is_ok());
        assert!(validate_non_empty_string("serial.port_name", "   ").is_err());
    }
}
