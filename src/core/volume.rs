use crate::domain::model::VolumeLevel;

pub const DEVICE_MIN: i64 = 0;
pub const DEVICE_MAX: i64 = 255;

/// Linear rescale with truncating integer division (Arduino `map` semantics).
pub fn map_range(x: i64, in_min: i64, in_max: i64, out_min: i64, out_max: i64) -> i64 {
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// 0..=255 (控制器) → 0..=100 (百分比)
pub fn device_to_percent(raw: u8) -> VolumeLevel {
    VolumeLevel::clamped(map_range(
        i64::from(raw),
        DEVICE_MIN,
        DEVICE_MAX,
        i64::from(VolumeLevel::MIN.get()),
        i64::from(VolumeLevel::MAX.get()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(device_to_percent(0).get(), 0);
        assert_eq!(device_to_percent(255).get(), 100);
    }

    #[test]
    fn test_truncates_toward_zero() {
        assert_eq!(device_to_percent(128).get(), 50);
        assert_eq!(device_to_percent(2).get(), 0);
        assert_eq!(device_to_percent(3).get(), 1);
    }

    #[test]
    fn test_monotonic() {
        let mut previous = device_to_percent(0);
        for raw in 1..=u8::MAX {
            let current = device_to_percent(raw);
            assert!(current >= previous, "{} dropped below {}", raw, previous);
            previous = current;
        }
    }
}
