//! Core Data timestamp conversion.
//!
//! Apple Notes stores dates as floating-point seconds since 2001-01-01 (the
//! Core Data epoch) rather than the Unix epoch.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Seconds between the Unix epoch and the Core Data epoch (2001-01-01)
pub const CORE_DATA_EPOCH: i64 = 978_307_200;

/// Convert a Core Data timestamp to a local date-time.
///
/// Returns `None` for non-finite or unrepresentable values.
pub fn from_core_data(timestamp: f64) -> Option<DateTime<Local>> {
    if !timestamp.is_finite() {
        return None;
    }

    let unix = timestamp + CORE_DATA_EPOCH as f64;
    if unix < i64::MIN as f64 || unix > i64::MAX as f64 {
        return None;
    }

    Local.timestamp_opt(unix as i64, 0).single()
}

/// Format an optional Core Data timestamp as `YYYY-MM-DD HH:MM`.
///
/// Absent or unrepresentable timestamps render as `"Unknown"`.
pub fn format_core_data(timestamp: Option<f64>) -> String {
    timestamp
        .and_then(from_core_data)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Core Data cutoff for "modified within the last N hours"
pub fn cutoff_hours_ago(hours: u64) -> f64 {
    Utc::now().timestamp() as f64 - CORE_DATA_EPOCH as f64 - (hours * 3600) as f64
}

/// Core Data cutoff for "modified within the last N days"
pub fn cutoff_days_ago(days: u64) -> f64 {
    cutoff_hours_ago(days * 24)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_converts() {
        // Core Data zero is 2001-01-01T00:00:00Z
        let dt = from_core_data(0.0).unwrap();
        assert_eq!(dt.with_timezone(&Utc).timestamp(), CORE_DATA_EPOCH);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(from_core_data(f64::NAN).is_none());
        assert!(from_core_data(f64::INFINITY).is_none());
    }

    #[test]
    fn test_format_absent_is_unknown() {
        assert_eq!(format_core_data(None), "Unknown");
        assert_eq!(format_core_data(Some(f64::NAN)), "Unknown");
    }

    #[test]
    fn test_format_shape() {
        let formatted = format_core_data(Some(0.0));
        // YYYY-MM-DD HH:MM
        assert_eq!(formatted.len(), 16);
        assert_eq!(&formatted[4..5], "-");
    }

    #[test]
    fn test_cutoffs_are_ordered() {
        let recent = cutoff_hours_ago(1);
        let older = cutoff_days_ago(7);
        assert!(older < recent);
    }
}
