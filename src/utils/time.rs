//! Time utilities: parsing workday targets, formatting durations, clock times, etc.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Local, Utc};

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Parse a duration such as `9h`, `8h30m`, `510m`, `45s` or `08:30` into milliseconds.
pub fn parse_duration_ms(s: &str) -> AppResult<u64> {
    let input = s.trim().to_lowercase();
    if input.is_empty() {
        return Err(AppError::InvalidDuration(s.to_string()));
    }

    // HH:MM
    if let Some((h, m)) = input.split_once(':') {
        let hours: u64 = h
            .parse()
            .map_err(|_| AppError::InvalidDuration(s.to_string()))?;
        let minutes: u64 = m
            .parse()
            .map_err(|_| AppError::InvalidDuration(s.to_string()))?;
        if minutes >= 60 {
            return Err(AppError::InvalidDuration(s.to_string()));
        }
        return hours
            .checked_mul(MS_PER_HOUR)
            .and_then(|h| h.checked_add(minutes * MS_PER_MINUTE))
            .ok_or_else(|| AppError::InvalidDuration(s.to_string()));
    }

    let mut total = 0u64;
    let mut digits = String::new();
    let mut seen_unit = false;

    for c in input.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        let unit = match c {
            'h' => MS_PER_HOUR,
            'm' => MS_PER_MINUTE,
            's' => MS_PER_SECOND,
            ' ' => continue,
            _ => return Err(AppError::InvalidDuration(s.to_string())),
        };

        let value: u64 = digits
            .parse()
            .map_err(|_| AppError::InvalidDuration(s.to_string()))?;
        total = value
            .checked_mul(unit)
            .and_then(|ms| total.checked_add(ms))
            .ok_or_else(|| AppError::InvalidDuration(s.to_string()))?;
        digits.clear();
        seen_unit = true;
    }

    if !digits.is_empty() {
        // bare number → minutes
        if seen_unit {
            return Err(AppError::InvalidDuration(s.to_string()));
        }
        let value: u64 = digits
            .parse()
            .map_err(|_| AppError::InvalidDuration(s.to_string()))?;
        total = value
            .checked_mul(MS_PER_MINUTE)
            .ok_or_else(|| AppError::InvalidDuration(s.to_string()))?;
    }

    Ok(total)
}

/// `HH:MM:SS`, hours not capped at 24.
pub fn format_hms(ms: u64) -> String {
    let total_seconds = ms / MS_PER_SECOND;
    let h = total_seconds / 3600;
    let m = (total_seconds % 3600) / 60;
    let s = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// `Xh Ym`, used for remaining time.
pub fn format_hm(ms: u64) -> String {
    let total_minutes = ms / MS_PER_MINUTE;
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}

/// Human description of a workday target: `9 hours`, `8h 30m`.
pub fn describe_target(target_ms: u64) -> String {
    if target_ms % MS_PER_HOUR == 0 {
        let hours = target_ms / MS_PER_HOUR;
        if hours == 1 {
            "1 hour".to_string()
        } else {
            format!("{} hours", hours)
        }
    } else {
        format_hm(target_ms)
    }
}

/// Local wall-clock time `HH:MM` of an instant.
pub fn format_clock_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

/// Drop sub-millisecond precision so the instant survives an epoch-ms round trip.
pub fn truncate_to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or(at)
}

/// Non-negative milliseconds from `from` to `to`.
pub fn millis_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    (to - from).num_milliseconds().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hours_and_minutes() {
        assert_eq!(parse_duration_ms("9h").unwrap(), 9 * MS_PER_HOUR);
        assert_eq!(
            parse_duration_ms("8h30m").unwrap(),
            8 * MS_PER_HOUR + 30 * MS_PER_MINUTE
        );
        assert_eq!(parse_duration_ms("510m").unwrap(), 510 * MS_PER_MINUTE);
        assert_eq!(parse_duration_ms("510").unwrap(), 510 * MS_PER_MINUTE);
        assert_eq!(
            parse_duration_ms("07:45").unwrap(),
            7 * MS_PER_HOUR + 45 * MS_PER_MINUTE
        );
        assert_eq!(parse_duration_ms("90s").unwrap(), 90 * MS_PER_SECOND);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_duration_ms("").is_err());
        assert!(parse_duration_ms("nine hours").is_err());
        assert!(parse_duration_ms("8h30").is_err());
        assert!(parse_duration_ms("8:75").is_err());
    }

    #[test]
    fn test_parse_overflow_is_an_error() {
        assert!(matches!(
            parse_duration_ms("9999999999999999h"),
            Err(AppError::InvalidDuration(_))
        ));
        assert!(matches!(
            parse_duration_ms("9999999999999999:00"),
            Err(AppError::InvalidDuration(_))
        ));
        assert!(matches!(
            parse_duration_ms("99999999999999999"),
            Err(AppError::InvalidDuration(_))
        ));
        assert!(parse_duration_ms("4000000000000h 4000000000000h").is_err());
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(32_400_000), "09:00:00");
        assert_eq!(format_hms(3_723_999), "01:02:03");
        assert_eq!(format_hms(100 * MS_PER_HOUR), "100:00:00");
    }

    #[test]
    fn test_format_hm_and_target() {
        assert_eq!(format_hm(30_600_000), "8h 30m");
        assert_eq!(format_hm(59_999), "0h 0m");
        assert_eq!(describe_target(32_400_000), "9 hours");
        assert_eq!(describe_target(30_600_000), "8h 30m");
    }

    #[test]
    fn test_truncate_to_millis() {
        let at = DateTime::from_timestamp(1_700_000_000, 123_456_789).unwrap();
        let t = truncate_to_millis(at);
        assert_eq!(t.timestamp_millis(), 1_700_000_000_123);
        assert_eq!(t.timestamp_subsec_nanos(), 123_000_000);
    }
}
