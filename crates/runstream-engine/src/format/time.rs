use chrono::{Local, TimeZone};
use runstream_types::parse_event_time;
use serde_json::Value;

const MS_PER_SECOND: f64 = 1_000.0;
const MS_PER_MINUTE: f64 = 60_000.0;

/// Human duration with unit breakpoints at one second and one minute.
///
/// `850` -> `850 ms`, `1234` -> `1.2s`, `125000` -> `2m 5s`
///
/// The unit is picked from the value as it will print, so `999.6` reads
/// `1.0s` rather than `1000 ms`.
pub fn format_duration(ms: f64) -> String {
    if ms.round() < MS_PER_SECOND {
        format!("{} ms", ms.round() as u64)
    } else if (ms / 100.0).round() * 100.0 < MS_PER_MINUTE {
        format!("{:.1}s", ms / MS_PER_SECOND)
    } else {
        let total_seconds = (ms / MS_PER_SECOND).round() as u64;
        format!("{}m {}s", total_seconds / 60, total_seconds % 60)
    }
}

/// Local `HH:MM:SS`, or an empty string when the timestamp is unusable.
pub fn display_timestamp(value: Option<&Value>) -> String {
    display_timestamp_in(value, &Local)
}

pub fn display_timestamp_in<Tz: TimeZone>(value: Option<&Value>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    value
        .and_then(parse_event_time)
        .map(|dt| dt.with_timezone(tz).format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_duration_breakpoints() {
        assert_eq!(format_duration(0.0), "0 ms");
        assert_eq!(format_duration(999.0), "999 ms");
        assert_eq!(format_duration(1000.0), "1.0s");
        assert_eq!(format_duration(1234.0), "1.2s");
        assert_eq!(format_duration(59_000.0), "59.0s");
        assert_eq!(format_duration(60_000.0), "1m 0s");
        assert_eq!(format_duration(125_400.0), "2m 5s");
    }

    #[test]
    fn test_duration_just_under_breakpoint_uses_next_unit() {
        assert_eq!(format_duration(999.4), "999 ms");
        assert_eq!(format_duration(999.6), "1.0s");
        assert_eq!(format_duration(59_940.0), "59.9s");
        assert_eq!(format_duration(59_960.0), "1m 0s");
    }

    #[test]
    fn test_display_timestamp_in_utc() {
        let ts = json!("2025-03-01T08:05:09Z");
        assert_eq!(display_timestamp_in(Some(&ts), &Utc), "08:05:09");
    }

    #[test]
    fn test_unusable_timestamp_is_empty() {
        assert_eq!(display_timestamp(Some(&json!("yesterday"))), "");
        assert_eq!(display_timestamp(Some(&json!({"t": 1}))), "");
        assert_eq!(display_timestamp(None), "");
    }

    #[test]
    fn test_display_timestamp_has_clock_shape() {
        let shown = display_timestamp(Some(&json!(1_700_000_000)));
        assert_eq!(shown.len(), 8);
        assert_eq!(shown.matches(':').count(), 2);
    }
}
