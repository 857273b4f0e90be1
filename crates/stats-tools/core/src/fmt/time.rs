//! Time rendering rules.

use chrono::{DateTime, Utc};

/// Parse an RFC 3339 string or a unix-seconds integer.
pub fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.with_timezone(&Utc));
    }
    ts.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

/// `Just now`, `<n>m ago`, `<n>h ago` or `<n>d ago` relative to `now`.
///
/// Unparsable input is returned unchanged.
pub fn relative_time(ts: &str, now: DateTime<Utc>) -> String {
    parse_timestamp(ts).map_or_else(|| ts.to_string(), |t| relative_to(t, now))
}

/// [`relative_time`] for a unix-seconds value.
pub fn relative_time_unix(secs: i64, now: DateTime<Utc>) -> String {
    DateTime::from_timestamp(secs, 0).map_or_else(|| secs.to_string(), |t| relative_to(t, now))
}

fn relative_to(t: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - t).num_minutes();
    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if minutes < 1440 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / 1440)
    }
}

/// `2024-04-20 00:09 UTC` for a unix-seconds value.
pub fn utc_date(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0).map_or_else(
        || secs.to_string(),
        |t| t.format("%Y-%m-%d %H:%M UTC").to_string(),
    )
}

/// Coarse duration: `3d 4h`, `5h 12m`, `12m`, or `<1m`.
pub fn approx_duration(secs: i64) -> String {
    let secs = secs.max(0);
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m")
    } else {
        "<1m".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn relative_buckets() {
        assert_eq!(relative_time("2025-01-10T11:59:30Z", now()), "Just now");
        assert_eq!(relative_time("2025-01-10T11:15:00Z", now()), "45m ago");
        assert_eq!(relative_time("2025-01-10T09:00:00Z", now()), "3h ago");
        assert_eq!(relative_time("2025-01-08T12:00:00Z", now()), "2d ago");
    }

    #[test]
    fn bucket_edges() {
        assert_eq!(relative_time("2025-01-10T11:59:00Z", now()), "1m ago");
        assert_eq!(relative_time("2025-01-10T11:00:00Z", now()), "1h ago");
        assert_eq!(relative_time("2025-01-09T12:00:00Z", now()), "1d ago");
    }

    #[test]
    fn unix_seconds_and_future() {
        let ts = (now().timestamp() - 600).to_string();
        assert_eq!(relative_time(&ts, now()), "10m ago");
        assert_eq!(relative_time_unix(now().timestamp() + 3600, now()), "Just now");
    }

    #[test]
    fn unparsable_is_rendered_as_is() {
        assert_eq!(relative_time("yesterday-ish", now()), "yesterday-ish");
    }

    #[test]
    fn dates_and_durations() {
        assert_eq!(utc_date(1_713_571_767), "2024-04-20 00:09 UTC");
        assert_eq!(approx_duration(3 * 86_400 + 4 * 3_600 + 59), "3d 4h");
        assert_eq!(approx_duration(5 * 3_600 + 12 * 60), "5h 12m");
        assert_eq!(approx_duration(30), "<1m");
    }
}
