use chrono::{DateTime, FixedOffset};

/// hh.ru sends `2024-03-01T10:00:00+0300`; RFC 3339 offsets are accepted too.
pub fn parse_published_at(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
}

/// Calendar date in the timestamp's own offset.
pub fn to_calendar_date(dt: &DateTime<FixedOffset>) -> String {
    dt.format("%Y-%m-%d").to_string()
}
