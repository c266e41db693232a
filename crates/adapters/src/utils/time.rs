use crate::traits::UnixMillis;
use chrono::{DateTime, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

/// Parses an ISO-8601 / RFC 3339 datetime into Unix milliseconds
pub fn parse8601(datetime: &str) -> Option<UnixMillis> {
    DateTime::parse_from_rfc3339(datetime.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc).timestamp_millis())
}

pub fn iso8601(timestamp: UnixMillis) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(timestamp)
        .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
}

pub fn now_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse8601_with_and_without_fraction() {
        assert_eq!(parse8601("2019-02-01T18:44:21Z"), Some(1_549_046_661_000));
        assert_eq!(parse8601("2018-09-08T19:57:29.207282Z"), Some(1_536_436_649_207));
        assert_eq!(parse8601("not a date"), None);
    }

    #[test]
    fn test_iso8601_round_trip() {
        let ts = 1_549_046_661_000;
        let text = iso8601(ts).unwrap();
        assert_eq!(text, "2019-02-01T18:44:21.000Z");
        assert_eq!(parse8601(&text), Some(ts));
    }
}
