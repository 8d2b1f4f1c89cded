mod note_repository;
mod session_repository;
mod task_repository;

pub use note_repository::SqliteNoteRepository;
pub use session_repository::SqliteSessionRepository;
pub use task_repository::SqliteTaskRepository;

use chrono::{DateTime, SecondsFormat, Utc};

/// Fixed-width RFC 3339 so that stored timestamps sort lexicographically.
fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(index: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(
                index,
                rusqlite::types::Type::Text,
                Box::new(error),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_roundtrip_at_millisecond_precision() {
        let timestamp = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 1).unwrap()
            + chrono::Duration::milliseconds(250);

        let stored = format_timestamp(&timestamp);

        assert_eq!(stored, "2024-02-29T23:59:01.250Z");
        assert_eq!(parse_timestamp(0, &stored).unwrap(), timestamp);
    }

    #[test]
    fn stored_timestamps_sort_chronologically() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let later = earlier + chrono::Duration::milliseconds(5);

        assert!(format_timestamp(&earlier) < format_timestamp(&later));
    }

    #[test]
    fn invalid_timestamp_is_a_conversion_error() {
        assert!(parse_timestamp(3, "yesterday").is_err());
    }
}
