use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local, Utc};
use std::fmt::Write;

/// Formats epoch-millisecond timestamps into chart and display labels.
///
/// With no fixed offset, labels follow the local timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labeler {
    pub time_format:      String,
    pub date_time_format: String,
    pub offset:           Option<FixedOffset>,
}

impl Default for Labeler {
    fn default() -> Self {
        Self {
            time_format:      "%H:%M:%S".to_string(),
            date_time_format: "%Y-%m-%d %H:%M".to_string(),
            offset:           None,
        }
    }
}

impl Labeler {
    /// Default formats pinned to UTC.
    pub fn utc() -> Self {
        Self {
            offset: FixedOffset::east_opt(0),
            ..Self::default()
        }
    }

    /// Time-of-day label, used for point-per-sample series.
    pub fn time_of_day(&self, ms: i64) -> String {
        self.format(ms, &self.time_format)
    }

    /// Date and time label, used for bucket starts and status timestamps.
    pub fn date_time(&self, ms: i64) -> String {
        self.format(ms, &self.date_time_format)
    }

    /// `true` when `pattern` is a strftime pattern chrono can render.
    pub fn is_valid_pattern(pattern: &str) -> bool {
        !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
    }

    fn format(&self, ms: i64, pattern: &str) -> String {
        let Some(at) = DateTime::<Utc>::from_timestamp_millis(ms) else {
            return ms.to_string();
        };
        let mut label = String::new();
        let written = match self.offset {
            Some(offset) => write!(label, "{}", at.with_timezone(&offset).format(pattern)),
            None => write!(label, "{}", at.with_timezone(&Local).format(pattern)),
        };
        match written {
            Ok(()) => label,
            Err(_) => ms.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_labels() {
        let labeler = Labeler::utc();
        assert_eq!(labeler.time_of_day(3_600_000), "01:00:00");
        assert_eq!(labeler.date_time(21_600_000), "1970-01-01 06:00");
    }

    #[test]
    fn fixed_offset_shifts_labels() {
        let labeler = Labeler {
            offset: FixedOffset::east_opt(2 * 3600),
            ..Labeler::default()
        };
        assert_eq!(labeler.time_of_day(0), "02:00:00");
    }

    #[test]
    fn bad_pattern_falls_back_to_raw_millis() {
        let labeler = Labeler {
            time_format: "%Q".to_string(),
            ..Labeler::utc()
        };
        assert!(!Labeler::is_valid_pattern("%Q"));
        assert!(Labeler::is_valid_pattern("%H:%M"));
        assert_eq!(labeler.time_of_day(1_000), "1000");
        assert_eq!(labeler.date_time(0), "1970-01-01 00:00");
    }
}
