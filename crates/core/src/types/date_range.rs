//! Inclusive reporting period.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Error returned when a period ends before it starts.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("period start {start} is after period end {end}")]
pub struct DateRangeError {
    /// Requested start date.
    pub start: NaiveDate,
    /// Requested end date.
    pub end: NaiveDate,
}

/// A period of whole days, `start <= date <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a new inclusive range.
    ///
    /// # Errors
    ///
    /// Returns `DateRangeError` if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError { start, end });
        }
        Ok(Self { start, end })
    }

    /// First day of the period.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the period.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }
}

impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            start: NaiveDate,
            end: NaiveDate,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.start, raw.end).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_single_day() {
        let range = DateRange::new(date(2024, 5, 10), date(2024, 5, 10)).unwrap();
        assert_eq!(range.start(), range.end());
    }

    #[test]
    fn test_serializes_both_ends() {
        let range = DateRange::new(date(2024, 3, 1), date(2024, 3, 31)).unwrap();
        assert_eq!(
            serde_json::to_value(range).unwrap(),
            serde_json::json!({"start": "2024-03-01", "end": "2024-03-31"})
        );
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = DateRange::new(date(2024, 3, 2), date(2024, 3, 1)).unwrap_err();
        assert_eq!(err.start, date(2024, 3, 2));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Result<DateRange, _> =
            serde_json::from_str(r#"{"start":"2024-01-01","end":"2024-01-31"}"#);
        assert!(ok.is_ok());

        let inverted: Result<DateRange, _> =
            serde_json::from_str(r#"{"start":"2024-02-01","end":"2024-01-31"}"#);
        assert!(inverted.is_err());
    }
}
