//! Error type for the availability engine.

use crate::db::repository::RepositoryError;
use crate::models::{ClockTime, Weekday};

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised while generating grids, editing, mapping or saving a profile.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Slot duration was zero or negative.
    #[error("Invalid slot duration: {0} minutes")]
    InvalidDuration(i64),

    /// Persisted data could not be turned into a profile.
    #[error("Malformed availability record: {0}")]
    MalformedRecord(String),

    /// An interval has `start >= end` at save time.
    #[error("Inverted interval on {day} at index {index}: {start} is not before {end}")]
    InvertedInterval {
        day: Weekday,
        index: usize,
        start: ClockTime,
        end: ClockTime,
    },

    /// Two intervals of the same day overlap at save time.
    #[error("Overlapping intervals on {day}: interval {first} overlaps interval {second}")]
    OverlapOnSave {
        day: Weekday,
        first: usize,
        second: usize,
    },

    /// Date-range limit ends before it starts.
    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange {
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    },

    #[error("No interval at index {index} on {day}")]
    IntervalIndexOutOfRange { day: Weekday, index: usize },

    /// A mutation or save was attempted before the profile finished loading.
    #[error("Availability profile has not been loaded")]
    NotLoaded,

    /// Another save for the same session is still pending.
    #[error("A save is already in progress for this profile")]
    SaveInProgress,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl EngineError {
    /// True for failures the caller may retry unchanged.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Repository(err) => err.is_retryable(),
            Self::SaveInProgress => true,
            _ => false,
        }
    }

    /// True for errors the user fixes by editing the profile.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvertedInterval { .. } | Self::OverlapOnSave { .. } | Self::InvalidDateRange { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_identify_offender() {
        let err = EngineError::InvertedInterval {
            day: Weekday::Tuesday,
            index: 1,
            start: "12:00".parse().unwrap(),
            end: "11:00".parse().unwrap(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Tuesday"));
        assert!(msg.contains("index 1"));
        assert!(msg.contains("12:00"));
        assert!(err.is_validation());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_repository_errors_keep_retryability() {
        let err: EngineError = RepositoryError::connection("refused").into();
        assert!(err.is_retryable());
        let err: EngineError = RepositoryError::not_found("missing").into();
        assert!(!err.is_retryable());
    }
}
