//! Error types for schedule construction.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// Result type for capture-layer constructors.
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Errors raised while building schedules.
///
/// Decisions themselves never fail: these only come out of constructors and
/// deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// A window whose end is not after its start.
    #[error("privacy gap window must end after it starts ({start} .. {end})")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// A window that runs beyond the day after its schedule's date.
    #[error("privacy gap window ending {end} runs past the day after schedule date {date}")]
    WindowTooLong {
        date: NaiveDate,
        end: DateTime<Utc>,
    },

    /// A window that starts on a different day than its schedule.
    #[error("privacy gap window starting {start} does not belong to schedule date {date}")]
    WindowOutsideDate {
        date: NaiveDate,
        start: DateTime<Utc>,
    },
}
