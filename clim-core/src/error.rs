use thiserror::Error;

use crate::number::NumericKind;

/// Errors raised while building or parsing core climate values.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("QC code {0} is outside the legal range")]
    QcOutOfRange(i32),

    #[error("cannot parse {text:?} as {kind} value")]
    InvalidNumber { text: String, kind: NumericKind },

    #[error("cannot parse occurrence {0:?}")]
    InvalidOccurrence(String),

    #[error("hour {0} is not a valid hour of day")]
    InvalidHour(u32),

    #[error("{len} occurrences exceed capacity {capacity}")]
    CapacityExceeded { len: usize, capacity: usize },

    #[error("field {0} does not record occurrences")]
    NoOccurrences(&'static str),

    #[error("occurrence {occurrence} does not fit the date form of field {field}")]
    OccurrenceShape { field: &'static str, occurrence: String },

    #[error("unknown field {0:?}")]
    UnknownField(String),

    #[error("unknown field group {0:?}")]
    UnknownGroup(String),

    #[error("unknown period type {0:?}")]
    UnknownPeriodType(String),

    #[error("invalid station row: {0}")]
    InvalidStation(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
