//! Core types for reviewing climate period reports.
//!
//! A period report carries, per station, one value for every reportable
//! field. Values come from the daily-build, from a monthly summary message
//! (MSM), or from the operator; this crate defines the shared vocabulary
//! those sources are expressed in.

pub mod error;
pub mod field;
pub mod number;
pub mod occurrence;
pub mod period;
pub mod qc;
pub mod record;
pub mod station;
pub mod value;

pub use error::CoreError;
pub use field::{FieldGroup, FieldId, FieldSpec};
pub use number::{Number, NumericKind};
pub use occurrence::{BoundedOccurrenceList, Occurrence, OccurrenceDate, OccurrenceInput, OccurrenceShape};
pub use period::{PeriodDesc, PeriodType};
pub use qc::QcCode;
pub use record::PeriodRecord;
pub use station::{Station, StationId};
pub use value::{FieldValue, SourceSet};
