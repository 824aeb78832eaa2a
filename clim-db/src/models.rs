//! Row-level types shared by the loaders and queries.

use std::fmt;

use clim_core::qc::{VALUE_FROM_DAILY, VALUE_FROM_MSM};
use clim_core::QcCode;

/// Which machine source a stored period value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueSource {
    /// Built from the daily observation database.
    Daily,
    /// Taken from a monthly summary message.
    MonthlySummary,
}

impl ValueSource {
    pub fn code(&self) -> &'static str {
        match self {
            ValueSource::Daily => "D",
            ValueSource::MonthlySummary => "M",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "D" | "d" => Some(ValueSource::Daily),
            "M" | "m" => Some(ValueSource::MonthlySummary),
            _ => None,
        }
    }

    /// QC recorded when a fixture row leaves the column blank.
    pub fn default_qc(&self) -> QcCode {
        match self {
            ValueSource::Daily => VALUE_FROM_DAILY,
            ValueSource::MonthlySummary => VALUE_FROM_MSM,
        }
    }
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
