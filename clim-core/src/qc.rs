use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const QC_LOWER_BOUND: i32 = -1;
pub const QC_UPPER_BOUND: i32 = 18;
pub const MANUAL_ENTRY: i32 = 0;
pub const MISSING_QC: i32 = 9999;

/// Period value taken from a monthly summary message.
pub const VALUE_FROM_MSM: QcCode = QcCode::Computed(1);
/// Period value built from the daily database.
pub const VALUE_FROM_DAILY: QcCode = QcCode::Computed(2);

const MISSING_LABEL: &str = "Missing";

/// Provenance of a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QcCode {
    Missing,
    ManualEntry,
    Computed(i8),
}

impl QcCode {
    pub fn from_raw(raw: i32) -> Result<Self, CoreError> {
        match raw {
            MISSING_QC => Ok(QcCode::Missing),
            MANUAL_ENTRY => Ok(QcCode::ManualEntry),
            QC_LOWER_BOUND..=QC_UPPER_BOUND => Ok(QcCode::Computed(raw as i8)),
            _ => Err(CoreError::QcOutOfRange(raw)),
        }
    }

    pub fn raw(&self) -> i32 {
        match self {
            QcCode::Missing => MISSING_QC,
            QcCode::ManualEntry => MANUAL_ENTRY,
            QcCode::Computed(code) => i32::from(*code),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, QcCode::Missing)
    }

    /// Operator-facing description, e.g. `"Method: Entered Manually"`.
    pub fn describe(&self, value_type: QcValueType) -> String {
        let label = match self {
            QcCode::Missing => MISSING_LABEL,
            QcCode::ManualEntry => "Entered Manually",
            QcCode::Computed(code) => value_type
                .methods()
                .iter()
                .find(|(c, _)| c == code)
                .map(|(_, label)| *label)
                .unwrap_or(MISSING_LABEL),
        };
        format!("Method: {}", label)
    }
}

impl fmt::Display for QcCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw())
    }
}

impl TryFrom<i32> for QcCode {
    type Error = CoreError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        QcCode::from_raw(raw)
    }
}

/// The kind of quantity a QC code is attached to; computed codes mean
/// different methods for different quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QcValueType {
    Period,
    Temperature,
    Precip,
    Snow,
    SnowDepth,
    Wind,
    Gust,
    AvgWind,
    SkyCover,
    Sunshine,
    Weather,
}

impl QcValueType {
    fn methods(&self) -> &'static [(i8, &'static str)] {
        match self {
            QcValueType::Period => &[(1, "Monthly Summary Message"), (2, "Daily Database")],
            QcValueType::Temperature => &[
                (1, "Daily Summary Message"),
                (2, "24-Hour Temperature Group"),
                (3, "6-Hour Temperature Group"),
                (4, "Hourly Temperature"),
                (5, "Rounded Hourly Temperature"),
            ],
            QcValueType::Precip => &[
                (1, "Daily Summary Message"),
                (2, "6-Hour, 3-Hour, and Hourly Amounts"),
                (3, "6-Hour and 3-Hour Amounts"),
                (4, "6-Hour and Hourly Amounts"),
                (5, "3-Hour and Hourly Amounts"),
                (6, "6-Hour Amounts"),
                (7, "3-Hour Amounts"),
                (9, "Hourly Amounts"),
            ],
            QcValueType::Snow => &[
                (1, "Daily Summary Message"),
                (2, "Supplementary Climate Data"),
                (3, "Assumed"),
            ],
            QcValueType::SnowDepth => &[(1, "Daily Summary Message"), (12, "12Z METAR Report")],
            QcValueType::Wind => &[
                (1, "Daily Summary Message"),
                (2, "Special Wind"),
                (3, "Hourly Wind"),
            ],
            QcValueType::Gust => &[
                (1, "Daily Summary Message"),
                (4, "Peak Wind"),
                (5, "Hourly Gust"),
            ],
            QcValueType::AvgWind => &[
                (1, "Daily Summary Message"),
                (2, "Calculated from METAR Reports"),
            ],
            QcValueType::SkyCover | QcValueType::Sunshine => {
                &[(1, "Daily Summary Message"), (2, "Calculated")]
            }
            QcValueType::Weather => &[
                (1, "Daily Summary Message"),
                (2, "Hourly and Special Observations"),
                (3, "No Weather Reported"),
                (4, "DSM and Hourly Observations"),
            ],
        }
    }
}
