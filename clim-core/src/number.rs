use std::fmt;

use clim_utils::numeric::{floating_equals, nint_decimals};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const MISSING: i32 = 9999;
pub const MISSING_DEGREE_DAY: i32 = 99999;
pub const MISSING_FLOAT: f64 = 9999.0;
/// Internal encoding of a trace amount.
pub const TRACE: f64 = -1.0;
pub const TRACE_SYMBOL: &str = "T";
pub const MISSING_SYMBOL: &str = "M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericKind {
    Int,
    Float,
    /// Float that may also hold the trace state.
    TraceFloat,
}

impl fmt::Display for NumericKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NumericKind::Int => "integer",
            NumericKind::Float => "decimal",
            NumericKind::TraceFloat => "decimal or trace",
        };
        f.write_str(name)
    }
}

/// A scalar climate value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Number {
    Int(i32),
    Float(f64),
    Trace,
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(i) => f64::from(*i),
            Number::Float(f) => *f,
            Number::Trace => TRACE,
        }
    }

    /// Compare two scalars the way the review screens do: integers exactly,
    /// floats within epsilon after optional rounding to `decimals` places.
    /// Trace only ever equals trace.
    pub fn approx_eq(&self, other: &Number, decimals: Option<u32>) -> bool {
        match (self, other) {
            (Number::Trace, Number::Trace) => true,
            (Number::Trace, _) | (_, Number::Trace) => false,
            (Number::Int(a), Number::Int(b)) => a == b,
            _ => {
                let (a, b) = (self.as_f64(), other.as_f64());
                match decimals {
                    Some(d) => floating_equals(nint_decimals(a, d), nint_decimals(b, d)),
                    None => floating_equals(a, b),
                }
            }
        }
    }

    pub fn parse(text: &str, kind: NumericKind) -> Result<Number, CoreError> {
        let trimmed = text.trim();
        let invalid = || CoreError::InvalidNumber {
            text: text.to_string(),
            kind,
        };
        match kind {
            NumericKind::Int => trimmed.parse::<i32>().map(Number::Int).map_err(|_| invalid()),
            NumericKind::Float => match trimmed.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(Number::Float(value)),
                _ => Err(invalid()),
            },
            NumericKind::TraceFloat => {
                if trimmed.eq_ignore_ascii_case(TRACE_SYMBOL) {
                    return Ok(Number::Trace);
                }
                let value = trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(invalid)?;
                if floating_equals(value, TRACE) {
                    Ok(Number::Trace)
                } else {
                    Ok(Number::Float(value))
                }
            }
        }
    }

    pub fn format(&self, decimals: u32) -> String {
        match self {
            Number::Int(i) => i.to_string(),
            Number::Float(f) => format!("{:.*}", decimals as usize, f),
            Number::Trace => TRACE_SYMBOL.to_string(),
        }
    }
}
