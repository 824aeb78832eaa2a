//! Shared utility functions for the climate review crates.

/// Date utility functions
pub mod dates {
    use chrono::NaiveDate;

    /// Compact date format used by the report fixtures: "YYYYMMDD"
    pub const COMPACT_FORMAT: &str = "%Y%m%d";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
    }

    /// Format a NaiveDate as "YYYYMMDD"
    pub fn format_date_compact(date: &NaiveDate) -> String {
        date.format(COMPACT_FORMAT).to_string()
    }

    /// Parse a date string in "YYYYMMDD" format
    pub fn parse_date_compact(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, COMPACT_FORMAT)?)
    }

    /// Last calendar day of the given month.
    pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
    }

}

/// Rounding and tolerance helpers for climate values.
pub mod numeric {
    /// Tolerance used when comparing two floating point climate values.
    pub const EPSILON: f64 = 0.00001;

    /// Round to the nearest integer by biasing 0.51 away from zero and
    /// truncating.
    pub fn nint(value: f64) -> i64 {
        if value > 0.0 {
            (value + 0.51) as i64
        } else {
            (value - 0.51) as i64
        }
    }

    /// [`nint`] applied at the given number of decimal places.
    pub fn nint_decimals(value: f64, decimals: u32) -> f64 {
        let multiplier = 10f64.powi(decimals as i32);
        nint(value * multiplier) as f64 / multiplier
    }

    /// True if the two values differ by less than [`EPSILON`].
    pub fn floating_equals(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_nint_positive() {
            assert_eq!(nint(4.4), 4);
            assert_eq!(nint(4.5), 5);
            assert_eq!(nint(0.0), 0);
        }

        #[test]
        fn test_nint_negative() {
            assert_eq!(nint(-4.4), -4);
            assert_eq!(nint(-4.6), -5);
        }

        #[test]
        fn test_nint_decimals() {
            assert!(floating_equals(nint_decimals(45.26, 1), 45.3));
            assert!(floating_equals(nint_decimals(45.24, 1), 45.2));
        }

        #[test]
        fn test_floating_equals() {
            assert!(floating_equals(1.2, 1.2 + 0.000001));
            assert!(!floating_equals(1.2, 1.21));
        }
    }
}
