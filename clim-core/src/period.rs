use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use clim_utils::dates::{format_date, last_day_of_month};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodType {
    MonthlyNwws,
    MonthlyRadio,
    SeasonalNwws,
    SeasonalRadio,
    AnnualNwws,
    AnnualRadio,
}

impl PeriodType {
    pub const ALL: [PeriodType; 6] = [
        PeriodType::MonthlyNwws,
        PeriodType::MonthlyRadio,
        PeriodType::SeasonalNwws,
        PeriodType::SeasonalRadio,
        PeriodType::AnnualNwws,
        PeriodType::AnnualRadio,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            PeriodType::MonthlyNwws => "monthly-nwws",
            PeriodType::MonthlyRadio => "monthly-radio",
            PeriodType::SeasonalNwws => "seasonal-nwws",
            PeriodType::SeasonalRadio => "seasonal-radio",
            PeriodType::AnnualNwws => "annual-nwws",
            PeriodType::AnnualRadio => "annual-radio",
        }
    }

    pub fn is_monthly(&self) -> bool {
        matches!(self, PeriodType::MonthlyNwws | PeriodType::MonthlyRadio)
    }

    fn months(&self) -> u32 {
        match self {
            PeriodType::MonthlyNwws | PeriodType::MonthlyRadio => 1,
            PeriodType::SeasonalNwws | PeriodType::SeasonalRadio => 3,
            PeriodType::AnnualNwws | PeriodType::AnnualRadio => 12,
        }
    }

    pub fn summary_label(&self) -> &'static str {
        match self.months() {
            1 => "Monthly",
            3 => "Seasonal",
            _ => "Annual",
        }
    }
}

impl FromStr for PeriodType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        PeriodType::ALL
            .into_iter()
            .find(|p| p.key() == wanted)
            .ok_or_else(|| CoreError::UnknownPeriodType(s.to_string()))
    }
}

/// The period a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodDesc {
    pub period_type: PeriodType,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// The dates do not span whole calendar months for the type; such
    /// reports can be reviewed but not saved or completed.
    pub custom: bool,
}

impl PeriodDesc {
    pub fn new(period_type: PeriodType, start: NaiveDate, end: NaiveDate) -> Self {
        let custom = !spans_whole_months(start, end, period_type.months());
        PeriodDesc {
            period_type,
            start,
            end,
            custom,
        }
    }

    /// The calendar month starting on `start`, as a monthly report.
    pub fn month(period_type: PeriodType, year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = last_day_of_month(year, month)?;
        Some(PeriodDesc::new(period_type, start, end))
    }

    /// Monthly summary messages only exist for complete monthly periods.
    pub fn supports_msm(&self) -> bool {
        self.period_type.is_monthly() && !self.custom
    }
}

fn spans_whole_months(start: NaiveDate, end: NaiveDate, months: u32) -> bool {
    if start.day() != 1 {
        return false;
    }
    let last_month0 = start.month0() + months - 1;
    let year = start.year() + (last_month0 / 12) as i32;
    let month = last_month0 % 12 + 1;
    last_day_of_month(year, month) == Some(end)
}

impl fmt::Display for PeriodDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} to {}",
            self.period_type.summary_label(),
            format_date(&self.start),
            format_date(&self.end)
        )?;
        if self.custom {
            write!(f, " (custom)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monthly_period() {
        let period = PeriodDesc::month(PeriodType::MonthlyNwws, 2024, 2).unwrap();
        assert_eq!(period.end, date(2024, 2, 29));
        assert!(!period.custom);
        assert!(period.supports_msm());
    }

    #[test]
    fn test_custom_monthly_period() {
        let period = PeriodDesc::new(PeriodType::MonthlyRadio, date(2023, 7, 1), date(2023, 7, 15));
        assert!(period.custom);
        assert!(!period.supports_msm());
    }

    #[test]
    fn test_seasonal_crossing_year() {
        let period = PeriodDesc::new(PeriodType::SeasonalNwws, date(2023, 12, 1), date(2024, 2, 29));
        assert!(!period.custom);
        assert!(!period.supports_msm());
        assert_eq!(period.period_type.summary_label(), "Seasonal");
    }

    #[test]
    fn test_annual_period() {
        let period = PeriodDesc::new(PeriodType::AnnualNwws, date(2023, 1, 1), date(2023, 12, 31));
        assert!(!period.custom);
        let period = PeriodDesc::new(PeriodType::AnnualNwws, date(2023, 1, 1), date(2023, 11, 30));
        assert!(period.custom);
    }

    #[test]
    fn test_period_type_parse() {
        assert_eq!("Monthly-NWWS".parse::<PeriodType>().unwrap(), PeriodType::MonthlyNwws);
        assert!("weekly".parse::<PeriodType>().is_err());
    }

    #[test]
    fn test_display() {
        let period = PeriodDesc::month(PeriodType::MonthlyNwws, 2023, 7).unwrap();
        assert_eq!(period.to_string(), "Monthly 2023-07-01 to 2023-07-31");
    }
}
