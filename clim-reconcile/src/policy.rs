//! Per-group source priority.
//!
//! Temperature and wind values are trusted from the daily database first;
//! precipitation, snow and sky/weather from the monthly summary message.
//! Overrides come from a headerless CSV of `group,first,second[,first_visit]`.

use std::fmt;
use std::str::FromStr;

use clim_core::qc::{VALUE_FROM_DAILY, VALUE_FROM_MSM};
use clim_core::{FieldGroup, QcCode};
use csv::ReaderBuilder;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A machine-computed value source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    MonthlySummary,
    Daily,
}

impl Source {
    pub fn key(&self) -> &'static str {
        match self {
            Source::MonthlySummary => "msm",
            Source::Daily => "daily",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Source {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "msm" => Ok(Source::MonthlySummary),
            "daily" => Ok(Source::Daily),
            _ => Err(PolicyError::UnknownSource(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("unknown field group {0:?}")]
    UnknownGroup(String),

    #[error("unknown source {0:?}")]
    UnknownSource(String),

    #[error("unknown origin {0:?}")]
    UnknownOrigin(String),

    #[error("group {0} lists source {1} twice")]
    DuplicateSource(FieldGroup, Source),

    #[error("group {0} is configured more than once")]
    DuplicateGroup(FieldGroup),

    #[error("row {row}: expected group,first,second[,first_visit]")]
    Malformed { row: usize },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPolicy {
    /// Order in which sources are tried when resolving an origin.
    pub order: [Source; 2],
    /// Source selected on a station's first load when it has a value.
    pub first_visit: Source,
}

impl GroupPolicy {
    /// Resolution order for a stored value. A value stamped with one
    /// machine source's QC code tries that source first, so equal sources
    /// reload as the one that was saved.
    pub fn order_for(&self, qc: QcCode) -> [Source; 2] {
        if qc == VALUE_FROM_MSM {
            [Source::MonthlySummary, Source::Daily]
        } else if qc == VALUE_FROM_DAILY {
            [Source::Daily, Source::MonthlySummary]
        } else {
            self.order
        }
    }

    fn default_for(group: FieldGroup) -> Self {
        let order = match group {
            FieldGroup::Temperature | FieldGroup::Wind => [Source::Daily, Source::MonthlySummary],
            FieldGroup::Precipitation | FieldGroup::Snow | FieldGroup::SkyWeather => {
                [Source::MonthlySummary, Source::Daily]
            }
        };
        GroupPolicy {
            order,
            first_visit: Source::MonthlySummary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityPolicy {
    groups: [GroupPolicy; 5],
}

impl Default for PriorityPolicy {
    fn default() -> Self {
        PriorityPolicy {
            groups: FieldGroup::ALL.map(GroupPolicy::default_for),
        }
    }
}

impl PriorityPolicy {
    pub fn for_group(&self, group: FieldGroup) -> &GroupPolicy {
        &self.groups[group_index(group)]
    }

    /// Defaults with the groups listed in `csv_object` replaced.
    pub fn from_csv(csv_object: &str) -> Result<Self, PolicyError> {
        let mut policy = PriorityPolicy::default();
        let mut seen: Vec<FieldGroup> = Vec::new();
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .from_reader(csv_object.as_bytes());
        for (row_index, row) in rdr.records().enumerate() {
            let record = row?;
            let row = row_index + 1;
            if record.len() < 3 || record.len() > 4 {
                return Err(PolicyError::Malformed { row });
            }
            let group_text = record.get(0).unwrap_or_default();
            let group = FieldGroup::from_str(group_text)
                .map_err(|_| PolicyError::UnknownGroup(group_text.to_string()))?;
            if seen.contains(&group) {
                return Err(PolicyError::DuplicateGroup(group));
            }
            seen.push(group);

            let first: Source = record.get(1).unwrap_or_default().parse()?;
            let second: Source = record.get(2).unwrap_or_default().parse()?;
            if first == second {
                return Err(PolicyError::DuplicateSource(group, first));
            }
            let first_visit = match record.get(3) {
                Some(text) => text.parse()?,
                None => Source::MonthlySummary,
            };
            debug!("policy for {}: {} then {}, first visit {}", group, first, second, first_visit);
            policy.groups[group_index(group)] = GroupPolicy {
                order: [first, second],
                first_visit,
            };
        }
        Ok(policy)
    }
}

fn group_index(group: FieldGroup) -> usize {
    group as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_orders() {
        let policy = PriorityPolicy::default();
        assert_eq!(
            policy.for_group(FieldGroup::Temperature).order,
            [Source::Daily, Source::MonthlySummary]
        );
        assert_eq!(
            policy.for_group(FieldGroup::Wind).order,
            [Source::Daily, Source::MonthlySummary]
        );
        for group in [FieldGroup::Precipitation, FieldGroup::Snow, FieldGroup::SkyWeather] {
            assert_eq!(
                policy.for_group(group).order,
                [Source::MonthlySummary, Source::Daily]
            );
        }
        assert!(FieldGroup::ALL
            .iter()
            .all(|g| policy.for_group(*g).first_visit == Source::MonthlySummary));
    }

    #[test]
    fn test_order_for_saved_qc() {
        let policy = PriorityPolicy::default();
        let temperature = policy.for_group(FieldGroup::Temperature);
        assert_eq!(
            temperature.order_for(VALUE_FROM_MSM),
            [Source::MonthlySummary, Source::Daily]
        );
        assert_eq!(temperature.order_for(VALUE_FROM_DAILY), temperature.order);
        assert_eq!(temperature.order_for(QcCode::ManualEntry), temperature.order);

        let precip = policy.for_group(FieldGroup::Precipitation);
        assert_eq!(
            precip.order_for(VALUE_FROM_DAILY),
            [Source::Daily, Source::MonthlySummary]
        );
        assert_eq!(precip.order_for(QcCode::Computed(4)), precip.order);
    }

    #[test]
    fn test_from_csv_overrides() {
        let csv_data = "\
# group,first,second,first_visit
temperature,msm,daily
snow,daily,msm,daily
";
        let policy = PriorityPolicy::from_csv(csv_data).unwrap();
        assert_eq!(
            policy.for_group(FieldGroup::Temperature).order,
            [Source::MonthlySummary, Source::Daily]
        );
        assert_eq!(policy.for_group(FieldGroup::Snow).first_visit, Source::Daily);
        assert_eq!(
            policy.for_group(FieldGroup::Precipitation),
            PriorityPolicy::default().for_group(FieldGroup::Precipitation)
        );
    }

    #[test]
    fn test_from_csv_errors() {
        assert!(matches!(
            PriorityPolicy::from_csv("tides,msm,daily\n"),
            Err(PolicyError::UnknownGroup(_))
        ));
        assert!(matches!(
            PriorityPolicy::from_csv("wind,daily,daily\n"),
            Err(PolicyError::DuplicateSource(FieldGroup::Wind, Source::Daily))
        ));
        assert!(matches!(
            PriorityPolicy::from_csv("wind,daily,msm\nwind,msm,daily\n"),
            Err(PolicyError::DuplicateGroup(FieldGroup::Wind))
        ));
        assert!(matches!(
            PriorityPolicy::from_csv("wind,daily\n"),
            Err(PolicyError::Malformed { row: 1 })
        ));
        assert!(matches!(
            PriorityPolicy::from_csv("wind,daily,other\n"),
            Err(PolicyError::UnknownSource(_))
        ));
    }
}
