//! Reconciliation of period values from competing sources.
//!
//! Both functions here are pure: they look at the candidate values and say
//! which source a displayed value came from, or whether the two machine
//! sources disagree.

pub mod policy;

pub use policy::{GroupPolicy, PolicyError, PriorityPolicy, Source};

/// Which source a displayed value equals.
pub mod origin {
    use std::fmt;

    use clim_core::occurrence::equal_up_to_capacity;
    use clim_core::{FieldSpec, FieldValue, Number, Occurrence, SourceSet};
    use serde::{Deserialize, Serialize};

    use crate::policy::{PolicyError, Source};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum Origin {
        MonthlySummaryMessage,
        DailyDatabase,
        Other,
    }

    impl Origin {
        pub fn key(&self) -> &'static str {
            match self {
                Origin::MonthlySummaryMessage => "msm",
                Origin::DailyDatabase => "daily",
                Origin::Other => "other",
            }
        }
    }

    impl From<Source> for Origin {
        fn from(source: Source) -> Self {
            match source {
                Source::MonthlySummary => Origin::MonthlySummaryMessage,
                Source::Daily => Origin::DailyDatabase,
            }
        }
    }

    impl fmt::Display for Origin {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let label = match self {
                Origin::MonthlySummaryMessage => "Monthly Summary Message",
                Origin::DailyDatabase => "Daily DB",
                Origin::Other => "Other",
            };
            f.write_str(label)
        }
    }

    impl std::str::FromStr for Origin {
        type Err = PolicyError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.trim().to_ascii_lowercase().as_str() {
                "msm" => Ok(Origin::MonthlySummaryMessage),
                "daily" => Ok(Origin::DailyDatabase),
                "other" => Ok(Origin::Other),
                _ => Err(PolicyError::UnknownOrigin(s.to_string())),
            }
        }
    }

    /// True when `candidate` equals the displayed scalar and, for fields with
    /// dates, the displayed occurrences up to the field's capacity.
    pub fn matches(
        spec: &FieldSpec,
        scalar: &Number,
        occurrences: &[Occurrence],
        candidate: &FieldValue,
    ) -> bool {
        let capacity = spec.capacity();
        candidate.scalar.approx_eq(scalar, spec.compare_decimals)
            && (capacity == 0
                || equal_up_to_capacity(candidate.occurrence_slice(), occurrences, capacity))
    }

    /// Try the machine sources in `order`; the first one equal to the
    /// displayed value is its origin. No match means the value is the
    /// operator's.
    pub fn resolve(
        spec: &FieldSpec,
        scalar: &Number,
        occurrences: &[Occurrence],
        sources: &SourceSet<'_>,
        order: &[Source; 2],
    ) -> Origin {
        for source in order {
            let candidate = match source {
                Source::Daily => Some(sources.daily),
                Source::MonthlySummary => sources.msm,
            };
            if let Some(candidate) = candidate {
                if matches(spec, scalar, occurrences, candidate) {
                    return Origin::from(*source);
                }
            }
        }
        Origin::Other
    }

}

/// Disagreement between the daily database and the monthly summary message.
pub mod mismatch {
    use clim_core::occurrence::equal_up_to_capacity;
    use clim_core::{FieldId, FieldSpec, FieldValue, PeriodRecord};

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum MismatchResult<'a> {
        Matched,
        NotMatched {
            daily: &'a FieldValue,
            msm: &'a FieldValue,
        },
    }

    impl MismatchResult<'_> {
        pub fn is_mismatch(&self) -> bool {
            matches!(self, MismatchResult::NotMatched { .. })
        }
    }

    /// Compare the two machine values of one field. Nothing to compare when
    /// either is absent or missing.
    pub fn detect<'a>(
        spec: &FieldSpec,
        daily: Option<&'a FieldValue>,
        msm: Option<&'a FieldValue>,
    ) -> MismatchResult<'a> {
        let (daily, msm) = match (daily, msm) {
            (Some(d), Some(m)) => (d, m),
            _ => return MismatchResult::Matched,
        };
        if spec.is_missing(&daily.scalar) || spec.is_missing(&msm.scalar) {
            return MismatchResult::Matched;
        }
        if !daily.scalar.approx_eq(&msm.scalar, spec.compare_decimals) {
            return MismatchResult::NotMatched { daily, msm };
        }
        let capacity = spec.capacity();
        if capacity > 0
            && !equal_up_to_capacity(daily.occurrence_slice(), msm.occurrence_slice(), capacity)
        {
            return MismatchResult::NotMatched { daily, msm };
        }
        MismatchResult::Matched
    }

    /// Every field reported by both sources whose values disagree.
    pub fn record_mismatches<'a>(
        daily: &'a PeriodRecord,
        msm: &'a PeriodRecord,
    ) -> Vec<(FieldId, &'a FieldValue, &'a FieldValue)> {
        FieldId::ALL
            .into_iter()
            .filter(|f| f.spec().has_msm)
            .filter_map(|f| match detect(f.spec(), Some(daily.get(f)), Some(msm.get(f))) {
                MismatchResult::NotMatched { daily, msm } => Some((f, daily, msm)),
                MismatchResult::Matched => None,
            })
            .collect()
    }

}
