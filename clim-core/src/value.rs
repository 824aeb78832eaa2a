use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::field::FieldSpec;
use crate::number::Number;
use crate::occurrence::{BoundedOccurrenceList, Occurrence};
use crate::qc::QcCode;

/// One field's stored value with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub scalar: Number,
    pub occurrences: Option<BoundedOccurrenceList>,
    pub qc: QcCode,
}

impl FieldValue {
    pub fn missing(spec: &FieldSpec) -> Self {
        FieldValue {
            scalar: spec.missing,
            occurrences: spec.occurrences.map(|(_, capacity)| BoundedOccurrenceList::new(capacity)),
            qc: QcCode::Missing,
        }
    }

    /// Build a value for `spec`. A missing scalar always carries
    /// [`QcCode::Missing`], whatever `qc` says.
    pub fn new(
        spec: &FieldSpec,
        scalar: Number,
        occurrences: Vec<Occurrence>,
        qc: QcCode,
    ) -> Result<Self, CoreError> {
        let occurrences = match spec.occurrences {
            Some((shape, capacity)) => {
                if let Some(bad) = occurrences.iter().find(|o| !shape.accepts(o)) {
                    return Err(CoreError::OccurrenceShape {
                        field: spec.key,
                        occurrence: bad.to_string(),
                    });
                }
                Some(BoundedOccurrenceList::try_from_vec(capacity, occurrences)?)
            }
            None if occurrences.is_empty() => None,
            None => return Err(CoreError::NoOccurrences(spec.key)),
        };
        let qc = if spec.is_missing(&scalar) { QcCode::Missing } else { qc };
        Ok(FieldValue {
            scalar,
            occurrences,
            qc,
        })
    }

    pub fn occurrence_slice(&self) -> &[Occurrence] {
        self.occurrences
            .as_ref()
            .map(BoundedOccurrenceList::as_slice)
            .unwrap_or(&[])
    }

    /// QC is missing exactly when the scalar is.
    pub fn is_qc_consistent(&self, spec: &FieldSpec) -> bool {
        self.qc.is_missing() == spec.is_missing(&self.scalar)
    }
}

/// The candidate values for one field of one station.
#[derive(Debug, Clone, Copy)]
pub struct SourceSet<'a> {
    pub daily: &'a FieldValue,
    pub msm: Option<&'a FieldValue>,
    pub other: &'a FieldValue,
}
