//! What the review screen shows for the current station.

use clim_core::qc::QcValueType;
use clim_core::{
    CoreError, FieldGroup, FieldId, FieldSpec, FieldValue, Number, Occurrence, OccurrenceInput,
    QcCode,
};
use clim_reconcile::origin::Origin;

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayedField {
    pub text: String,
    /// The exact scalar behind `text`; `None` once the operator has typed.
    pub scalar: Option<Number>,
    /// One input per occurrence slot; empty for fields without dates.
    pub occurrences: Vec<OccurrenceInput>,
    pub qc: QcCode,
    pub origin: Origin,
    /// Daily and monthly summary values disagree.
    pub mismatch: bool,
}

impl DisplayedField {
    fn cleared(spec: &FieldSpec) -> Self {
        DisplayedField {
            text: spec.format(&spec.missing),
            scalar: Some(spec.missing),
            occurrences: vec![OccurrenceInput::default(); spec.capacity()],
            qc: QcCode::Missing,
            origin: Origin::Other,
            mismatch: false,
        }
    }

    pub fn qc_description(&self) -> String {
        self.qc.describe(QcValueType::Period)
    }

    /// The shown scalar, unrounded unless the operator typed it.
    pub fn value(&self, spec: &FieldSpec) -> Result<Number, CoreError> {
        match self.scalar {
            Some(scalar) => Ok(scalar),
            None => spec.parse(&self.text),
        }
    }

    /// Replace the text with what the operator typed.
    pub(crate) fn type_text(&mut self, text: String) {
        self.text = text;
        self.scalar = None;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    fields: Vec<DisplayedField>,
    tab_mismatch: [bool; 5],
    dialog_mismatch: bool,
}

impl Default for DisplayState {
    fn default() -> Self {
        DisplayState::cleared()
    }
}

impl DisplayState {
    /// Every field missing, no flags.
    pub fn cleared() -> Self {
        DisplayState {
            fields: FieldId::ALL
                .iter()
                .map(|f| DisplayedField::cleared(f.spec()))
                .collect(),
            tab_mismatch: [false; 5],
            dialog_mismatch: false,
        }
    }

    pub fn field(&self, field: FieldId) -> &DisplayedField {
        &self.fields[field.index()]
    }

    pub(crate) fn field_mut(&mut self, field: FieldId) -> &mut DisplayedField {
        &mut self.fields[field.index()]
    }

    pub fn tab_mismatch(&self, group: FieldGroup) -> bool {
        self.tab_mismatch[group as usize]
    }

    pub fn dialog_mismatch(&self) -> bool {
        self.dialog_mismatch
    }

    /// Load a stored value into the field's text, occurrence inputs and QC.
    pub(crate) fn show(&mut self, field: FieldId, value: &FieldValue) {
        let spec = field.spec();
        let shown = self.field_mut(field);
        shown.text = spec.format(&value.scalar);
        shown.scalar = Some(value.scalar);
        shown.qc = value.qc;
        let stored = value.occurrence_slice();
        for (slot, input) in shown.occurrences.iter_mut().enumerate() {
            *input = stored
                .get(slot)
                .map(OccurrenceInput::from_occurrence)
                .unwrap_or_default();
        }
    }

    /// The displayed scalar and every complete occurrence, in slot order.
    pub fn displayed_value(&self, field: FieldId) -> Result<(Number, Vec<Occurrence>), CoreError> {
        let spec = field.spec();
        let shown = self.field(field);
        let scalar = shown.value(spec)?;
        Ok((scalar, collect_occurrences(spec, &shown.occurrences)))
    }

    /// Recompute per-tab and whole-report flags from the per-field ones.
    pub(crate) fn refresh_flags(&mut self) {
        for group in FieldGroup::ALL {
            self.tab_mismatch[group as usize] =
                group.fields().any(|f| self.fields[f.index()].mismatch);
        }
        self.dialog_mismatch = self.tab_mismatch.iter().any(|flag| *flag);
    }
}

/// Complete occurrences only; a slot with any required part blank is dropped.
pub fn collect_occurrences(spec: &FieldSpec, inputs: &[OccurrenceInput]) -> Vec<Occurrence> {
    match spec.occurrences {
        Some((shape, _)) => inputs.iter().filter_map(|i| i.complete(shape)).collect(),
        None => Vec::new(),
    }
}
