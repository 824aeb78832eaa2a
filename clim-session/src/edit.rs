use clim_core::{FieldId, OccurrenceInput};
use clim_reconcile::origin::Origin;

/// A change made by the operator to one displayed field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    /// Text typed into the value box.
    Text { field: FieldId, text: String },
    /// One occurrence slot typed into.
    Occurrence {
        field: FieldId,
        slot: usize,
        input: OccurrenceInput,
    },
    /// A pick from the origin selector.
    SelectOrigin { field: FieldId, origin: Origin },
}

impl FieldEdit {
    pub fn field(&self) -> FieldId {
        match self {
            FieldEdit::Text { field, .. }
            | FieldEdit::Occurrence { field, .. }
            | FieldEdit::SelectOrigin { field, .. } => *field,
        }
    }

    /// Typing, as opposed to picking from the selector.
    pub fn is_typing(&self) -> bool {
        !matches!(self, FieldEdit::SelectOrigin { .. })
    }
}
