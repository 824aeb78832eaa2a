//! Review session for one period report.
//!
//! `StationSession` owns every per-station map (monthly summaries, operator
//! values, saved records and mismatch approvals) and is driven by the
//! front end through station selection, field edits, saves and completion.
//! Everything outside the session is reached through the traits in
//! [`collaborators`].

pub mod collaborators;
pub mod display;
pub mod edit;
pub mod error;
mod save;
pub mod session;

pub use collaborators::{
    CompletionPayload, CompletionSink, OverwriteChoice, PeriodReport, Prompter,
    ReportDataProvider, SessionStateProvider,
};
pub use display::{DisplayState, DisplayedField};
pub use edit::FieldEdit;
pub use error::SessionError;
pub use session::StationSession;
