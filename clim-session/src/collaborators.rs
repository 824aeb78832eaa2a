use std::collections::{BTreeMap, BTreeSet};

use clim_core::{PeriodDesc, PeriodRecord, Station, StationId};
use serde::Serialize;

/// A period report as built from the daily database.
#[derive(Debug, Clone)]
pub struct PeriodReport {
    pub period: PeriodDesc,
    /// Stations in report order.
    pub stations: Vec<Station>,
    pub daily: BTreeMap<StationId, PeriodRecord>,
}

/// Source of monthly summary message values.
pub trait ReportDataProvider {
    fn monthly_summary(&self, station_id: StationId, period: &PeriodDesc) -> anyhow::Result<PeriodRecord>;
}

/// Answer to the prompt shown when a saved station's daily values disagree
/// with its monthly summary message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteChoice {
    Yes,
    YesToAll,
    No,
}

/// Operator confirmations.
pub trait Prompter {
    /// Switching stations would drop unsaved edits on `station`.
    fn confirm_discard(&mut self, station: &Station) -> bool;
    fn overwrite_daily_with_msm(&mut self, station: &Station) -> OverwriteChoice;
    fn confirm_accept(&mut self) -> bool;
    fn confirm_abort(&mut self) -> bool;
    fn confirm_close(&mut self) -> bool;
}

pub trait SessionStateProvider {
    fn is_writable(&self) -> bool;
}

impl SessionStateProvider for bool {
    fn is_writable(&self) -> bool {
        *self
    }
}

/// Receives the outcome of the review workflow.
pub trait CompletionSink {
    fn complete(&mut self, payload: CompletionPayload) -> anyhow::Result<()>;
    fn abort(&mut self, reason: &str) -> anyhow::Result<()>;
}

/// What the session hands on when the operator accepts the report.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionPayload {
    pub period: PeriodDesc,
    /// Saved record per station, or the daily record if never saved.
    pub records: Vec<PeriodRecord>,
    pub original: Vec<PeriodRecord>,
    /// Stations whose daily values were approved for overwrite by the
    /// monthly summary message.
    pub approved_stations: BTreeSet<StationId>,
}
