use std::collections::{BTreeMap, BTreeSet};

use clim_core::{
    FieldId, FieldValue, PeriodDesc, PeriodRecord, QcCode, SourceSet, Station, StationId,
};
use clim_reconcile::mismatch::detect;
use clim_reconcile::origin::{resolve, Origin};
use clim_reconcile::{PriorityPolicy, Source};
use log::{debug, info, warn};

use crate::collaborators::{
    CompletionPayload, CompletionSink, PeriodReport, Prompter, ReportDataProvider,
    SessionStateProvider,
};
use crate::display::{collect_occurrences, DisplayState};
use crate::edit::FieldEdit;
use crate::error::SessionError;

/// Review state for one period report.
///
/// Monthly summary values are fetched once per station and never change.
/// Operator values are created on a station's first visit, and the first
/// visit also saves the machine selection so every visited station has a
/// saved record. Mismatch approvals are only ever added.
pub struct StationSession<P, Q, S> {
    period: PeriodDesc,
    stations: Vec<Station>,
    daily: BTreeMap<StationId, PeriodRecord>,
    policy: PriorityPolicy,
    provider: P,
    prompter: Q,
    state: S,
    pub(crate) current: Option<StationId>,
    pub(crate) unsaved_changes: bool,
    pub(crate) loading: bool,
    /// `None` records a failed or unsupported fetch.
    msm_by_station: BTreeMap<StationId, Option<PeriodRecord>>,
    pub(crate) other_by_station: BTreeMap<StationId, PeriodRecord>,
    pub(crate) saved_by_station: BTreeMap<StationId, PeriodRecord>,
    pub(crate) mismatch_approved: BTreeSet<StationId>,
    pub(crate) display: DisplayState,
    completed: bool,
    missing_record: PeriodRecord,
}

impl<P, Q, S> StationSession<P, Q, S>
where
    P: ReportDataProvider,
    Q: Prompter,
    S: SessionStateProvider,
{
    pub fn new(report: PeriodReport, policy: PriorityPolicy, provider: P, prompter: Q, state: S) -> Self {
        let PeriodReport {
            period,
            stations,
            mut daily,
        } = report;
        for station in stations.iter() {
            daily
                .entry(station.inform_id)
                .or_insert_with(|| PeriodRecord::missing(station.inform_id));
        }
        info!("opening {} review for {} stations", period, stations.len());
        StationSession {
            period,
            stations,
            daily,
            policy,
            provider,
            prompter,
            state,
            current: None,
            unsaved_changes: false,
            loading: false,
            msm_by_station: BTreeMap::new(),
            other_by_station: BTreeMap::new(),
            saved_by_station: BTreeMap::new(),
            mismatch_approved: BTreeSet::new(),
            display: DisplayState::cleared(),
            completed: false,
            missing_record: PeriodRecord::missing(0),
        }
    }

    pub fn period(&self) -> &PeriodDesc {
        &self.period
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn policy(&self) -> &PriorityPolicy {
        &self.policy
    }

    pub fn current_station(&self) -> Option<&Station> {
        self.current.and_then(|id| self.station(id))
    }

    pub fn unsaved_changes(&self) -> bool {
        self.unsaved_changes
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_writable(&self) -> bool {
        self.state.is_writable()
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn daily(&self, station_id: StationId) -> Option<&PeriodRecord> {
        self.daily.get(&station_id)
    }

    pub fn monthly_summary(&self, station_id: StationId) -> Option<&PeriodRecord> {
        self.msm_by_station.get(&station_id).and_then(Option::as_ref)
    }

    pub fn other(&self, station_id: StationId) -> Option<&PeriodRecord> {
        self.other_by_station.get(&station_id)
    }

    pub fn saved(&self, station_id: StationId) -> Option<&PeriodRecord> {
        self.saved_by_station.get(&station_id)
    }

    pub fn approved_stations(&self) -> &BTreeSet<StationId> {
        &self.mismatch_approved
    }

    pub fn prompter(&self) -> &Q {
        &self.prompter
    }

    pub fn prompter_mut(&mut self) -> &mut Q {
        &mut self.prompter
    }

    /// Operator saves need a writable report, a selected station and a
    /// complete period.
    pub fn can_save(&self) -> bool {
        self.is_writable() && self.current.is_some() && !self.period.custom
    }

    pub(crate) fn station(&self, station_id: StationId) -> Option<&Station> {
        self.stations.iter().find(|s| s.inform_id == station_id)
    }

    /// Switch the review to another station. Returns `false` when nothing
    /// changed: the station was already current, or the operator chose to
    /// keep unsaved edits.
    pub fn select_station(&mut self, station_id: StationId) -> Result<bool, SessionError> {
        if self.station(station_id).is_none() {
            return Err(SessionError::UnknownStation(station_id));
        }
        if self.current == Some(station_id) {
            return Ok(false);
        }
        if let Some(previous) = self.current {
            if self.unsaved_changes && self.is_writable() {
                let station = self
                    .station(previous)
                    .cloned()
                    .ok_or(SessionError::UnknownStation(previous))?;
                if !self.prompter.confirm_discard(&station) {
                    debug!("kept unsaved edits on station {}", previous);
                    return Ok(false);
                }
            }
        }
        self.load_station(station_id)?;
        Ok(true)
    }

    /// Load `station_id` into the display without asking about unsaved
    /// edits.
    pub(crate) fn load_station(&mut self, station_id: StationId) -> Result<(), SessionError> {
        self.loading = true;
        self.current = Some(station_id);
        self.display = DisplayState::cleared();

        let result = match self.saved_by_station.get(&station_id).cloned() {
            Some(saved) => {
                info!("loading saved values for station {}", station_id);
                self.show_saved(station_id, &saved);
                Ok(())
            }
            None => self.first_visit(station_id),
        };

        self.loading = false;
        self.unsaved_changes = false;
        result
    }

    fn show_saved(&mut self, station_id: StationId, saved: &PeriodRecord) {
        for field in FieldId::ALL {
            let value = saved.get(field);
            self.display.show(field, value);
            let order = self.policy.for_group(field.spec().group).order_for(value.qc);
            let origin = self.resolve_displayed(station_id, field, &order);
            self.display.field_mut(field).origin = origin;
        }
        self.detect_mismatches(station_id);
    }

    fn first_visit(&mut self, station_id: StationId) -> Result<(), SessionError> {
        info!("first visit to station {}", station_id);
        self.other_by_station
            .entry(station_id)
            .or_insert_with(|| PeriodRecord::missing(station_id));
        self.fetch_monthly_summary(station_id);

        for field in FieldId::ALL {
            let spec = field.spec();
            let daily = self.daily_value(station_id, field).clone();
            self.display.show(field, &daily);
            let msm = self
                .msm_value(station_id, field)
                .filter(|v| !spec.is_missing(&v.scalar))
                .cloned();
            let preferred = self.policy.for_group(spec.group).first_visit;
            if let (Some(msm), Source::MonthlySummary) = (msm, preferred) {
                self.display.show(field, &msm);
            }
            // Equal sources resolve to the higher priority one; show its QC.
            let order = self.policy.for_group(spec.group).order;
            let origin = self.resolve_displayed(station_id, field, &order);
            if let Some(value) = self.machine_value(station_id, field, origin).cloned() {
                self.display.show(field, &value);
            }
            self.display.field_mut(field).origin = origin;
        }
        self.detect_mismatches(station_id);
        self.save_programmatic(station_id)
    }

    fn fetch_monthly_summary(&mut self, station_id: StationId) {
        if !self.period.supports_msm() || self.msm_by_station.contains_key(&station_id) {
            return;
        }
        let fetched = match self.provider.monthly_summary(station_id, &self.period) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(
                    "no monthly summary message for station {}: {:#}",
                    station_id, e
                );
                None
            }
        };
        self.msm_by_station.insert(station_id, fetched);
    }

    fn detect_mismatches(&mut self, station_id: StationId) {
        for field in FieldId::ALL {
            let mismatch = detect(
                field.spec(),
                Some(self.daily_value(station_id, field)),
                self.msm_value(station_id, field),
            )
            .is_mismatch();
            self.display.field_mut(field).mismatch = mismatch;
        }
        self.display.refresh_flags();
    }

    pub(crate) fn daily_value(&self, station_id: StationId, field: FieldId) -> &FieldValue {
        self.daily
            .get(&station_id)
            .unwrap_or(&self.missing_record)
            .get(field)
    }

    /// The stored value behind a machine origin.
    pub(crate) fn machine_value(
        &self,
        station_id: StationId,
        field: FieldId,
        origin: Origin,
    ) -> Option<&FieldValue> {
        match origin {
            Origin::MonthlySummaryMessage => self.msm_value(station_id, field),
            Origin::DailyDatabase => Some(self.daily_value(station_id, field)),
            Origin::Other => None,
        }
    }

    /// The monthly summary value, if the field has one and it was fetched.
    pub(crate) fn msm_value(&self, station_id: StationId, field: FieldId) -> Option<&FieldValue> {
        if !field.spec().has_msm {
            return None;
        }
        self.monthly_summary(station_id).map(|record| record.get(field))
    }

    fn resolve_displayed(&self, station_id: StationId, field: FieldId, order: &[Source; 2]) -> Origin {
        let spec = field.spec();
        let (scalar, occurrences) = match self.display.displayed_value(field) {
            Ok(shown) => shown,
            Err(_) => return Origin::Other,
        };
        let missing_other;
        let other = match self.other_by_station.get(&station_id) {
            Some(record) => record.get(field),
            None => {
                missing_other = FieldValue::missing(spec);
                &missing_other
            }
        };
        let sources = SourceSet {
            daily: self.daily_value(station_id, field),
            msm: self.msm_value(station_id, field),
            other,
        };
        resolve(spec, &scalar, &occurrences, &sources, order)
    }

    /// Apply one operator edit to the current station.
    pub fn apply(&mut self, edit: FieldEdit) -> Result<(), SessionError> {
        let station_id = self.current.ok_or(SessionError::NoStationSelected)?;
        if !self.is_writable() {
            return Err(SessionError::ReadOnly);
        }
        debug!("station {}: {:?}", station_id, edit);
        let field = edit.field();
        match edit {
            FieldEdit::Text { text, .. } => {
                self.display.field_mut(field).type_text(text);
                self.typed(station_id, field);
            }
            FieldEdit::Occurrence { slot, input, .. } => {
                let shown = self.display.field_mut(field);
                let target = shown
                    .occurrences
                    .get_mut(slot)
                    .ok_or(SessionError::SlotOutOfRange { field, slot })?;
                *target = input;
                self.typed(station_id, field);
            }
            FieldEdit::SelectOrigin { origin, .. } => {
                self.select_origin(station_id, field, origin, false)?;
            }
        }
        Ok(())
    }

    /// Typing turns the field into an operator value.
    fn typed(&mut self, station_id: StationId, field: FieldId) {
        self.display.field_mut(field).qc = QcCode::ManualEntry;
        if let Err(e) = self.select_origin(station_id, field, Origin::Other, true) {
            // Not yet a valid value; the operator is still typing.
            debug!("station {}: {} not committed: {}", station_id, field, e);
        }
        if !self.loading {
            self.unsaved_changes = true;
        }
    }

    fn select_origin(
        &mut self,
        station_id: StationId,
        field: FieldId,
        origin: Origin,
        editing: bool,
    ) -> Result<(), SessionError> {
        let previous = self.display.field(field).origin;
        if !self.loading && previous == Origin::Other && !editing {
            self.commit_other(station_id, field)?;
        }
        if previous == origin && !self.loading {
            if editing {
                self.commit_other(station_id, field)?;
            }
            return Ok(());
        }
        let value = match origin {
            Origin::MonthlySummaryMessage | Origin::DailyDatabase => Some(
                self.machine_value(station_id, field, origin)
                    .cloned()
                    .ok_or(SessionError::NoMonthlySummary(station_id))?,
            ),
            Origin::Other if editing => {
                self.display.field_mut(field).origin = origin;
                self.commit_other(station_id, field)?;
                None
            }
            Origin::Other => self
                .other_by_station
                .get(&station_id)
                .map(|record| record.get(field).clone()),
        };
        if !self.loading {
            self.unsaved_changes = true;
        }
        self.display.field_mut(field).origin = origin;
        if let Some(value) = value {
            self.display.show(field, &value);
        }
        Ok(())
    }

    /// Store the displayed value as the station's operator value.
    fn commit_other(&mut self, station_id: StationId, field: FieldId) -> Result<(), SessionError> {
        let value = self.displayed_as_other(field)?;
        self.other_by_station
            .entry(station_id)
            .or_insert_with(|| PeriodRecord::missing(station_id))
            .set(field, value);
        Ok(())
    }

    pub(crate) fn displayed_as_other(&self, field: FieldId) -> Result<FieldValue, SessionError> {
        let spec = field.spec();
        let shown = self.display.field(field);
        let scalar = shown
            .value(spec)
            .map_err(|source| SessionError::Parse { field, source })?;
        let occurrences = collect_occurrences(spec, &shown.occurrences);
        FieldValue::new(spec, scalar, occurrences, QcCode::ManualEntry)
            .map_err(|source| SessionError::Parse { field, source })
    }

    /// Finish the review: hand every station's saved (or daily) record on.
    /// Returns `false` if the operator backed out.
    pub fn accept_and_continue<C: CompletionSink>(&mut self, sink: &mut C) -> Result<bool, SessionError> {
        if !self.is_writable() {
            return Err(SessionError::ReadOnly);
        }
        if self.period.custom {
            return Err(SessionError::CustomPeriod);
        }
        if !self.prompter.confirm_accept() {
            return Ok(false);
        }
        let records = self
            .stations
            .iter()
            .map(|s| {
                self.saved_by_station
                    .get(&s.inform_id)
                    .or_else(|| self.daily.get(&s.inform_id))
                    .cloned()
                    .unwrap_or_else(|| PeriodRecord::missing(s.inform_id))
            })
            .collect();
        let original = self
            .stations
            .iter()
            .filter_map(|s| self.daily.get(&s.inform_id).cloned())
            .collect();
        let payload = CompletionPayload {
            period: self.period,
            records,
            original,
            approved_stations: self.mismatch_approved.clone(),
        };
        sink.complete(payload).map_err(SessionError::Completion)?;
        info!("review of {} accepted", self.period);
        self.completed = true;
        Ok(true)
    }

    /// Abandon the review. Returns `false` if the operator backed out.
    pub fn abort<C: CompletionSink>(&mut self, sink: &mut C, reason: &str) -> Result<bool, SessionError> {
        if !self.prompter.confirm_abort() {
            return Ok(false);
        }
        sink.abort(reason).map_err(SessionError::Completion)?;
        info!("review of {} aborted: {}", self.period, reason);
        self.completed = true;
        Ok(true)
    }

    /// Whether the review may close now, asking the operator unless the
    /// workflow already finished or nothing could have been changed.
    pub fn should_close(&mut self) -> bool {
        if self.completed || !self.is_writable() {
            return true;
        }
        self.prompter.confirm_close()
    }
}
