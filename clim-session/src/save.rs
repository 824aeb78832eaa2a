use clim_core::{FieldId, FieldValue, PeriodRecord, StationId};
use log::{debug, info};

use crate::collaborators::{OverwriteChoice, Prompter, ReportDataProvider, SessionStateProvider};
use crate::display::collect_occurrences;
use crate::error::SessionError;
use crate::session::StationSession;

impl<P, Q, S> StationSession<P, Q, S>
where
    P: ReportDataProvider,
    Q: Prompter,
    S: SessionStateProvider,
{
    /// Save the current station as the operator, then move on to the next
    /// station in report order.
    pub fn save(&mut self) -> Result<(), SessionError> {
        if !self.is_writable() {
            return Err(SessionError::ReadOnly);
        }
        let station_id = self.current.ok_or(SessionError::NoStationSelected)?;
        if self.period().custom {
            return Err(SessionError::CustomPeriod);
        }

        let record = self.collect_record(station_id)?;
        self.saved_by_station.insert(station_id, record.clone());
        self.other_by_station.insert(station_id, record);
        self.unsaved_changes = false;
        info!("saved station {}", station_id);

        if self.display.dialog_mismatch() && !self.mismatch_approved.contains(&station_id) {
            self.ask_overwrite(station_id)?;
        }

        let next = self.next_station(station_id);
        self.load_station(next)
    }

    /// Record the displayed values without asking anything or moving on.
    pub(crate) fn save_programmatic(&mut self, station_id: StationId) -> Result<(), SessionError> {
        let record = self.collect_record(station_id)?;
        debug!("recorded initial values for station {}", station_id);
        self.saved_by_station.insert(station_id, record);
        Ok(())
    }

    fn ask_overwrite(&mut self, station_id: StationId) -> Result<(), SessionError> {
        let station = self
            .station(station_id)
            .cloned()
            .ok_or(SessionError::UnknownStation(station_id))?;
        match self.prompter_mut().overwrite_daily_with_msm(&station) {
            OverwriteChoice::Yes => {
                self.mismatch_approved.insert(station_id);
            }
            OverwriteChoice::YesToAll => {
                let all: Vec<StationId> = self.stations().iter().map(|s| s.inform_id).collect();
                self.mismatch_approved.extend(all);
            }
            OverwriteChoice::No => {}
        }
        debug!("approved stations: {:?}", self.mismatch_approved);
        Ok(())
    }

    fn next_station(&self, station_id: StationId) -> StationId {
        let stations = self.stations();
        let position = stations
            .iter()
            .position(|s| s.inform_id == station_id)
            .unwrap_or(0);
        stations
            .get((position + 1) % stations.len())
            .map(|s| s.inform_id)
            .unwrap_or(station_id)
    }

    /// Every field as it would be stored: machine origins take scalar and QC
    /// from their source, operator values are parsed from the display.
    /// Occurrences always come from the displayed inputs.
    fn collect_record(&self, station_id: StationId) -> Result<PeriodRecord, SessionError> {
        let mut record = PeriodRecord::missing(station_id);
        for field in FieldId::ALL {
            let value = self.stored_value(station_id, field)?;
            record.set(field, value);
        }
        Ok(record)
    }

    fn stored_value(&self, station_id: StationId, field: FieldId) -> Result<FieldValue, SessionError> {
        let spec = field.spec();
        let shown = self.display.field(field);
        match self.machine_value(station_id, field, shown.origin) {
            Some(source) => FieldValue::new(
                spec,
                source.scalar,
                collect_occurrences(spec, &shown.occurrences),
                source.qc,
            )
            .map_err(|source| SessionError::Parse { field, source }),
            None => self.displayed_as_other(field),
        }
    }
}
