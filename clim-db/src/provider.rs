use anyhow::anyhow;
use clim_core::{PeriodDesc, PeriodRecord, StationId};
use clim_session::ReportDataProvider;

use crate::models::ValueSource;
use crate::Database;

impl ReportDataProvider for Database {
    /// The store holds a single period, so `period` only shows up in logs.
    fn monthly_summary(&self, station_id: StationId, period: &PeriodDesc) -> anyhow::Result<PeriodRecord> {
        log::debug!("fetching monthly summary for station {} ({})", station_id, period);
        self.query_period_record(ValueSource::MonthlySummary, station_id)?
            .ok_or_else(|| anyhow!("no monthly summary message for station {}", station_id))
    }
}
