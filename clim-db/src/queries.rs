//! Typed query methods for reading stations and period records back out.

use std::collections::BTreeMap;

use anyhow::Context;
use clim_core::{FieldId, FieldValue, Number, NumericKind, PeriodDesc, PeriodRecord, QcCode, Station, StationId};
use clim_session::PeriodReport;
use rusqlite::params;

use crate::loader::parse_occurrences;
use crate::models::ValueSource;
use crate::Database;

impl Database {
    /// All stations in report order.
    pub fn query_stations(&self) -> anyhow::Result<Vec<Station>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT inform_id, icao, name FROM stations
             ORDER BY position, inform_id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Station {
                    inform_id: row.get(0)?,
                    icao: row.get(1)?,
                    name: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("[CLIM Debug] query: query_stations returned {} records", rows.len());
        Ok(rows)
    }

    /// One station's record from `source`, or `None` if the source has no
    /// rows for it. Fields without a row are missing.
    pub fn query_period_record(
        &self,
        source: ValueSource,
        inform_id: StationId,
    ) -> anyhow::Result<Option<PeriodRecord>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT field, value, is_trace, qc, occurrences FROM period_values
             WHERE source = ?1 AND inform_id = ?2
             ORDER BY field",
        )?;
        let rows = stmt
            .query_map(params![source.code(), inform_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, bool>(2)?,
                    row.get::<_, i32>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[CLIM Debug] query: query_period_record({}, {}) returned {} fields",
            source,
            inform_id,
            rows.len()
        );
        if rows.is_empty() {
            return Ok(None);
        }

        let mut record = PeriodRecord::missing(inform_id);
        for (key, value, is_trace, qc, occurrences) in rows {
            let field: FieldId = key.parse()?;
            let spec = field.spec();
            let scalar = stored_number(spec.kind, value, is_trace);
            let value = FieldValue::new(spec, scalar, parse_occurrences(&occurrences)?, QcCode::from_raw(qc)?)
                .with_context(|| format!("stored {} for station {}", key, inform_id))?;
            record.set(field, value);
        }
        Ok(Some(record))
    }

    /// The daily-build report for every station in the store.
    pub fn query_daily_report(&self, period: PeriodDesc) -> anyhow::Result<PeriodReport> {
        let stations = self.query_stations()?;
        let mut daily = BTreeMap::new();
        for station in stations.iter() {
            match self.query_period_record(ValueSource::Daily, station.inform_id)? {
                Some(record) => {
                    daily.insert(station.inform_id, record);
                }
                None => log::warn!("no daily values for station {}", station.icao),
            }
        }
        Ok(PeriodReport {
            period,
            stations,
            daily,
        })
    }
}

fn stored_number(kind: NumericKind, value: f64, is_trace: bool) -> Number {
    match kind {
        _ if is_trace => Number::Trace,
        NumericKind::Int => Number::Int(value.round() as i32),
        NumericKind::Float | NumericKind::TraceFloat => Number::Float(value),
    }
}
