//! CSV data loading functions for populating the in-memory SQLite database.
//!
//! # CSV Formats
//!
//! - **Stations** (has headers): `INFORM_ID,ICAO,NAME`
//! - **Period values** (no headers):
//!   `source(D|M),inform_id,field,value,qc,occurrences`, where `value` is a
//!   number, `T` for trace or `M` for missing, a blank `qc` takes the
//!   source's computed code, and `occurrences` is a `|`-separated list of
//!   `YYYYMMDD[@HH]` or `YYYYMMDD[@HH]-YYYYMMDD[@HH]`.

use anyhow::{anyhow, Context};
use clim_core::{FieldId, FieldValue, Number, Occurrence, QcCode, Station, StationId};
use rusqlite::params;

use crate::models::ValueSource;
use crate::Database;

impl Database {
    /// Load the station list. Rows keep their file order as report order.
    ///
    /// # Example CSV
    /// ```text
    /// INFORM_ID,ICAO,NAME
    /// 101,KDEN,Denver International
    /// ```
    pub fn load_stations(&self, csv_data: &str) -> anyhow::Result<()> {
        let stations = Station::parse_station_csv(csv_data)?;
        let conn = self.conn.borrow();
        let start: i64 = conn.query_row("SELECT COUNT(*) FROM stations", [], |row| row.get(0))?;
        for (offset, station) in stations.iter().enumerate() {
            conn.execute(
                "INSERT OR REPLACE INTO stations (inform_id, icao, name, position)
                 VALUES (?1, ?2, ?3, ?4)",
                params![station.inform_id, station.icao, station.name, start + offset as i64],
            )?;
        }
        log::info!("[CLIM Debug] loader: Loaded {} stations", stations.len());
        Ok(())
    }

    /// Load period values from a headerless CSV string.
    ///
    /// Every row is validated against the field catalogue; the first bad row
    /// fails the whole load.
    ///
    /// # Example CSV
    /// ```text
    /// D,101,max_temp,97,,20230705|20230712
    /// M,101,precip_total,T,1,
    /// D,101,precip_storm_max,1.42,,20230710@06-20230711@18
    /// ```
    pub fn load_period_values(&self, csv_data: &str) -> anyhow::Result<()> {
        let conn = self.conn.borrow();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let mut count = 0u32;
        for (index, result) in rdr.records().enumerate() {
            let r = result?;
            let row = index + 1;
            let (source, inform_id, field, value) =
                parse_value_row(&r).with_context(|| format!("period values row {}", row))?;
            let (stored, is_trace) = match value.scalar {
                Number::Trace => (clim_core::number::TRACE, true),
                other => (other.as_f64(), false),
            };
            let occurrences = value
                .occurrence_slice()
                .iter()
                .map(Occurrence::to_string)
                .collect::<Vec<_>>()
                .join("|");

            conn.execute(
                "INSERT OR REPLACE INTO period_values
                 (source, inform_id, field, value, is_trace, qc, occurrences)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    source.code(),
                    inform_id,
                    field.key(),
                    stored,
                    is_trace,
                    value.qc.raw(),
                    occurrences
                ],
            )?;
            count += 1;
        }
        log::info!("[CLIM Debug] loader: Loaded {} period values", count);
        Ok(())
    }
}

fn parse_value_row(r: &csv::StringRecord) -> anyhow::Result<(ValueSource, StationId, FieldId, FieldValue)> {
    let column = |i: usize| r.get(i).unwrap_or("").trim();

    let source = ValueSource::from_code(column(0))
        .ok_or_else(|| anyhow!("unknown source {:?}, expected D or M", column(0)))?;
    let inform_id: StationId = column(1)
        .parse()
        .with_context(|| format!("bad inform id {:?}", column(1)))?;
    let field: FieldId = column(2).parse()?;
    let spec = field.spec();
    let scalar = spec.parse(column(3))?;
    let qc = match column(4) {
        "" => source.default_qc(),
        raw => QcCode::from_raw(raw.parse().with_context(|| format!("bad qc {:?}", raw))?)?,
    };
    let occurrences = parse_occurrences(column(5))?;
    let value = FieldValue::new(spec, scalar, occurrences, qc)?;
    Ok((source, inform_id, field, value))
}

/// Split a stored `|`-separated occurrence list.
pub(crate) fn parse_occurrences(text: &str) -> anyhow::Result<Vec<Occurrence>> {
    text.split('|')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<Occurrence>().map_err(anyhow::Error::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::Database;

    #[test]
    fn load_stations_from_csv() {
        let db = Database::new().unwrap();
        db.load_stations("INFORM_ID,ICAO,NAME\n102,KCOS,Colorado Springs\n101,KDEN,Denver\n")
            .unwrap();

        let conn = db.conn.borrow();
        let first: i64 = conn
            .query_row("SELECT inform_id FROM stations WHERE position = 0", [], |row| row.get(0))
            .unwrap();
        assert_eq!(first, 102, "file order is report order");
    }

    #[test]
    fn load_period_values_from_csv() {
        let db = Database::new().unwrap();
        db.load_period_values(
            "D,101,max_temp,97,,20230705|20230712\nM,101,precip_total,T,,\nD,101,precip_storm_max,1.42,,20230710@06-20230711@18\n",
        )
        .unwrap();

        let conn = db.conn.borrow();
        let (qc, occurrences): (i32, String) = conn
            .query_row(
                "SELECT qc, occurrences FROM period_values WHERE source = 'D' AND field = 'max_temp'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(qc, 2);
        assert_eq!(occurrences, "20230705|20230712");

        let (trace, qc): (bool, i32) = conn
            .query_row(
                "SELECT is_trace, qc FROM period_values WHERE source = 'M' AND field = 'precip_total'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert!(trace);
        assert_eq!(qc, 1);
    }

    #[test]
    fn load_missing_value_stores_missing_qc() {
        let db = Database::new().unwrap();
        db.load_period_values("D,101,mean_temp,M,2,\n").unwrap();
        let conn = db.conn.borrow();
        let qc: i32 = conn
            .query_row("SELECT qc FROM period_values", [], |row| row.get(0))
            .unwrap();
        assert_eq!(qc, 9999);
    }

    #[test]
    fn load_period_values_rejects_bad_rows() {
        let db = Database::new().unwrap();
        assert!(db.load_period_values("X,101,max_temp,97,,\n").is_err());
        assert!(db.load_period_values("D,abc,max_temp,97,,\n").is_err());
        assert!(db.load_period_values("D,101,max_tmp,97,,\n").is_err());
        assert!(db.load_period_values("D,101,max_temp,hot,,\n").is_err());
        assert!(db.load_period_values("D,101,max_temp,97,42,\n").is_err());
        assert!(db
            .load_period_values("D,101,max_temp,97,,20230701|20230702|20230703|20230704\n")
            .is_err());
        assert!(db.load_period_values("D,101,mean_temp,45.1,,20230701\n").is_err());
    }

    #[test]
    fn load_period_values_rejects_wrong_date_form() {
        let db = Database::new().unwrap();
        let err = db
            .load_period_values("D,101,max_temp,97,,\nD,101,precip_max_24h,1.20,,20230705\n")
            .unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("row 2"), "{}", message);
        assert!(message.contains("precip_max_24h"), "{}", message);

        assert!(db.load_period_values("D,101,max_wind_speed,41,,20230724\n").is_err());
        db.load_period_values("D,101,max_wind_speed,41,,20230724/270\n").unwrap();
    }

    #[test]
    fn load_period_values_replaces_on_conflict() {
        let db = Database::new().unwrap();
        db.load_period_values("D,101,max_temp,97,,\n").unwrap();
        db.load_period_values("D,101,max_temp,98,,\n").unwrap();
        let conn = db.conn.borrow();
        let (count, value): (i64, f64) = conn
            .query_row("SELECT COUNT(*), MAX(value) FROM period_values", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(value, 98.0);
    }
}
