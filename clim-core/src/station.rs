use csv::ReaderBuilder;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub type StationId = i32;

/// A reporting climate station.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Station {
    /// Station key used by the report database.
    pub inform_id: StationId,
    /// Four-letter ICAO identifier, e.g. "KDEN".
    pub icao: String,
    pub name: String,
}

impl Station {
    /// Parse a station list. Expected columns: INFORM_ID, ICAO, NAME.
    /// The list order is the report order.
    pub fn parse_station_csv(csv_object: &str) -> Result<Vec<Station>, CoreError> {
        let mut station_list: Vec<Station> = Vec::new();
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .from_reader(csv_object.as_bytes());
        for row in rdr.records() {
            let record = row?;
            let column = |i: usize, name: &str| {
                record
                    .get(i)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| CoreError::InvalidStation(format!("missing {}", name)))
            };
            let inform_id = column(0, "INFORM_ID")?
                .parse::<StationId>()
                .map_err(|e| CoreError::InvalidStation(e.to_string()))?;
            let icao = column(1, "ICAO")?.to_string();
            let name = column(2, "NAME")?.to_string();
            station_list.push(Station {
                inform_id,
                icao,
                name,
            });
        }
        debug!("parsed {} stations", station_list.len());
        Ok(station_list)
    }
}
