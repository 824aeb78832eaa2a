use clim_core::{CoreError, FieldId, StationId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("station {0} is not part of this report")]
    UnknownStation(StationId),

    #[error("no station is selected")]
    NoStationSelected,

    #[error("the report is open read-only")]
    ReadOnly,

    #[error("custom periods cannot be saved or completed")]
    CustomPeriod,

    #[error("invalid value for {field}: {source}")]
    Parse { field: FieldId, source: CoreError },

    #[error("no monthly summary message for station {0}")]
    NoMonthlySummary(StationId),

    #[error("{field} has no occurrence slot {slot}")]
    SlotOutOfRange { field: FieldId, slot: usize },

    #[error("report completion failed: {0:#}")]
    Completion(anyhow::Error),
}
