//! Non-interactive collaborators for scripted reviews.

use std::fs;

use clim_core::Station;
use clim_session::{CompletionPayload, CompletionSink, OverwriteChoice, Prompter};
use log::{info, warn};

pub fn overwrite_choice(approve_all: bool, approve_none: bool) -> OverwriteChoice {
    match (approve_all, approve_none) {
        (true, _) => OverwriteChoice::YesToAll,
        (false, true) => OverwriteChoice::No,
        (false, false) => OverwriteChoice::Yes,
    }
}

/// Answers every prompt the same way: go ahead.
pub struct AutoPrompter {
    overwrite: OverwriteChoice,
}

impl AutoPrompter {
    pub fn new(overwrite: OverwriteChoice) -> Self {
        AutoPrompter { overwrite }
    }
}

impl Prompter for AutoPrompter {
    fn confirm_discard(&mut self, station: &Station) -> bool {
        warn!("discarding unsaved edits for {}", station.icao);
        true
    }

    fn overwrite_daily_with_msm(&mut self, station: &Station) -> OverwriteChoice {
        info!("{}: overwrite daily values with monthly summary: {:?}", station.icao, self.overwrite);
        self.overwrite
    }

    fn confirm_accept(&mut self) -> bool {
        true
    }

    fn confirm_abort(&mut self) -> bool {
        true
    }

    fn confirm_close(&mut self) -> bool {
        true
    }
}

/// Writes the accepted report as pretty-printed JSON.
pub struct JsonFileSink {
    path: String,
    pub aborted: Option<String>,
}

impl JsonFileSink {
    pub fn new(path: &str) -> Self {
        JsonFileSink {
            path: path.to_string(),
            aborted: None,
        }
    }
}

impl CompletionSink for JsonFileSink {
    fn complete(&mut self, payload: CompletionPayload) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&payload)?;
        fs::write(&self.path, json)?;
        info!("wrote {} records to {}", payload.records.len(), self.path);
        Ok(())
    }

    fn abort(&mut self, reason: &str) -> anyhow::Result<()> {
        warn!("review aborted: {}", reason);
        self.aborted = Some(reason.to_string());
        Ok(())
    }
}
