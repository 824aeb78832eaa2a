//! Scripted review of a period report.

use anyhow::Context;
use clim_reconcile::PriorityPolicy;
use clim_session::{OverwriteChoice, StationSession};
use log::info;

use crate::prompter::{AutoPrompter, JsonFileSink};
use crate::script::{parse_script, Action, ScriptStep};
use crate::ReportArgs;

pub struct ReviewOptions {
    pub report: ReportArgs,
    pub script: Option<String>,
    pub policy: Option<String>,
    pub output: String,
    pub overwrite: OverwriteChoice,
    pub read_only: bool,
}

/// Load the report, visit every station once, play the edit script and
/// accept the result into `output`.
pub fn run_review(options: ReviewOptions) -> anyhow::Result<()> {
    let period = options.report.period()?;
    let db = options.report.load_store()?;
    let report = db.query_daily_report(period)?;
    let policy = match &options.policy {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
            PriorityPolicy::from_csv(&text)?
        }
        None => PriorityPolicy::default(),
    };
    let steps = match &options.script {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
            parse_script(&text)?
        }
        None => Vec::new(),
    };

    let mut session = StationSession::new(
        report,
        policy,
        db.clone(),
        AutoPrompter::new(options.overwrite),
        !options.read_only,
    );
    let station_ids: Vec<_> = session.stations().iter().map(|s| s.inform_id).collect();
    for id in station_ids {
        session.select_station(id)?;
    }

    let mut sink = JsonFileSink::new(&options.output);
    if !play_script(&mut session, &steps, &mut sink)? {
        return Ok(());
    }

    if session.is_writable() {
        session.accept_and_continue(&mut sink)?;
    } else {
        info!("read-only review; nothing written");
    }
    Ok(())
}

/// Returns `false` when the script aborted the review.
fn play_script<P, S>(
    session: &mut StationSession<P, AutoPrompter, S>,
    steps: &[ScriptStep],
    sink: &mut JsonFileSink,
) -> anyhow::Result<bool>
where
    P: clim_session::ReportDataProvider,
    S: clim_session::SessionStateProvider,
{
    for (index, step) in steps.iter().enumerate() {
        let context = || format!("script step {} (station {})", index + 1, step.station);
        if let Action::Abort(reason) = &step.action {
            session.abort(sink, reason).with_context(context)?;
            return Ok(false);
        }
        session.select_station(step.station).with_context(context)?;
        match &step.action {
            Action::Select | Action::Abort(_) => {}
            Action::Edit(edit) => session.apply(edit.clone()).with_context(context)?,
            Action::Save => session.save().with_context(context)?,
        }
    }
    Ok(true)
}
