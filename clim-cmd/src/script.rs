//! Edit scripts: a scripted stand-in for an operator at the review screen.
//!
//! CSV with headers `station,action,field,arg`, one step per row:
//!
//! ```text
//! station,action,field,arg
//! 101,text,avg_wind_speed,8.1
//! 101,origin,max_temp,msm
//! 101,occurrence,max_temp,0:20230706
//! 101,save,,
//! 102,abort,,operator cancelled
//! ```
//!
//! `occurrence` args are `slot:occurrence`; an empty occurrence clears the
//! slot.

use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use clim_core::{FieldId, Occurrence, OccurrenceInput, StationId};
use clim_reconcile::origin::Origin;
use clim_session::FieldEdit;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Select,
    Edit(FieldEdit),
    Save,
    Abort(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptStep {
    pub station: StationId,
    pub action: Action,
}

pub fn parse_script(csv_data: &str) -> anyhow::Result<Vec<ScriptStep>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());
    let mut steps = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        let r = result?;
        let step = parse_step(&r).with_context(|| format!("script row {}", index + 1))?;
        steps.push(step);
    }
    log::info!("parsed {} script steps", steps.len());
    Ok(steps)
}

fn parse_step(r: &csv::StringRecord) -> anyhow::Result<ScriptStep> {
    let column = |i: usize| r.get(i).unwrap_or("").trim();
    let station: StationId = column(0)
        .parse()
        .with_context(|| format!("bad station {:?}", column(0)))?;
    let field = || FieldId::from_str(column(2));
    let arg = r.get(3).unwrap_or("");

    let action = match column(1).to_ascii_lowercase().as_str() {
        "select" => Action::Select,
        "save" => Action::Save,
        "abort" => Action::Abort(arg.trim().to_string()),
        "text" => Action::Edit(FieldEdit::Text {
            field: field()?,
            text: arg.to_string(),
        }),
        "origin" => Action::Edit(FieldEdit::SelectOrigin {
            field: field()?,
            origin: Origin::from_str(arg)?,
        }),
        "occurrence" => {
            let (slot, occurrence) = arg
                .split_once(':')
                .ok_or_else(|| anyhow!("occurrence arg must be slot:occurrence"))?;
            let input = match occurrence.trim() {
                "" => OccurrenceInput::default(),
                text => OccurrenceInput::from_occurrence(&text.parse::<Occurrence>()?),
            };
            Action::Edit(FieldEdit::Occurrence {
                field: field()?,
                slot: slot.trim().parse().context("bad occurrence slot")?,
                input,
            })
        }
        other => bail!("unknown action {:?}", other),
    };
    Ok(ScriptStep { station, action })
}
