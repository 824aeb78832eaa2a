//! Report where the daily build and the monthly summary messages disagree.

use clim_core::{FieldValue, Occurrence};
use clim_db::ValueSource;
use clim_reconcile::mismatch::record_mismatches;
use log::{info, warn};

use crate::ReportArgs;

pub fn run_mismatches(args: &ReportArgs) -> anyhow::Result<()> {
    let period = args.period()?;
    let db = args.load_store()?;
    println!("{}", period);

    let mut total = 0usize;
    for station in db.query_stations()? {
        let daily = db.query_period_record(ValueSource::Daily, station.inform_id)?;
        let msm = db.query_period_record(ValueSource::MonthlySummary, station.inform_id)?;
        let (daily, msm) = match (daily, msm) {
            (Some(d), Some(m)) => (d, m),
            _ => {
                warn!("{}: needs both daily and monthly summary values", station.icao);
                continue;
            }
        };
        for (field, d, m) in record_mismatches(&daily, &msm) {
            println!(
                "{:<6} {:<22} daily={:<24} msm={}",
                station.icao,
                field.key(),
                describe(field.spec(), d),
                describe(field.spec(), m)
            );
            total += 1;
        }
    }
    info!("{} mismatched fields", total);
    Ok(())
}

fn describe(spec: &clim_core::FieldSpec, value: &FieldValue) -> String {
    let text = spec.format(&value.scalar);
    let dates = value.occurrence_slice();
    if dates.is_empty() {
        return text;
    }
    let dates: Vec<String> = dates.iter().map(Occurrence::to_string).collect();
    format!("{} [{}]", text, dates.join(" "))
}
