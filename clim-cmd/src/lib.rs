//! Command implementations for the climate period review CLI.
//!
//! Both commands load a station list and a period values file into the
//! in-memory report store. `review` then drives a review session over it;
//! `mismatches` only reports where the daily build and the monthly summary
//! messages disagree.

use anyhow::Context;
use clap::{Args, Subcommand};
use clim_core::{PeriodDesc, PeriodType};
use clim_db::Database;
use clim_utils::dates::parse_date;

pub mod mismatches;
pub mod prompter;
pub mod review;
pub mod script;

#[derive(Subcommand)]
pub enum Command {
    /// Review a period report, optionally applying an edit script, and write the accepted records as JSON
    Review {
        #[command(flatten)]
        report: ReportArgs,

        /// Edit script CSV (`station,action,field,arg`)
        #[arg(long)]
        script: Option<String>,

        /// Source priority CSV (`group,first,second[,first_visit]`)
        #[arg(long)]
        policy: Option<String>,

        /// Output path for the completion JSON
        #[arg(short = 'o', long)]
        output: String,

        /// Approve monthly summary overwrites for every station at the first prompt
        #[arg(long, conflicts_with = "approve_none")]
        approve_all: bool,

        /// Never approve monthly summary overwrites
        #[arg(long)]
        approve_none: bool,

        /// Open the report read-only
        #[arg(long)]
        read_only: bool,
    },

    /// Print per-station fields where the daily build and monthly summary disagree
    Mismatches {
        #[command(flatten)]
        report: ReportArgs,
    },
}

/// Where the report comes from and which period it covers.
#[derive(Args)]
pub struct ReportArgs {
    /// Station list CSV (`INFORM_ID,ICAO,NAME`)
    #[arg(short = 's', long)]
    pub stations_csv: String,

    /// Period values CSV (`source,inform_id,field,value,qc,occurrences`)
    #[arg(short = 'v', long)]
    pub values_csv: String,

    /// Period type, e.g. monthly-nwws, seasonal-radio, annual-nwws
    #[arg(short = 'p', long, default_value = "monthly-nwws")]
    pub period_type: String,

    /// First day of the period (YYYY-MM-DD)
    #[arg(long)]
    pub start: String,

    /// Last day of the period (YYYY-MM-DD)
    #[arg(long)]
    pub end: String,
}

impl ReportArgs {
    pub fn period(&self) -> anyhow::Result<PeriodDesc> {
        let period_type: PeriodType = self.period_type.parse()?;
        let start = parse_date(&self.start).context("bad --start")?;
        let end = parse_date(&self.end).context("bad --end")?;
        anyhow::ensure!(start <= end, "period starts after it ends");
        Ok(PeriodDesc::new(period_type, start, end))
    }

    pub fn load_store(&self) -> anyhow::Result<Database> {
        let db = Database::new()?;
        let stations = std::fs::read_to_string(&self.stations_csv)
            .with_context(|| format!("reading {}", self.stations_csv))?;
        db.load_stations(&stations)?;
        let values = std::fs::read_to_string(&self.values_csv)
            .with_context(|| format!("reading {}", self.values_csv))?;
        db.load_period_values(&values)?;
        Ok(db)
    }
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Review {
            report,
            script,
            policy,
            output,
            approve_all,
            approve_none,
            read_only,
        } => review::run_review(review::ReviewOptions {
            report,
            script,
            policy,
            output,
            overwrite: prompter::overwrite_choice(approve_all, approve_none),
            read_only,
        }),
        Command::Mismatches { report } => mismatches::run_mismatches(&report),
    }
}
