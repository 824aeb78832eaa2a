//! CLIM CLI - review climate period reports from the command line.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "clim-cli",
    version,
    about = "Climate period review toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: clim_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("starting clim-cli");
    clim_cmd::run(cli.command)
}
