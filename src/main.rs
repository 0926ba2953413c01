use clap::Parser;

use crate::{cli::Cli, config::Config, source::scholar::ScholarClient};

mod cli;
mod config;
mod logging;
mod merge;
mod publication;
mod records;
mod source;
mod stats;
mod sync;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    logging::setup_logging(&args.log_level)?;

    let config = Config::from(args);
    let client = ScholarClient::new(&config.scholar_base_url)?;
    if let sync::Outcome::Synced(summary) = sync::run(&config, &client)? {
        log::info!(
            "{} records refreshed, {} unmatched publications, {} stubs added",
            summary.matched,
            summary.new_papers,
            summary.added.len()
        );
    }
    Ok(())
}
