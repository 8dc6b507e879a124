use anyhow::Result;
use clap::Parser;
use tracing::info;

mod config;
mod engine;
mod matchup;
mod report;

use config::Config;
use report::{ReportSettings, ViewOptions};

fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let matchup = matchup::resolve(&config)?;

    let settings = ReportSettings {
        tail_threshold: config.tail_threshold,
        table_k_max: config.table_k_max,
        thresholds: config.tier_thresholds()?,
        truncation: config.truncation_policy(),
    };
    info!(
        "Model: P(X >= {}), tables 0..{}, truncation {:?}",
        settings.tail_threshold, settings.table_k_max, settings.truncation
    );

    let report = report::build_report(&matchup, &settings)?;

    let view = ViewOptions {
        show_charts: config.charts,
        show_specials: config.specials,
    };
    match &config.export {
        Some(path) => report::export(&report, config.format, view, path)?,
        None => println!("{}", report::render(&report, config.format, view)?),
    }

    Ok(())
}
