use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indico_ics_core::{ExportOptions, ExportReport, Exporter, FailurePolicy, IndicoClient, IndicoConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "indico-ics")]
#[command(about = "Export Indico room bookings as one iCalendar feed per room")]
struct Cli {
    /// Config file (YAML or TOML)
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Directory the .ics feeds and room index are written to
    #[arg(short, long, default_value = "icalendars")]
    output_dir: PathBuf,

    /// Skip rooms whose bookings cannot be fetched or parsed instead of stopping
    #[arg(long)]
    keep_going: bool,

    /// Only export public rooms (overrides `only_public` in the config)
    #[arg(long)]
    only_public: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    let config = IndicoConfig::load(&cli.config)
        .with_context(|| format!("Could not load configuration from {}", cli.config.display()))?;
    tracing::debug!(?config, "loaded configuration");

    let client = IndicoClient::new(&config)?;

    let mut options = ExportOptions::from_config(&config, cli.output_dir);
    options.only_public |= cli.only_public;
    if cli.keep_going {
        options.failure_policy = FailurePolicy::SkipRoom;
    }

    let report = Exporter::new(client, options)
        .run()
        .await
        .with_context(|| format!("Export from {} failed", config.base_url()))?;

    print_summary(&report);

    if !report.skipped.is_empty() {
        anyhow::bail!("{} room(s) could not be exported", report.skipped.len());
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the default `info` level.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(report: &ExportReport) {
    println!(
        "Wrote {} calendars ({} events), index at {}",
        report.written.len(),
        report.total_events(),
        report.index_path.display()
    );

    for skipped in &report.skipped {
        println!("  skipped {} ({}): {}", skipped.room_id, skipped.room_name, skipped.reason);
    }
}
