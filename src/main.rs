use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fault_report::data::loader::{load_csv, CsvOptions};
use fault_report::{generate_report, FaultConfig, RenderedImage, ReportComposer};

#[derive(Parser)]
#[command(name = "fault-report")]
#[command(about = "Write a fault-condition report for AHU trend data", version)]
struct Args {
    /// CSV export with a timestamp column and the fault flag column
    #[arg(short, long)]
    data: PathBuf,

    /// JSON fault configuration (`fault_code` of fc1 or fc2)
    #[arg(short, long)]
    config: PathBuf,

    /// Output directory for report.md and its figures
    #[arg(short, long, default_value = "report")]
    out: PathBuf,

    /// Timestamp column name (first column if omitted)
    #[arg(long)]
    timestamp_col: Option<String>,

    /// Directory holding fc1_definition.png / fc2_definition.png
    #[arg(long)]
    images: Option<PathBuf>,

    /// Also write the summary statistics as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = FaultConfig::load(&args.config)
        .with_context(|| format!("reading config {}", args.config.display()))?;
    let profile = config.profile();

    let options = CsvOptions { timestamp_col: args.timestamp_col.clone(), ..Default::default() };
    let timeline = load_csv(&args.data, &options)
        .with_context(|| format!("loading {}", args.data.display()))?;

    let mut composer = ReportComposer::new(profile);
    if let Some(dir) = &args.images {
        let path = dir.join(config.code().definition_image());
        if path.exists() {
            let bytes = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            let image = RenderedImage::from_png(bytes, format!("Fault condition {} definition", config.code().number()))
                .with_context(|| format!("decoding {}", path.display()))?;
            composer = composer.with_reference_image(image);
        } else {
            tracing::warn!("{} not found", path.display());
        }
    }

    let report = generate_report(&composer, &timeline).context("generating report")?;
    let written = report.document.write_markdown(&args.out)?;

    if let Some(path) = &args.summary_json {
        let json = serde_json::to_string_pretty(&report.summary)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    }

    tracing::info!(
        flagged_hours = report.summary.flagged_hours,
        busiest_hour = ?report.histogram.busiest_hour(),
        "done"
    );
    println!("{}", written.display());
    Ok(())
}
