//! Temperature heatmap generator.
//!
//! Reads daily readings from a CSV file and writes a standalone HTML heatmap.
//!
//! # Usage
//!
//! ```bash
//! tempmap temperature_daily.csv --output heatmap.html
//! tempmap --variant basic --metric min_temperature
//! RUST_LOG=debug tempmap --config tempmap.toml --export-json heatmap.json
//! ```

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use tempmap::config::{ConfigOverrides, TempmapConfig, Variant};
use tempmap::core::Metric;
use tempmap::io::{write_aggregates_csv, write_heatmap_json, TemperatureLoader};
use tempmap::services::heatmap::{build_heatmap_data, HeatmapView};

#[derive(Parser, Debug)]
#[command(name = "tempmap", version, about = "Year by month temperature heatmaps")]
struct Cli {
    /// Daily temperature CSV (date,max_temperature,min_temperature)
    input: Option<PathBuf>,

    /// TOML configuration file (defaults to ./tempmap.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTML file to write
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// basic or extended
    #[arg(long)]
    variant: Option<Variant>,

    /// Keep only the N most recent years (0 keeps all)
    #[arg(long)]
    recent_years: Option<usize>,

    /// Metric shown first: max_temperature or min_temperature
    #[arg(long)]
    metric: Option<Metric>,

    /// Drop malformed rows instead of failing
    #[arg(long)]
    skip_malformed: bool,

    /// Also write the month aggregates as CSV
    #[arg(long)]
    export_csv: Option<PathBuf>,

    /// Also write the heatmap data as JSON
    #[arg(long)]
    export_json: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            input: self.input.clone(),
            output: self.output.clone(),
            variant: self.variant,
            recent_years: self.recent_years,
            metric: self.metric,
            skip_malformed: self.skip_malformed,
            export_csv: self.export_csv.clone(),
            export_json: self.export_json.clone(),
        }
    }
}

#[tokio::main]
async fn main() {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => TempmapConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => TempmapConfig::from_default_location().context("Failed to load tempmap.toml")?,
    };
    config.apply_overrides(cli.overrides());

    info!(
        "Generating {} heatmap from {}",
        config.heatmap.variant,
        config.input.path.display()
    );

    let report = TemperatureLoader::new(config.input.on_malformed)
        .fetch(&config.input.path)
        .await
        .with_context(|| format!("Failed to load {}", config.input.path.display()))?;

    let data = build_heatmap_data(&report.records, &config.heatmap_options())
        .context("Failed to aggregate temperature data")?;
    let view = HeatmapView::new(data).context("Failed to prepare heatmap view")?;

    let html = config
        .renderer()
        .render_html(&view)
        .context("Failed to render heatmap")?;
    tokio::fs::write(&config.output.path, html)
        .await
        .with_context(|| format!("Failed to write {}", config.output.path.display()))?;
    info!("Wrote heatmap to {}", config.output.path.display());

    if let Some(path) = &config.output.export_csv {
        write_aggregates_csv(view.data().cells(), path)
            .with_context(|| format!("Failed to export aggregates to {}", path.display()))?;
    }
    if let Some(path) = &config.output.export_json {
        write_heatmap_json(&view, path)
            .with_context(|| format!("Failed to export heatmap data to {}", path.display()))?;
    }

    Ok(())
}
