use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sliders_core::{logging, plot_distance_histogram, RenderConfig};

#[derive(Parser)]
#[command(
    name = "histogram-plot",
    version,
    about = "Plot the distance histogram of a random search"
)]
struct Cli {
    /// Random-search summary containing `distanceHistogram`
    input: PathBuf,

    /// Output path without the `.html` extension
    output_prefix: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    let config = RenderConfig::from_env().context("failed to load render config")?;
    let path = plot_distance_histogram(&cli.input, &cli.output_prefix, &config)
        .with_context(|| format!("failed to plot {}", cli.input.display()))?;

    tracing::info!("wrote {}", path.display());
    Ok(())
}
