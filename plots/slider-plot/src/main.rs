use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sliders_core::{logging, plot_slider_curves, RenderConfig};

#[derive(Parser)]
#[command(name = "slider-plot", version, about = "Plot sampled slider response curves")]
struct Cli {
    /// JSON object mapping slider id to `{"x": [...], "y": [...]}`
    input: PathBuf,

    /// HTML file to write
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    let config = RenderConfig::from_env().context("failed to load render config")?;
    let path = plot_slider_curves(&cli.input, &cli.output, &config)
        .with_context(|| format!("failed to plot {}", cli.input.display()))?;

    tracing::info!("wrote {}", path.display());
    Ok(())
}
