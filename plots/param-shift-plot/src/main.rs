//! Win counts, best scores and average improvement per parameter-shift trial.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sliders_core::{logging, plot_param_shift, RenderConfig};

#[derive(Parser)]
#[command(name = "param-shift-plot", version, about = "Plot parameter-shift trials")]
struct Cli {
    /// JSON list of trial results
    input: PathBuf,

    /// Prefix of the `.html`, `_scores.html` and `_deltas.html` charts
    output_prefix: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    let config = RenderConfig::from_env().context("failed to load render config")?;
    let written = plot_param_shift(&cli.input, &cli.output_prefix, &config)
        .with_context(|| format!("failed to plot {}", cli.input.display()))?;

    for path in written {
        tracing::info!("wrote {}", path.display());
    }
    Ok(())
}
