//! Best and average objective/fitness per generation for one or more optimizer runs.
//!
//! Writes `<OUTPUT_PREFIX>_ceres.html` and `<OUTPUT_PREFIX>_fitness.html`. When several run
//! logs are given, every legend entry names the log it came from.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sliders_core::{logging, plot_evolution, RenderConfig};

#[derive(Parser)]
#[command(name = "evo-plot", version, about = "Plot evolution run logs")]
struct Cli {
    /// Run logs (`evo_log.json`) to summarize
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Prefix of the two HTML charts
    output_prefix: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    let config = RenderConfig::from_env().context("failed to load render config")?;
    let written = plot_evolution(&cli.inputs, &cli.output_prefix, &config).with_context(|| {
        format!(
            "failed to plot {} run log(s) to {}",
            cli.inputs.len(),
            cli.output_prefix.display()
        )
    })?;

    for path in written {
        tracing::info!("wrote {}", path.display());
    }
    Ok(())
}
