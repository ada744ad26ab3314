mod catalog;
mod parameters;
mod plot;
mod processing;
mod trigger_detection;

use anyhow::Result;
use clap::Parser;
use parameters::DetectionParameters;
use processing::Detection;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Trace file to analyse.
    #[clap(long)]
    file_name: PathBuf,

    /// Where to write the detection catalog.
    #[clap(long, default_value = "catalog.csv")]
    catalog_path: PathBuf,

    /// Optional SVG plot of the filtered trace with the trigger marked.
    #[clap(long)]
    plot_path: Option<PathBuf>,

    #[command(flatten)]
    parameters: DetectionParameters,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Cli::parse();
    debug!("Args: {args:?}");

    let waveform = trace_reader::load_trace_file(&args.file_name)?;
    let source = args.file_name.display().to_string();

    let analysis = processing::process(&waveform, &source, &args.parameters)?;

    match &analysis.detection {
        Detection::Trigger(result) => {
            info!(
                "trigger for {} at {} ({}s into the trace)",
                result.filename(),
                result.time_abs().format("%Y-%m-%dT%H:%M:%S%.6f"),
                result.time_rel()
            );
            catalog::save_catalog(&args.catalog_path, result)?;
            info!("catalog written to {}", args.catalog_path.display());
        }
        Detection::NoTriggerFound => {
            warn!(
                "no STA/LTA peak within {}s of the velocity peak; no event detected",
                args.parameters.window_size
            );
        }
    }

    if let Some(plot_path) = &args.plot_path {
        plot::render_trace(plot_path, &source, &analysis.filtered, analysis.trigger_time())?;
        info!("plot written to {}", plot_path.display());
    }

    Ok(())
}
