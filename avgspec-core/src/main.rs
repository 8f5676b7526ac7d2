//! avgspec command-line entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use avgspec::batch::{BatchAverager, BatchConfig};
use avgspec::present;

/// Averaged magnitude spectrum of one or more audio recordings
#[derive(Parser, Debug)]
#[command(name = "avgspec")]
#[command(about = "Averaged magnitude spectrum of audio files", long_about = None)]
struct Args {
    /// FFT size
    #[arg(long, value_name = "N", default_value_t = 4096)]
    size: usize,

    /// Overlap factor; the hop size is N / OVERLAP
    #[arg(long, value_name = "FACTOR", default_value_t = 8)]
    overlap: usize,

    /// Smoothing strength (0 leaves the spectrum untouched)
    #[arg(long, value_name = "STRENGTH", default_value_t = 128.0)]
    smooth: f64,

    /// Skip the smoothing pass entirely
    #[arg(long)]
    no_smooth: bool,

    /// Show the spectrum in an interactive plot instead of printing it
    #[arg(long)]
    plot: bool,

    /// Prefix the text output with a rate=<sampleRate> pair
    #[arg(long)]
    rate_prefix: bool,

    /// Audio files or directories of audio files
    #[arg(required = true, value_name = "PATH")]
    inputs: Vec<PathBuf>,
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the spectrum itself
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = BatchConfig {
        fft_size: args.size,
        overlap: args.overlap,
        smoothing: if args.no_smooth {
            None
        } else {
            Some(args.smooth)
        },
    };

    let spectrum = BatchAverager::new(config).run(&args.inputs)?;

    if args.plot {
        present::show_spectrum(spectrum).map_err(|e| anyhow::anyhow!("plot window: {e}"))?;
    } else {
        println!("{}", present::format_spectrum(&spectrum, args.rate_prefix));
    }

    Ok(())
}
