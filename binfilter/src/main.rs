//! Code for the `binfilter` executable.
use std::io::stderr;
use std::path::PathBuf;

use binfilter::{BINFILTER_VERSION, Mask, filter_files};
use clap::Parser;
use eyre::{Context, Result};
use tracing::subscriber::set_global_default;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt};

/// Drop records whose masked channel state did not change.
///
/// Input and output are raw captures of 10-byte records: a 64-bit timestamp
/// followed by a 16-bit channel word. The first record and the last record are
/// always kept, so the filtered capture has the same length in time.
#[derive(Parser)]
#[command(version = BINFILTER_VERSION, about, allow_negative_numbers = true)]
struct Args {
    /// Binary capture to read
    input: PathBuf,
    /// Channels to compare, e.g. 0x0003, 3 or 03 (hex, decimal or octal)
    #[clap(value_parser = clap::value_parser!(Mask))]
    mask: Mask,
    /// Filtered capture to write, created or truncated
    output: PathBuf,
}

/// Starts the logging on stderr. Verbosity is taken from `RUST_LOG`.
pub fn start_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let subscriber = Registry::default().with(
        fmt::layer()
            .without_time()
            .with_writer(stderr)
            .with_filter(filter),
    );

    set_global_default(subscriber).wrap_err("Unable to set global subscriber")?;

    Ok(())
}

fn main() -> Result<()> {
    simple_eyre::install()?;
    start_logging()?;

    // parse arguments, exits with usage on error
    let args = Args::parse();

    filter_files(&args.input, args.mask, &args.output).wrap_err_with(|| {
        format!(
            "Failed to filter {} into {}",
            args.input.display(),
            args.output.display()
        )
    })?;

    Ok(())
}
