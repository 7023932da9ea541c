//! fms-recording: writes the telemetry of one simulated truck to CSV.
//!
//! ```text
//! fms-recording [-o FILE] [--ticks N] [--seed N] [--params FILE] [--extended-signals]
//! ```
//!
//! Logs go to stderr (`RUST_LOG`, default `info`); stdout carries only the
//! confirmation line.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fms_core::RunConfig;
use fms_output::{CsvWriter, OutputWriter, SignalOutputObserver, SignalSet};
use fms_sim::SimBuilder;
use fms_vehicle::VehicleParams;


// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(version, about = "Generate a simulated truck signal recording")]
struct Args {
    /// Output CSV file.
    #[arg(short, long, default_value = "signalsFmsRecording.csv")]
    output: PathBuf,

    /// Number of one-second ticks to simulate.
    #[arg(long, default_value_t = RunConfig::DEFAULT_TICKS)]
    ticks: u64,

    /// Master seed; drawn from entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file overriding any subset of the vehicle parameters.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Also emit `Vehicle.Speed` and both drivers' rest counters.
    #[arg(long)]
    extended_signals: bool,

    /// Print the effective parameters as JSON and exit.
    #[arg(long)]
    print_params: bool,

    /// Write to this SQLite database instead of CSV.
    #[cfg(feature = "sqlite")]
    #[arg(long)]
    sqlite: Option<PathBuf>,
}

impl Args {
    fn signal_set(&self) -> SignalSet {
        if self.extended_signals { SignalSet::Extended } else { SignalSet::Standard }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Defaults, overridden by whatever keys the JSON file names.
fn load_params(path: Option<&Path>) -> Result<VehicleParams> {
    let Some(path) = path else {
        return Ok(VehicleParams::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading parameter file {}", path.display()))?;
    let params: VehicleParams = serde_json::from_str(&text)
        .with_context(|| format!("parsing parameter file {}", path.display()))?;
    Ok(params)
}

/// Run the simulation into `writer`.  A stored write error is returned
/// unchanged, ahead of the orchestrator's `Halted`.
fn record<W: OutputWriter>(
    writer: W,
    config: RunConfig,
    params: VehicleParams,
    set:    SignalSet,
) -> Result<u64> {
    let seed = config.seed;
    let mut sim = SimBuilder::new(config).params(params).build()?;
    let mut obs = SignalOutputObserver::seeded(writer, set, seed);

    let outcome = sim.run(&mut obs);
    if let Some(e) = obs.take_error() {
        return Err(e.into());
    }
    outcome?;

    info!(vin = obs.vin(), rows = obs.rows_written(), "recording complete");
    Ok(obs.rows_written())
}

fn run(args: Args) -> Result<()> {
    let params = load_params(args.params.as_deref())?;
    params.validate()?;
    if args.print_params {
        println!("{}", serde_json::to_string_pretty(&params)?);
        return Ok(());
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let config = RunConfig::new(args.ticks, seed);
    info!(ticks = config.total_ticks, seed, "generating recording");

    #[cfg(feature = "sqlite")]
    if let Some(db) = &args.sqlite {
        let writer = fms_output::SqliteWriter::new(db)?;
        record(writer, config, params, args.signal_set())?;
        println!("SQLite database '{}' generated successfully.", db.display());
        return Ok(());
    }

    let writer = CsvWriter::new(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    record(writer, config, params, args.signal_set())?;
    println!("CSV file '{}' generated successfully.", args.output.display());
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    run(Args::parse())
}
