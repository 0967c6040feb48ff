//! Atlas CLI - render location-history exports as map payloads
//!
//! Commands:
//! - extract: dump normalized activity segments and place visits
//! - heatmap: build the weighted-point heatmap payload
//! - timeseries: build the time-animated GeoJSON payload
//!
//! Per-file extraction errors go to stderr and processing continues with the
//! files that parsed; the exit code is non-zero only when nothing could be
//! rendered.

use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use timeline_atlas::{
    build_heatmap, build_timeseries, extract_batch, BatchOutcome, TimelineError, ATLAS_VERSION,
};

/// Atlas - turn timeline exports into map-ready payloads
#[derive(Parser)]
#[command(name = "atlas")]
#[command(version = ATLAS_VERSION)]
#[command(about = "Render location-history exports as map payloads", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump normalized activity segments and place visits
    Extract {
        #[command(flatten)]
        io: IoArgs,
    },

    /// Build the heatmap payload (weighted points plus map center)
    Heatmap {
        #[command(flatten)]
        io: IoArgs,
    },

    /// Build the time-animated GeoJSON payload
    Timeseries {
        #[command(flatten)]
        io: IoArgs,
    },
}

#[derive(Args)]
struct IoArgs {
    /// Input export files (use - for stdin)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file path (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON payload
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("atlas: {}", e.message());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AtlasCliError> {
    match cli.command {
        Commands::Extract { io } => {
            let outcome = load_batch(&io.inputs)?;
            let payload = serde_json::to_value(&outcome.data)?;
            write_payload(&io, &payload)
        }
        Commands::Heatmap { io } => {
            let outcome = load_batch(&io.inputs)?;
            let layer = build_heatmap(&outcome.data)?;
            write_payload(&io, &serde_json::to_value(&layer)?)
        }
        Commands::Timeseries { io } => {
            let outcome = load_batch(&io.inputs)?;
            let layer = build_timeseries(&outcome.data)?;
            write_payload(&io, &serde_json::to_value(&layer)?)
        }
    }
}

/// Read and extract every input, reporting per-file errors without aborting.
fn load_batch(inputs: &[PathBuf]) -> Result<BatchOutcome, AtlasCliError> {
    let mut files: Vec<(String, Vec<u8>)> = Vec::with_capacity(inputs.len());
    for input in inputs {
        files.push((display_name(input), read_input(input)?));
    }

    let outcome = extract_batch(files);

    for error in &outcome.errors {
        eprintln!("atlas: error processing {error}");
    }

    if outcome.data.is_empty() && !outcome.errors.is_empty() {
        return Err(AtlasCliError::AllFilesFailed(outcome.errors.len()));
    }

    Ok(outcome)
}

fn read_input(path: &Path) -> Result<Vec<u8>, AtlasCliError> {
    if path.to_string_lossy() == "-" {
        let mut buffer = Vec::new();
        io::stdin().read_to_end(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read(path)?)
    }
}

fn display_name(path: &Path) -> String {
    if path.to_string_lossy() == "-" {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}

fn write_payload(io_args: &IoArgs, payload: &serde_json::Value) -> Result<(), AtlasCliError> {
    let text = if io_args.pretty {
        serde_json::to_string_pretty(payload)?
    } else {
        serde_json::to_string(payload)?
    };

    match &io_args.output {
        Some(path) => fs::write(path, text)?,
        None => println!("{text}"),
    }

    Ok(())
}

// Error types

#[derive(Debug)]
enum AtlasCliError {
    Io(io::Error),
    Json(serde_json::Error),
    Pipeline(TimelineError),
    AllFilesFailed(usize),
}

impl AtlasCliError {
    fn message(&self) -> String {
        match self {
            AtlasCliError::Io(e) => format!("io error: {e}"),
            AtlasCliError::Json(e) => format!("serialization error: {e}"),
            AtlasCliError::Pipeline(e) => e.to_string(),
            AtlasCliError::AllFilesFailed(count) => {
                format!("all {count} input file(s) failed to extract")
            }
        }
    }
}

impl From<io::Error> for AtlasCliError {
    fn from(e: io::Error) -> Self {
        AtlasCliError::Io(e)
    }
}

impl From<serde_json::Error> for AtlasCliError {
    fn from(e: serde_json::Error) -> Self {
        AtlasCliError::Json(e)
    }
}

impl From<TimelineError> for AtlasCliError {
    fn from(e: TimelineError) -> Self {
        AtlasCliError::Pipeline(e)
    }
}
