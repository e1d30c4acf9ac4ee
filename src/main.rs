use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use trip_planner::request::ErrorResponse;
use trip_planner::solver::{SolveOptions, solve_batch, solve_value};
use trip_planner::{Error, OptimizeResponse, Result};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Order waypoints and plan day-by-day itineraries",
    long_about = None
)]
struct Cli {
    /// Request JSON file. Reads stdin when omitted or "-".
    input: Option<PathBuf>,

    /// Write the response here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pretty: bool,

    /// Input is a JSON array of requests, solved in parallel.
    #[arg(long, default_value_t = false)]
    batch: bool,

    #[arg(long, default_value_t = 500)]
    max_waypoints: usize,

    #[arg(long, default_value_t = 1000)]
    max_sweeps: usize,

    /// Abort ordering after this many milliseconds.
    #[arg(long)]
    time_budget_ms: Option<u64>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn solve_options(&self) -> SolveOptions {
        SolveOptions {
            max_waypoints: self.max_waypoints,
            max_sweeps: self.max_sweeps,
            time_budget: self.time_budget_ms.map(Duration::from_millis),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e}");
            // Still answer with an error body so callers always get JSON.
            let _ = emit(&cli, &ErrorResponse::from(&e));
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every request succeeded.
fn run(cli: &Cli) -> Result<bool> {
    let body: Value = serde_json::from_str(&read_input(cli)?)?;
    let options = cli.solve_options();

    if !cli.batch {
        return match solve_value(&body, &options) {
            Ok(response) => {
                emit(cli, &response)?;
                Ok(true)
            }
            Err(e) => {
                error!("request rejected: {e}");
                emit(cli, &ErrorResponse::from(&e))?;
                Ok(false)
            }
        };
    }

    let bodies = body
        .as_array()
        .ok_or_else(|| Error::invalid_input("batch input must be a JSON array of requests"))?;
    let results = solve_batch(bodies, &options);
    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(requests = results.len(), failed, "batch finished");

    let rendered: Vec<BatchEntry> = results.iter().map(BatchEntry::from).collect();
    emit(cli, &rendered)?;
    Ok(failed == 0)
}

#[derive(Serialize)]
#[serde(untagged)]
enum BatchEntry<'a> {
    Ok(&'a OptimizeResponse),
    Err(ErrorResponse),
}

impl<'a> From<&'a Result<OptimizeResponse>> for BatchEntry<'a> {
    fn from(result: &'a Result<OptimizeResponse>) -> Self {
        match result {
            Ok(response) => BatchEntry::Ok(response),
            Err(e) => BatchEntry::Err(ErrorResponse::from(e)),
        }
    }
}

fn read_input(cli: &Cli) -> Result<String> {
    match &cli.input {
        Some(path) if path.as_os_str() != "-" => Ok(fs::read_to_string(path)?),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn emit<T: Serialize>(cli: &Cli, value: &T) -> Result<()> {
    let mut text = if cli.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    text.push('\n');

    match &cli.output {
        Some(path) => fs::write(path, text)?,
        None => io::stdout().lock().write_all(text.as_bytes())?,
    }
    Ok(())
}
