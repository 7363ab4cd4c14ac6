//! effort-extract CLI
//!
//! Reads a JATOS dataset and writes `<stem>_performance.csv`,
//! `<stem>_effort_slider.csv` and `<stem>_effort_dial.csv` beside it.
//! Log verbosity follows `RUST_LOG` (default `info`).

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use effort_extract::{ExtractError, ExtractPipeline, EXTRACT_VERSION};

/// Extract performance and effort tables from a JATOS dataset
#[derive(Parser)]
#[command(name = "effort-extract")]
#[command(version = EXTRACT_VERSION)]
#[command(about = "Parses JATOS data into performance and effort CSV tables", long_about = None)]
struct Cli {
    /// Dataset to parse: one JSON timeline per line
    dataset: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match ExtractPipeline::new().run(&cli.dataset) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<ExtractError> for CliError {
    fn from(e: ExtractError) -> Self {
        let message = e.to_string();
        let (code, hint) = match e {
            ExtractError::Io { .. } => ("IO_ERROR", "Check file paths and permissions"),
            ExtractError::Parse { .. } => ("PARSE_ERROR", "Check JSON syntax on the reported line"),
            ExtractError::InvalidTimeline { .. } => (
                "INVALID_TIMELINE",
                "Each line must be a JSON array of trial data",
            ),
            ExtractError::InvalidField { .. } => (
                "INVALID_FIELD",
                "Fix or remove the reported trial and retry",
            ),
            ExtractError::OutputPath(_) => ("OUTPUT_PATH", "Pass a path to a dataset file"),
        };
        CliError {
            code: code.to_string(),
            message,
            hint: Some(hint.to_string()),
        }
    }
}
