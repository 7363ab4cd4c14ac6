//! effort-extract - Behavioral measures from JATOS session logs
//!
//! Turns a newline-delimited JSON export of a multiple-object-tracking
//! experiment (one jsPsych timeline per subject) into three CSV tables through
//! a deterministic pipeline: loading → scored-phase detection → per-trial
//! measure extraction → table assembly → CSV output.
//!
//! ## Tables
//!
//! - **performance**: target-designation accuracy per trial
//! - **effort_slider**: post-trial subjective effort rating
//! - **effort_dial**: press/release timing of the effort key during motion

pub mod config;
pub mod error;
pub mod event;
pub mod extractor;
pub mod loader;
pub mod pipeline;
pub mod schema;
pub mod tables;
pub mod types;
pub mod writer;

pub use config::{ExtractConfig, UnpairedKeyPolicy};
pub use error::ExtractError;
pub use extractor::{PhaseStart, TimelineExtractor};
pub use loader::SubjectTimeline;
pub use pipeline::{extract_dataset, extract_ndjson, ExtractPipeline, RunSummary};
pub use tables::MeasureTables;
pub use writer::OutputPaths;

/// Crate version reported by the CLI
pub const EXTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");
