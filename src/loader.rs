//! Dataset loading
//!
//! A dataset is newline-delimited JSON with one subject per line. Each line is
//! either the bare array of jsPsych trial data that JATOS exports, or an object
//! carrying that array under `timeline`.

use crate::error::ExtractError;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Ordered trial events of one subject
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectTimeline {
    pub events: Vec<Value>,
}

impl SubjectTimeline {
    pub fn new(events: Vec<Value>) -> Self {
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Read and parse a dataset file
pub fn load_file(path: &Path) -> Result<Vec<SubjectTimeline>, ExtractError> {
    let contents = fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))?;
    let timelines = parse_ndjson(&contents)?;
    debug!(path = %path.display(), subjects = timelines.len(), "loaded dataset");
    Ok(timelines)
}

/// Parse NDJSON text into subject timelines, skipping blank lines
pub fn parse_ndjson(ndjson: &str) -> Result<Vec<SubjectTimeline>, ExtractError> {
    let mut timelines = Vec::new();
    for (line_num, line) in ndjson.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(trimmed).map_err(|e| ExtractError::Parse {
            line: line_num + 1,
            source: e,
        })?;
        timelines.push(into_timeline(value, line_num + 1)?);
    }
    Ok(timelines)
}

fn into_timeline(value: Value, line: usize) -> Result<SubjectTimeline, ExtractError> {
    match value {
        Value::Array(events) => Ok(SubjectTimeline::new(events)),
        Value::Object(mut map) => match map.remove("timeline") {
            Some(Value::Array(events)) => Ok(SubjectTimeline::new(events)),
            Some(other) => Err(ExtractError::InvalidTimeline {
                line,
                found: json_kind(&other),
            }),
            None => Err(ExtractError::InvalidTimeline {
                line,
                found: "an object without `timeline`",
            }),
        },
        other => Err(ExtractError::InvalidTimeline {
            line,
            found: json_kind(&other),
        }),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
