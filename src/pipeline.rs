//! Pipeline orchestration
//!
//! This module provides the public API for effort-extract. It runs a dataset
//! through the full pipeline: loading, per-subject extraction, table assembly
//! and CSV output.

use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::extractor::TimelineExtractor;
use crate::loader::{self, SubjectTimeline};
use crate::tables::MeasureTables;
use crate::writer::{self, OutputPaths};
use std::path::Path;
use tracing::info;

/// Extract the three measure tables from NDJSON text with default settings.
///
/// # Example
/// ```
/// let line = r#"[{"trial_id": 3, "response": 5.0}, {"type": "exit"}]"#;
/// let tables = effort_extract::extract_ndjson(line).unwrap();
/// assert_eq!(tables.effort_slider[0].effort, 5.0);
/// ```
pub fn extract_ndjson(ndjson: &str) -> Result<MeasureTables, ExtractError> {
    ExtractPipeline::new().extract_ndjson(ndjson)
}

/// Process a dataset file and write its CSV tables beside it, with default
/// settings.
pub fn extract_dataset(dataset: &Path) -> Result<RunSummary, ExtractError> {
    ExtractPipeline::new().run(dataset)
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub subjects: usize,
    pub performance_rows: usize,
    pub effort_slider_rows: usize,
    pub effort_dial_rows: usize,
    pub outputs: OutputPaths,
}

/// Configured extraction pipeline
#[derive(Debug, Clone, Default)]
pub struct ExtractPipeline {
    extractor: TimelineExtractor,
}

impl ExtractPipeline {
    /// Create a pipeline with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline with custom extraction settings
    pub fn with_config(config: ExtractConfig) -> Self {
        Self {
            extractor: TimelineExtractor::new(config),
        }
    }

    pub fn config(&self) -> &ExtractConfig {
        self.extractor.config()
    }

    /// Extract every subject in order; subject index is the timeline position.
    /// Stops at the first malformed trial.
    pub fn extract_subjects(
        &self,
        timelines: &[SubjectTimeline],
    ) -> Result<MeasureTables, ExtractError> {
        let mut tables = MeasureTables::new();
        for (uid, timeline) in timelines.iter().enumerate() {
            let measures = self.extractor.extract(timeline, uid)?;
            tables.append(measures);
        }
        Ok(tables)
    }

    /// Parse NDJSON text and extract it
    pub fn extract_ndjson(&self, ndjson: &str) -> Result<MeasureTables, ExtractError> {
        let timelines = loader::parse_ndjson(ndjson)?;
        self.extract_subjects(&timelines)
    }

    /// Load `dataset`, extract it and write the three tables beside it.
    ///
    /// Nothing is written unless every subject extracts cleanly.
    pub fn run(&self, dataset: &Path) -> Result<RunSummary, ExtractError> {
        let timelines = loader::load_file(dataset)?;
        let outputs = OutputPaths::for_dataset(dataset)?;

        let tables = self.extract_subjects(&timelines)?;
        writer::write_tables(&tables, &outputs)?;

        let summary = RunSummary {
            subjects: timelines.len(),
            performance_rows: tables.performance.len(),
            effort_slider_rows: tables.effort_slider.len(),
            effort_dial_rows: tables.effort_dial.len(),
            outputs,
        };
        info!(
            subjects = summary.subjects,
            performance = summary.performance_rows,
            effort_slider = summary.effort_slider_rows,
            effort_dial = summary.effort_dial_rows,
            "extraction complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnpairedKeyPolicy;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn subject_line() -> String {
        serde_json::json!([
            {"type": "instructions"},
            {"type": "comp_quiz", "correct": false},
            {"type": "comp_quiz", "correct": true},
            {"type": "instructions"},
            {
                "trial_id": 3,
                "reversed": false,
                "trial_index": 0,
                "selected_objects": [1, 1, 0, 1],
                "response": 5.0,
                "effort_dial_responses": [["keydown", 0.0], ["keyup", 1.2]]
            },
            {"type": "exit"}
        ])
        .to_string()
    }

    fn two_subjects() -> String {
        format!("{}\n{}\n", subject_line(), subject_line())
    }

    #[test]
    fn test_two_subject_example() {
        let tables = extract_ndjson(&two_subjects()).unwrap();

        assert_eq!(tables.performance.len(), 2);
        assert_eq!(tables.effort_slider.len(), 2);
        assert_eq!(tables.effort_dial.len(), 2);
        for (uid, record) in tables.performance.iter().enumerate() {
            assert_eq!(record.key.uid, uid);
            assert_eq!(record.td, 0.75);
        }
        for (uid, record) in tables.effort_slider.iter().enumerate() {
            assert_eq!(record.key.uid, uid);
            assert_eq!(record.effort, 5.0);
        }
        for (uid, record) in tables.effort_dial.iter().enumerate() {
            assert_eq!(record.key.uid, uid);
            assert_eq!((record.keydown, record.keyup), (0.0, 1.2));
        }
    }

    #[test]
    fn test_run_writes_tables_beside_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = dir.path().join("pilot.txt");
        fs::write(&dataset, two_subjects()).unwrap();

        let summary = extract_dataset(&dataset).unwrap();

        assert_eq!(summary.subjects, 2);
        assert_eq!(summary.outputs.performance, dir.path().join("pilot_performance.csv"));
        assert_eq!(
            fs::read_to_string(&summary.outputs.performance).unwrap(),
            "scene,reversed,order,td,uid\n3,false,0,0.75,0\n3,false,0,0.75,1\n"
        );
        assert_eq!(
            fs::read_to_string(&summary.outputs.effort_slider).unwrap(),
            "scene,reversed,order,effort,uid\n3,false,0,5.0,0\n3,false,0,5.0,1\n"
        );
        assert_eq!(
            fs::read_to_string(&summary.outputs.effort_dial).unwrap(),
            "scene,reversed,order,keydown,keyup,uid\n3,false,0,0.0,1.2,0\n3,false,0,0.0,1.2,1\n"
        );
    }

    #[test]
    fn test_empty_dataset_writes_headers_only() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = dir.path().join("empty.txt");
        fs::write(&dataset, "").unwrap();

        let summary = extract_dataset(&dataset).unwrap();

        assert_eq!(summary.subjects, 0);
        assert_eq!(
            fs::read_to_string(&summary.outputs.effort_dial).unwrap(),
            "scene,reversed,order,keydown,keyup,uid\n"
        );
        assert_eq!(
            fs::read_to_string(&summary.outputs.performance).unwrap(),
            "scene,reversed,order,td,uid\n"
        );
    }

    #[test]
    fn test_invalid_line_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = dir.path().join("broken.txt");
        fs::write(&dataset, format!("{}\nnot json\n", subject_line())).unwrap();

        let err = extract_dataset(&dataset).unwrap_err();

        assert!(matches!(err, ExtractError::Parse { line: 2, .. }));
        assert!(!dir.path().join("broken_performance.csv").exists());
    }

    #[test]
    fn test_missing_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_dataset(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, ExtractError::Io { .. }));
    }

    #[test]
    fn test_subject_order_is_stable() {
        let line = |scene: i64| {
            serde_json::json!([
                {"trial_id": scene, "response": 1},
                {"trial_id": scene + 100, "response": 2},
                {"type": "exit"}
            ])
            .to_string()
        };
        let input = format!("{}\n{}\n{}\n", line(1), line(2), line(3));
        let tables = extract_ndjson(&input).unwrap();

        let rows: Vec<(usize, i64)> = tables
            .effort_slider
            .iter()
            .map(|r| (r.key.uid, r.key.scene))
            .collect();
        assert_eq!(
            rows,
            vec![(0, 1), (0, 101), (1, 2), (1, 102), (2, 3), (2, 103)]
        );
    }

    #[test]
    fn test_custom_config() {
        let pipeline = ExtractPipeline::with_config(
            ExtractConfig::default().with_unpaired_key(UnpairedKeyPolicy::Drop),
        );
        let input = serde_json::json!([
            {"trial_id": 1, "effort_dial_responses": [["keydown", 4.0]]},
            {"type": "exit"}
        ])
        .to_string();

        assert_eq!(pipeline.config().unpaired_key, UnpairedKeyPolicy::Drop);
        assert!(pipeline.extract_ndjson(&input).unwrap().effort_dial.is_empty());
        assert_eq!(extract_ndjson(&input).unwrap().effort_dial.len(), 1);
    }
}
