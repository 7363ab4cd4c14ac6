//! Core types for the extraction pipeline
//!
//! Records produced by the timeline extractor, the per-subject bundle that
//! carries them to the table assembler, and the cell values the CSV writer
//! consumes.

use crate::schema::{
    ColumnKind, TableSchema, EFFORT_DIAL_SCHEMA, EFFORT_SLIDER_SCHEMA, PERFORMANCE_SCHEMA,
};

/// Fields shared by every record of one trial
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialKey {
    /// Scene identifier (`trial_id`)
    pub scene: i64,
    /// Mirrored presentation of the scene
    pub reversed: Option<bool>,
    /// Position of the trial in the session (`trial_index`)
    pub order: Option<i64>,
    /// Subject index within the dataset
    pub uid: usize,
}

/// Target-designation accuracy for one trial
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceRecord {
    pub key: TrialKey,
    /// Mean of the scored selection flags
    pub td: f64,
}

/// Post-trial effort rating
#[derive(Debug, Clone, PartialEq)]
pub struct EffortSliderRecord {
    pub key: TrialKey,
    pub effort: f64,
}

/// One press/release of the effort dial, timestamps in ms from motion onset
#[derive(Debug, Clone, PartialEq)]
pub struct EffortDialRecord {
    pub key: TrialKey,
    pub keydown: f64,
    pub keyup: f64,
}

/// Direction of a logged key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
    /// Label the plugin never writes; kept so pairing stays positional
    Other,
}

impl KeyAction {
    pub fn from_label(label: &str) -> Self {
        match label {
            "keydown" => KeyAction::Down,
            "keyup" => KeyAction::Up,
            _ => KeyAction::Other,
        }
    }
}

/// One entry of `effort_dial_responses`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyPress {
    pub action: KeyAction,
    pub timestamp: f64,
}

/// Everything extracted from one subject's timeline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectMeasures {
    pub performance: Vec<PerformanceRecord>,
    pub effort_slider: Vec<EffortSliderRecord>,
    pub effort_dial: Vec<EffortDialRecord>,
}

impl SubjectMeasures {
    pub fn is_empty(&self) -> bool {
        self.performance.is_empty() && self.effort_slider.is_empty() && self.effort_dial.is_empty()
    }
}

/// A single CSV cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Int(Option<i64>),
    Bool(Option<bool>),
    Float(f64),
}

impl Cell {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Cell::Int(_) => ColumnKind::Int,
            Cell::Bool(_) => ColumnKind::Bool,
            Cell::Float(_) => ColumnKind::Float,
        }
    }
}

/// A record that can be written as one row of a table
pub trait TableRow {
    const SCHEMA: TableSchema;

    /// Cells in schema column order
    fn cells(&self) -> Vec<Cell>;
}

impl TrialKey {
    fn leading_cells(&self) -> [Cell; 3] {
        [
            Cell::Int(Some(self.scene)),
            Cell::Bool(self.reversed),
            Cell::Int(self.order),
        ]
    }

    fn uid_cell(&self) -> Cell {
        Cell::Int(Some(self.uid as i64))
    }
}

impl TableRow for PerformanceRecord {
    const SCHEMA: TableSchema = PERFORMANCE_SCHEMA;

    fn cells(&self) -> Vec<Cell> {
        let mut cells = self.key.leading_cells().to_vec();
        cells.push(Cell::Float(self.td));
        cells.push(self.key.uid_cell());
        cells
    }
}

impl TableRow for EffortSliderRecord {
    const SCHEMA: TableSchema = EFFORT_SLIDER_SCHEMA;

    fn cells(&self) -> Vec<Cell> {
        let mut cells = self.key.leading_cells().to_vec();
        cells.push(Cell::Float(self.effort));
        cells.push(self.key.uid_cell());
        cells
    }
}

impl TableRow for EffortDialRecord {
    const SCHEMA: TableSchema = EFFORT_DIAL_SCHEMA;

    fn cells(&self) -> Vec<Cell> {
        let mut cells = self.key.leading_cells().to_vec();
        cells.push(Cell::Float(self.keydown));
        cells.push(Cell::Float(self.keyup));
        cells.push(self.key.uid_cell());
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> TrialKey {
        TrialKey {
            scene: 3,
            reversed: Some(false),
            order: None,
            uid: 1,
        }
    }

    fn assert_matches_schema<R: TableRow>(row: &R) {
        let kinds: Vec<ColumnKind> = row.cells().iter().map(Cell::kind).collect();
        let expected: Vec<ColumnKind> = R::SCHEMA.columns.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, expected, "{} row does not match schema", R::SCHEMA.name);
    }

    #[test]
    fn test_rows_follow_schema_layout() {
        assert_matches_schema(&PerformanceRecord { key: key(), td: 0.5 });
        assert_matches_schema(&EffortSliderRecord {
            key: key(),
            effort: 3.0,
        });
        assert_matches_schema(&EffortDialRecord {
            key: key(),
            keydown: 0.0,
            keyup: 1.0,
        });
    }

    #[test]
    fn test_key_action_labels() {
        assert_eq!(KeyAction::from_label("keydown"), KeyAction::Down);
        assert_eq!(KeyAction::from_label("keyup"), KeyAction::Up);
        assert_eq!(KeyAction::from_label("space"), KeyAction::Other);
    }
}
