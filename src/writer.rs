//! CSV encoding and output files
//!
//! Tables are rendered to comma-separated text with the schema header. All
//! cells are numbers or booleans so no quoting is ever needed. Floats keep at
//! least one fractional digit (`5.0`, not `5`); missing optional values are
//! empty cells.

use crate::error::ExtractError;
use crate::schema::{TableSchema, EFFORT_DIAL_SCHEMA, EFFORT_SLIDER_SCHEMA, PERFORMANCE_SCHEMA};
use crate::tables::MeasureTables;
use crate::types::{Cell, TableRow};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Locations of the three output tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub performance: PathBuf,
    pub effort_slider: PathBuf,
    pub effort_dial: PathBuf,
}

impl OutputPaths {
    /// Paths beside `dataset`, named after its stem: `data/run1.txt` gives
    /// `data/run1_performance.csv` and so on
    pub fn for_dataset(dataset: &Path) -> Result<Self, ExtractError> {
        let stem = dataset
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ExtractError::OutputPath(dataset.to_path_buf()))?;
        let dir = match dataset.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let path = |schema: TableSchema| dir.join(schema.file_name(stem));

        Ok(Self {
            performance: path(PERFORMANCE_SCHEMA),
            effort_slider: path(EFFORT_SLIDER_SCHEMA),
            effort_dial: path(EFFORT_DIAL_SCHEMA),
        })
    }
}

/// Render rows as CSV text, header included
pub fn encode_table<R: TableRow>(rows: &[R]) -> String {
    let mut out = R::SCHEMA.header();
    out.push('\n');
    for row in rows {
        let cells = row.cells();
        debug_assert!(cells
            .iter()
            .zip(R::SCHEMA.columns)
            .all(|(cell, column)| cell.kind() == column.kind));

        let line: Vec<String> = cells.iter().map(format_cell).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

/// Write one table to `path`
pub fn write_table<R: TableRow>(path: &Path, rows: &[R]) -> Result<(), ExtractError> {
    fs::write(path, encode_table(rows)).map_err(|e| ExtractError::io(path, e))?;
    info!(
        table = R::SCHEMA.name,
        rows = rows.len(),
        path = %path.display(),
        "wrote table"
    );
    Ok(())
}

/// Write all three tables, header-only when a table is empty
pub fn write_tables(tables: &MeasureTables, paths: &OutputPaths) -> Result<(), ExtractError> {
    write_table(&paths.performance, &tables.performance)?;
    write_table(&paths.effort_slider, &tables.effort_slider)?;
    write_table(&paths.effort_dial, &tables.effort_dial)?;
    Ok(())
}

fn format_cell(cell: &Cell) -> String {
    match cell {
        Cell::Int(Some(n)) => n.to_string(),
        Cell::Bool(Some(b)) => b.to_string(),
        Cell::Int(None) | Cell::Bool(None) => String::new(),
        Cell::Float(f) => format_float(*f),
    }
}

fn format_float(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        format!("{}inf", sign)
    } else if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
