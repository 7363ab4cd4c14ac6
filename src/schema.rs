//! Output table schemas
//!
//! The three CSV tables share their column layout between the record types in
//! [`crate::types`] and the writer in [`crate::writer`]. Column order here is
//! the order of cells produced by each record.

/// Semantic type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Int,
    Bool,
    Float,
}

/// One named column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn column(name: &'static str, kind: ColumnKind) -> Column {
    Column { name, kind }
}

/// Fixed layout of one output table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    /// Measure name, also the output file suffix
    pub name: &'static str,
    pub columns: &'static [Column],
}

impl TableSchema {
    /// Comma-joined header row
    pub fn header(&self) -> String {
        self.columns
            .iter()
            .map(|c| c.name)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Output file name for a dataset stem, e.g. `run1_performance.csv`
    pub fn file_name(&self, stem: &str) -> String {
        format!("{}_{}.csv", stem, self.name)
    }
}

pub const PERFORMANCE_SCHEMA: TableSchema = TableSchema {
    name: "performance",
    columns: &[
        column("scene", ColumnKind::Int),
        column("reversed", ColumnKind::Bool),
        column("order", ColumnKind::Int),
        column("td", ColumnKind::Float),
        column("uid", ColumnKind::Int),
    ],
};

pub const EFFORT_SLIDER_SCHEMA: TableSchema = TableSchema {
    name: "effort_slider",
    columns: &[
        column("scene", ColumnKind::Int),
        column("reversed", ColumnKind::Bool),
        column("order", ColumnKind::Int),
        column("effort", ColumnKind::Float),
        column("uid", ColumnKind::Int),
    ],
};

pub const EFFORT_DIAL_SCHEMA: TableSchema = TableSchema {
    name: "effort_dial",
    columns: &[
        column("scene", ColumnKind::Int),
        column("reversed", ColumnKind::Bool),
        column("order", ColumnKind::Int),
        column("keydown", ColumnKind::Float),
        column("keyup", ColumnKind::Float),
        column("uid", ColumnKind::Int),
    ],
};
