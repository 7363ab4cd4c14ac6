//! Table assembly
//!
//! Accumulates per-subject measures into the three dataset-wide tables in
//! subject order, keeping each subject's timeline order.

use crate::types::{EffortDialRecord, EffortSliderRecord, PerformanceRecord, SubjectMeasures};

/// The three output tables of a dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasureTables {
    pub performance: Vec<PerformanceRecord>,
    pub effort_slider: Vec<EffortSliderRecord>,
    pub effort_dial: Vec<EffortDialRecord>,
}

impl MeasureTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one subject's records after everything already collected
    pub fn append(&mut self, measures: SubjectMeasures) {
        self.performance.extend(measures.performance);
        self.effort_slider.extend(measures.effort_slider);
        self.effort_dial.extend(measures.effort_dial);
    }

    pub fn is_empty(&self) -> bool {
        self.performance.is_empty() && self.effort_slider.is_empty() && self.effort_dial.is_empty()
    }
}

impl FromIterator<SubjectMeasures> for MeasureTables {
    fn from_iter<I: IntoIterator<Item = SubjectMeasures>>(iter: I) -> Self {
        let mut tables = MeasureTables::new();
        for measures in iter {
            tables.append(measures);
        }
        tables
    }
}
