//! Timeline extraction
//!
//! Finds the scored phase of a subject timeline and derives the three
//! per-trial measures from it:
//!
//! - **performance**: target-designation accuracy from `selected_objects`
//! - **effort slider**: the post-trial rating in `response`
//! - **effort dial**: press/release pairs from `effort_dial_responses`
//!
//! Each measure is extracted independently; a trial missing one field still
//! contributes the others. Trials without a scene identifier contribute
//! nothing.

use crate::config::{ExtractConfig, UnpairedKeyPolicy};
use crate::error::ExtractError;
use crate::event::TrialEvent;
use crate::loader::SubjectTimeline;
use crate::types::{
    EffortDialRecord, EffortSliderRecord, KeyAction, KeyPress, PerformanceRecord,
    SubjectMeasures, TrialKey,
};
use std::ops::Range;
use tracing::{debug, warn};

/// Where the scored phase of a timeline begins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStart {
    /// Trials follow the first passed comprehension quiz
    AfterQuiz { quiz_position: usize },
    /// No passed quiz was found and the whole timeline is scanned,
    /// instructions included
    WholeTimeline,
}

impl PhaseStart {
    /// Index of the first event of the scored phase
    pub fn first_event(&self, quiz_offset: usize) -> usize {
        match self {
            PhaseStart::AfterQuiz { quiz_position } => quiz_position + quiz_offset,
            PhaseStart::WholeTimeline => 0,
        }
    }
}

/// Per-subject extractor
#[derive(Debug, Clone, Default)]
pub struct TimelineExtractor {
    config: ExtractConfig,
}

impl TimelineExtractor {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Locate the first passed comprehension quiz
    pub fn phase_start(&self, timeline: &SubjectTimeline) -> PhaseStart {
        timeline
            .events
            .iter()
            .enumerate()
            .find(|(i, step)| TrialEvent::new(step, 0, *i).is_passed_quiz(&self.config.quiz_type))
            .map_or(PhaseStart::WholeTimeline, |(quiz_position, _)| {
                PhaseStart::AfterQuiz { quiz_position }
            })
    }

    /// Index range of the scored phase: from the phase start up to, but not
    /// including, the trailing exit steps
    pub fn scored_range(&self, timeline: &SubjectTimeline, start: PhaseStart) -> Range<usize> {
        let first = start.first_event(self.config.quiz_offset);
        let end = timeline.len().saturating_sub(self.config.trailing_steps);
        first.min(end)..end
    }

    /// Extract all measures of one subject
    pub fn extract(
        &self,
        timeline: &SubjectTimeline,
        uid: usize,
    ) -> Result<SubjectMeasures, ExtractError> {
        let start = self.phase_start(timeline);
        if start == PhaseStart::WholeTimeline {
            warn!(uid, "no passed comprehension quiz, scanning the whole timeline");
        }
        let range = self.scored_range(timeline, start);
        debug!(uid, ?start, first = range.start, end = range.end, "scored phase");

        let mut measures = SubjectMeasures::default();
        for position in range {
            let event = TrialEvent::new(&timeline.events[position], uid, position);
            self.extract_trial(&event, uid, &mut measures)?;
        }

        debug!(
            uid,
            performance = measures.performance.len(),
            effort_slider = measures.effort_slider.len(),
            effort_dial = measures.effort_dial.len(),
            "extracted subject"
        );
        Ok(measures)
    }

    fn extract_trial(
        &self,
        event: &TrialEvent<'_>,
        uid: usize,
        measures: &mut SubjectMeasures,
    ) -> Result<(), ExtractError> {
        let Some(key) = trial_key(event, uid)? else {
            return Ok(());
        };

        if let Some(record) = performance_record(event, key, self.config.target_count)? {
            measures.performance.push(record);
        }
        if let Some(record) = effort_slider_record(event, key)? {
            measures.effort_slider.push(record);
        }
        measures.effort_dial.extend(effort_dial_records(
            event,
            key,
            self.config.unpaired_key,
            self.config.trial_timeout_ms,
        )?);
        Ok(())
    }
}

/// Key fields of a trial, or `None` when the event has no scene identifier
pub fn trial_key(event: &TrialEvent<'_>, uid: usize) -> Result<Option<TrialKey>, ExtractError> {
    let Some(scene) = event.scene()? else {
        return Ok(None);
    };
    Ok(Some(TrialKey {
        scene,
        reversed: event.reversed()?,
        order: event.order()?,
        uid,
    }))
}

/// Performance record from the target selection flags, if present
pub fn performance_record(
    event: &TrialEvent<'_>,
    key: TrialKey,
    target_count: usize,
) -> Result<Option<PerformanceRecord>, ExtractError> {
    Ok(event.selected_objects()?.map(|flags| PerformanceRecord {
        key,
        td: target_designation_accuracy(&flags, target_count),
    }))
}

/// Effort slider record from the rating, if present
pub fn effort_slider_record(
    event: &TrialEvent<'_>,
    key: TrialKey,
) -> Result<Option<EffortSliderRecord>, ExtractError> {
    Ok(event
        .response()?
        .map(|effort| EffortSliderRecord { key, effort }))
}

/// Effort dial records from the logged key events, empty if absent
pub fn effort_dial_records(
    event: &TrialEvent<'_>,
    key: TrialKey,
    policy: UnpairedKeyPolicy,
    timeout_ms: f64,
) -> Result<Vec<EffortDialRecord>, ExtractError> {
    let Some(presses) = event.key_presses()? else {
        return Ok(Vec::new());
    };
    if labels_disagree(&presses) {
        debug!(
            uid = key.uid,
            position = event.position(),
            "effort dial labels do not alternate keydown/keyup, pairing by position"
        );
    }

    Ok(pair_key_presses(&presses, policy, timeout_ms)
        .into_iter()
        .map(|(keydown, keyup)| EffortDialRecord {
            key,
            keydown,
            keyup,
        })
        .collect())
}

/// Mean of the first `target_count` selection flags.
///
/// Targets are always presented first, so the leading flags are exactly the
/// target selections. Fewer flags are averaged as given; none yields NaN.
pub fn target_designation_accuracy(flags: &[f64], target_count: usize) -> f64 {
    let scored = &flags[..flags.len().min(target_count)];
    scored.iter().sum::<f64>() / scored.len() as f64
}

/// Pair key events positionally as (down, up) timestamps.
///
/// A trailing unmatched press is dropped or closed at `timeout_ms` depending
/// on `policy`.
pub fn pair_key_presses(
    presses: &[KeyPress],
    policy: UnpairedKeyPolicy,
    timeout_ms: f64,
) -> Vec<(f64, f64)> {
    let mut pairs: Vec<(f64, f64)> = presses
        .chunks_exact(2)
        .map(|pair| (pair[0].timestamp, pair[1].timestamp))
        .collect();

    if let [.., last] = presses {
        if presses.len() % 2 == 1 && policy == UnpairedKeyPolicy::Timeout {
            pairs.push((last.timestamp, timeout_ms));
        }
    }
    pairs
}

fn labels_disagree(presses: &[KeyPress]) -> bool {
    presses.iter().enumerate().any(|(i, press)| {
        let expected = if i % 2 == 0 { KeyAction::Down } else { KeyAction::Up };
        press.action != expected
    })
}
