//! Extraction configuration
//!
//! Every constant the timeline extractor depends on lives here so that the
//! defaults match the deployed experiment and callers can override them in one
//! place.

/// `type` value of the comprehension quiz step that precedes the scored trials
pub const COMP_QUIZ_TYPE: &str = "comp_quiz";

/// Scored trials begin this many steps after the first passed quiz
pub const QUIZ_TO_TRIALS_OFFSET: usize = 2;

/// Trailing steps that are never trials (the exit/debrief page)
pub const TRAILING_EXIT_STEPS: usize = 1;

/// Number of designated targets scored for accuracy
pub const TARGET_COUNT: usize = 4;

/// Length of a tracking trial in milliseconds; closes a key press that was
/// still held when the trial ended
pub const TRIAL_TIMEOUT_MS: f64 = 10_000.0;

/// What to do with a trailing key-down that has no matching key-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnpairedKeyPolicy {
    /// Discard the unmatched press
    Drop,
    /// Emit the press with its release set to the trial timeout
    #[default]
    Timeout,
}

/// Tunables for [`crate::extractor::TimelineExtractor`]
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractConfig {
    /// Quiz step marker that opens the scored phase
    pub quiz_type: String,
    /// Offset from the passed quiz to the first scored trial
    pub quiz_offset: usize,
    /// Steps dropped from the end of every timeline
    pub trailing_steps: usize,
    /// Selection flags averaged into target-designation accuracy
    pub target_count: usize,
    /// Handling of an odd trailing key-down
    pub unpaired_key: UnpairedKeyPolicy,
    /// Release timestamp used by [`UnpairedKeyPolicy::Timeout`]
    pub trial_timeout_ms: f64,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            quiz_type: COMP_QUIZ_TYPE.to_string(),
            quiz_offset: QUIZ_TO_TRIALS_OFFSET,
            trailing_steps: TRAILING_EXIT_STEPS,
            target_count: TARGET_COUNT,
            unpaired_key: UnpairedKeyPolicy::default(),
            trial_timeout_ms: TRIAL_TIMEOUT_MS,
        }
    }
}

impl ExtractConfig {
    /// Default configuration with a different unpaired key-press policy
    pub fn with_unpaired_key(mut self, policy: UnpairedKeyPolicy) -> Self {
        self.unpaired_key = policy;
        self
    }
}
