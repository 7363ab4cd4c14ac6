//! Typed access to trial events
//!
//! Trial events are heterogeneous jsPsych data objects, so they stay as
//! `serde_json::Value` and are read field by field. A missing or `null` field
//! is `Ok(None)`; a present field of the wrong type is an error that aborts the
//! run.

use crate::error::ExtractError;
use crate::loader::json_kind;
use crate::types::{KeyAction, KeyPress};
use serde_json::Value;

/// One event of a subject timeline, with its location for error reporting
#[derive(Debug, Clone, Copy)]
pub struct TrialEvent<'a> {
    value: &'a Value,
    subject: usize,
    position: usize,
}

impl<'a> TrialEvent<'a> {
    pub fn new(value: &'a Value, subject: usize, position: usize) -> Self {
        Self {
            value,
            subject,
            position,
        }
    }

    /// Position of the event in the untrimmed timeline
    pub fn position(&self) -> usize {
        self.position
    }

    fn field(&self, name: &str) -> Option<&'a Value> {
        self.value.get(name).filter(|v| !v.is_null())
    }

    fn invalid(&self, field: &'static str, problem: String) -> ExtractError {
        ExtractError::InvalidField {
            subject: self.subject,
            position: self.position,
            field,
            problem,
        }
    }

    fn expected(&self, field: &'static str, what: &str, found: &Value) -> ExtractError {
        self.invalid(field, format!("expected {}, found {}", what, json_kind(found)))
    }

    /// True for a comprehension quiz step that the subject answered correctly
    pub fn is_passed_quiz(&self, quiz_type: &str) -> bool {
        let is_quiz = self.field("type").and_then(Value::as_str) == Some(quiz_type);
        is_quiz && self.field("correct").and_then(Value::as_bool) == Some(true)
    }

    /// Scene identifier (`trial_id`)
    pub fn scene(&self) -> Result<Option<i64>, ExtractError> {
        self.field("trial_id")
            .map(|v| as_integer(v).ok_or_else(|| self.expected("trial_id", "an integer", v)))
            .transpose()
    }

    /// Presentation direction (`reversed`)
    pub fn reversed(&self) -> Result<Option<bool>, ExtractError> {
        self.field("reversed")
            .map(|v| v.as_bool().ok_or_else(|| self.expected("reversed", "a boolean", v)))
            .transpose()
    }

    /// Trial order (`trial_index`)
    pub fn order(&self) -> Result<Option<i64>, ExtractError> {
        self.field("trial_index")
            .map(|v| as_integer(v).ok_or_else(|| self.expected("trial_index", "an integer", v)))
            .transpose()
    }

    /// Target selection flags (`selected_objects`) as 0.0/1.0 values
    pub fn selected_objects(&self) -> Result<Option<Vec<f64>>, ExtractError> {
        let Some(value) = self.field("selected_objects") else {
            return Ok(None);
        };
        let items = value
            .as_array()
            .ok_or_else(|| self.expected("selected_objects", "an array", value))?;

        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Bool(flag) => Ok(if *flag { 1.0 } else { 0.0 }),
                Value::Number(n) => n.as_f64().ok_or_else(|| {
                    self.invalid("selected_objects", format!("entry {} is not a finite number", i))
                }),
                other => Err(self.invalid(
                    "selected_objects",
                    format!("entry {} is {}, expected a boolean or number", i, json_kind(other)),
                )),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Effort slider rating (`response`)
    pub fn response(&self) -> Result<Option<f64>, ExtractError> {
        self.field("response")
            .map(|v| v.as_f64().ok_or_else(|| self.expected("response", "a number", v)))
            .transpose()
    }

    /// Logged effort dial events (`effort_dial_responses`)
    pub fn key_presses(&self) -> Result<Option<Vec<KeyPress>>, ExtractError> {
        let Some(value) = self.field("effort_dial_responses") else {
            return Ok(None);
        };
        let items = value
            .as_array()
            .ok_or_else(|| self.expected("effort_dial_responses", "an array", value))?;

        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.key_press(i, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    fn key_press(&self, index: usize, item: &Value) -> Result<KeyPress, ExtractError> {
        let timestamp = item
            .get(1)
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                self.invalid(
                    "effort_dial_responses",
                    format!("entry {} has no numeric timestamp", index),
                )
            })?;
        let action = item
            .get(0)
            .and_then(Value::as_str)
            .map_or(KeyAction::Other, KeyAction::from_label);

        Ok(KeyPress { action, timestamp })
    }
}

/// Integer value, accepting integral floats such as `3.0`
fn as_integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
        .map(|f| f as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(value: &Value) -> TrialEvent<'_> {
        TrialEvent::new(value, 0, 4)
    }

    #[test]
    fn test_passed_quiz() {
        assert!(event(&json!({"type": "comp_quiz", "correct": true})).is_passed_quiz("comp_quiz"));
        assert!(!event(&json!({"type": "comp_quiz", "correct": false})).is_passed_quiz("comp_quiz"));
        assert!(!event(&json!({"type": "comp_quiz"})).is_passed_quiz("comp_quiz"));
        assert!(!event(&json!({"type": "survey", "correct": true})).is_passed_quiz("comp_quiz"));
        assert!(!event(&json!(12)).is_passed_quiz("comp_quiz"));
    }

    #[test]
    fn test_scene() {
        assert_eq!(event(&json!({"trial_id": 3})).scene().unwrap(), Some(3));
        assert_eq!(event(&json!({"trial_id": 3.0})).scene().unwrap(), Some(3));
        assert_eq!(event(&json!({"trial_id": null})).scene().unwrap(), None);
        assert_eq!(event(&json!({})).scene().unwrap(), None);
        assert!(event(&json!({"trial_id": "3"})).scene().is_err());
        assert!(event(&json!({"trial_id": 3.5})).scene().is_err());
    }

    #[test]
    fn test_optional_key_fields() {
        let value = json!({"reversed": true, "trial_index": 12});
        let ev = event(&value);
        assert_eq!(ev.reversed().unwrap(), Some(true));
        assert_eq!(ev.order().unwrap(), Some(12));

        let empty = json!({});
        assert_eq!(event(&empty).reversed().unwrap(), None);
        assert_eq!(event(&empty).order().unwrap(), None);

        assert!(event(&json!({"reversed": "no"})).reversed().is_err());
    }

    #[test]
    fn test_selected_objects_accepts_bools_and_numbers() {
        let value = json!({"selected_objects": [true, false, 1, 0]});
        assert_eq!(
            event(&value).selected_objects().unwrap(),
            Some(vec![1.0, 0.0, 1.0, 0.0])
        );
        assert!(event(&json!({"selected_objects": ["x"]})).selected_objects().is_err());
        assert!(event(&json!({"selected_objects": 1})).selected_objects().is_err());
    }

    #[test]
    fn test_response() {
        assert_eq!(event(&json!({"response": 5})).response().unwrap(), Some(5.0));
        assert_eq!(event(&json!({"response": 62.5})).response().unwrap(), Some(62.5));
        assert!(event(&json!({"response": "high"})).response().is_err());
    }

    #[test]
    fn test_key_presses() {
        let value = json!({"effort_dial_responses": [["keydown", 10.5], ["keyup", 20]]});
        let presses = event(&value).key_presses().unwrap().unwrap();

        assert_eq!(
            presses,
            vec![
                KeyPress {
                    action: KeyAction::Down,
                    timestamp: 10.5
                },
                KeyPress {
                    action: KeyAction::Up,
                    timestamp: 20.0
                },
            ]
        );
    }

    #[test]
    fn test_key_press_without_timestamp_is_error() {
        let value = json!({"effort_dial_responses": [["keydown", "soon"]]});
        let err = event(&value).key_presses().unwrap_err();

        match err {
            ExtractError::InvalidField {
                subject,
                position,
                field,
                ..
            } => {
                assert_eq!((subject, position, field), (0, 4, "effort_dial_responses"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
