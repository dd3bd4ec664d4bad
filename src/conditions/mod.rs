//! Condition evaluation
//!
//! Decides whether a decoded response body satisfies the conditions
//! declared on a case.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::{Condition, Operator};

/// Flat response body: string keys to string values
pub type ResponseBody = BTreeMap<String, String>;

/// A failed condition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConditionError {
    #[error("expected {key} to be in the response body but it was not")]
    MissingKey { key: String },

    #[error("expected {key} to be equal to {expected}. Got {actual} instead")]
    ValueMismatch {
        key: String,
        expected: String,
        actual: String,
    },
}

impl Condition {
    /// Check this condition against `body[key]`
    pub fn validate(&self, body: &ResponseBody, key: &str) -> Result<(), ConditionError> {
        match self.operator {
            Operator::Exists => {
                if !body.contains_key(key) {
                    return Err(ConditionError::MissingKey {
                        key: key.to_string(),
                    });
                }
            }
            Operator::Equals => {
                let actual = body.get(key).map(String::as_str).unwrap_or_default();
                if actual != self.value {
                    return Err(ConditionError::ValueMismatch {
                        key: key.to_string(),
                        expected: self.value.clone(),
                        actual: actual.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Evaluate every condition and collect one message per failure.
///
/// Conditions on the same key are independent; a failure never hides the
/// ones after it.
pub fn validate_conditions(
    conditions: &BTreeMap<String, Vec<Condition>>,
    body: &ResponseBody,
) -> Vec<String> {
    conditions
        .iter()
        .flat_map(|(key, conditions_for_key)| {
            conditions_for_key.iter().filter_map(move |condition| {
                condition
                    .validate(body, key)
                    .err()
                    .map(|e| format!("error running condition on key {key}: {e}"))
            })
        })
        .collect()
}
