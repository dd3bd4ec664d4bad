//! Test case declarations
//!
//! Defines the declarative case records consumed by the runner.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Comparison operator of a condition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Equals,
    Exists,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::Exists => "exists",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single comparison rule against one response field
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Condition {
    /// Expected value, only meaningful for `equals`
    #[serde(default, alias = "value")]
    pub value: String,

    #[serde(alias = "operator")]
    pub operator: Operator,
}

#[cfg(test)]
impl Condition {
    pub fn equals(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            operator: Operator::Equals,
        }
    }

    pub fn exists() -> Self {
        Self {
            value: String::new(),
            operator: Operator::Exists,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator {
            Operator::Equals => write!(f, "equals \"{}\"", self.value),
            Operator::Exists => write!(f, "exists"),
        }
    }
}

/// Presence-only marker: the response value under this key is carried
/// forward as a request header.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {}

/// One declarative request-and-validation unit
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TestCaseSpec {
    /// Path appended to the target base URL
    #[serde(alias = "route")]
    pub route: String,

    #[serde(alias = "expect_return_code")]
    pub expect_return_code: u16,

    /// Conditions per response key, evaluated in key order. A present but
    /// empty map still makes the body decoded.
    #[serde(default, alias = "conditions", skip_serializing_if = "Option::is_none")]
    pub conditions: Option<BTreeMap<String, Vec<Condition>>>,

    /// Response keys whose values become headers for later cases
    #[serde(default, alias = "actions")]
    pub actions: BTreeMap<String, Action>,
}

impl TestCaseSpec {
    /// True when the case declares conditions, even an empty set
    pub fn has_conditions(&self) -> bool {
        self.conditions.is_some()
    }

    pub fn has_actions(&self) -> bool {
        !self.actions.is_empty()
    }
}

#[cfg(test)]
impl TestCaseSpec {
    pub fn new(route: impl Into<String>, expect_return_code: u16) -> Self {
        Self {
            route: route.into(),
            expect_return_code,
            conditions: None,
            actions: BTreeMap::new(),
        }
    }

    pub fn with_condition(mut self, key: impl Into<String>, condition: Condition) -> Self {
        self.conditions
            .get_or_insert_with(BTreeMap::new)
            .entry(key.into())
            .or_default()
            .push(condition);
        self
    }

    pub fn with_action(mut self, key: impl Into<String>) -> Self {
        self.actions.insert(key.into(), Action::default());
        self
    }
}

impl fmt::Display for TestCaseSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GET {} (expect {})", self.route, self.expect_return_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_pascal_case() {
        let json = r#"{
            "Route": "/login",
            "ExpectReturnCode": 200,
            "Conditions": {"token": [{"Operator": "exists"}]},
            "Actions": {"token": {}}
        }"#;

        let spec: TestCaseSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.route, "/login");
        assert_eq!(spec.expect_return_code, 200);
        assert_eq!(spec.conditions.unwrap()["token"], vec![Condition::exists()]);
        assert!(spec.actions.contains_key("token"));
    }

    #[test]
    fn test_deserialize_snake_case() {
        let json = r#"{
            "route": "/health",
            "expect_return_code": 200,
            "conditions": {"status": [{"operator": "equals", "value": "ok"}]}
        }"#;

        let spec: TestCaseSpec = serde_json::from_str(json).unwrap();
        assert!(!spec.has_actions());
        assert_eq!(spec.conditions.unwrap()["status"], vec![Condition::equals("ok")]);
    }

    #[test]
    fn test_unknown_operator_rejected() {
        let json = r#"{"Route": "/", "ExpectReturnCode": 200,
            "Conditions": {"a": [{"Operator": "contains", "Value": "x"}]}}"#;
        assert!(serde_json::from_str::<TestCaseSpec>(json).is_err());
    }

    #[test]
    fn test_builder() {
        let spec = TestCaseSpec::new("/health", 200)
            .with_condition("status", Condition::equals("ok"))
            .with_condition("status", Condition::exists())
            .with_action("token");

        assert_eq!(spec.conditions.as_ref().unwrap()["status"].len(), 2);
        assert!(spec.has_conditions());
        assert!(spec.has_actions());
        assert_eq!(spec.to_string(), "GET /health (expect 200)");
    }

    #[test]
    fn test_empty_conditions_are_declared() {
        let declared: TestCaseSpec =
            serde_json::from_str(r#"{"Route": "/", "ExpectReturnCode": 200, "Conditions": {}}"#)
                .unwrap();
        assert!(declared.has_conditions());

        let absent: TestCaseSpec =
            serde_json::from_str(r#"{"Route": "/", "ExpectReturnCode": 200}"#).unwrap();
        assert!(!absent.has_conditions());

        let null: TestCaseSpec =
            serde_json::from_str(r#"{"Route": "/", "ExpectReturnCode": 200, "Conditions": null}"#)
                .unwrap();
        assert!(!null.has_conditions());
    }
}
