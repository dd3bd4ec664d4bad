//! Case file loading
//!
//! Reads the ordered case list from a JSON or YAML file.

use anyhow::{Context, Result};
use std::path::Path;

use super::file::is_yaml_file;
use crate::models::{Operator, TestCaseSpec};

/// Load cases in file order
pub fn load_cases(path: impl AsRef<Path>) -> Result<Vec<TestCaseSpec>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read case file: {}", path.display()))?;

    let cases: Vec<TestCaseSpec> = if is_yaml_file(path) {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML cases: {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON cases: {}", path.display()))?
    };

    Ok(cases)
}

/// Report suspicious declarations that still load fine
pub fn validate_cases(cases: &[TestCaseSpec]) -> Vec<String> {
    let mut issues = Vec::new();

    for (index, case) in cases.iter().enumerate() {
        let n = index + 1;

        if !case.route.starts_with('/') {
            issues.push(format!(
                "case {n}: route '{}' does not start with '/'",
                case.route
            ));
        }

        if !(100..=599).contains(&case.expect_return_code) {
            issues.push(format!(
                "case {n}: expected status code {} is not a valid HTTP status",
                case.expect_return_code
            ));
        }

        for (key, conditions) in case.conditions.iter().flatten() {
            if conditions.is_empty() {
                issues.push(format!("case {n}: key '{key}' has an empty condition list"));
            }
            for condition in conditions {
                if condition.operator == Operator::Exists && !condition.value.is_empty() {
                    issues.push(format!(
                        "case {n}: 'exists' on key '{key}' ignores value '{}'",
                        condition.value
                    ));
                }
            }
        }

        // Values are only decoded when conditions are declared
        if case.has_actions() && !case.has_conditions() {
            issues.push(format!(
                "case {n}: actions without conditions always carry empty values"
            ));
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Condition;

    const JSON_CASES: &str = r#"[
        {"Route": "/login", "ExpectReturnCode": 200,
         "Conditions": {"token": [{"Operator": "exists"}]},
         "Actions": {"token": {}}},
        {"Route": "/health", "ExpectReturnCode": 200,
         "Conditions": {"status": [{"Value": "ok", "Operator": "equals"}]}}
    ]"#;

    const YAML_CASES: &str = r#"
- Route: /login
  ExpectReturnCode: 200
  Conditions:
    token:
      - Operator: exists
  Actions:
    token: {}
- route: /health
  expect_return_code: 200
  conditions:
    status:
      - value: ok
        operator: equals
"#;

    #[test]
    fn test_json_and_yaml_load_identically() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("cases.json");
        let yaml_path = dir.path().join("cases.yaml");
        std::fs::write(&json_path, JSON_CASES).unwrap();
        std::fs::write(&yaml_path, YAML_CASES).unwrap();

        let from_json = load_cases(&json_path).unwrap();
        let from_yaml = load_cases(&yaml_path).unwrap();

        assert_eq!(from_json.len(), 2);
        assert_eq!(from_json, from_yaml);
        assert_eq!(from_json[0].route, "/login");
        assert_eq!(from_json[1].route, "/health");
    }

    #[test]
    fn test_missing_file() {
        let err = load_cases("/nonexistent/cases.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read case file"));
    }

    #[test]
    fn test_validate_cases() {
        let cases = vec![
            TestCaseSpec::new("/ok", 200).with_condition("a", Condition::equals("b")),
            TestCaseSpec::new("no-slash", 200),
            TestCaseSpec::new("/weird", 42),
            TestCaseSpec::new("/token", 200).with_action("token"),
        ];

        let issues = validate_cases(&cases);
        assert_eq!(issues.len(), 3);
        assert!(issues[0].starts_with("case 2:"));
        assert!(issues[1].starts_with("case 3:"));
        assert!(issues[2].starts_with("case 4:"));
    }
}
