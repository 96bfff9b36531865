use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default export filename, kept compatible with previously saved files.
pub const DEFAULT_RULES_FILENAME: &str = "regras_substituicao.json";

/// A single substitution rule. The field names are the on-disk JSON format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Pattern to search for, compiled case-insensitively.
    pub antigo: String,
    /// Replacement template. May be empty, may reference captures ($1, $name).
    pub novo: String,
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("the file is not a list of rules")]
    NotAList,
    #[error("no valid rules found in the file")]
    NoValidRules,
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("no rules to export")]
    NoRules,
    #[error("failed to serialize rules: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Parses a rules document and checks the top-level shape. Element
/// validation is left to the caller so the store can clear its rows first.
pub fn parse_document(contents: &str) -> Result<Vec<serde_json::Value>, ImportError> {
    let value: serde_json::Value = serde_json::from_str(contents)?;
    match value {
        serde_json::Value::Array(items) => Ok(items),
        _ => Err(ImportError::NotAList),
    }
}

/// A valid element is a non-null object with string `antigo` and `novo`
/// fields. Extra fields are ignored; anything else is rejected.
pub fn validate_element(element: &serde_json::Value) -> Option<Rule> {
    serde_json::from_value(element.clone()).ok()
}

/// Serializes the rules as a 2-space indented JSON array.
pub fn export_rules(rules: &[Rule]) -> Result<String, ExportError> {
    if rules.is_empty() {
        return Err(ExportError::NoRules);
    }
    Ok(serde_json::to_string_pretty(rules)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(antigo: &str, novo: &str) -> Rule {
        Rule {
            antigo: antigo.to_string(),
            novo: novo.to_string(),
        }
    }

    #[test]
    fn export_is_two_space_indented() {
        let json = export_rules(&[rule("a", "b")]).unwrap();
        assert_eq!(
            json,
            "[\n  {\n    \"antigo\": \"a\",\n    \"novo\": \"b\"\n  }\n]"
        );
    }

    #[test]
    fn export_refuses_an_empty_rule_set() {
        assert!(matches!(export_rules(&[]), Err(ExportError::NoRules)));
    }

    #[test]
    fn exported_rules_parse_back_identically() {
        let rules = vec![rule("foo", "bar"), rule(r"(\d+)", "$1!"), rule("x", "")];
        let json = export_rules(&rules).unwrap();
        let parsed: Vec<Rule> = parse_document(&json)
            .unwrap()
            .iter()
            .filter_map(validate_element)
            .collect();
        assert_eq!(parsed, rules);
    }

    #[test]
    fn validate_element_accepts_extra_fields() {
        let element = serde_json::json!({"antigo": "a", "novo": "b", "extra": 1});
        assert_eq!(validate_element(&element), Some(rule("a", "b")));
    }

    #[test]
    fn validate_element_rejects_malformed_elements() {
        for element in [
            serde_json::json!(null),
            serde_json::json!("a string"),
            serde_json::json!({"antigo": "a"}),
            serde_json::json!({"novo": "b"}),
            serde_json::json!({"antigo": 1, "novo": "b"}),
            serde_json::json!({"antigo": "a", "novo": null}),
        ] {
            assert_eq!(validate_element(&element), None, "accepted {element}");
        }
    }

    #[test]
    fn non_list_document_is_rejected() {
        assert!(matches!(
            parse_document(r#"{"antigo": "a", "novo": "b"}"#),
            Err(ImportError::NotAList)
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            parse_document("not json"),
            Err(ImportError::Parse(_))
        ));
    }
}
