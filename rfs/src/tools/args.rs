//! Argument extraction for tool inputs
//!
//! `null` counts as absent. A present value of the wrong type is an error
//! naming the argument rather than a silent default.

use serde_json::Value;

use super::ToolError;

fn ill_typed(key: &str, expected: &str) -> ToolError {
    ToolError::InvalidArgument(format!("{key} must be {expected}"))
}

fn field<'a>(input: &'a Value, key: &str) -> Option<&'a Value> {
    input.get(key).filter(|v| !v.is_null())
}

pub fn required_str<'a>(input: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    optional_str(input, key)?.ok_or_else(|| ToolError::InvalidArgument(format!("{key} is required")))
}

pub fn optional_str<'a>(input: &'a Value, key: &str) -> Result<Option<&'a str>, ToolError> {
    match field(input, key) {
        None => Ok(None),
        Some(v) => v.as_str().map(Some).ok_or_else(|| ill_typed(key, "a string")),
    }
}

pub fn optional_bool(input: &Value, key: &str) -> Result<Option<bool>, ToolError> {
    match field(input, key) {
        None => Ok(None),
        Some(v) => v.as_bool().map(Some).ok_or_else(|| ill_typed(key, "a boolean")),
    }
}

pub fn optional_u64(input: &Value, key: &str) -> Result<Option<u64>, ToolError> {
    match field(input, key) {
        None => Ok(None),
        Some(v) => v.as_u64().map(Some).ok_or_else(|| ill_typed(key, "a non-negative integer")),
    }
}

/// A list of strings; absent means empty
pub fn string_list(input: &Value, key: &str) -> Result<Vec<String>, ToolError> {
    match field(input, key) {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(|| ill_typed(key, "an array of strings")))
            .collect(),
        Some(_) => Err(ill_typed(key, "an array of strings")),
    }
}

/// A list of strings that must be present
pub fn required_string_list(input: &Value, key: &str) -> Result<Vec<String>, ToolError> {
    if field(input, key).is_none() {
        return Err(ToolError::InvalidArgument(format!("{key} is required")));
    }
    string_list(input, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_str() {
        let input = json!({"path": "src", "count": 3});

        assert_eq!(required_str(&input, "path").unwrap(), "src");
        assert_eq!(
            required_str(&input, "pattern").unwrap_err().to_string(),
            "Invalid argument: pattern is required"
        );
        assert_eq!(
            required_str(&input, "count").unwrap_err().to_string(),
            "Invalid argument: count must be a string"
        );
    }

    #[test]
    fn test_null_is_absent() {
        let input = json!({"recursive": null, "maxResults": null});

        assert_eq!(optional_bool(&input, "recursive").unwrap(), None);
        assert_eq!(optional_u64(&input, "maxResults").unwrap(), None);
        assert!(string_list(&input, "paths").unwrap().is_empty());
    }

    #[test]
    fn test_ill_typed_optionals() {
        let input = json!({"recursive": "yes", "maxResults": -1, "excludePatterns": ["ok", 3]});

        assert!(optional_bool(&input, "recursive").is_err());
        assert!(optional_u64(&input, "maxResults").is_err());
        assert!(string_list(&input, "excludePatterns").is_err());
    }

    #[test]
    fn test_string_lists() {
        let input = json!({"paths": ["a.rs", "b.rs"]});

        assert_eq!(required_string_list(&input, "paths").unwrap(), vec!["a.rs", "b.rs"]);
        assert!(required_string_list(&input, "files").is_err());
        assert!(string_list(&json!({"paths": "a.rs"}), "paths").is_err());
    }
}
