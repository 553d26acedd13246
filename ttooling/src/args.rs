//! Typed access to coerced tool arguments.
//!
//! ```rust
//! use ttooling::{extract_arg, parse_json_object, required_i64, required_string};
//!
//! let args = parse_json_object(r#"{"city":"Delhi","days":3}"#).expect("object should parse");
//! assert_eq!(required_string(&args, "city").expect("city"), "Delhi");
//! assert_eq!(required_i64(&args, "days").expect("days"), 3);
//!
//! let units: Option<String> = extract_arg(&args, "units").expect("optional");
//! assert_eq!(units, None);
//! ```

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{ToolArgs, ToolError};

pub fn parse_json_value(args_json: &str) -> Result<Value, ToolError> {
    serde_json::from_str(args_json)
        .map_err(|err| ToolError::invalid_arguments(format!("invalid JSON arguments: {err}")))
}

pub fn parse_json_object(args_json: &str) -> Result<Map<String, Value>, ToolError> {
    match parse_json_value(args_json)? {
        Value::Object(map) => Ok(map),
        _ => Err(ToolError::invalid_arguments("expected JSON object arguments")),
    }
}

/// Deserializes one argument. A missing argument reads as `null`, so
/// `Option<T>` parameters come back as `None`.
pub fn extract_arg<T>(args: &ToolArgs, key: &str) -> Result<T, ToolError>
where
    T: DeserializeOwned,
{
    let value = args.get(key).cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|err| {
        ToolError::invalid_arguments(format!("argument '{key}' has the wrong shape: {err}"))
    })
}

pub fn required_string(args: &ToolArgs, key: &str) -> Result<String, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| ToolError::invalid_arguments(format!("missing required string: '{key}'")))
}

pub fn required_i64(args: &ToolArgs, key: &str) -> Result<i64, ToolError> {
    args.get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| ToolError::invalid_arguments(format!("missing required integer: '{key}'")))
}

pub fn required_f64(args: &ToolArgs, key: &str) -> Result<f64, ToolError> {
    args.get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| ToolError::invalid_arguments(format!("missing required number: '{key}'")))
}

pub fn required_bool(args: &ToolArgs, key: &str) -> Result<bool, ToolError> {
    args.get(key)
        .and_then(Value::as_bool)
        .ok_or_else(|| ToolError::invalid_arguments(format!("missing required boolean: '{key}'")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ToolErrorKind;

    fn args(value: Value) -> ToolArgs {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn parse_invalid_json_returns_invalid_arguments() {
        let error = parse_json_value("{").expect_err("json should fail");
        assert_eq!(error.kind, ToolErrorKind::InvalidArguments);

        let error = parse_json_object("[1]").expect_err("array is not an object");
        assert_eq!(error.kind, ToolErrorKind::InvalidArguments);
    }

    #[test]
    fn required_helpers_check_type() {
        let args = args(json!({"a": 2, "b": 2.5, "flag": true, "name": "x"}));
        assert_eq!(required_i64(&args, "a").expect("int"), 2);
        assert_eq!(required_f64(&args, "a").expect("int as float"), 2.0);
        assert_eq!(required_f64(&args, "b").expect("float"), 2.5);
        assert!(required_bool(&args, "flag").expect("bool"));
        assert!(required_i64(&args, "name").is_err());
        assert!(required_string(&args, "missing").is_err());
    }

    #[test]
    fn extract_arg_deserializes_and_reports_shape_errors() {
        let args = args(json!({"items": [1, 2, 3], "label": 7}));
        let items: Vec<i64> = extract_arg(&args, "items").expect("list");
        assert_eq!(items, vec![1, 2, 3]);

        let error = extract_arg::<String>(&args, "label").expect_err("number is not a string");
        assert_eq!(error.kind, ToolErrorKind::InvalidArguments);
        assert!(error.message.contains("'label'"));

        let missing: Option<i64> = extract_arg(&args, "absent").expect("missing is null");
        assert_eq!(missing, None);
    }
}
