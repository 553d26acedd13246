//! Tolerant extraction of `<tool_call>` blocks from model output.
//!
//! Malformed blocks are not errors: they read as "no tool call".
//!
//! ```rust
//! use tloop::{parse_all, parse_first};
//!
//! let text = r#"Let me check.
//! <tool_call>
//! {"name": "add", "arguments": {"a": 2, "b": 3}}
//! </tool_call>"#;
//!
//! let call = parse_first(text).expect("block should parse");
//! assert_eq!(call.name, "add");
//! assert_eq!(call.arguments["a"], 2);
//!
//! assert!(parse_first("The answer is 5.").is_none());
//! assert!(parse_first("<tool_call>{not json}</tool_call>").is_none());
//! assert_eq!(parse_all(text).len(), 1);
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use ttooling::ToolCall;

pub const TOOL_CALL_OPEN: &str = "<tool_call>";
pub const TOOL_CALL_CLOSE: &str = "</tool_call>";

static TOOL_CALL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<tool_call>\s*(\{.*?\})\s*</tool_call>")
        .expect("tool call pattern is a valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    InvalidJson,
    NotAnObject,
    MissingName,
    InvalidArguments,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ParseError {}

/// Validates one block payload. `arguments` defaults to `{}` when absent.
/// A non-string `name` is kept as its JSON text so lookup reports it as an
/// unknown tool.
pub fn decode_payload(payload: &str) -> Result<ToolCall, ParseError> {
    let decoded: Value = serde_json::from_str(payload).map_err(|err| {
        ParseError::new(
            ParseErrorKind::InvalidJson,
            format!("tool call payload is not valid JSON: {err}"),
        )
    })?;

    let Value::Object(mut object) = decoded else {
        return Err(ParseError::new(
            ParseErrorKind::NotAnObject,
            "tool call payload must be a JSON object",
        ));
    };

    let name = match object.remove("name") {
        None => {
            return Err(ParseError::new(
                ParseErrorKind::MissingName,
                "tool call payload has no 'name'",
            ));
        }
        Some(Value::String(name)) => name,
        Some(other) => other.to_string(),
    };

    let arguments = match object.remove("arguments") {
        None => Map::new(),
        Some(Value::Object(arguments)) => arguments,
        Some(other) => {
            return Err(ParseError::new(
                ParseErrorKind::InvalidArguments,
                format!("tool call 'arguments' must be an object, got {other}"),
            ));
        }
    };

    Ok(ToolCall::new(name, arguments))
}

/// The first delimited block, decoded. `None` when no block is present.
pub fn try_parse_first(text: &str) -> Option<Result<ToolCall, ParseError>> {
    let payload = TOOL_CALL_PATTERN.captures(text)?.get(1)?;
    Some(decode_payload(payload.as_str()))
}

/// Only the first delimited block is consulted; a malformed first block
/// yields `None` even if a later block is valid.
pub fn parse_first(text: &str) -> Option<ToolCall> {
    if text.is_empty() {
        return None;
    }

    try_parse_first(text)?.ok()
}

pub fn parse_all(text: &str) -> Vec<ToolCall> {
    TOOL_CALL_PATTERN
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .filter_map(|payload| decode_payload(payload.as_str()).ok())
        .collect()
}

pub fn contains_tool_call_block(text: &str) -> bool {
    TOOL_CALL_PATTERN.is_match(text)
}
