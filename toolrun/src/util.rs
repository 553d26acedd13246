//! Small convenience constructors for common types.

use serde_json::{Value, json};

use crate::{History, ParamType, RuntimeError, TOOL_CALL_CLOSE, TOOL_CALL_OPEN};

/// Formats a tool call the way a model is instructed to emit it.
///
/// ```rust
/// use serde_json::json;
/// use toolrun::{parse_first, util::tool_call_block};
///
/// let text = tool_call_block("add", &json!({"a": 1}));
/// let call = parse_first(&text).expect("block parses");
/// assert_eq!(call.name, "add");
/// ```
pub fn tool_call_block(name: &str, arguments: &Value) -> String {
    let payload = json!({"name": name, "arguments": arguments});
    format!("{TOOL_CALL_OPEN}{payload}{TOOL_CALL_CLOSE}")
}

pub fn history<I, U, A>(pairs: I) -> History
where
    I: IntoIterator<Item = (U, A)>,
    U: Into<String>,
    A: Into<String>,
{
    History::from_pairs(pairs)
}

pub fn history_from_json(json: &str) -> Result<History, RuntimeError> {
    History::from_json(json)
}

pub fn parse_param_type(tag: &str) -> Option<ParamType> {
    tag.parse().ok()
}
