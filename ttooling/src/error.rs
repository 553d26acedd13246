//! Tool lookup and execution errors.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolErrorKind {
    NotFound,
    InvalidArguments,
    Execution,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
    pub tool_name: Option<String>,
    pub available_tools: Vec<String>,
    pub cause: Option<String>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            tool_name: None,
            available_tools: Vec::new(),
            cause: None,
        }
    }

    /// Lookup failure naming every registered tool.
    pub fn not_found(tool_name: impl Into<String>, available_tools: Vec<String>) -> Self {
        let tool_name = tool_name.into();
        let listed = if available_tools.is_empty() {
            "none".to_string()
        } else {
            available_tools.join(", ")
        };

        Self {
            kind: ToolErrorKind::NotFound,
            message: format!("tool '{tool_name}' not found in registry. Available tools: {listed}"),
            tool_name: Some(tool_name),
            available_tools,
            cause: None,
        }
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidArguments, message)
    }

    /// Handler failure; `cause` keeps the handler's own error text.
    pub fn execution(tool_name: impl Into<String>, cause: impl Into<String>) -> Self {
        let tool_name = tool_name.into();
        let cause = cause.into();

        Self {
            kind: ToolErrorKind::Execution,
            message: format!("tool '{tool_name}' execution failed: {cause}"),
            tool_name: Some(tool_name),
            available_tools: Vec::new(),
            cause: Some(cause),
        }
    }

    pub fn with_tool_name(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    /// The handler's error text when present, else the full message.
    pub fn detail(&self) -> &str {
        self.cause.as_deref().unwrap_or(&self.message)
    }
}

impl Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.tool_name {
            Some(tool_name) => write!(f, "{:?} [tool={}]: {}", self.kind, tool_name, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for ToolError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_lists_available_tools() {
        let error = ToolError::not_found("mul", vec!["add".to_string(), "sub".to_string()]);
        assert_eq!(error.kind, ToolErrorKind::NotFound);
        assert_eq!(
            error.message,
            "tool 'mul' not found in registry. Available tools: add, sub"
        );
        assert_eq!(error.available_tools, vec!["add", "sub"]);

        let empty = ToolError::not_found("mul", Vec::new());
        assert!(empty.message.ends_with("Available tools: none"));
    }

    #[test]
    fn execution_keeps_cause_and_tool_name_in_display() {
        let error = ToolError::execution("divide", "division by zero");
        assert_eq!(error.detail(), "division by zero");

        let rendered = error.to_string();
        assert!(rendered.starts_with("Execution [tool=divide]"));
        assert!(rendered.contains("division by zero"));
    }

    #[test]
    fn detail_falls_back_to_message() {
        let error = ToolError::invalid_arguments("missing 'a'").with_tool_name("add");
        assert_eq!(error.detail(), "missing 'a'");
        assert_eq!(error.tool_name.as_deref(), Some("add"));
    }
}
