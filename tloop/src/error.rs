//! Runtime-layer errors and their user-facing messages.
//!
//! ```rust
//! use tloop::{RuntimeError, RuntimeErrorKind};
//!
//! let error = RuntimeError::step_budget_exhausted(3, Some("tool 'noop' not found".to_string()));
//! assert_eq!(error.kind, RuntimeErrorKind::StepBudgetExhausted);
//! assert_eq!(
//!     error.message,
//!     "operation failed after 3 steps/attempts. Last error: tool 'noop' not found"
//! );
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

use tprovider::{ProviderError, ProviderErrorKind};
use ttooling::{ToolError, ToolErrorKind};

use crate::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    InvalidInput,
    ToolNotFound,
    ToolExecution,
    Authentication,
    RateLimited,
    Connection,
    StepBudgetExhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub message: String,
    pub tool_name: Option<String>,
    pub available_tools: Vec<String>,
    pub retry_after: Option<Duration>,
    pub steps: Option<u32>,
    pub last_error: Option<String>,
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            tool_name: None,
            available_tools: Vec::new(),
            retry_after: None,
            steps: None,
            last_error: None,
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::InvalidInput, message)
    }

    pub fn tool_not_found(tool_name: impl Into<String>, available_tools: Vec<String>) -> Self {
        ToolError::not_found(tool_name, available_tools).into()
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::Authentication, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::RateLimited, message)
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::Connection, message)
    }

    pub fn step_budget_exhausted(steps: u32, last_error: Option<String>) -> Self {
        let message = match &last_error {
            Some(last_error) => {
                format!("operation failed after {steps} steps/attempts. Last error: {last_error}")
            }
            None => format!("operation failed after {steps} steps/attempts"),
        };

        Self {
            steps: Some(steps),
            last_error,
            ..Self::new(RuntimeErrorKind::StepBudgetExhausted, message)
        }
    }

    /// Failures that abort a run immediately instead of being retried.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            RuntimeErrorKind::Authentication
                | RuntimeErrorKind::RateLimited
                | RuntimeErrorKind::Connection
        )
    }

    /// Fixed end-user sentence for the error classes that have one.
    pub fn user_message(&self) -> Option<&'static str> {
        match self.kind {
            RuntimeErrorKind::Authentication => {
                Some("Service configuration error. Please contact support.")
            }
            RuntimeErrorKind::RateLimited => {
                Some("Service is temporarily busy. Please try again in a moment.")
            }
            RuntimeErrorKind::Connection => {
                Some("Unable to connect to the AI service. Please check your connection.")
            }
            RuntimeErrorKind::StepBudgetExhausted => {
                Some("Unable to complete the request. Please try rephrasing your question.")
            }
            _ => None,
        }
    }
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.tool_name {
            Some(tool_name) => write!(f, "{:?} [tool={}]: {}", self.kind, tool_name, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for RuntimeError {}

impl From<ProviderError> for RuntimeError {
    fn from(value: ProviderError) -> Self {
        let kind = match value.kind {
            ProviderErrorKind::Authentication => RuntimeErrorKind::Authentication,
            ProviderErrorKind::RateLimited => RuntimeErrorKind::RateLimited,
            ProviderErrorKind::Connection
            | ProviderErrorKind::SystemPromptUnsupported
            | ProviderErrorKind::EmptyResponse
            | ProviderErrorKind::Other => RuntimeErrorKind::Connection,
        };

        Self {
            retry_after: value.retry_after,
            ..Self::new(kind, value.message)
        }
    }
}

impl From<ToolError> for RuntimeError {
    fn from(value: ToolError) -> Self {
        let kind = match value.kind {
            ToolErrorKind::NotFound => RuntimeErrorKind::ToolNotFound,
            ToolErrorKind::InvalidArguments | ToolErrorKind::Execution => {
                RuntimeErrorKind::ToolExecution
            }
        };

        Self {
            tool_name: value.tool_name,
            available_tools: value.available_tools,
            ..Self::new(kind, value.message)
        }
    }
}

impl From<ConfigError> for RuntimeError {
    fn from(value: ConfigError) -> Self {
        Self::invalid_input(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhaustion_without_last_error_has_short_message() {
        let error = RuntimeError::step_budget_exhausted(5, None);
        assert_eq!(error.message, "operation failed after 5 steps/attempts");
        assert_eq!(error.steps, Some(5));
        assert!(!error.is_terminal());
    }

    #[test]
    fn provider_errors_keep_terminal_class_and_retry_hint() {
        let error: RuntimeError = ProviderError::from_signal(None, "429 retry after 7").into();
        assert_eq!(error.kind, RuntimeErrorKind::RateLimited);
        assert_eq!(error.retry_after, Some(Duration::from_secs(7)));
        assert!(error.is_terminal());

        let error: RuntimeError = ProviderError::other("socket reset").into();
        assert_eq!(error.kind, RuntimeErrorKind::Connection);
    }

    #[test]
    fn tool_errors_map_to_runtime_kinds() {
        let error = RuntimeError::tool_not_found("mul", vec!["add".to_string()]);
        assert_eq!(error.kind, RuntimeErrorKind::ToolNotFound);
        assert_eq!(error.available_tools, vec!["add"]);
        assert_eq!(error.tool_name.as_deref(), Some("mul"));

        let error: RuntimeError = ToolError::execution("divide", "division by zero").into();
        assert_eq!(error.kind, RuntimeErrorKind::ToolExecution);
        assert!(error.to_string().starts_with("ToolExecution [tool=divide]"));
    }

    #[test]
    fn user_messages_cover_fixed_classes_only() {
        assert_eq!(
            RuntimeError::authentication("bad key").user_message(),
            Some("Service configuration error. Please contact support.")
        );
        assert_eq!(
            RuntimeError::step_budget_exhausted(1, None).user_message(),
            Some("Unable to complete the request. Please try rephrasing your question.")
        );
        assert_eq!(
            RuntimeError::rate_limited("quota").user_message(),
            Some("Service is temporarily busy. Please try again in a moment.")
        );
        assert_eq!(
            RuntimeError::connection("refused").user_message(),
            Some("Unable to connect to the AI service. Please check your connection.")
        );
        assert_eq!(RuntimeError::invalid_input("empty").user_message(), None);
        assert_eq!(RuntimeError::tool_not_found("mul", Vec::new()).user_message(), None);
    }
}
