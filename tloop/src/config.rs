//! Runtime configuration loaded from TOML.
//!
//! ```rust
//! use tloop::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_toml_str("max_steps = 3\nverbose = true").expect("valid toml");
//! assert_eq!(config.max_steps, 3);
//! assert!(config.verbose);
//! assert_eq!(config.history_window, 5);
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tprovider::BackoffPolicy;

pub const DEFAULT_FALLBACK_MESSAGE: &str = "I encountered an error processing your request.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    Io,
    Parse,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub kind: ConfigErrorKind,
    pub message: String,
}

impl ConfigError {
    pub fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Io, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Parse, message)
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Invalid, message)
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    pub max_steps: u32,
    pub verbose: bool,
    pub fallback_message: String,
    pub history_window: usize,
    pub retry_initial_backoff_ms: u64,
    pub retry_max_backoff_ms: u64,
    pub retry_backoff_multiplier: f64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_steps: 5,
            verbose: false,
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            history_window: 5,
            retry_initial_backoff_ms: 0,
            retry_max_backoff_ms: 2000,
            retry_backoff_multiplier: 2.0,
        }
    }
}

impl RuntimeConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)
            .map_err(|err| ConfigError::parse(format!("failed to parse configuration: {err}")))?;
        config.validate()?;
        Ok(config.normalized())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|err| {
            ConfigError::io(format!("failed to read {}: {err}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.retry_backoff_multiplier.is_finite() || self.retry_backoff_multiplier < 1.0 {
            return Err(ConfigError::invalid(
                "retry_backoff_multiplier must be a finite number of at least 1.0",
            ));
        }

        if self.retry_max_backoff_ms < self.retry_initial_backoff_ms {
            return Err(ConfigError::invalid(
                "retry_max_backoff_ms must not be below retry_initial_backoff_ms",
            ));
        }

        Ok(())
    }

    /// Clamps the step budget to at least one step.
    pub fn normalized(mut self) -> Self {
        self.max_steps = self.max_steps.max(1);
        self
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_fallback_message(mut self, fallback_message: impl Into<String>) -> Self {
        self.fallback_message = fallback_message.into();
        self
    }

    pub fn with_history_window(mut self, history_window: usize) -> Self {
        self.history_window = history_window;
        self
    }

    pub fn backoff_policy(&self) -> BackoffPolicy {
        BackoffPolicy::new(
            Duration::from_millis(self.retry_initial_backoff_ms),
            Duration::from_millis(self.retry_max_backoff_ms),
            self.retry_backoff_multiplier,
        )
    }
}
