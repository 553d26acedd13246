//! Shared provider error kinds and error value helpers.
//!
//! ```rust
//! use tprovider::{ProviderError, ProviderErrorKind};
//!
//! let auth = ProviderError::authentication("bad key");
//! assert!(auth.is_terminal());
//!
//! let unknown = ProviderError::other("429 Too Many Requests").classified();
//! assert_eq!(unknown.kind, ProviderErrorKind::RateLimited);
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

use crate::classify::{classify_failure, parse_retry_after};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Authentication,
    RateLimited,
    Connection,
    SystemPromptUnsupported,
    EmptyResponse,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    pub status: Option<u16>,
    pub retry_after: Option<Duration>,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            retry_after: None,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Authentication, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::RateLimited, message)
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Connection, message)
    }

    pub fn system_prompt_unsupported(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::SystemPromptUnsupported, message)
    }

    pub fn empty_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::EmptyResponse, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Other, message)
    }

    /// Builds an error from raw boundary output, picking the kind with
    /// [`classify_failure`].
    pub fn from_signal(status: Option<u16>, message: impl Into<String>) -> Self {
        let message = message.into();
        let kind = classify_failure(status, &message);
        let retry_after = match kind {
            ProviderErrorKind::RateLimited => parse_retry_after(&message),
            _ => None,
        };

        Self {
            kind,
            message,
            status,
            retry_after,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = Some(retry_after);
        self
    }

    /// Re-derives the kind of an unclassified error from its status and message.
    ///
    /// Errors that already carry a specific kind are returned unchanged.
    pub fn classified(self) -> Self {
        if self.kind != ProviderErrorKind::Other {
            return self;
        }

        let retry_after = self.retry_after;
        let reclassified = Self::from_signal(self.status, self.message);
        match retry_after {
            Some(delay) => reclassified.with_retry_after(delay),
            None => reclassified,
        }
    }

    /// Failures that need outside intervention and must not be retried.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            ProviderErrorKind::Authentication
                | ProviderErrorKind::RateLimited
                | ProviderErrorKind::Connection
        )
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{:?} [status={}]: {}", self.kind, status, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for ProviderError {}
