//! Message and request types exchanged with a model boundary.
//!
//! ```rust
//! use tprovider::{ModelRequest, Role};
//!
//! let split = ModelRequest::with_system("You call tools.", "What is 2 + 3?");
//! assert_eq!(split.system(), Some("You call tools."));
//! assert_eq!(split.user(), "What is 2 + 3?");
//!
//! let folded = ModelRequest::user_only("You call tools.\n\n---\n\nUser: What is 2 + 3?");
//! assert_eq!(folded.system(), None);
//! assert_eq!(folded.messages[0].role, Role::User);
//! ```

use std::fmt::{Display, Formatter};

use crate::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let role = match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        };

        f.write_str(role)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// One model invocation: an optional system instruction followed by a user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    pub messages: Vec<Message>,
}

impl ModelRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn with_system(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self::new(vec![Message::system(system), Message::user(user)])
    }

    pub fn user_only(user: impl Into<String>) -> Self {
        Self::new(vec![Message::user(user)])
    }

    pub fn system(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|message| message.role == Role::System)
            .map(|message| message.content.as_str())
    }

    /// The last user message, or an empty string when none is present.
    pub fn user(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|message| message.role == Role::User)
            .map(|message| message.content.as_str())
            .unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.messages.is_empty() {
            return Err(ProviderError::other("at least one message is required"));
        }

        if !self.messages.iter().any(|message| message.role == Role::User) {
            return Err(ProviderError::other("a user message is required"));
        }

        Ok(())
    }
}
