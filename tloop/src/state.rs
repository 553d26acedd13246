//! Per-run conversation state and caller-supplied history.
//!
//! ```rust
//! use tloop::{ConversationState, History};
//!
//! let mut conversation = ConversationState::new("What is 2 + 3?");
//! assert_eq!(conversation.render(), "What is 2 + 3?");
//!
//! conversation.push_assistant("<tool_call>{\"name\": \"add\"}</tool_call>");
//! conversation.push_observation("Tool 'add' returned:\n5");
//! assert!(conversation.render().starts_with("User: What is 2 + 3?\n\nAssistant: "));
//!
//! let history = History::from_json(r#"[["hi", "hello"]]"#).expect("valid history");
//! assert_eq!(history.len(), 1);
//! ```

use std::fmt::{Display, Formatter};

use serde::Serialize;
use serde_json::Value;

use crate::RuntimeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Assistant,
    /// Runtime-authored corrections, such as unknown-tool or tool-failure notices.
    System,
    /// A tool result presented back to the model.
    Observation,
}

impl Display for TurnRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
            Self::System => "System",
            Self::Observation => "Observation",
        };

        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
}

impl Turn {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Turns of one run, the step counter and the last recoverable error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    turns: Vec<Turn>,
    pub step: u32,
    pub last_error: Option<String>,
}

impl ConversationState {
    pub fn new(user_prompt: impl Into<String>) -> Self {
        let mut state = Self::default();
        state.push_user(user_prompt);
        state
    }

    /// Seeds the conversation with the most recent `window` history pairs
    /// before the new user turn.
    pub fn with_history(history: &History, window: usize, user_prompt: impl Into<String>) -> Self {
        let mut state = Self::default();
        for (user, assistant) in history.recent(window) {
            state.push_user(user.as_str());
            state.push_assistant(assistant.as_str());
        }
        state.push_user(user_prompt);
        state
    }

    pub fn push(&mut self, role: TurnRole, content: impl Into<String>) {
        self.turns.push(Turn::new(role, content));
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(TurnRole::User, content);
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(TurnRole::Assistant, content);
    }

    pub fn push_system(&mut self, content: impl Into<String>) {
        self.push(TurnRole::System, content);
    }

    pub fn push_observation(&mut self, content: impl Into<String>) {
        self.push(TurnRole::Observation, content);
    }

    pub fn record_error(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Text sent to the model as the user message. A lone user turn is sent
    /// verbatim; longer conversations label each turn.
    pub fn render(&self) -> String {
        match self.turns.as_slice() {
            [only] if only.role == TurnRole::User => only.content.clone(),
            turns => turns
                .iter()
                .map(|turn| format!("{}: {}", turn.role, turn.content))
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }
}

/// Prior `(user, assistant)` exchanges, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct History {
    pairs: Vec<(String, String)>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, U, A>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (U, A)>,
        U: Into<String>,
        A: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(user, assistant)| (user.into(), assistant.into()))
                .collect(),
        }
    }

    /// Parses a JSON array of `[user, assistant]` pairs. Non-string members
    /// are kept as their JSON text.
    pub fn from_json(json: &str) -> Result<Self, RuntimeError> {
        let value: Value = serde_json::from_str(json).map_err(|err| {
            RuntimeError::invalid_input(format!("history is not valid JSON: {err}"))
        })?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, RuntimeError> {
        let entries = value
            .as_array()
            .ok_or_else(|| RuntimeError::invalid_input("history must be a JSON array"))?;

        let mut pairs = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            match entry.as_array().map(Vec::as_slice) {
                Some([user, assistant]) => {
                    pairs.push((pair_text(user), pair_text(assistant)));
                }
                _ => {
                    return Err(RuntimeError::invalid_input(format!(
                        "history entry {index} must be a [user_message, assistant_message] pair"
                    )));
                }
            }
        }

        Ok(Self { pairs })
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn push(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.pairs.push((user.into(), assistant.into()));
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// The last `window` pairs, oldest first.
    pub fn recent(&self, window: usize) -> &[(String, String)] {
        let start = self.pairs.len().saturating_sub(window);
        &self.pairs[start..]
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn pair_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
