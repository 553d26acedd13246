//! Model boundary contracts and adapters.
//!
//! A [`LanguageModel`] turns a [`ModelRequest`] into response text. Plain
//! `(system, user) -> text` closures plug in through [`FnModel`]; richer
//! message-based clients plug in through [`ChatModel`] and [`ChatModelAdapter`].
//!
//! ```rust
//! use tprovider::{FnModel, LanguageModel, ModelRequest};
//!
//! let model = FnModel::new(|system: &str, user: &str| {
//!     Ok::<_, String>(format!("{}|{}", system.len(), user))
//! });
//!
//! let reply = model
//!     .complete(&ModelRequest::with_system("abc", "hi"))
//!     .expect("closure should answer");
//! assert_eq!(reply, "3|hi");
//! ```

use std::fmt::Display;

use crate::{Message, ModelRequest, ProviderError, Role};

pub trait LanguageModel: Send + Sync {
    /// Label used in hook callbacks and log events.
    fn name(&self) -> &str {
        "model"
    }

    fn complete(&self, request: &ModelRequest) -> Result<String, ProviderError>;
}

/// Adapts a `(system, user) -> text` callable.
///
/// Errors are converted with [`ProviderError::from_signal`], so their text is
/// classified. A request without a system message passes an empty system
/// string.
pub struct FnModel<F> {
    name: String,
    handler: F,
}

impl<F, T, E> FnModel<F>
where
    F: Fn(&str, &str) -> Result<T, E> + Send + Sync,
    T: Into<String>,
    E: Display,
{
    pub fn new(handler: F) -> Self {
        Self {
            name: "fn-model".to_string(),
            handler,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<F, T, E> LanguageModel for FnModel<F>
where
    F: Fn(&str, &str) -> Result<T, E> + Send + Sync,
    T: Into<String>,
    E: Display,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn complete(&self, request: &ModelRequest) -> Result<String, ProviderError> {
        request.validate()?;
        let system = request.system().unwrap_or_default();
        (self.handler)(system, request.user())
            .map(Into::into)
            .map_err(|err| ProviderError::from_signal(None, err.to_string()))
    }
}

/// A message-list client, such as a vendor chat SDK wrapper.
pub trait ChatModel: Send + Sync {
    fn name(&self) -> &str {
        "chat-model"
    }

    fn invoke(&self, messages: &[Message]) -> Result<Message, ProviderError>;
}

/// Exposes a [`ChatModel`] as a [`LanguageModel`].
pub struct ChatModelAdapter<M> {
    inner: M,
}

impl<M> ChatModelAdapter<M>
where
    M: ChatModel,
{
    pub fn new(inner: M) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }
}

impl<M> LanguageModel for ChatModelAdapter<M>
where
    M: ChatModel,
{
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn complete(&self, request: &ModelRequest) -> Result<String, ProviderError> {
        request.validate()?;
        let reply = self
            .inner
            .invoke(&request.messages)
            .map_err(ProviderError::classified)?;

        if reply.role != Role::Assistant {
            return Err(ProviderError::other(format!(
                "expected an assistant reply, got a {} message",
                reply.role
            )));
        }

        Ok(reply.content)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::ProviderErrorKind;

    #[test]
    fn fn_model_passes_empty_system_for_folded_requests() {
        let model = FnModel::new(|system: &str, user: &str| {
            Ok::<_, String>(format!("[{system}] {user}"))
        });

        let reply = model
            .complete(&ModelRequest::user_only("combined"))
            .expect("reply");
        assert_eq!(reply, "[] combined");
    }

    #[test]
    fn fn_model_classifies_error_text() {
        let model = FnModel::new(|_: &str, _: &str| Err::<String, _>("invalid api key"))
            .with_name("closure");

        let error = model
            .complete(&ModelRequest::with_system("s", "u"))
            .expect_err("should fail");
        assert_eq!(error.kind, ProviderErrorKind::Authentication);
        assert_eq!(model.name(), "closure");
    }

    #[derive(Default)]
    struct RecordingChat {
        seen: Mutex<Vec<Vec<Message>>>,
    }

    impl ChatModel for RecordingChat {
        fn invoke(&self, messages: &[Message]) -> Result<Message, ProviderError> {
            self.seen
                .lock()
                .expect("seen lock")
                .push(messages.to_vec());
            if messages.iter().any(|message| message.role == Role::System) {
                return Err(ProviderError::other(
                    "Developer instruction is not enabled for this model",
                ));
            }

            Ok(Message::assistant("folded ok"))
        }
    }

    #[test]
    fn chat_adapter_forwards_messages_and_classifies_rejections() {
        let adapter = ChatModelAdapter::new(RecordingChat::default());

        let error = adapter
            .complete(&ModelRequest::with_system("rules", "question"))
            .expect_err("system message should be rejected");
        assert_eq!(error.kind, ProviderErrorKind::SystemPromptUnsupported);

        let reply = adapter
            .complete(&ModelRequest::user_only("rules + question"))
            .expect("folded request should pass");
        assert_eq!(reply, "folded ok");
        assert_eq!(adapter.inner().seen.lock().expect("seen lock").len(), 2);
    }

    struct UserEcho;

    impl ChatModel for UserEcho {
        fn invoke(&self, messages: &[Message]) -> Result<Message, ProviderError> {
            Ok(messages[0].clone())
        }
    }

    #[test]
    fn chat_adapter_rejects_non_assistant_replies() {
        let adapter = ChatModelAdapter::new(UserEcho);
        let error = adapter
            .complete(&ModelRequest::user_only("hi"))
            .expect_err("user echo is not a reply");
        assert_eq!(error.kind, ProviderErrorKind::Other);
    }
}
