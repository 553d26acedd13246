//! Model boundary layer: request types, adapters, failure classification and
//! retry backoff.

mod classify;
mod error;
mod model;
mod provider;
mod resilience;
mod scripted;

pub mod prelude;

pub use classify::{classify_failure, is_system_prompt_rejection, parse_retry_after};
pub use error::{ProviderError, ProviderErrorKind};
pub use model::{Message, ModelRequest, Role};
pub use provider::{ChatModel, ChatModelAdapter, FnModel, LanguageModel};
pub use resilience::{BackoffPolicy, NoopOperationHooks, ProviderOperationHooks};
pub use scripted::ScriptedModel;
