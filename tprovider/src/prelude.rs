//! Common `tprovider` imports for downstream crates.

pub use crate::{
    BackoffPolicy, ChatModel, ChatModelAdapter, FnModel, LanguageModel, Message, ModelRequest,
    NoopOperationHooks, ProviderError, ProviderErrorKind, ProviderOperationHooks, Role,
    ScriptedModel, classify_failure,
};
pub use tcommon::RunId;
