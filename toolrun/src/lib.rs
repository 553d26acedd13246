//! Unified facade over the toolrun workspace crates.
//!
//! This crate is the single dependency for most applications. It re-exports
//! the runtime crates and adds the `tool_fn!` registration macro plus
//! wiring helpers for common setups.
//!
//! ```rust
//! use toolrun::{Orchestrator, ScriptedModel, tool_fn};
//!
//! let model = ScriptedModel::new([
//!     r#"<tool_call>{"name": "add", "arguments": {"a": 2, "b": 3}}</tool_call>"#,
//!     "The sum is 5.",
//! ]);
//! let mut orchestrator = Orchestrator::new(model);
//! orchestrator.register(
//!     tool_fn! {
//!         /// Add two integers.
//!         fn add(a: i64, b: i64) -> i64 {
//!             a + b
//!         }
//!     }
//!     .expect("add builds"),
//! );
//!
//! assert_eq!(orchestrator.run("What is 2 + 3?").expect("answer"), "The sum is 5.");
//! ```

mod macros;

pub mod runtime;
pub mod util;

pub use tcommon;
pub use tloop;
pub use tobserve;
pub use tprovider;
pub use ttooling;

pub use tcommon::{Registry, RunId};
pub use tloop::{
    ConfigError, ConfigErrorKind, ConversationState, DEFAULT_FALLBACK_MESSAGE, History, LoopHooks,
    NoopLoopHooks, Orchestrator, OrchestratorBuilder, ParseError, ParseErrorKind, RunOutcome,
    RuntimeConfig, RuntimeError, RuntimeErrorKind, TOOL_CALL_CLOSE, TOOL_CALL_OPEN, Turn,
    TurnRole, build_system_prompt, build_tool_error_message, build_tool_not_found_message,
    build_tool_result_message, combine_prompts, contains_tool_call_block, parse_all, parse_first,
};
pub use tobserve::{
    MetricsObservabilityHooks, SafeLoopHooks, SafeProviderHooks, SafeToolHooks,
    TracingObservabilityHooks,
};
pub use tprovider::{
    BackoffPolicy, ChatModel, ChatModelAdapter, FnModel, LanguageModel, Message, ModelRequest,
    NoopOperationHooks, ProviderError, ProviderErrorKind, ProviderOperationHooks, Role,
    ScriptedModel, classify_failure,
};
pub use ttooling::{
    DefaultToolExecutor, NoopToolRuntimeHooks, ParamSpec, ParamType, Tool, ToolArgs, ToolBuilder,
    ToolCall, ToolError, ToolErrorKind, ToolExecutionContext, ToolExecutionResult, ToolExecutor,
    ToolParam, ToolRegistry, ToolRuntimeHooks, ToolSchema, extract_arg, parse_json_object,
    parse_json_value, required_bool, required_f64, required_i64, required_string,
};

pub use runtime::{
    Observability, builder, observed_orchestrator, orchestrator, orchestrator_from_path,
    orchestrator_from_toml, orchestrator_with,
};
pub use util::{history, history_from_json, parse_param_type, tool_call_block};

pub mod prelude {
    //! Common imports for most toolrun applications.

    pub use crate::{
        History, LanguageModel, Observability, Orchestrator, ParamType, RunOutcome, RuntimeConfig,
        RuntimeError, RuntimeErrorKind, ScriptedModel, Tool, ToolArgs, ToolError, ToolRegistry,
        history, observed_orchestrator, orchestrator, tool_call_block,
    };
    pub use crate::{tool_fn, tools};
}
