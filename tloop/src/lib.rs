//! Tool-calling conversation loop: wire-format parser, prompt templates,
//! conversation state and the step-bounded orchestrator.

mod config;
mod error;
mod hooks;
mod orchestrator;
mod parser;
mod prompt;
mod state;

pub mod prelude {
    pub use crate::{
        ConfigError, ConversationState, History, LoopHooks, NoopLoopHooks, Orchestrator,
        OrchestratorBuilder, RunOutcome, RuntimeConfig, RuntimeError, RuntimeErrorKind, Turn,
        TurnRole, parse_all, parse_first,
    };
}

pub use config::{ConfigError, ConfigErrorKind, DEFAULT_FALLBACK_MESSAGE, RuntimeConfig};
pub use error::{RuntimeError, RuntimeErrorKind};
pub use hooks::{LoopHooks, NoopLoopHooks};
pub use orchestrator::{Orchestrator, OrchestratorBuilder, RunOutcome};
pub use parser::{
    ParseError, ParseErrorKind, TOOL_CALL_CLOSE, TOOL_CALL_OPEN, contains_tool_call_block,
    decode_payload, parse_all, parse_first, try_parse_first,
};
pub use prompt::{
    build_system_prompt, build_tool_error_message, build_tool_not_found_message,
    build_tool_result_message, combine_prompts,
};
pub use state::{ConversationState, History, Turn, TurnRole};
