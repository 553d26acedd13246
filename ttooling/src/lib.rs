//! Capability layer for declaring, registering and executing tools.

mod args;
mod error;
mod executor;
mod hooks;
mod param;
mod registry;
mod tool;
mod types;

pub mod prelude {
    pub use crate::{
        DefaultToolExecutor, NoopToolRuntimeHooks, ParamSpec, ParamType, Tool, ToolArgs,
        ToolBuilder, ToolCall, ToolError, ToolErrorKind, ToolExecutionContext,
        ToolExecutionResult, ToolExecutor, ToolParam, ToolRegistry, ToolRuntimeHooks, ToolSchema,
    };
}

pub use args::{
    extract_arg, parse_json_object, parse_json_value, required_bool, required_f64, required_i64,
    required_string,
};
pub use error::{ToolError, ToolErrorKind};
pub use executor::{DefaultToolExecutor, ToolExecutor};
pub use hooks::{NoopToolRuntimeHooks, ToolRuntimeHooks};
pub use param::{ParamSpec, ParamType, ToolParam};
pub use registry::ToolRegistry;
pub use tool::{Tool, ToolBuilder};
pub use types::{ToolArgs, ToolCall, ToolExecutionContext, ToolExecutionResult, ToolSchema};
