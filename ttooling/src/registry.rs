//! Tool registry keyed by tool name.
//!
//! Registration is an upsert: a second tool with the same name replaces the
//! first but keeps its listing position.
//!
//! ```rust
//! use ttooling::{ToolArgs, ToolRegistry};
//!
//! let mut registry = ToolRegistry::new();
//! registry
//!     .register_fn("ping", "Reply with pong", [], |_: &ToolArgs| Ok::<_, String>("pong"))
//!     .expect("ping registers");
//!
//! assert_eq!(registry.list_tools(), vec!["ping"]);
//! assert!(registry.get("pong").is_err());
//! ```

use std::fmt::Display;
use std::sync::Arc;

use serde::Serialize;
use tcommon::Registry;

use crate::{ParamSpec, Tool, ToolArgs, ToolError, ToolSchema};

#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Registry<String, Arc<Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Registry::new(),
        }
    }

    pub fn register(&mut self, tool: Tool) {
        let name = tool.name().to_string();
        self.tools.insert(name, Arc::new(tool));
    }

    pub fn register_fn<F, R, E, P>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        params: P,
        handler: F,
    ) -> Result<(), ToolError>
    where
        F: Fn(&ToolArgs) -> Result<R, E> + Send + Sync + 'static,
        R: Serialize,
        E: Display,
        P: IntoIterator<Item = ParamSpec>,
    {
        let tool = Tool::builder(name)
            .description(description)
            .params(params)
            .handler(handler)
            .build()?;
        self.register(tool);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Arc<Tool>, ToolError> {
        self.tools
            .get(name)
            .cloned()
            .ok_or_else(|| ToolError::not_found(name, self.list_tools()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<Tool>> {
        self.tools.remove(name)
    }

    /// Registered names in first-registration order.
    pub fn list_tools(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn get_all_schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|tool| tool.schema()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{ParamType, ToolErrorKind};

    fn constant(name: &str, output: i64) -> Tool {
        Tool::builder(name)
            .handler(move |_: &ToolArgs| Ok::<_, String>(output))
            .build()
            .expect("tool builds")
    }

    #[test]
    fn reregistration_overwrites_but_keeps_position() {
        let mut registry = ToolRegistry::new();
        registry.register(constant("first", 1));
        registry.register(constant("second", 2));
        registry.register(constant("first", 10));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.list_tools(), vec!["first", "second"]);

        let output = registry
            .get("first")
            .expect("first is registered")
            .call(&ToolArgs::new())
            .expect("call succeeds");
        assert_eq!(output, json!(10));
    }

    #[test]
    fn missing_tool_error_lists_registered_names() {
        let mut registry = ToolRegistry::new();
        registry.register(constant("add", 0));
        registry.register(constant("sub", 0));

        let error = registry.get("mul").expect_err("mul is missing");
        assert_eq!(error.kind, ToolErrorKind::NotFound);
        assert_eq!(error.available_tools, vec!["add", "sub"]);
    }

    #[test]
    fn schemas_follow_registration_order() {
        let mut registry = ToolRegistry::new();
        registry
            .register_fn(
                "weather",
                "Get weather",
                [ParamSpec::new("city", ParamType::Str)],
                |_: &ToolArgs| Ok::<_, String>("Sunny"),
            )
            .expect("weather registers");
        registry.register(constant("clock", 0));

        let schemas = registry.get_all_schemas();
        assert_eq!(schemas[0].name, "weather");
        assert_eq!(schemas[0].parameters[0].param_type, ParamType::Str);
        assert_eq!(schemas[1].description, "Tool: clock");
    }

    #[test]
    fn remove_and_emptiness() {
        let mut registry = ToolRegistry::default();
        assert!(registry.is_empty());

        registry.register(constant("tmp", 0));
        assert!(registry.contains("tmp"));
        assert!(registry.remove("tmp").is_some());
        assert!(!registry.contains("tmp"));
        assert!(registry.is_empty());
    }
}
