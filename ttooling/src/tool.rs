//! Registered tools: a named handler with a declared parameter signature.
//!
//! ```rust
//! use serde_json::json;
//! use ttooling::{ParamType, Tool, required_i64};
//!
//! let add = Tool::builder("add")
//!     .description("Add two integers")
//!     .param("a", ParamType::Int)
//!     .param("b", ParamType::Int)
//!     .handler(|args| {
//!         Ok::<_, ttooling::ToolError>(required_i64(args, "a")? + required_i64(args, "b")?)
//!     })
//!     .build()
//!     .expect("tool should build");
//!
//! // String arguments are coerced to the declared integer type.
//! let output = add
//!     .call(json!({"a": "2", "b": 3}).as_object().expect("object"))
//!     .expect("call should succeed");
//! assert_eq!(output, json!(5));
//! assert_eq!(add.schema().parameters.len(), 2);
//! ```

use std::any::Any;
use std::fmt::{Debug, Display, Formatter};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::{ParamSpec, ParamType, ToolArgs, ToolError, ToolSchema, parse_json_object};

type ToolHandler = dyn Fn(&ToolArgs) -> Result<Value, String> + Send + Sync;

#[derive(Clone)]
pub struct Tool {
    name: String,
    description: String,
    params: Vec<ParamSpec>,
    handler: Arc<ToolHandler>,
}

impl Tool {
    pub fn builder(name: impl Into<String>) -> ToolBuilder {
        ToolBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.params.clone(),
        }
    }

    /// Coerces each declared parameter present in `arguments`. Absent
    /// parameters stay absent and undeclared keys are dropped.
    pub fn coerce_arguments(&self, arguments: &ToolArgs) -> ToolArgs {
        self.params
            .iter()
            .filter_map(|spec| {
                arguments
                    .get(&spec.name)
                    .map(|value| (spec.name.clone(), spec.param_type.coerce(value.clone())))
            })
            .collect()
    }

    /// Runs the handler on coerced arguments. Handler errors and panics both
    /// surface as [`ToolErrorKind::Execution`](crate::ToolErrorKind::Execution).
    pub fn call(&self, arguments: &ToolArgs) -> Result<Value, ToolError> {
        let coerced = self.coerce_arguments(arguments);
        match catch_unwind(AssertUnwindSafe(|| (self.handler)(&coerced))) {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(cause)) => Err(ToolError::execution(&self.name, cause)),
            Err(payload) => Err(ToolError::execution(
                &self.name,
                format!("tool panicked: {}", panic_message(payload.as_ref())),
            )),
        }
    }

    pub fn call_json(&self, args_json: &str) -> Result<Value, ToolError> {
        let arguments =
            parse_json_object(args_json).map_err(|err| err.with_tool_name(&self.name))?;
        self.call(&arguments)
    }
}

impl Debug for Tool {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

pub struct ToolBuilder {
    name: String,
    description: Option<String>,
    doc: Vec<String>,
    params: Vec<ParamSpec>,
    handler: Option<Arc<ToolHandler>>,
}

impl ToolBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            doc: Vec::new(),
            params: Vec::new(),
            handler: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Documentation lines used as the description when none is set explicitly.
    pub fn doc(mut self, lines: &[&str]) -> Self {
        self.doc.extend(lines.iter().map(|line| line.trim().to_string()));
        self
    }

    pub fn param(mut self, name: impl Into<String>, param_type: ParamType) -> Self {
        self.params.push(ParamSpec::new(name, param_type));
        self
    }

    pub fn params<I>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = ParamSpec>,
    {
        self.params.extend(params);
        self
    }

    pub fn handler<F, R, E>(mut self, handler: F) -> Self
    where
        F: Fn(&ToolArgs) -> Result<R, E> + Send + Sync + 'static,
        R: Serialize,
        E: Display,
    {
        self.handler = Some(Arc::new(move |arguments: &ToolArgs| {
            let output = handler(arguments).map_err(|err| err.to_string())?;
            serde_json::to_value(output)
                .map_err(|err| format!("tool output is not serializable: {err}"))
        }));
        self
    }

    pub fn build(self) -> Result<Tool, ToolError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ToolError::invalid_arguments("tool name must not be empty"));
        }

        let handler = self.handler.ok_or_else(|| {
            ToolError::invalid_arguments(format!("tool '{name}' has no handler"))
                .with_tool_name(&name)
        })?;

        let explicit = self
            .description
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        let documented =
            Some(self.doc.join("\n").trim().to_string()).filter(|text| !text.is_empty());
        let description = explicit
            .or(documented)
            .unwrap_or_else(|| format!("Tool: {name}"));

        Ok(Tool {
            name,
            description,
            params: self.params,
            handler,
        })
    }
}
