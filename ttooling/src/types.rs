//! Tool call, schema, execution context and result types.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tcommon::RunId;

use crate::ParamSpec;

/// Arguments of one tool call, keyed by parameter name.
pub type ToolArgs = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub name: String,
    pub arguments: ToolArgs,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: ToolArgs) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Builds a call from a `json!({...})` literal; non-object values yield no arguments.
    pub fn with_value(name: impl Into<String>, arguments: Value) -> Self {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        Self::new(name, arguments)
    }
}

/// Public description of a tool, as advertised to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParamSpec>,
}

impl Serialize for ToolSchema {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        struct Shape<'a> {
            name: &'a str,
            description: &'a str,
            parameters: Parameters<'a>,
        }

        struct Parameters<'a>(&'a [ParamSpec]);

        impl Serialize for Parameters<'_> {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for spec in self.0 {
                    map.serialize_entry(&spec.name, &spec.param_type)?;
                }
                map.end()
            }
        }

        Shape {
            name: &self.name,
            description: &self.description,
            parameters: Parameters(&self.parameters),
        }
        .serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolExecutionContext {
    pub run_id: RunId,
    pub step: u32,
}

impl ToolExecutionContext {
    pub fn new(run_id: impl Into<RunId>) -> Self {
        Self {
            run_id: run_id.into(),
            step: 0,
        }
    }

    pub fn with_step(mut self, step: u32) -> Self {
        self.step = step;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolExecutionResult {
    pub tool_name: String,
    pub output: Value,
}

impl ToolExecutionResult {
    pub fn new(tool_name: impl Into<String>, output: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            output,
        }
    }

    /// Text shown to the model: strings verbatim, everything else as JSON.
    pub fn render(&self) -> String {
        match &self.output {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}
