//! Tool executor trait and the default registry-backed executor.

use std::sync::Arc;
use std::time::Instant;

use crate::{
    NoopToolRuntimeHooks, ToolCall, ToolError, ToolExecutionContext, ToolExecutionResult,
    ToolRegistry, ToolRuntimeHooks,
};

pub trait ToolExecutor: Send + Sync {
    fn execute(
        &self,
        call: &ToolCall,
        context: &ToolExecutionContext,
    ) -> Result<ToolExecutionResult, ToolError>;
}

#[derive(Clone)]
pub struct DefaultToolExecutor {
    registry: Arc<ToolRegistry>,
    hooks: Arc<dyn ToolRuntimeHooks>,
}

impl Default for DefaultToolExecutor {
    fn default() -> Self {
        Self::new(Arc::new(ToolRegistry::new()))
    }
}

impl DefaultToolExecutor {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            hooks: Arc::new(NoopToolRuntimeHooks),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn registry(&self) -> Arc<ToolRegistry> {
        Arc::clone(&self.registry)
    }
}

impl ToolExecutor for DefaultToolExecutor {
    fn execute(
        &self,
        call: &ToolCall,
        context: &ToolExecutionContext,
    ) -> Result<ToolExecutionResult, ToolError> {
        self.hooks.on_execution_start(call, context);
        let started_at = Instant::now();

        let outcome = self
            .registry
            .get(&call.name)
            .and_then(|tool| tool.call(&call.arguments))
            .map(|output| ToolExecutionResult::new(&call.name, output));

        let elapsed = started_at.elapsed();
        match &outcome {
            Ok(result) => self
                .hooks
                .on_execution_success(call, context, result, elapsed),
            Err(error) => self
                .hooks
                .on_execution_failure(call, context, error, elapsed),
        }

        outcome
    }
}
