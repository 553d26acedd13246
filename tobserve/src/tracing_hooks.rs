//! Tracing-based hooks for model, tool and loop events.
//!
//! ```rust
//! use tloop::LoopHooks;
//! use tobserve::TracingObservabilityHooks;
//!
//! fn accepts_loop_hooks(_hooks: &dyn LoopHooks) {}
//!
//! accepts_loop_hooks(&TracingObservabilityHooks);
//! ```

use std::time::Duration;

use tcommon::RunId;
use tloop::{LoopHooks, RunOutcome, RuntimeError};
use tprovider::{ProviderError, ProviderOperationHooks};
use ttooling::{ToolCall, ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ProviderOperationHooks for TracingObservabilityHooks {
    fn on_attempt_start(&self, model: &str, run_id: &RunId, attempt: u32) {
        tracing::info!(
            phase = "model",
            event = "attempt_start",
            model,
            run_id = %run_id,
            attempt
        );
    }

    fn on_retry_scheduled(
        &self,
        model: &str,
        run_id: &RunId,
        attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        tracing::warn!(
            phase = "model",
            event = "retry_scheduled",
            model,
            run_id = %run_id,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error_kind = ?error.kind,
            error = %error
        );
    }

    fn on_success(&self, model: &str, run_id: &RunId, attempt: u32, elapsed: Duration) {
        tracing::info!(
            phase = "model",
            event = "success",
            model,
            run_id = %run_id,
            attempt,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_failure(&self, model: &str, run_id: &RunId, attempt: u32, error: &ProviderError) {
        tracing::error!(
            phase = "model",
            event = "failure",
            model,
            run_id = %run_id,
            attempt,
            error_kind = ?error.kind,
            terminal = error.is_terminal(),
            error = %error
        );
    }

    fn on_system_prompt_fallback(&self, model: &str, run_id: &RunId) {
        tracing::warn!(
            phase = "model",
            event = "system_prompt_fallback",
            model,
            run_id = %run_id
        );
    }
}

impl ToolRuntimeHooks for TracingObservabilityHooks {
    fn on_execution_start(&self, call: &ToolCall, context: &ToolExecutionContext) {
        tracing::info!(
            phase = "tool",
            event = "execution_start",
            tool_name = call.name.as_str(),
            run_id = %context.run_id,
            step = context.step
        );
    }

    fn on_execution_success(
        &self,
        call: &ToolCall,
        context: &ToolExecutionContext,
        _result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "tool",
            event = "execution_success",
            tool_name = call.name.as_str(),
            run_id = %context.run_id,
            step = context.step,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_execution_failure(
        &self,
        call: &ToolCall,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "tool",
            event = "execution_failure",
            tool_name = call.name.as_str(),
            run_id = %context.run_id,
            step = context.step,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            error = %error
        );
    }
}

impl LoopHooks for TracingObservabilityHooks {
    fn on_run_start(&self, run_id: &RunId, max_steps: u32) {
        tracing::info!(phase = "run", event = "start", run_id = %run_id, max_steps);
    }

    fn on_step_start(&self, run_id: &RunId, step: u32) {
        tracing::debug!(phase = "run", event = "step_start", run_id = %run_id, step);
    }

    fn on_tool_call_recovered(&self, run_id: &RunId, step: u32, error: &RuntimeError) {
        tracing::warn!(
            phase = "run",
            event = "tool_call_recovered",
            run_id = %run_id,
            step,
            tool_name = error.tool_name.as_deref(),
            error_kind = ?error.kind,
            error = %error
        );
    }

    fn on_run_success(&self, run_id: &RunId, outcome: &RunOutcome) {
        tracing::info!(
            phase = "run",
            event = "success",
            run_id = %run_id,
            steps = outcome.steps,
            tool_calls = outcome.tool_calls.len()
        );
    }

    fn on_run_failure(&self, run_id: &RunId, error: &RuntimeError) {
        tracing::error!(
            phase = "run",
            event = "failure",
            run_id = %run_id,
            error_kind = ?error.kind,
            steps = error.steps,
            error = %error
        );
    }
}
