//! Metrics-based hooks for model, tool and loop events.
//!
//! ```rust
//! use tobserve::MetricsObservabilityHooks;
//! use tprovider::ProviderOperationHooks;
//!
//! fn accepts_provider_hooks(_hooks: &dyn ProviderOperationHooks) {}
//!
//! accepts_provider_hooks(&MetricsObservabilityHooks);
//! ```

use std::time::Duration;

use tcommon::RunId;
use tloop::{LoopHooks, RunOutcome, RuntimeError};
use tprovider::{ProviderError, ProviderOperationHooks};
use ttooling::{ToolCall, ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl ProviderOperationHooks for MetricsObservabilityHooks {
    fn on_attempt_start(&self, model: &str, _run_id: &RunId, _attempt: u32) {
        metrics::counter!("toolrun_model_attempt_start_total", "model" => model.to_string())
            .increment(1);
    }

    fn on_retry_scheduled(
        &self,
        model: &str,
        _run_id: &RunId,
        _attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        metrics::counter!(
            "toolrun_model_retry_scheduled_total",
            "model" => model.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!("toolrun_model_retry_delay_seconds", "model" => model.to_string())
            .record(delay.as_secs_f64());
    }

    fn on_success(&self, model: &str, _run_id: &RunId, _attempt: u32, elapsed: Duration) {
        metrics::counter!("toolrun_model_success_total", "model" => model.to_string())
            .increment(1);
        metrics::histogram!(
            "toolrun_model_call_duration_seconds",
            "model" => model.to_string(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_failure(&self, model: &str, _run_id: &RunId, _attempt: u32, error: &ProviderError) {
        metrics::counter!(
            "toolrun_model_failure_total",
            "model" => model.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
    }

    fn on_system_prompt_fallback(&self, model: &str, _run_id: &RunId) {
        metrics::counter!(
            "toolrun_model_system_prompt_fallback_total",
            "model" => model.to_string()
        )
        .increment(1);
    }
}

impl ToolRuntimeHooks for MetricsObservabilityHooks {
    fn on_execution_start(&self, call: &ToolCall, _context: &ToolExecutionContext) {
        metrics::counter!("toolrun_tool_execution_start_total", "tool_name" => call.name.clone())
            .increment(1);
    }

    fn on_execution_success(
        &self,
        call: &ToolCall,
        _context: &ToolExecutionContext,
        _result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "toolrun_tool_execution_success_total",
            "tool_name" => call.name.clone()
        )
        .increment(1);
        metrics::histogram!(
            "toolrun_tool_execution_duration_seconds",
            "tool_name" => call.name.clone(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_execution_failure(
        &self,
        call: &ToolCall,
        _context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "toolrun_tool_execution_failure_total",
            "tool_name" => call.name.clone(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "toolrun_tool_execution_duration_seconds",
            "tool_name" => call.name.clone(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }
}

impl LoopHooks for MetricsObservabilityHooks {
    fn on_run_start(&self, _run_id: &RunId, _max_steps: u32) {
        metrics::counter!("toolrun_run_start_total").increment(1);
    }

    fn on_step_start(&self, _run_id: &RunId, _step: u32) {
        metrics::counter!("toolrun_run_step_total").increment(1);
    }

    fn on_tool_call_recovered(&self, _run_id: &RunId, _step: u32, error: &RuntimeError) {
        metrics::counter!(
            "toolrun_run_tool_call_recovered_total",
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
    }

    fn on_run_success(&self, _run_id: &RunId, outcome: &RunOutcome) {
        metrics::counter!("toolrun_run_success_total").increment(1);
        metrics::histogram!("toolrun_run_steps_per_success").record(f64::from(outcome.steps));
    }

    fn on_run_failure(&self, _run_id: &RunId, error: &RuntimeError) {
        metrics::counter!(
            "toolrun_run_failure_total",
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
    }
}
