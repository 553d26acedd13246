use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use tcommon::RunId;
use tloop::{LoopHooks, RunOutcome, RuntimeError};
use tprovider::{ProviderError, ProviderOperationHooks};
use ttooling::{ToolCall, ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};

pub struct SafeProviderHooks<H> {
    inner: H,
}

impl<H> SafeProviderHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ProviderOperationHooks for SafeProviderHooks<H>
where
    H: ProviderOperationHooks,
{
    fn on_attempt_start(&self, model: &str, run_id: &RunId, attempt: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_attempt_start(model, run_id, attempt)
        }));
    }

    fn on_retry_scheduled(
        &self,
        model: &str,
        run_id: &RunId,
        attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_retry_scheduled(model, run_id, attempt, delay, error)
        }));
    }

    fn on_success(&self, model: &str, run_id: &RunId, attempt: u32, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_success(model, run_id, attempt, elapsed)
        }));
    }

    fn on_failure(&self, model: &str, run_id: &RunId, attempt: u32, error: &ProviderError) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_failure(model, run_id, attempt, error)
        }));
    }

    fn on_system_prompt_fallback(&self, model: &str, run_id: &RunId) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_system_prompt_fallback(model, run_id)
        }));
    }
}

pub struct SafeToolHooks<H> {
    inner: H,
}

impl<H> SafeToolHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ToolRuntimeHooks for SafeToolHooks<H>
where
    H: ToolRuntimeHooks,
{
    fn on_execution_start(&self, call: &ToolCall, context: &ToolExecutionContext) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_execution_start(call, context)
        }));
    }

    fn on_execution_success(
        &self,
        call: &ToolCall,
        context: &ToolExecutionContext,
        result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_execution_success(call, context, result, elapsed)
        }));
    }

    fn on_execution_failure(
        &self,
        call: &ToolCall,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_execution_failure(call, context, error, elapsed)
        }));
    }
}

pub struct SafeLoopHooks<H> {
    inner: H,
}

impl<H> SafeLoopHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> LoopHooks for SafeLoopHooks<H>
where
    H: LoopHooks,
{
    fn on_run_start(&self, run_id: &RunId, max_steps: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_run_start(run_id, max_steps)));
    }

    fn on_step_start(&self, run_id: &RunId, step: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_step_start(run_id, step)));
    }

    fn on_tool_call_recovered(&self, run_id: &RunId, step: u32, error: &RuntimeError) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_tool_call_recovered(run_id, step, error)
        }));
    }

    fn on_run_success(&self, run_id: &RunId, outcome: &RunOutcome) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_run_success(run_id, outcome)
        }));
    }

    fn on_run_failure(&self, run_id: &RunId, error: &RuntimeError) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_run_failure(run_id, error)
        }));
    }
}
