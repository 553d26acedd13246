use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use tcommon::RunId;
use tloop::{LoopHooks, Orchestrator, RunOutcome, RuntimeError};
use tprovider::{ProviderError, ProviderOperationHooks, ScriptedModel};
use ttooling::{
    Tool, ToolArgs, ToolCall, ToolError, ToolExecutionContext, ToolExecutionResult,
    ToolRuntimeHooks,
};

use crate::{
    MetricsObservabilityHooks, SafeLoopHooks, SafeProviderHooks, SafeToolHooks,
    TracingObservabilityHooks,
};

fn sample_tool_call() -> ToolCall {
    ToolCall::with_value("echo", json!({"text": "hi"}))
}

fn sample_tool_context() -> ToolExecutionContext {
    ToolExecutionContext::new("run-1").with_step(1)
}

fn sample_outcome() -> RunOutcome {
    RunOutcome {
        run_id: RunId::from("run-1"),
        answer: "done".to_string(),
        steps: 2,
        tool_calls: vec![sample_tool_call()],
    }
}

fn exercise_provider_hooks(hooks: &dyn ProviderOperationHooks) {
    let run_id = RunId::from("run-1");
    let error = ProviderError::connection("model timeout");

    hooks.on_attempt_start("scripted", &run_id, 1);
    hooks.on_retry_scheduled("scripted", &run_id, 1, Duration::from_millis(10), &error);
    hooks.on_success("scripted", &run_id, 2, Duration::from_millis(5));
    hooks.on_failure("scripted", &run_id, 2, &error);
    hooks.on_system_prompt_fallback("scripted", &run_id);
}

fn exercise_tool_hooks(hooks: &dyn ToolRuntimeHooks) {
    let error = ToolError::execution("echo", "tool failed");

    hooks.on_execution_start(&sample_tool_call(), &sample_tool_context());
    hooks.on_execution_success(
        &sample_tool_call(),
        &sample_tool_context(),
        &ToolExecutionResult::new("echo", json!("ok")),
        Duration::from_millis(20),
    );
    hooks.on_execution_failure(
        &sample_tool_call(),
        &sample_tool_context(),
        &error,
        Duration::from_millis(20),
    );
}

fn exercise_loop_hooks(hooks: &dyn LoopHooks) {
    let run_id = RunId::from("run-1");

    hooks.on_run_start(&run_id, 5);
    hooks.on_step_start(&run_id, 1);
    hooks.on_tool_call_recovered(
        &run_id,
        1,
        &RuntimeError::tool_not_found("missing", vec!["echo".to_string()]),
    );
    hooks.on_run_success(&run_id, &sample_outcome());
    hooks.on_run_failure(&run_id, &RuntimeError::step_budget_exhausted(5, None));
}

#[test]
fn tracing_hooks_smoke_test_all_callbacks() {
    let hooks = TracingObservabilityHooks;
    exercise_provider_hooks(&hooks);
    exercise_tool_hooks(&hooks);
    exercise_loop_hooks(&hooks);
}

#[test]
fn metrics_hooks_smoke_test_all_callbacks() {
    let hooks = MetricsObservabilityHooks;
    exercise_provider_hooks(&hooks);
    exercise_tool_hooks(&hooks);
    exercise_loop_hooks(&hooks);
}

#[derive(Default, Clone)]
struct RecordingHooks {
    events: Arc<Mutex<Vec<&'static str>>>,
}

impl RecordingHooks {
    fn push(&self, event: &'static str) {
        self.events.lock().expect("events lock").push(event);
    }
}

impl ProviderOperationHooks for RecordingHooks {
    fn on_attempt_start(&self, _model: &str, _run_id: &RunId, _attempt: u32) {
        self.push("attempt_start");
    }

    fn on_retry_scheduled(
        &self,
        _model: &str,
        _run_id: &RunId,
        _attempt: u32,
        _delay: Duration,
        _error: &ProviderError,
    ) {
        self.push("retry_scheduled");
    }

    fn on_success(&self, _model: &str, _run_id: &RunId, _attempt: u32, _elapsed: Duration) {
        self.push("success");
    }

    fn on_failure(&self, _model: &str, _run_id: &RunId, _attempt: u32, _error: &ProviderError) {
        self.push("failure");
    }

    fn on_system_prompt_fallback(&self, _model: &str, _run_id: &RunId) {
        self.push("fallback");
    }
}

impl ToolRuntimeHooks for RecordingHooks {
    fn on_execution_start(&self, _call: &ToolCall, _context: &ToolExecutionContext) {
        self.push("tool_start");
    }

    fn on_execution_success(
        &self,
        _call: &ToolCall,
        _context: &ToolExecutionContext,
        _result: &ToolExecutionResult,
        _elapsed: Duration,
    ) {
        self.push("tool_success");
    }

    fn on_execution_failure(
        &self,
        _call: &ToolCall,
        _context: &ToolExecutionContext,
        _error: &ToolError,
        _elapsed: Duration,
    ) {
        self.push("tool_failure");
    }
}

impl LoopHooks for RecordingHooks {
    fn on_run_start(&self, _run_id: &RunId, _max_steps: u32) {
        self.push("run_start");
    }

    fn on_step_start(&self, _run_id: &RunId, _step: u32) {
        self.push("step_start");
    }

    fn on_tool_call_recovered(&self, _run_id: &RunId, _step: u32, _error: &RuntimeError) {
        self.push("recovered");
    }

    fn on_run_success(&self, _run_id: &RunId, _outcome: &RunOutcome) {
        self.push("run_success");
    }

    fn on_run_failure(&self, _run_id: &RunId, _error: &RuntimeError) {
        self.push("run_failure");
    }
}

struct PanicHooks;

impl ProviderOperationHooks for PanicHooks {
    fn on_attempt_start(&self, _model: &str, _run_id: &RunId, _attempt: u32) {
        panic!("attempt_start panic");
    }

    fn on_success(&self, _model: &str, _run_id: &RunId, _attempt: u32, _elapsed: Duration) {
        panic!("success panic");
    }
}

impl ToolRuntimeHooks for PanicHooks {
    fn on_execution_start(&self, _call: &ToolCall, _context: &ToolExecutionContext) {
        panic!("start panic");
    }
}

impl LoopHooks for PanicHooks {
    fn on_run_start(&self, _run_id: &RunId, _max_steps: u32) {
        panic!("run_start panic");
    }

    fn on_run_success(&self, _run_id: &RunId, _outcome: &RunOutcome) {
        panic!("run_success panic");
    }
}

#[test]
fn safe_wrappers_delegate_when_inner_succeeds() {
    let inner = RecordingHooks::default();
    let events = Arc::clone(&inner.events);

    exercise_provider_hooks(&SafeProviderHooks::new(inner.clone()));
    exercise_tool_hooks(&SafeToolHooks::new(inner.clone()));
    exercise_loop_hooks(&SafeLoopHooks::new(inner));

    assert_eq!(events.lock().expect("events lock").len(), 13);
}

#[test]
fn safe_wrappers_swallow_panics() {
    exercise_provider_hooks(&SafeProviderHooks::new(PanicHooks));
    exercise_tool_hooks(&SafeToolHooks::new(PanicHooks));
    exercise_loop_hooks(&SafeLoopHooks::new(PanicHooks));
}

fn echo_orchestrator() -> tloop::OrchestratorBuilder {
    Orchestrator::builder()
        .model(ScriptedModel::new([
            r#"<tool_call>{"name": "echo", "arguments": {"text": "hi"}}</tool_call>"#,
            "echoed",
        ]))
        .tool(
            Tool::builder("echo")
                .handler(|args: &ToolArgs| Ok::<_, String>(args.clone()))
                .build()
                .expect("echo builds"),
        )
}

#[test]
fn recording_hooks_see_a_full_run() {
    let hooks = Arc::new(RecordingHooks::default());
    let orchestrator = echo_orchestrator()
        .hooks(Arc::clone(&hooks))
        .build()
        .expect("builds");

    assert_eq!(orchestrator.run("say hi").expect("answer"), "echoed");
    assert_eq!(
        *hooks.events.lock().expect("events lock"),
        vec![
            "run_start",
            "step_start",
            "attempt_start",
            "success",
            "tool_start",
            "tool_success",
            "step_start",
            "attempt_start",
            "success",
            "run_success",
        ]
    );
}

#[test]
fn panicking_observers_do_not_break_runs_when_wrapped() {
    let orchestrator = echo_orchestrator()
        .provider_hooks(Arc::new(SafeProviderHooks::new(PanicHooks)))
        .tool_hooks(Arc::new(SafeToolHooks::new(PanicHooks)))
        .loop_hooks(Arc::new(SafeLoopHooks::new(PanicHooks)))
        .build()
        .expect("builds");

    assert_eq!(orchestrator.run("say hi").expect("answer"), "echoed");
}

#[test]
fn tracing_and_metrics_hooks_plug_into_the_builder() {
    let traced = echo_orchestrator()
        .hooks(Arc::new(TracingObservabilityHooks))
        .build()
        .expect("builds");
    assert_eq!(traced.run("say hi").expect("answer"), "echoed");

    let metered = echo_orchestrator()
        .hooks(Arc::new(MetricsObservabilityHooks))
        .build()
        .expect("builds");
    assert_eq!(metered.run("say hi").expect("answer"), "echoed");
}
