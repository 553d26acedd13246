//! The bounded tool-calling loop.
//!
//! Each step invokes the model with the system prompt and the rendered
//! conversation. Output without a tool-call block is the final answer;
//! output with one runs the tool and feeds the result (or a correction)
//! back as the next turn.
//!
//! ```rust
//! use tloop::Orchestrator;
//! use tprovider::ScriptedModel;
//! use ttooling::{ParamType, Tool, ToolError, required_i64};
//!
//! let model = ScriptedModel::new([
//!     r#"<tool_call>{"name": "add", "arguments": {"a": 2, "b": 3}}</tool_call>"#,
//!     "The sum is 5.",
//! ]);
//! let mut orchestrator = Orchestrator::new(model);
//! orchestrator.register(
//!     Tool::builder("add")
//!         .param("a", ParamType::Int)
//!         .param("b", ParamType::Int)
//!         .handler(|args| Ok::<_, ToolError>(required_i64(args, "a")? + required_i64(args, "b")?))
//!         .build()
//!         .expect("add builds"),
//! );
//!
//! let outcome = orchestrator.run_detailed("What is 2 + 3?").expect("run succeeds");
//! assert_eq!(outcome.answer, "The sum is 5.");
//! assert_eq!(outcome.steps, 2);
//! ```

use std::cell::Cell;
use std::fmt::Display;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tcommon::RunId;
use tprovider::{
    BackoffPolicy, FnModel, LanguageModel, ModelRequest, NoopOperationHooks, ProviderError,
    ProviderErrorKind, ProviderOperationHooks,
};
use ttooling::{
    DefaultToolExecutor, NoopToolRuntimeHooks, Tool, ToolCall, ToolExecutionContext,
    ToolExecutor, ToolRegistry, ToolRuntimeHooks,
};

use crate::{
    ConversationState, History, LoopHooks, NoopLoopHooks, RuntimeConfig, RuntimeError,
    RuntimeErrorKind, build_system_prompt, build_tool_error_message,
    build_tool_not_found_message, build_tool_result_message, combine_prompts, try_parse_first,
};

type Sleeper = dyn Fn(Duration) + Send + Sync;

macro_rules! diag {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+);
        } else {
            tracing::debug!($($arg)+);
        }
    };
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub run_id: RunId,
    pub answer: String,
    /// Model invocations consumed, counting retried failures.
    pub steps: u32,
    pub tool_calls: Vec<ToolCall>,
}

pub struct OrchestratorBuilder {
    model: Option<Arc<dyn LanguageModel>>,
    registry: ToolRegistry,
    config: RuntimeConfig,
    provider_hooks: Arc<dyn ProviderOperationHooks>,
    tool_hooks: Arc<dyn ToolRuntimeHooks>,
    loop_hooks: Arc<dyn LoopHooks>,
    sleeper: Arc<Sleeper>,
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            model: None,
            registry: ToolRegistry::new(),
            config: RuntimeConfig::default(),
            provider_hooks: Arc::new(NoopOperationHooks),
            tool_hooks: Arc::new(NoopToolRuntimeHooks),
            loop_hooks: Arc::new(NoopLoopHooks),
            sleeper: Arc::new(thread::sleep),
        }
    }

    pub fn model<M>(mut self, model: M) -> Self
    where
        M: LanguageModel + 'static,
    {
        self.model = Some(Arc::new(model));
        self
    }

    pub fn shared_model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_steps(mut self, max_steps: u32) -> Self {
        self.config = self.config.with_max_steps(max_steps);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config = self.config.with_verbose(verbose);
        self
    }

    pub fn fallback_message(mut self, fallback_message: impl Into<String>) -> Self {
        self.config = self.config.with_fallback_message(fallback_message);
        self
    }

    pub fn registry(mut self, registry: ToolRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn tool(mut self, tool: Tool) -> Self {
        self.registry.register(tool);
        self
    }

    /// Installs one observer for provider, tool and loop events.
    pub fn hooks<H>(mut self, hooks: Arc<H>) -> Self
    where
        H: ProviderOperationHooks + ToolRuntimeHooks + LoopHooks + 'static,
    {
        self.provider_hooks = hooks.clone();
        self.tool_hooks = hooks.clone();
        self.loop_hooks = hooks;
        self
    }

    pub fn provider_hooks(mut self, hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.provider_hooks = hooks;
        self
    }

    pub fn tool_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.tool_hooks = hooks;
        self
    }

    pub fn loop_hooks(mut self, hooks: Arc<dyn LoopHooks>) -> Self {
        self.loop_hooks = hooks;
        self
    }

    /// Replaces `std::thread::sleep` for retry backoff.
    pub fn sleeper<F>(mut self, sleeper: F) -> Self
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        self.sleeper = Arc::new(sleeper);
        self
    }

    pub fn build(self) -> Result<Orchestrator, RuntimeError> {
        self.config.validate()?;
        let model = self.model.ok_or_else(|| {
            RuntimeError::invalid_input("a model boundary is required to build an orchestrator")
        })?;
        let config = self.config.normalized();

        Ok(Orchestrator {
            model,
            registry: Arc::new(self.registry),
            backoff: config.backoff_policy(),
            config,
            provider_hooks: self.provider_hooks,
            tool_hooks: self.tool_hooks,
            loop_hooks: self.loop_hooks,
            sleeper: self.sleeper,
            combined_prompt: Cell::new(false),
        })
    }
}

/// Drives runs against one model boundary and tool registry.
///
/// Once the model rejects a separate system instruction, every later call
/// on the same instance folds it into the user message. That flag is a
/// [`Cell`], so an orchestrator can move between threads but cannot be
/// shared by reference across them.
pub struct Orchestrator {
    model: Arc<dyn LanguageModel>,
    registry: Arc<ToolRegistry>,
    config: RuntimeConfig,
    backoff: BackoffPolicy,
    provider_hooks: Arc<dyn ProviderOperationHooks>,
    tool_hooks: Arc<dyn ToolRuntimeHooks>,
    loop_hooks: Arc<dyn LoopHooks>,
    sleeper: Arc<Sleeper>,
    combined_prompt: Cell<bool>,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    pub fn new<M>(model: M) -> Self
    where
        M: LanguageModel + 'static,
    {
        let config = RuntimeConfig::default();
        Self {
            model: Arc::new(model),
            registry: Arc::new(ToolRegistry::new()),
            backoff: config.backoff_policy(),
            config,
            provider_hooks: Arc::new(NoopOperationHooks),
            tool_hooks: Arc::new(NoopToolRuntimeHooks),
            loop_hooks: Arc::new(NoopLoopHooks),
            sleeper: Arc::new(thread::sleep),
            combined_prompt: Cell::new(false),
        }
    }

    /// Wraps a `(system, user) -> text` closure as the model boundary.
    pub fn from_fn<F, T, E>(handler: F) -> Self
    where
        F: Fn(&str, &str) -> Result<T, E> + Send + Sync + 'static,
        T: Into<String> + 'static,
        E: Display + 'static,
    {
        Self::new(FnModel::new(handler))
    }

    pub fn register(&mut self, tool: Tool) {
        self.tools_mut().register(tool);
    }

    pub fn tools_mut(&mut self) -> &mut ToolRegistry {
        Arc::make_mut(&mut self.registry)
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Whether the system instruction is currently folded into the user message.
    pub fn uses_combined_prompt(&self) -> bool {
        self.combined_prompt.get()
    }

    pub fn run(&self, user_prompt: &str) -> Result<String, RuntimeError> {
        self.run_detailed(user_prompt).map(|outcome| outcome.answer)
    }

    pub fn run_detailed(&self, user_prompt: &str) -> Result<RunOutcome, RuntimeError> {
        let user_prompt = validated_prompt(user_prompt)?;
        self.drive(ConversationState::new(user_prompt))
    }

    /// Like [`run`](Self::run) but never fails; see [`run_safe_or`](Self::run_safe_or).
    pub fn run_safe(&self, user_prompt: &str) -> String {
        self.run_safe_or(user_prompt, &self.config.fallback_message)
    }

    /// Maps terminal and step-exhaustion failures to fixed sentences and
    /// anything else, including a panic, to `default`.
    pub fn run_safe_or(&self, user_prompt: &str, default: &str) -> String {
        let result = catch_unwind(AssertUnwindSafe(|| self.run(user_prompt)));
        match result {
            Ok(Ok(answer)) => answer,
            Ok(Err(error)) => {
                diag!(
                    self.config.verbose,
                    phase = "run",
                    event = "safe_fallback",
                    error_kind = ?error.kind,
                    "run failed; returning fallback message"
                );
                error
                    .user_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| default.to_string())
            }
            Err(_) => {
                tracing::warn!(phase = "run", event = "panic", "run panicked; returning default");
                default.to_string()
            }
        }
    }

    /// Runs with the most recent `history_window` exchanges as prior turns and
    /// returns the answer together with the extended history.
    pub fn run_with_history(
        &self,
        user_prompt: &str,
        mut history: History,
    ) -> Result<(String, History), RuntimeError> {
        let user_prompt = validated_prompt(user_prompt)?;
        let conversation =
            ConversationState::with_history(&history, self.config.history_window, user_prompt);

        let outcome = self.drive(conversation)?;
        history.push(user_prompt, outcome.answer.clone());
        Ok((outcome.answer, history))
    }

    fn drive(&self, conversation: ConversationState) -> Result<RunOutcome, RuntimeError> {
        let run_id = RunId::next();
        let max_steps = self.config.max_steps.max(1);
        self.loop_hooks.on_run_start(&run_id, max_steps);
        diag!(
            self.config.verbose,
            phase = "run",
            event = "start",
            run_id = %run_id,
            max_steps,
            tools = self.registry.len(),
            "run started"
        );
        if self.registry.is_empty() {
            diag!(
                self.config.verbose,
                phase = "run",
                event = "no_tools",
                run_id = %run_id,
                "no tools registered; the model answers without tool access"
            );
        }

        let result = self.drive_steps(&run_id, max_steps, conversation);
        match &result {
            Ok(outcome) => {
                self.loop_hooks.on_run_success(&run_id, outcome);
                diag!(
                    self.config.verbose,
                    phase = "run",
                    event = "success",
                    run_id = %run_id,
                    steps = outcome.steps,
                    tool_calls = outcome.tool_calls.len(),
                    "run finished"
                );
            }
            Err(error) => {
                self.loop_hooks.on_run_failure(&run_id, error);
                diag!(
                    self.config.verbose,
                    phase = "run",
                    event = "failure",
                    run_id = %run_id,
                    error_kind = ?error.kind,
                    error = %error,
                    "run failed"
                );
            }
        }

        result
    }

    fn drive_steps(
        &self,
        run_id: &RunId,
        max_steps: u32,
        mut conversation: ConversationState,
    ) -> Result<RunOutcome, RuntimeError> {
        let system_prompt = build_system_prompt(&self.registry.get_all_schemas());
        let executor = DefaultToolExecutor::new(Arc::clone(&self.registry))
            .with_hooks(Arc::clone(&self.tool_hooks));
        let mut tool_calls = Vec::new();

        for step in 1..=max_steps {
            conversation.step = step;
            self.loop_hooks.on_step_start(run_id, step);

            let rendered = conversation.render();
            let output = match self.invoke_model(run_id, step, &system_prompt, &rendered) {
                Ok(output) => output,
                Err(error) if error.is_terminal() => return Err(error.into()),
                Err(error) if step == max_steps => {
                    return Err(RuntimeError::connection(format!(
                        "model call failed after {max_steps} attempts: {}",
                        error.message
                    )));
                }
                Err(error) => {
                    conversation.record_error(error.to_string());
                    let delay = self.backoff.backoff_for_attempt(step);
                    self.provider_hooks
                        .on_retry_scheduled(self.model.name(), run_id, step, delay, &error);
                    if !delay.is_zero() {
                        (self.sleeper)(delay);
                    }
                    continue;
                }
            };

            let call = match try_parse_first(&output) {
                Some(Ok(call)) => call,
                parsed => {
                    if let Some(Err(error)) = parsed {
                        diag!(
                            self.config.verbose,
                            phase = "parse",
                            event = "malformed_block",
                            run_id = %run_id,
                            step,
                            error = %error,
                            "malformed tool call block; treating output as the final answer"
                        );
                    }

                    return Ok(RunOutcome {
                        run_id: run_id.clone(),
                        answer: output,
                        steps: step,
                        tool_calls,
                    });
                }
            };

            diag!(
                self.config.verbose,
                phase = "tool",
                event = "call",
                run_id = %run_id,
                step,
                tool_name = %call.name,
                "model requested a tool"
            );
            conversation.push_assistant(output);

            let context = ToolExecutionContext::new(run_id.clone()).with_step(step);
            match executor.execute(&call, &context) {
                Ok(result) => {
                    conversation.push_observation(build_tool_result_message(
                        &call.name,
                        &result.render(),
                    ));
                }
                Err(tool_error) => {
                    let detail = tool_error.detail().to_string();
                    let error = RuntimeError::from(tool_error);
                    let correction = match error.kind {
                        RuntimeErrorKind::ToolNotFound => {
                            build_tool_not_found_message(&call.name, &error.available_tools)
                        }
                        _ => build_tool_error_message(&call.name, &detail),
                    };

                    diag!(
                        self.config.verbose,
                        phase = "tool",
                        event = "recovered",
                        run_id = %run_id,
                        step,
                        tool_name = %call.name,
                        error_kind = ?error.kind,
                        "tool call failed; asking the model to correct course"
                    );
                    conversation.push_system(correction);
                    conversation.record_error(error.message.clone());
                    self.loop_hooks.on_tool_call_recovered(run_id, step, &error);
                }
            }

            tool_calls.push(call);
        }

        Err(RuntimeError::step_budget_exhausted(
            max_steps,
            conversation.last_error,
        ))
    }

    fn invoke_model(
        &self,
        run_id: &RunId,
        step: u32,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ProviderError> {
        let model_name = self.model.name();
        self.provider_hooks.on_attempt_start(model_name, run_id, step);
        diag!(
            self.config.verbose,
            phase = "model",
            event = "attempt",
            run_id = %run_id,
            step,
            combined = self.combined_prompt.get(),
            "invoking model"
        );
        let started_at = Instant::now();

        let result = if self.combined_prompt.get() {
            self.complete(&ModelRequest::user_only(combine_prompts(
                system_prompt,
                user_prompt,
            )))
        } else {
            match self.complete(&ModelRequest::with_system(system_prompt, user_prompt)) {
                Err(error) if error.kind == ProviderErrorKind::SystemPromptUnsupported => {
                    self.combined_prompt.set(true);
                    self.provider_hooks
                        .on_system_prompt_fallback(model_name, run_id);
                    diag!(
                        self.config.verbose,
                        phase = "model",
                        event = "system_prompt_fallback",
                        run_id = %run_id,
                        step,
                        "system instructions not supported; using combined prompt"
                    );
                    self.complete(&ModelRequest::user_only(combine_prompts(
                        system_prompt,
                        user_prompt,
                    )))
                }
                other => other,
            }
        };

        match &result {
            Ok(_) => self
                .provider_hooks
                .on_success(model_name, run_id, step, started_at.elapsed()),
            Err(error) => {
                self.provider_hooks
                    .on_failure(model_name, run_id, step, error);
                diag!(
                    self.config.verbose,
                    phase = "model",
                    event = "failure",
                    run_id = %run_id,
                    step,
                    error_kind = ?error.kind,
                    error = %error,
                    "model call failed"
                );
            }
        }

        result
    }

    fn complete(&self, request: &ModelRequest) -> Result<String, ProviderError> {
        let output = self
            .model
            .complete(request)
            .map_err(ProviderError::classified)?;

        if output.trim().is_empty() {
            return Err(ProviderError::empty_response(
                "model returned an empty response",
            ));
        }

        Ok(output)
    }
}

fn validated_prompt(user_prompt: &str) -> Result<&str, RuntimeError> {
    let trimmed = user_prompt.trim();
    if trimmed.is_empty() {
        return Err(RuntimeError::invalid_input("user prompt must not be empty"));
    }

    Ok(trimmed)
}
