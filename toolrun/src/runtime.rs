//! Wiring helpers that assemble an orchestrator with tools, configuration
//! and observability attached.

use std::path::Path;
use std::sync::Arc;

use crate::{
    LanguageModel, LoopHooks, MetricsObservabilityHooks, Orchestrator, OrchestratorBuilder,
    ProviderOperationHooks, RuntimeConfig, RuntimeError, SafeLoopHooks, SafeProviderHooks,
    SafeToolHooks, Tool, ToolRuntimeHooks, TracingObservabilityHooks,
};

/// Which built-in observer a helper installs. Observers are wrapped so a
/// panicking hook never aborts a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Observability {
    #[default]
    Off,
    Tracing,
    Metrics,
}

pub fn builder<M>(model: M, observability: Observability) -> OrchestratorBuilder
where
    M: LanguageModel + 'static,
{
    let builder = Orchestrator::builder().model(model);
    match observability {
        Observability::Off => builder,
        Observability::Tracing => observe_with(builder, TracingObservabilityHooks),
        Observability::Metrics => observe_with(builder, MetricsObservabilityHooks),
    }
}

pub fn orchestrator<M, I>(model: M, tools: I) -> Result<Orchestrator, RuntimeError>
where
    M: LanguageModel + 'static,
    I: IntoIterator<Item = Tool>,
{
    orchestrator_with(model, RuntimeConfig::default(), Observability::Off, tools)
}

pub fn observed_orchestrator<M, I>(model: M, tools: I) -> Result<Orchestrator, RuntimeError>
where
    M: LanguageModel + 'static,
    I: IntoIterator<Item = Tool>,
{
    orchestrator_with(model, RuntimeConfig::default(), Observability::Tracing, tools)
}

/// Reads a TOML [`RuntimeConfig`] from `path`. Config failures surface as
/// [`RuntimeErrorKind::InvalidInput`](crate::RuntimeErrorKind::InvalidInput).
pub fn orchestrator_from_path<M, I>(
    model: M,
    path: impl AsRef<Path>,
    observability: Observability,
    tools: I,
) -> Result<Orchestrator, RuntimeError>
where
    M: LanguageModel + 'static,
    I: IntoIterator<Item = Tool>,
{
    let config = RuntimeConfig::from_path(path)?;
    orchestrator_with(model, config, observability, tools)
}

pub fn orchestrator_from_toml<M, I>(
    model: M,
    raw: &str,
    observability: Observability,
    tools: I,
) -> Result<Orchestrator, RuntimeError>
where
    M: LanguageModel + 'static,
    I: IntoIterator<Item = Tool>,
{
    let config = RuntimeConfig::from_toml_str(raw)?;
    orchestrator_with(model, config, observability, tools)
}

pub fn orchestrator_with<M, I>(
    model: M,
    config: RuntimeConfig,
    observability: Observability,
    tools: I,
) -> Result<Orchestrator, RuntimeError>
where
    M: LanguageModel + 'static,
    I: IntoIterator<Item = Tool>,
{
    tools
        .into_iter()
        .fold(builder(model, observability).config(config), |builder, tool| {
            builder.tool(tool)
        })
        .build()
}

fn observe_with<H>(builder: OrchestratorBuilder, hooks: H) -> OrchestratorBuilder
where
    H: ProviderOperationHooks + ToolRuntimeHooks + LoopHooks + Clone + 'static,
{
    builder
        .provider_hooks(Arc::new(SafeProviderHooks::new(hooks.clone())))
        .tool_hooks(Arc::new(SafeToolHooks::new(hooks.clone())))
        .loop_hooks(Arc::new(SafeLoopHooks::new(hooks)))
}
