//! Lifecycle hooks for orchestrator runs.
//!
//! ```rust
//! use tloop::{LoopHooks, NoopLoopHooks};
//!
//! fn assert_hooks_trait(_hooks: &dyn LoopHooks) {}
//!
//! assert_hooks_trait(&NoopLoopHooks);
//! ```

use tcommon::RunId;

use crate::{RunOutcome, RuntimeError};

pub trait LoopHooks: Send + Sync {
    fn on_run_start(&self, _run_id: &RunId, _max_steps: u32) {}

    fn on_step_start(&self, _run_id: &RunId, _step: u32) {}

    /// A recoverable tool failure was folded into a corrective turn.
    fn on_tool_call_recovered(&self, _run_id: &RunId, _step: u32, _error: &RuntimeError) {}

    fn on_run_success(&self, _run_id: &RunId, _outcome: &RunOutcome) {}

    fn on_run_failure(&self, _run_id: &RunId, _error: &RuntimeError) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLoopHooks;

impl LoopHooks for NoopLoopHooks {}
