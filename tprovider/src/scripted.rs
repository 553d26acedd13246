//! Deterministic in-memory model for tests and demos.
//!
//! ```rust
//! use tprovider::{LanguageModel, ModelRequest, ScriptedModel};
//!
//! let model = ScriptedModel::new(["first", "second"]);
//! let request = ModelRequest::with_system("rules", "hi");
//!
//! assert_eq!(model.complete(&request).unwrap(), "first");
//! assert_eq!(model.complete(&request).unwrap(), "second");
//! // The last entry repeats once the script runs out.
//! assert_eq!(model.complete(&request).unwrap(), "second");
//! assert_eq!(model.calls(), 3);
//! ```

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use crate::{LanguageModel, ModelRequest, ProviderError};

type Step = Result<String, ProviderError>;

#[derive(Debug, Default)]
pub struct ScriptedModel {
    state: Mutex<ScriptState>,
}

#[derive(Debug, Default)]
struct ScriptState {
    pending: VecDeque<Step>,
    last: Option<Step>,
    requests: Vec<ModelRequest>,
}

impl ScriptedModel {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_steps(responses.into_iter().map(|text| Ok(text.into())))
    }

    pub fn from_steps<I>(steps: I) -> Self
    where
        I: IntoIterator<Item = Result<String, ProviderError>>,
    {
        Self {
            state: Mutex::new(ScriptState {
                pending: steps.into_iter().collect(),
                last: None,
                requests: Vec::new(),
            }),
        }
    }

    pub fn always(response: impl Into<String>) -> Self {
        Self::new([response.into()])
    }

    pub fn failing(error: ProviderError) -> Self {
        Self::from_steps([Err(error)])
    }

    pub fn calls(&self) -> usize {
        self.lock().requests.len()
    }

    pub fn requests(&self) -> Vec<ModelRequest> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LanguageModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    fn complete(&self, request: &ModelRequest) -> Result<String, ProviderError> {
        let mut state = self.lock();
        state.requests.push(request.clone());

        if let Some(step) = state.pending.pop_front() {
            state.last = Some(step.clone());
            return step;
        }

        state
            .last
            .clone()
            .unwrap_or_else(|| Err(ProviderError::other("scripted model has no responses")))
    }
}
