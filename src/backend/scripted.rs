//! Deterministic scripted backend.
//!
//! Replays a queued sequence of responses in FIFO order, optionally
//! falling back to a handler function when the queue runs dry. Used for
//! replay determinism checks and as the mock backend in tests.

use std::collections::VecDeque;
use std::fmt;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use super::{BackendError, GenerationBackend, PromptContext};
use crate::registry::OutputSchema;

type Handler = Box<dyn Fn(&PromptContext) -> Result<Value, BackendError> + Send + Sync>;

/// A [`GenerationBackend`] that replays scripted responses.
#[derive(Default)]
pub struct ScriptedBackend {
    queue: Mutex<VecDeque<Result<Value, BackendError>>>,
    fallback: Option<Handler>,
}

impl ScriptedBackend {
    /// An empty script; every call fails until responses are pushed.
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that answers every call through `handler` once the
    /// queue is empty.
    pub fn with_fallback(
        handler: impl Fn(&PromptContext) -> Result<Value, BackendError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: Some(Box::new(handler)),
        }
    }

    /// Queue a successful response.
    pub fn push(&self, response: Value) {
        self.queue.lock().push_back(Ok(response));
    }

    /// Queue a failure.
    pub fn push_error(&self, error: BackendError) {
        self.queue.lock().push_back(Err(error));
    }

    /// Responses still queued.
    pub fn remaining(&self) -> usize {
        self.queue.lock().len()
    }
}

impl fmt::Debug for ScriptedBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedBackend")
            .field("remaining", &self.remaining())
            .field("has_fallback", &self.fallback.is_some())
            .finish()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(
        &self,
        prompt: &PromptContext,
        _schema: &OutputSchema,
    ) -> Result<Value, BackendError> {
        if let Some(next) = self.queue.lock().pop_front() {
            return next;
        }
        match &self.fallback {
            Some(handler) => handler(prompt),
            None => Err(BackendError::Unavailable("script exhausted".into())),
        }
    }
}
