//! Deterministic gateway for tests and offline runs
//!
//! ```
//! use docbrief_llm::{MockGateway, ModelGateway};
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let gateway = MockGateway::new("[OVERVIEW]\nHello world.");
//! let text = rt.block_on(gateway.generate("any prompt")).unwrap();
//! assert_eq!(text, "[OVERVIEW]\nHello world.");
//! assert_eq!(gateway.call_count(), 1);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::gateway::{GenerationError, ModelGateway};

type Reply = Result<String, GenerationError>;

#[derive(Debug, Default)]
struct MockState {
    queue: VecDeque<Reply>,
    prompts: Vec<String>,
}

/// Scripted model gateway.
///
/// Replies are chosen in this order: queued replies (FIFO), then the first
/// rule whose needle occurs in the prompt, then the default reply.
#[derive(Debug, Clone)]
pub struct MockGateway {
    default_reply: Reply,
    rules: Vec<(String, Reply)>,
    delay: Option<Duration>,
    state: Arc<Mutex<MockState>>,
}

impl MockGateway {
    /// Gateway returning `response` for every prompt
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_default(Ok(response.into()))
    }

    /// Gateway failing every call with `error`
    pub fn failing(error: GenerationError) -> Self {
        Self::with_default(Err(error))
    }

    fn with_default(default_reply: Reply) -> Self {
        Self {
            default_reply,
            rules: Vec::new(),
            delay: None,
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Reply with `response` whenever the prompt contains `needle`
    pub fn respond_when(mut self, needle: impl Into<String>, response: impl Into<String>) -> Self {
        self.rules.push((needle.into(), Ok(response.into())));
        self
    }

    /// Fail with `error` whenever the prompt contains `needle`
    pub fn fail_when(mut self, needle: impl Into<String>, error: GenerationError) -> Self {
        self.rules.push((needle.into(), Err(error)));
        self
    }

    /// Queue a one-shot reply consumed before any rule
    pub fn push_reply(&self, reply: Result<String, GenerationError>) {
        self.lock().queue.push_back(reply);
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of generate calls so far
    pub fn call_count(&self) -> usize {
        self.lock().prompts.len()
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.lock().prompts.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A poisoned lock only means another test thread panicked mid-call
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn reply_for(&self, prompt: &str) -> Reply {
        let mut state = self.lock();
        state.prompts.push(prompt.to_string());

        if let Some(reply) = state.queue.pop_front() {
            return reply;
        }

        self.rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.default_reply.clone())
    }
}

#[async_trait]
impl ModelGateway for MockGateway {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let reply = self.reply_for(prompt);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        reply
    }

    fn name(&self) -> &str {
        "mock"
    }
}
