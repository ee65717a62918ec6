//! Test doubles for the generation seam.
//!
//! Enable the `test-fixtures` feature to use these from other crates:
//!
//! ```toml
//! [dev-dependencies]
//! textgen = { path = "../textgen", features = ["test-fixtures"] }
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::provider::{GenerateError, TextGenerator};

/// A generator that replays queued responses and records every prompt.
///
/// When the queue is empty it returns the fallback response, so open-ended
/// simulation runs never starve.
pub struct ScriptedGenerator {
    queue: Mutex<VecDeque<String>>,
    fallback: String,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: "just another quiet day on the feed".to_string(),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sets the response returned once the queue is exhausted.
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Queues one response.
    pub fn push(&self, response: impl Into<String>) {
        self.queue.lock().unwrap().push_back(response.into());
    }

    /// Queues several responses in order.
    pub fn push_many<S: Into<String>>(&self, responses: impl IntoIterator<Item = S>) {
        let mut queue = self.queue.lock().unwrap();
        for response in responses {
            queue.push_back(response.into());
        }
    }

    /// Handle to the prompts seen so far, for assertions.
    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }
}

impl Default for ScriptedGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let next = self.queue.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| self.fallback.clone()))
    }
}

/// A well-formed user-generation response for tests.
pub fn sample_user_response(username: &str) -> String {
    format!(
        "USERNAME: {username}\n\
         INTERESTS: Vintage Synthesizer Repair, Bouldering, Urban Beekeeping, Sustainable Fashion"
    )
}

/// A well-formed event-generation response for tests.
pub fn sample_event_response() -> String {
    "TITLE: Major AI Breakthrough in Medical Research\n\
     DESCRIPTION: A new model predicts protein structures for rare diseases.\n\
     TAGS: ai-medical-breakthrough, medical-research, healthcare-innovation\n\
     REGIONS: North America, Europe"
        .to_string()
}
