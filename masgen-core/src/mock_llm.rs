//! Scripted language model for tests.
//!
//! Replays a fixed sequence of responses, one per invocation, and records
//! every request it receives. This backs pipeline and evaluator tests:
//! no API calls, deterministic output, and a call counter for asserting
//! idempotence (a cached re-run must make zero model calls).

use crate::error::LlmError;
use crate::llm::{LanguageModel, LlmRequest, LlmResponse};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A language model that replays canned responses in order.
///
/// # Example
///
/// ```
/// use masgen_core::{LanguageModel, LlmRequest, ScriptedLlm};
///
/// # async fn example() -> Result<(), masgen_core::LlmError> {
/// let llm = ScriptedLlm::new(vec!["first", "second"]);
/// assert_eq!(llm.invoke(LlmRequest::new("a")).await?.text, "first");
/// assert_eq!(llm.invoke(LlmRequest::new("b")).await?.text, "second");
/// assert_eq!(llm.call_count(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ScriptedLlm {
    responses: Vec<String>,
    cursor: AtomicUsize,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedLlm {
    /// Create a mock that replays the given responses in order.
    pub fn new<S: Into<String>>(responses: Vec<S>) -> Self {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            cursor: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock from JSON values, serialized as response text.
    ///
    /// Convenient for scripting structured-output calls.
    pub fn from_json(values: Vec<serde_json::Value>) -> Self {
        Self::new(values.into_iter().map(|v| v.to_string()).collect())
    }

    /// Number of invocations made so far.
    pub fn call_count(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    /// Whether all scripted responses have been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.call_count() >= self.responses.len()
    }

    /// Copies of every request received, in order.
    pub fn recorded_requests(&self) -> Vec<LlmRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// The prompts received, in order.
    pub fn recorded_prompts(&self) -> Vec<String> {
        self.recorded_requests()
            .into_iter()
            .map(|r| r.prompt)
            .collect()
    }
}

#[async_trait]
impl LanguageModel for ScriptedLlm {
    async fn invoke(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request);

        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        match self.responses.get(index) {
            Some(text) => Ok(LlmResponse::new(text.clone())),
            None => Err(LlmError::Other(format!(
                "Scripted responses exhausted after {} calls",
                self.responses.len()
            ))),
        }
    }

    fn model_id(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order() {
        let llm = ScriptedLlm::new(vec!["a", "b"]);
        assert_eq!(llm.invoke(LlmRequest::new("1")).await.unwrap().text, "a");
        assert_eq!(llm.invoke(LlmRequest::new("2")).await.unwrap().text, "b");
    }

    #[tokio::test]
    async fn test_exhaustion_is_an_error() {
        let llm = ScriptedLlm::new(vec!["only"]);
        llm.invoke(LlmRequest::new("1")).await.unwrap();

        let err = llm.invoke(LlmRequest::new("2")).await.unwrap_err();
        assert!(err.to_string().contains("exhausted"));
        assert!(llm.is_exhausted());
    }

    #[tokio::test]
    async fn test_records_prompts() {
        let llm = ScriptedLlm::new(vec!["a", "b"]);
        llm.invoke(LlmRequest::new("first prompt")).await.unwrap();
        llm.invoke(LlmRequest::new("second prompt")).await.unwrap();

        assert_eq!(llm.recorded_prompts(), vec!["first prompt", "second prompt"]);
    }

    #[tokio::test]
    async fn test_from_json() {
        let llm = ScriptedLlm::from_json(vec![serde_json::json!({"response": "x"})]);
        let text = llm.invoke(LlmRequest::new("q")).await.unwrap().text;
        assert_eq!(text, r#"{"response":"x"}"#);
    }
}
