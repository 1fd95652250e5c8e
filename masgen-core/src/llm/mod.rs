//! The language-model collaborator boundary.
//!
//! The core treats the model service purely as `invoke(request) -> response`
//! plus an optional structured-output schema carried on the request. The
//! [`HttpLlm`] client talks to any OpenAI-compatible chat completions
//! endpoint; [`crate::mock_llm::ScriptedLlm`] replays canned responses for
//! tests.

mod client;
mod request;

pub use client::HttpLlm;
pub use request::{LlmRequest, LlmResponse};

use crate::error::LlmError;
use crate::schema::StructuredOutput;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// A language model that can be invoked with a prompt.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send one request and return the raw response.
    async fn invoke(&self, request: LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Identifier of the underlying model, for logs.
    fn model_id(&self) -> &str;
}

/// Invoke a model with a named output schema and parse the result.
///
/// Attaches `T`'s JSON schema as the response format, invokes the model,
/// strips any surrounding code fence, and deserializes into `T`. A response
/// that does not conform yields [`LlmError::Structured`] naming the schema.
///
/// # Example
///
/// ```
/// use masgen_core::{invoke_structured, GenerateResponse, ScriptedLlm};
///
/// # async fn example() -> Result<(), masgen_core::LlmError> {
/// let llm = ScriptedLlm::new(vec![r#"{"response": "42"}"#]);
/// let out: GenerateResponse = invoke_structured(&llm, "Solve it").await?;
/// assert_eq!(out.response, "42");
/// # Ok(())
/// # }
/// ```
pub async fn invoke_structured<T>(
    llm: &dyn LanguageModel,
    prompt: impl Into<String> + Send,
) -> Result<T, LlmError>
where
    T: StructuredOutput + DeserializeOwned,
{
    let request = LlmRequest::new(prompt).with_response_format(T::schema());
    let response = llm.invoke(request).await?;
    response.parse_structured::<T>()
}
