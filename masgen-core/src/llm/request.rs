//! Request and response types for the language-model collaborator.

use crate::error::LlmError;
use crate::schema::StructuredOutput;
use crate::utils::strip_code_fences;
use serde::de::DeserializeOwned;

/// One request to the model.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct LlmRequest {
    /// User prompt
    pub prompt: String,

    /// Optional system instruction
    pub system_instruction: Option<String>,

    /// Optional JSON schema for structured output
    ///
    /// When set, the model is constrained to answer with a JSON object
    /// conforming to this schema. See [`crate::schema`] for the catalog.
    pub response_format: Option<serde_json::Value>,
}

impl LlmRequest {
    /// Create a request with just a prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    /// Attach a system instruction.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system_instruction = Some(system.into());
        self
    }

    /// Attach a structured-output schema.
    #[must_use]
    pub fn with_response_format(mut self, schema: serde_json::Value) -> Self {
        self.response_format = Some(schema);
        self
    }
}

/// Raw response text from the model.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
}

impl LlmResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Parse the response as a structured output of type `T`.
    ///
    /// Strips a surrounding Markdown code fence first; models add one often
    /// enough that rejecting it would turn good answers into errors.
    pub fn parse_structured<T>(&self) -> Result<T, LlmError>
    where
        T: StructuredOutput + DeserializeOwned,
    {
        let cleaned = strip_code_fences(&self.text);
        serde_json::from_str(cleaned).map_err(|e| LlmError::Structured {
            schema: T::SCHEMA_NAME,
            message: e.to_string(),
        })
    }
}
