use thiserror::Error;

/// Errors that can occur when calling the language-model collaborator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LlmError {
    /// HTTP transport failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    /// The API returned a non-success status
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response carried no usable content
    #[error("No content in response")]
    NoContent,

    /// The response did not conform to the requested output schema
    #[error("Failed to parse '{schema}' response: {message}")]
    Structured {
        schema: &'static str,
        message: String,
    },

    /// Other LLM error
    #[error("{0}")]
    Other(String),
}

/// Errors raised while executing a workflow unit against one problem input.
///
/// These are treated as transient by the evaluation layer: the benchmark
/// retries the invocation and downgrades exhaustion to a zero-score result.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WorkflowError {
    /// A model call inside the workflow failed
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// The workflow ran to completion without producing an output
    #[error("Workflow produced no output")]
    NoOutput,

    /// Other execution failure
    #[error("{0}")]
    Other(String),
}

/// Configuration errors, fatal at startup before any pipeline work begins.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A model identifier has no entry in the model registry
    #[error(
        "Model '{0}' was not found in the model registry. \
         Register it or specify a valid model identifier."
    )]
    UnknownModel(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::timeout(LlmError::Timeout(5000), &["5000", "timed out"])]
    #[case::api(
        LlmError::Api { status: 429, message: "rate limited".into() },
        &["429", "rate limited"]
    )]
    #[case::no_content(LlmError::NoContent, &["No content"])]
    #[case::structured(
        LlmError::Structured { schema: "detailed_plan", message: "missing field".into() },
        &["detailed_plan", "missing field"]
    )]
    fn test_llm_error_display(#[case] error: LlmError, #[case] expected: &[&str]) {
        let display = error.to_string();
        for s in expected {
            assert!(display.contains(s), "Expected '{}' in '{}'", s, display);
        }
    }

    #[test]
    fn test_workflow_error_from_llm() {
        let err: WorkflowError = LlmError::NoContent.into();
        assert!(matches!(err, WorkflowError::Llm(_)));
        assert!(err.to_string().contains("No content"));
    }

    #[test]
    fn test_unknown_model_names_the_model() {
        let err = ConfigError::UnknownModel("mystery-model".to_string());
        assert!(err.to_string().contains("mystery-model"));
    }
}
