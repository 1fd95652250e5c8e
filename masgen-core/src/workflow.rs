//! The workflow capability interface.
//!
//! A workflow unit is the synthesized executable artifact implementing a
//! scenario and plan as a callable problem solver. Anything loaded from
//! generated source must satisfy this trait; the evaluation layer only ever
//! sees the trait.

use crate::error::WorkflowError;
use async_trait::async_trait;

/// Result of one workflow invocation: the answer text and its execution log.
pub type WorkflowOutput = (String, String);

/// A callable problem solver.
#[async_trait]
pub trait Workflow: Send + Sync {
    /// Solve one problem input, returning `(output, execution_log)`.
    async fn call(&self, input: &str) -> Result<WorkflowOutput, WorkflowError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl Workflow for Echo {
        async fn call(&self, input: &str) -> Result<WorkflowOutput, WorkflowError> {
            Ok((input.to_string(), "echo".to_string()))
        }
    }

    #[tokio::test]
    async fn test_workflow_trait_object() {
        let workflow: Box<dyn Workflow> = Box::new(Echo);
        let (output, log) = workflow.call("hello").await.unwrap();
        assert_eq!(output, "hello");
        assert_eq!(log, "echo");
    }
}
