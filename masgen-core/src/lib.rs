//! # masgen-core
//!
//! Shared foundation for automated discovery of multi-agent reasoning
//! workflows: the language-model collaborator boundary, the operator
//! catalog, scenario and plan data types, structured-output schemas, and
//! the workflow capability trait.
//!
//! ## Architecture
//!
//! ```text
//! masgen-core (operators, scenarios, LLM boundary)   ← this crate
//!     ↓
//! masgen-bench (datasets, scorers, retry)
//!     ↓
//! masgen-runner (workflow loading and evaluation)
//!     ↓
//! masgen-pipeline (staged artifact generation)
//! ```

pub mod config;
pub mod error;
pub mod llm;
pub mod mock_llm;
pub mod operator;
pub mod scenario;
pub mod schema;
pub mod utils;
pub mod workflow;

// Re-export public API
pub use config::{LlmConfig, ModelRegistry};
pub use error::{ConfigError, LlmError, WorkflowError};
pub use llm::{invoke_structured, HttpLlm, LanguageModel, LlmRequest, LlmResponse};
pub use mock_llm::ScriptedLlm;
pub use operator::{Operator, UnknownOperator};
pub use scenario::{Plan, PlanAlignmentError, ScenarioParseError, ScenarioSpec, Subtask};
pub use schema::{
    AnswerGenerateResponse, CodeGenerateResponse, DebaterResponse, FormatResponse,
    GenerateResponse, JudgeResponse, MasCodeResponse, ReflectionTestResponse, ReviewResponse,
    ReviseResponse, ScEnsembleResponse, ScenarioBatchResponse, StructuredOutput,
};
pub use utils::{strip_code_fences, truncate};
pub use workflow::{Workflow, WorkflowOutput};
