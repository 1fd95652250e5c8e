//! # masgen-runner
//!
//! Turns generated workflow source into an executable unit and evaluates it
//! against benchmark datasets.
//!
//! - **Loader**: parses a `workflow solve` block, validating the entry point
//!   and every step; structural defects are fatal for the sample
//! - **Executor**: maps each operator step onto one structured call to the
//!   execution model
//! - **Evaluator**: sweeps a benchmark's records in dataset order with
//!   bounded concurrency, persists the result table, and returns the mean

pub mod evaluator;
pub mod executor;
pub mod loader;

// Re-export public API
pub use evaluator::{EvalConfig, EvalError, Evaluator};
pub use executor::execute_operator;
pub use loader::{instantiate, parse_workflow, CompiledWorkflow, LoadError, WorkflowStep};
