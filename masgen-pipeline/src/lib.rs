//! # masgen-pipeline
//!
//! Staged, idempotent generation of per-sample artifacts: a scenario, a
//! plan bound to it, and workflow source implementing the plan. Each stage
//! is disk-memoized under `<results_path>/<dataset>/sample_<id>/`, so
//! restarted runs resume exactly where they stopped, and a fully cached
//! sample is a pure read path with zero model calls.
//!
//! ## Stage order
//!
//! 1. **Scenario**: drawn from a bounded queue of distinct candidates,
//!    pre-filled by the generation model before any are consumed
//! 2. **Plan**: a decomposition constrained to the scenario's operator
//!    order and count
//! 3. **Code**: workflow source wrapped in a fixed module template

pub mod generator;
pub mod prompts;
pub mod queue;
pub mod store;

// Re-export public API
pub use generator::{DataGenerator, GeneratedSample, PipelineConfig, PipelineError};
pub use queue::{QueueClosed, ScenarioQueue};
pub use store::{ArtifactKind, ArtifactStore, SampleKey};
