//! # masgen-bench
//!
//! Benchmark evaluation for generated multi-agent workflows: dataset
//! loading, per-benchmark scoring strategies, bounded retry around workflow
//! invocation, mismatch logging, and evaluation result types.
//!
//! ## Overview
//!
//! - **Records**: newline-delimited JSON per split, loaded once and
//!   read-only thereafter
//! - **Scorers**: token-overlap F1 and numeric tolerance, pure functions
//!   from `(expected, produced)` to a calibrated score
//! - **Benchmarks**: GSM8K, HotpotQA, and DROP evaluation policies
//! - **Retry**: uniform bounded retry for transient workflow failures
//!
//! ## Example
//!
//! ```
//! use masgen_bench::{Scorer, TokenOverlapF1};
//!
//! let (score, normalized) = TokenOverlapF1.score("Paris", "the answer is Paris");
//! assert!(score > 0.0);
//! assert_eq!(normalized.as_deref(), Some("answer is paris"));
//! ```

pub mod benchmark;
pub mod mismatch;
pub mod record;
pub mod results;
pub mod retry;
pub mod scorer;

// Re-export public API
pub use benchmark::{
    create_benchmark, Benchmark, DropBenchmark, Gsm8kBenchmark, HotpotQaBenchmark,
};
pub use mismatch::{MismatchEntry, MismatchLog};
pub use record::{load_split, split_path, BenchmarkError, Record, Split};
pub use results::{EvalSummary, EvaluationResult};
pub use retry::RetryingInvoker;
pub use scorer::{NumericTolerance, Scorer, TokenOverlapF1};
