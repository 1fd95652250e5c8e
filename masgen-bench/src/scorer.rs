//! Scoring strategies.
//!
//! A scorer converts an `(expected, produced)` answer pair into a numeric
//! score plus the normalized form of the produced answer. Scorers are pure
//! and deterministic; extraction failure degrades to a zero score, never an
//! error.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Trait for scoring strategies.
///
/// `score` returns `(numeric_score, normalized_produced)` where the second
/// element is the produced answer after normalization or extraction
/// (`None` when nothing was extractable).
pub trait Scorer: Send + Sync {
    /// The name of this scorer (used in reports).
    fn name(&self) -> &str;

    /// Score a produced answer against the expected answer.
    fn score(&self, expected: &str, produced: &str) -> (f64, Option<String>);
}

/// Token-overlap F1 scorer for text answers.
///
/// Both sides are normalized (lowercase, punctuation stripped, English
/// articles dropped, whitespace collapsed) and tokenized on whitespace; the
/// score is the harmonic mean of precision and recall over the multiset
/// token intersection, 0.0 when the intersection is empty.
///
/// Expected values may carry `|`-separated alternatives and produced values
/// `|`-separated parts; the score is the maximum pairwise F1.
///
/// # Example
///
/// ```
/// use masgen_bench::{Scorer, TokenOverlapF1};
///
/// let (score, _) = TokenOverlapF1.score("the quick fox", "quick fox");
/// assert_eq!(score, 1.0);
///
/// let (score, _) = TokenOverlapF1.score("dog", "cat");
/// assert_eq!(score, 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenOverlapF1;

impl TokenOverlapF1 {
    /// Normalize text for comparison. Idempotent.
    pub fn normalize(s: &str) -> String {
        s.to_lowercase()
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .collect::<String>()
            .split_whitespace()
            .filter(|word| !matches!(*word, "a" | "an" | "the"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// F1 between one expected alternative and one produced part.
    fn f1_pair(expected: &str, produced: &str) -> f64 {
        let expected_norm = Self::normalize(expected);
        let produced_norm = Self::normalize(produced);
        let expected_tokens: Vec<&str> = expected_norm.split_whitespace().collect();
        let produced_tokens: Vec<&str> = produced_norm.split_whitespace().collect();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for token in &expected_tokens {
            *counts.entry(token).or_insert(0) += 1;
        }
        let mut num_same = 0usize;
        for token in &produced_tokens {
            if let Some(count) = counts.get_mut(token) {
                if *count > 0 {
                    *count -= 1;
                    num_same += 1;
                }
            }
        }

        if num_same == 0 {
            return 0.0;
        }
        let precision = num_same as f64 / produced_tokens.len() as f64;
        let recall = num_same as f64 / expected_tokens.len() as f64;
        (2.0 * precision * recall) / (precision + recall)
    }
}

impl Scorer for TokenOverlapF1 {
    fn name(&self) -> &str {
        "token_overlap_f1"
    }

    fn score(&self, expected: &str, produced: &str) -> (f64, Option<String>) {
        let mut best = 0.0f64;
        for alternative in expected.split('|') {
            if alternative.trim().is_empty() {
                continue;
            }
            for part in produced.split('|') {
                best = best.max(Self::f1_pair(alternative, part));
            }
        }
        (best, Some(Self::normalize(produced)))
    }
}

/// Numeric-answer scorer with absolute tolerance.
///
/// Extracts the last numeric literal (thousands separators and decimals
/// supported) from each side; scores 1.0 when both extractions succeed and
/// differ by at most 1e-6, otherwise 0.0. An unextractable produced value
/// yields `(0.0, None)`.
///
/// # Example
///
/// ```
/// use masgen_bench::{NumericTolerance, Scorer};
///
/// assert_eq!(
///     NumericTolerance.score("100.0", "the answer is 100"),
///     (1.0, Some("100".to_string()))
/// );
/// assert_eq!(NumericTolerance.score("100.0", "no numbers here"), (0.0, None));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericTolerance;

/// Absolute tolerance for numeric comparison.
const NUMERIC_TOLERANCE: f64 = 1e-6;

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[-+]?\d+(?:,\d{3})*(?:\.\d+)?|\d+\.\d+").expect("valid number pattern")
    })
}

impl NumericTolerance {
    /// Extract the last numeric literal from text.
    pub fn extract_number(text: &str) -> Option<f64> {
        let last = number_pattern().find_iter(text).last()?;
        last.as_str().replace(',', "").parse::<f64>().ok()
    }
}

impl Scorer for NumericTolerance {
    fn name(&self) -> &str {
        "numeric_tolerance"
    }

    fn score(&self, expected: &str, produced: &str) -> (f64, Option<String>) {
        let Some(produced_value) = Self::extract_number(produced) else {
            return (0.0, None);
        };
        let normalized = Some(format_number(produced_value));
        let Some(expected_value) = Self::extract_number(expected) else {
            return (0.0, normalized);
        };
        let score = if (expected_value - produced_value).abs() <= NUMERIC_TOLERANCE {
            1.0
        } else {
            0.0
        };
        (score, normalized)
    }
}

/// Render an extracted number without a trailing `.0` for integral values.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
