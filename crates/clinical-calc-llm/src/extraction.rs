//! PHQ-9 prediction extraction from model output.
//!
//! The model answers in loose free text:
//!
//! ```text
//! 7
//! Explanation: ...
//! Significant words/phrases: a, b, c
//! ```
//!
//! Extraction is a tolerant prefix scan. Anything that does not match
//! degrades to `None` / empty string and is recorded as a [`ParseWarning`].

use serde::{Deserialize, Serialize};

pub const EXPLANATION_MARKER: &str = "Explanation:";
pub const SIGNIFICANT_MARKER: &str = "Significant words/phrases:";

/// Non-fatal mismatch between the model output and the expected layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ParseWarning {
    /// No non-empty line in the output
    EmptyContent,
    /// First line is not an integer
    UnparsableScore { line: String },
    MissingExplanation,
    MissingSignificantPhrases,
}

/// Fields extracted from the model's reply.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedPrediction {
    /// PHQ-9 score from the first line
    pub score: Option<i64>,
    pub explanation: String,
    pub significant_phrases: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ParseWarning>,
}

/// Parse raw model content into a [`ParsedPrediction`]. Never fails.
pub fn parse_prediction(content: &str) -> ParsedPrediction {
    let mut prediction = ParsedPrediction::default();

    match content.lines().map(str::trim).find(|l| !l.is_empty()) {
        Some(first) => match first.parse::<i64>() {
            Ok(score) => prediction.score = Some(score),
            Err(_) => prediction.warnings.push(ParseWarning::UnparsableScore {
                line: first.to_string(),
            }),
        },
        None => prediction.warnings.push(ParseWarning::EmptyContent),
    }

    let mut explanation = None;
    let mut significant = None;

    // A later labelled line overrides an earlier one.
    for line in content.lines() {
        if let Some(value) = value_after_marker(line, EXPLANATION_MARKER) {
            explanation = Some(value);
        }
        if let Some(value) = value_after_marker(line, SIGNIFICANT_MARKER) {
            significant = Some(value);
        }
    }

    match explanation {
        Some(text) => prediction.explanation = text,
        None => prediction.warnings.push(ParseWarning::MissingExplanation),
    }
    match significant {
        Some(text) => prediction.significant_phrases = text,
        None => prediction.warnings.push(ParseWarning::MissingSignificantPhrases),
    }

    prediction
}

/// Trimmed text after the first `marker` on a line that starts with it.
fn value_after_marker(line: &str, marker: &str) -> Option<String> {
    line.trim_start()
        .strip_prefix(marker)
        .map(|rest| rest.trim().to_string())
}
