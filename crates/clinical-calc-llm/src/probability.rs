//! Grouped probability and confidence from first-token candidates.
//!
//! Candidates that read as an integer are split into the non-depressed band
//! (PHQ-9 0-4) and the depressed band (5-27). The two band masses are
//! renormalized to 100 and the distance of the depressed share from 50%
//! becomes the confidence. Non-numeric candidates carry no mass.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::client::TokenLogProb;

/// PHQ-9 scores counted as no depression.
pub const LOW_GROUP: RangeInclusive<i64> = 0..=4;
/// PHQ-9 scores counted as depression.
pub const HIGH_GROUP: RangeInclusive<i64> = 5..=27;

/// A candidate token with its probability in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenProbability {
    pub token: String,
    pub probability_percent: f64,
}

/// Derived view over the first-position candidates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProbabilityAggregate {
    /// Candidates in provider order
    pub token_probabilities: Vec<TokenProbability>,
    /// Share of the 0-4 band, percent
    pub group_low_percent: f64,
    /// Share of the 5-27 band, percent
    pub group_high_percent: f64,
    /// |high - 50| / 50, in [0, 1]
    pub confidence: f64,
    pub depression_predicted: bool,
}

/// Integer value of a candidate token, ignoring surrounding whitespace.
fn token_value(token: &str) -> Option<i64> {
    token.trim().parse().ok()
}

/// Build the aggregate from a top-log-probability list.
pub fn aggregate(top_log_probs: &[TokenLogProb]) -> ProbabilityAggregate {
    let token_probabilities: Vec<TokenProbability> = top_log_probs
        .iter()
        .map(|t| {
            let p = t.log_probability.exp() * 100.0;
            TokenProbability {
                token: t.token.clone(),
                probability_percent: if p.is_finite() { p } else { 0.0 },
            }
        })
        .collect();

    let mut low = 0.0;
    let mut high = 0.0;
    for tp in &token_probabilities {
        match token_value(&tp.token) {
            Some(v) if LOW_GROUP.contains(&v) => low += tp.probability_percent,
            Some(v) if HIGH_GROUP.contains(&v) => high += tp.probability_percent,
            _ => {}
        }
    }

    let total = low + high;
    if total <= 0.0 {
        return ProbabilityAggregate {
            token_probabilities,
            ..Default::default()
        };
    }

    let group_low_percent = low / total * 100.0;
    let group_high_percent = high / total * 100.0;

    ProbabilityAggregate {
        token_probabilities,
        group_low_percent,
        group_high_percent,
        confidence: (group_high_percent - 50.0).abs() / 50.0,
        depression_predicted: group_high_percent >= 50.0,
    }
}
