//! Text and JSON reports.

use std::fmt;

use serde::Serialize;

use clinical_calc_core::{criteria_text, RiskLabel, ScoreInputs, ScoreResult};
use clinical_calc_llm::Classification;

/// One COMPASS evaluation. Serializes as the JSON report and displays as
/// the text report.
#[derive(Debug, Serialize)]
pub struct CompassReport<'a> {
    pub inputs: &'a ScoreInputs,
    pub result: &'a ScoreResult,
}

impl fmt::Display for CompassReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (inputs, result) = (self.inputs, self.result);
        let b = &result.breakdown;
        let risk = match result.risk {
            RiskLabel::High => "High risk",
            RiskLabel::Low => "Low risk",
        };
        let dwi = if inputs.dwi_lesion { "lesion" } else { "no lesion" };

        writeln!(f, "COMPASS Total Score: {} / 8", result.total_score)?;
        writeln!(
            f,
            "Risk classification: {} (threshold {})",
            risk,
            result.threshold.value()
        )?;
        writeln!(f)?;
        writeln!(f, "Points")?;
        writeln!(f, "  Age ({} years): {}", inputs.age, b.age)?;
        writeln!(f, "  GCS ({}): {}", inputs.gcs, b.gcs)?;
        writeln!(f, "  CK ({} U/L): {}", inputs.ck, b.ck)?;
        writeln!(f, "  DWI ({}): {}", dwi, b.dwi)?;
        writeln!(f)?;
        writeln!(f, "{}", criteria_text())
    }
}

/// Text report for a PHQ-9 classification.
pub struct ClassificationReport<'a>(pub &'a Classification);

impl fmt::Display for ClassificationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.0.prediction;
        let probs = &self.0.probabilities;

        match p.score {
            Some(score) => writeln!(f, "Predicted PHQ-9 Score: {}", score)?,
            None => writeln!(f, "Predicted PHQ-9 Score: None")?,
        }
        writeln!(f, "Explanation: {}", p.explanation)?;
        writeln!(f, "Significant words/phrases: {}", p.significant_phrases)?;
        writeln!(f, "---")?;
        writeln!(f, "Top token probabilities:")?;
        writeln!(f, "  {:<16} {:>9}", "Token", "Prob (%)")?;
        for tp in &probs.token_probabilities {
            let token = format!("{:?}", tp.token);
            writeln!(f, "  {:<16} {:>9.2}", token, tp.probability_percent)?;
        }
        writeln!(
            f,
            "Grouped probability (0–4 vs 5–27): {:.2}% vs {:.2}%",
            probs.group_low_percent, probs.group_high_percent
        )?;
        writeln!(f, "Confidence: {:.2}", probs.confidence)?;
        writeln!(
            f,
            "Depression predicted? {}",
            if probs.depression_predicted { "Yes" } else { "No" }
        )
    }
}
