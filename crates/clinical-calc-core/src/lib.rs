//! Clinical Calc Core Library
//!
//! COMPASS score for prognosis after carbon-monoxide poisoning. The score
//! runs 0–8; higher totals mean a greater risk of poor neurocognitive
//! outcome at one month.
//!
//! # Pipeline
//!
//! ```text
//! age ──────┐
//! GCS band ─┤   four independent        ┌──────────┐
//! CK ───────┼──▶ range lookups ──▶ sum ─▶│ ≥ cutoff │──▶ high / low
//! DWI ──────┘   (0/1/2 points)          └──────────┘
//! ```
//!
//! # Modules
//!
//! - [`models`]: Input, threshold and result types
//! - [`compass`]: Point lookups and the score calculation

pub mod compass;
pub mod models;

// Re-export commonly used types
pub use compass::{compute_score, criteria_text};
pub use models::{
    GcsCategory, PointBreakdown, RiskLabel, ScoreError, ScoreInputs, ScoreResult, Threshold,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ClinicalCalcError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<ScoreError> for ClinicalCalcError {
    fn from(e: ScoreError) -> Self {
        ClinicalCalcError::InvalidInput(e.to_string())
    }
}

// =========================================================================
// Exported Functions
// =========================================================================

/// Compute the COMPASS score from form values.
///
/// `gcs` takes the form labels (">= 13", "6 – 12", "<= 5") or the short
/// forms "ge13" / "6-12" / "le5".
#[uniffi::export]
pub fn compute_compass_score(
    age: u32,
    gcs: String,
    ck: u32,
    dwi_lesion: bool,
    threshold: u8,
) -> Result<FfiScoreResult, ClinicalCalcError> {
    let gcs: GcsCategory = gcs.parse()?;
    let inputs = ScoreInputs::new(age, gcs, ck, dwi_lesion)?;
    let threshold = Threshold::new(threshold)?;
    Ok(compute_score(&inputs, threshold).into())
}

/// Form label of the GCS band a raw GCS value falls in.
#[uniffi::export]
pub fn gcs_category_for_value(value: u8) -> String {
    GcsCategory::from_gcs(value).label().to_string()
}

/// Scoring criteria text.
#[uniffi::export]
pub fn compass_criteria() -> String {
    criteria_text().to_string()
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe score result.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiScoreResult {
    pub total_score: u8,
    pub age_points: u8,
    pub gcs_points: u8,
    pub ck_points: u8,
    pub dwi_points: u8,
    pub threshold: u8,
    pub high_risk: bool,
    pub risk_label: String,
}

impl From<ScoreResult> for FfiScoreResult {
    fn from(result: ScoreResult) -> Self {
        Self {
            total_score: result.total_score,
            age_points: result.breakdown.age,
            gcs_points: result.breakdown.gcs,
            ck_points: result.breakdown.ck,
            dwi_points: result.breakdown.dwi,
            threshold: result.threshold.value(),
            high_risk: result.risk.is_high(),
            risk_label: result.risk.to_string(),
        }
    }
}
