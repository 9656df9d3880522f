//! COMPASS score calculator.
//!
//! Four independent range lookups, summed:
//! - Age: <45 → 0, 45-54 → 1, ≥55 → 2
//! - GCS: ≥13 → 0, 6-12 → 1, ≤5 → 2
//! - CK: <70 → 0, 70-1243 → 1, ≥1244 → 2
//! - DWI: no lesion → 0, lesion → 2

use tracing::debug;

use crate::models::{GcsCategory, PointBreakdown, RiskLabel, ScoreInputs, ScoreResult, Threshold};

/// Age in years at which the second age band starts.
pub const AGE_MIDDLE_BAND: u32 = 45;
/// Age in years at which the top age band starts.
pub const AGE_TOP_BAND: u32 = 55;
/// CK (U/L) at which the second CK band starts.
pub const CK_MIDDLE_BAND: u32 = 70;
/// CK (U/L) at which the top CK band starts.
pub const CK_TOP_BAND: u32 = 1244;

pub fn age_points(age: u32) -> u8 {
    if age < AGE_MIDDLE_BAND {
        0
    } else if age < AGE_TOP_BAND {
        1
    } else {
        2
    }
}

pub fn gcs_points(gcs: GcsCategory) -> u8 {
    match gcs {
        GcsCategory::AtLeast13 => 0,
        GcsCategory::From6To12 => 1,
        GcsCategory::AtMost5 => 2,
    }
}

pub fn ck_points(ck: u32) -> u8 {
    if ck < CK_MIDDLE_BAND {
        0
    } else if ck < CK_TOP_BAND {
        1
    } else {
        2
    }
}

pub fn dwi_points(dwi_lesion: bool) -> u8 {
    if dwi_lesion {
        2
    } else {
        0
    }
}

/// Score the four inputs and label the total against `threshold`.
///
/// Pure: the same inputs and threshold always produce the same result.
/// Range checks happen when [`ScoreInputs`] is built, not here.
pub fn compute_score(inputs: &ScoreInputs, threshold: Threshold) -> ScoreResult {
    let breakdown = PointBreakdown {
        age: age_points(inputs.age),
        gcs: gcs_points(inputs.gcs),
        ck: ck_points(inputs.ck),
        dwi: dwi_points(inputs.dwi_lesion),
    };
    let total_score = breakdown.total();

    let risk = if total_score >= threshold.value() {
        RiskLabel::High
    } else {
        RiskLabel::Low
    };

    debug!(
        total_score,
        threshold = threshold.value(),
        %risk,
        "Computed COMPASS score"
    );

    ScoreResult {
        total_score,
        breakdown,
        threshold,
        risk,
    }
}

/// Scoring criteria as rendered under the result.
pub fn criteria_text() -> &'static str {
    "Scoring criteria\n\
     - Age: <45 → 0, 45–54 → 1, ≥55 → 2\n\
     - GCS: ≥13 → 0, 6–12 → 1, ≤5 → 2\n\
     - CK: <70 → 0, 70–1243 → 1, ≥1244 → 2\n\
     - DWI: no lesion → 0, lesion → 2"
}
