//! Golden tests for the COMPASS calculator.
//!
//! Each case pins the per-variable points, the total and the risk label.

use clinical_calc_core::models::{GcsCategory, RiskLabel, ScoreInputs, Threshold};
use clinical_calc_core::compute_score;
use proptest::prelude::*;

/// Test case from golden table.
struct GoldenCase {
    id: &'static str,
    age: u32,
    gcs: GcsCategory,
    ck: u32,
    dwi_lesion: bool,
    threshold: u8,
    expected_points: [u8; 4],
    expected_total: u8,
    expected_risk: RiskLabel,
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "all-minimum",
            age: 30,
            gcs: GcsCategory::AtLeast13,
            ck: 50,
            dwi_lesion: false,
            threshold: 4,
            expected_points: [0, 0, 0, 0],
            expected_total: 0,
            expected_risk: RiskLabel::Low,
        },
        GoldenCase {
            id: "form-defaults",
            age: 30,
            gcs: GcsCategory::AtLeast13,
            ck: 100,
            dwi_lesion: false,
            threshold: 4,
            expected_points: [0, 0, 1, 0],
            expected_total: 1,
            expected_risk: RiskLabel::Low,
        },
        GoldenCase {
            id: "all-maximum",
            age: 60,
            gcs: GcsCategory::AtMost5,
            ck: 1500,
            dwi_lesion: true,
            threshold: 4,
            expected_points: [2, 2, 2, 2],
            expected_total: 8,
            expected_risk: RiskLabel::High,
        },
        GoldenCase {
            id: "lower-band-edges",
            age: 45,
            gcs: GcsCategory::From6To12,
            ck: 70,
            dwi_lesion: false,
            threshold: 4,
            expected_points: [1, 1, 1, 0],
            expected_total: 3,
            expected_risk: RiskLabel::Low,
        },
        GoldenCase {
            id: "upper-band-edges",
            age: 54,
            gcs: GcsCategory::From6To12,
            ck: 1243,
            dwi_lesion: false,
            threshold: 3,
            expected_points: [1, 1, 1, 0],
            expected_total: 3,
            expected_risk: RiskLabel::High,
        },
        GoldenCase {
            id: "top-band-edges",
            age: 55,
            gcs: GcsCategory::AtLeast13,
            ck: 1244,
            dwi_lesion: false,
            threshold: 4,
            expected_points: [2, 0, 2, 0],
            expected_total: 4,
            expected_risk: RiskLabel::High,
        },
        GoldenCase {
            id: "lesion-only",
            age: 18,
            gcs: GcsCategory::AtLeast13,
            ck: 0,
            dwi_lesion: true,
            threshold: 4,
            expected_points: [0, 0, 0, 2],
            expected_total: 2,
            expected_risk: RiskLabel::Low,
        },
        GoldenCase {
            id: "strict-threshold",
            age: 70,
            gcs: GcsCategory::AtMost5,
            ck: 2000,
            dwi_lesion: false,
            threshold: 8,
            expected_points: [2, 2, 2, 0],
            expected_total: 6,
            expected_risk: RiskLabel::Low,
        },
        GoldenCase {
            id: "input-ceilings",
            age: 120,
            gcs: GcsCategory::AtLeast13,
            ck: 10_000,
            dwi_lesion: false,
            threshold: 4,
            expected_points: [2, 0, 2, 0],
            expected_total: 4,
            expected_risk: RiskLabel::High,
        },
    ]
}

#[test]
fn test_golden_cases() {
    for case in get_golden_cases() {
        let inputs = ScoreInputs::new(case.age, case.gcs, case.ck, case.dwi_lesion)
            .unwrap_or_else(|e| panic!("Case {}: invalid inputs: {}", case.id, e));
        let threshold = Threshold::new(case.threshold).unwrap();

        let result = compute_score(&inputs, threshold);
        let b = result.breakdown;

        assert_eq!(
            [b.age, b.gcs, b.ck, b.dwi],
            case.expected_points,
            "Case {}: points mismatch",
            case.id
        );
        assert_eq!(
            result.total_score, case.expected_total,
            "Case {}: total mismatch",
            case.id
        );
        assert_eq!(
            result.risk, case.expected_risk,
            "Case {}: risk mismatch",
            case.id
        );
    }
}

#[test]
fn test_result_serializes_for_display() {
    let inputs = ScoreInputs::new(60, GcsCategory::AtMost5, 1500, true).unwrap();
    let result = compute_score(&inputs, Threshold::default());
    let json = serde_json::to_value(result).unwrap();

    assert_eq!(json["total_score"], 8);
    assert_eq!(json["threshold"], 4);
    assert_eq!(json["risk"], "high");
    assert_eq!(json["breakdown"]["dwi"], 2);
}

fn gcs_strategy() -> impl Strategy<Value = GcsCategory> {
    prop_oneof![
        Just(GcsCategory::AtLeast13),
        Just(GcsCategory::From6To12),
        Just(GcsCategory::AtMost5),
    ]
}

fn inputs_strategy() -> impl Strategy<Value = ScoreInputs> {
    (0u32..=120, gcs_strategy(), 0u32..=10_000, any::<bool>())
        .prop_map(|(age, gcs, ck, dwi)| ScoreInputs::new(age, gcs, ck, dwi).unwrap())
}

proptest! {
    #[test]
    fn total_stays_in_range(inputs in inputs_strategy(), threshold in 0u8..=8) {
        let result = compute_score(&inputs, Threshold::new(threshold).unwrap());
        prop_assert!(result.total_score <= 8);
        prop_assert_eq!(result.total_score, result.breakdown.total());
    }

    #[test]
    fn scoring_is_pure(inputs in inputs_strategy(), threshold in 0u8..=8) {
        let threshold = Threshold::new(threshold).unwrap();
        prop_assert_eq!(compute_score(&inputs, threshold), compute_score(&inputs, threshold));
    }

    #[test]
    fn high_iff_total_reaches_threshold(inputs in inputs_strategy(), threshold in 0u8..=8) {
        let result = compute_score(&inputs, Threshold::new(threshold).unwrap());
        prop_assert_eq!(result.risk == RiskLabel::High, result.total_score >= threshold);
    }

    #[test]
    fn low_severity_scores_zero(age in 0u32..45, ck in 0u32..70) {
        let inputs = ScoreInputs::new(age, GcsCategory::AtLeast13, ck, false).unwrap();
        prop_assert_eq!(compute_score(&inputs, Threshold::default()).total_score, 0);
    }

    #[test]
    fn max_severity_scores_eight(age in 55u32..=120, ck in 1244u32..=10_000) {
        let inputs = ScoreInputs::new(age, GcsCategory::AtMost5, ck, true).unwrap();
        prop_assert_eq!(compute_score(&inputs, Threshold::default()).total_score, 8);
    }

    #[test]
    fn older_never_scores_lower(
        a in 0u32..=120,
        b in 0u32..=120,
        gcs in gcs_strategy(),
        ck in 0u32..=10_000,
    ) {
        let (young, old) = if a <= b { (a, b) } else { (b, a) };
        let score = |age| {
            let inputs = ScoreInputs::new(age, gcs, ck, false).unwrap();
            compute_score(&inputs, Threshold::default()).total_score
        };
        prop_assert!(score(young) <= score(old));
    }
}
