//! COMPASS score input and result models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum accepted age in years.
pub const MAX_AGE: u32 = 120;
/// Maximum accepted creatine kinase level (U/L).
pub const MAX_CK: u32 = 10_000;
/// Highest possible COMPASS total.
pub const MAX_SCORE: u8 = 8;
/// Default high-risk cut-off.
pub const DEFAULT_THRESHOLD: u8 = 4;

/// Score input errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    #[error("{field} out of range: {value} (expected 0..={max})")]
    OutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },

    #[error("Invalid threshold: {0} (expected 0..=8)")]
    InvalidThreshold(u32),

    #[error("Unknown GCS category: {0}")]
    UnknownGcsCategory(String),
}

pub type InputResult<T> = Result<T, ScoreError>;

/// Initial Glasgow Coma Scale band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GcsCategory {
    /// GCS ≥ 13
    AtLeast13,
    /// GCS 6–12
    From6To12,
    /// GCS ≤ 5
    AtMost5,
}

impl GcsCategory {
    /// Band a raw GCS value. Values outside 3..=15 still land in the
    /// nearest band; validating the raw scale is the caller's job.
    pub fn from_gcs(value: u8) -> Self {
        match value {
            13..=u8::MAX => GcsCategory::AtLeast13,
            6..=12 => GcsCategory::From6To12,
            _ => GcsCategory::AtMost5,
        }
    }

    /// Display label as shown on the input form.
    pub fn label(&self) -> &'static str {
        match self {
            GcsCategory::AtLeast13 => ">= 13",
            GcsCategory::From6To12 => "6 – 12",
            GcsCategory::AtMost5 => "<= 5",
        }
    }
}

impl fmt::Display for GcsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GcsCategory {
    type Err = ScoreError;

    /// Accepts the form labels (">= 13", "6 – 12", "<= 5"), their unicode
    /// and ASCII spellings, and the short forms "ge13" / "le5".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == '–' || c == '—' { '-' } else { c })
            .collect::<String>()
            .to_lowercase();

        match compact.as_str() {
            ">=13" | "≥13" | "ge13" | "at_least13" => Ok(GcsCategory::AtLeast13),
            "6-12" | "from6_to12" => Ok(GcsCategory::From6To12),
            "<=5" | "≤5" | "le5" | "at_most5" => Ok(GcsCategory::AtMost5),
            _ => Err(ScoreError::UnknownGcsCategory(s.to_string())),
        }
    }
}

/// The four patient variables scored by COMPASS.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ScoreInputs {
    /// Age in years
    pub age: u32,
    /// Initial GCS band
    pub gcs: GcsCategory,
    /// Creatine kinase (U/L)
    pub ck: u32,
    /// Lesion present on diffusion-weighted imaging
    pub dwi_lesion: bool,
}

impl ScoreInputs {
    /// Build inputs, rejecting values the input form would not allow.
    pub fn new(age: u32, gcs: GcsCategory, ck: u32, dwi_lesion: bool) -> InputResult<Self> {
        if age > MAX_AGE {
            return Err(ScoreError::OutOfRange {
                field: "age",
                value: age,
                max: MAX_AGE,
            });
        }
        if ck > MAX_CK {
            return Err(ScoreError::OutOfRange {
                field: "ck",
                value: ck,
                max: MAX_CK,
            });
        }
        Ok(Self {
            age,
            gcs,
            ck,
            dwi_lesion,
        })
    }
}

/// High-risk cut-off on the total score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct Threshold(u8);

impl Threshold {
    pub fn new(value: u8) -> InputResult<Self> {
        if value > MAX_SCORE {
            return Err(ScoreError::InvalidThreshold(value as u32));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl TryFrom<u8> for Threshold {
    type Error = ScoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Threshold::new(value)
    }
}

impl From<Threshold> for u8 {
    fn from(t: Threshold) -> Self {
        t.0
    }
}

/// Risk classification against the threshold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskLabel {
    High,
    Low,
}

impl RiskLabel {
    pub fn is_high(&self) -> bool {
        matches!(self, RiskLabel::High)
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLabel::High => f.write_str("high"),
            RiskLabel::Low => f.write_str("low"),
        }
    }
}

/// Points contributed by each variable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PointBreakdown {
    pub age: u8,
    pub gcs: u8,
    pub ck: u8,
    pub dwi: u8,
}

impl PointBreakdown {
    /// Sum of all four lookups (0 - 8).
    pub fn total(&self) -> u8 {
        self.age + self.gcs + self.ck + self.dwi
    }
}

/// Outcome of one COMPASS evaluation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ScoreResult {
    /// Total score (0 - 8)
    pub total_score: u8,
    /// Per-variable points
    pub breakdown: PointBreakdown,
    /// Cut-off the label was derived from
    pub threshold: Threshold,
    /// High iff total_score >= threshold
    pub risk: RiskLabel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gcs_from_value() {
        assert_eq!(GcsCategory::from_gcs(15), GcsCategory::AtLeast13);
        assert_eq!(GcsCategory::from_gcs(13), GcsCategory::AtLeast13);
        assert_eq!(GcsCategory::from_gcs(12), GcsCategory::From6To12);
        assert_eq!(GcsCategory::from_gcs(6), GcsCategory::From6To12);
        assert_eq!(GcsCategory::from_gcs(5), GcsCategory::AtMost5);
        assert_eq!(GcsCategory::from_gcs(3), GcsCategory::AtMost5);
    }

    #[test]
    fn test_gcs_parse_labels() {
        assert_eq!(">= 13".parse::<GcsCategory>().unwrap(), GcsCategory::AtLeast13);
        assert_eq!("≥13".parse::<GcsCategory>().unwrap(), GcsCategory::AtLeast13);
        assert_eq!("6 – 12".parse::<GcsCategory>().unwrap(), GcsCategory::From6To12);
        assert_eq!("6-12".parse::<GcsCategory>().unwrap(), GcsCategory::From6To12);
        assert_eq!("<= 5".parse::<GcsCategory>().unwrap(), GcsCategory::AtMost5);
        assert_eq!("LE5".parse::<GcsCategory>().unwrap(), GcsCategory::AtMost5);
        assert!(matches!(
            "moderate".parse::<GcsCategory>(),
            Err(ScoreError::UnknownGcsCategory(_))
        ));
    }

    #[test]
    fn test_gcs_label_roundtrips_through_parse() {
        for gcs in [GcsCategory::AtLeast13, GcsCategory::From6To12, GcsCategory::AtMost5] {
            assert_eq!(gcs.label().parse::<GcsCategory>().unwrap(), gcs);
        }
    }

    #[test]
    fn test_inputs_reject_out_of_range() {
        assert!(ScoreInputs::new(120, GcsCategory::AtLeast13, 10_000, false).is_ok());
        assert_eq!(
            ScoreInputs::new(121, GcsCategory::AtLeast13, 0, false),
            Err(ScoreError::OutOfRange {
                field: "age",
                value: 121,
                max: MAX_AGE
            })
        );
        assert!(matches!(
            ScoreInputs::new(40, GcsCategory::AtLeast13, 10_001, false),
            Err(ScoreError::OutOfRange { field: "ck", .. })
        ));
    }

    #[test]
    fn test_threshold_bounds() {
        assert_eq!(Threshold::default().value(), 4);
        assert_eq!(Threshold::new(0).unwrap().value(), 0);
        assert_eq!(Threshold::new(8).unwrap().value(), 8);
        assert_eq!(Threshold::new(9), Err(ScoreError::InvalidThreshold(9)));
    }

    #[test]
    fn test_threshold_serde_rejects_invalid() {
        assert!(serde_json::from_str::<Threshold>("5").is_ok());
        assert!(serde_json::from_str::<Threshold>("12").is_err());
    }

    #[test]
    fn test_breakdown_total() {
        let breakdown = PointBreakdown {
            age: 2,
            gcs: 1,
            ck: 0,
            dwi: 2,
        };
        assert_eq!(breakdown.total(), 5);
    }
}
