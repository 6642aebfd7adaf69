// Risk fusion engine — combines per-modality signals into a Verdict.
//
// Each modality has its own deterministic formula (fixed weights, fixed
// thresholds, no hidden state). Fusion never consults a model directly;
// it only sees the signal structs produced by the extractors.

pub mod audio;
pub mod image;
pub mod keywords;
pub mod text;
pub mod video;

use serde::{Deserialize, Serialize};

use crate::explain::UserSummary;
use crate::signal::clamp01;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Categorical verdict. The valid set is modality-specific: text produces
/// SAFE/SCAM, audio REAL/FAKE, image REAL/UNCERTAIN/DEEPFAKE, video the
/// same plus UNKNOWN when no face was ever detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Safe,
    Scam,
    Real,
    Deepfake,
    Uncertain,
    Fake,
    Unknown,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Safe => "SAFE",
            Category::Scam => "SCAM",
            Category::Real => "REAL",
            Category::Deepfake => "DEEPFAKE",
            Category::Uncertain => "UNCERTAIN",
            Category::Fake => "FAKE",
            Category::Unknown => "UNKNOWN",
        }
    }

    /// Whether this is the risky class for its modality.
    pub fn is_flagged(&self) -> bool {
        matches!(
            self,
            Category::Scam | Category::Deepfake | Category::Uncertain | Category::Fake
        )
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Static descriptive metadata about the scoring stack. Not behaviorally
/// load-bearing; carried for output compatibility.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDetails {
    pub architecture: String,
    pub features_analysed: Vec<String>,
}

/// The fusion output for one scan request. Constructed once, immutable
/// thereafter; the evidence hash and anchor record are appended to the
/// response bundle, never written back into the verdict.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub category: Category,
    /// Final score if the category is the risky class, else 1 - score.
    /// Rounded to four decimal places.
    pub confidence: f64,
    /// round(final_score * 100), in [0, 100].
    pub risk_score: u8,
    /// Deduplicated trigger lines, detection-priority ordered.
    pub explanation: Vec<String>,
    pub model_details: ModelDetails,
    pub user_summary: UserSummary,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Map a final score in [0, 1] to the integer risk scale.
pub(crate) fn risk_score(final_score: f64) -> u8 {
    (clamp01(final_score) * 100.0).round() as u8
}

/// Round to four decimal places, the precision confidence is reported at.
pub(crate) fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&Category::Deepfake).unwrap(),
            "\"DEEPFAKE\""
        );
        assert_eq!(serde_json::to_string(&Category::Safe).unwrap(), "\"SAFE\"");
    }

    #[test]
    fn flagged_classes() {
        assert!(Category::Scam.is_flagged());
        assert!(Category::Deepfake.is_flagged());
        assert!(Category::Uncertain.is_flagged());
        assert!(Category::Fake.is_flagged());
        assert!(!Category::Safe.is_flagged());
        assert!(!Category::Real.is_flagged());
        assert!(!Category::Unknown.is_flagged());
    }

    #[test]
    fn risk_score_rounds_and_clamps() {
        assert_eq!(risk_score(0.0), 0);
        assert_eq!(risk_score(0.764), 76);
        assert_eq!(risk_score(0.765), 77);
        assert_eq!(risk_score(1.0), 100);
        assert_eq!(risk_score(2.0), 100);
        assert_eq!(risk_score(f64::NAN), 0);
    }

    #[test]
    fn round4_truncates_noise() {
        assert_eq!(round4(0.123_456), 0.1235);
        assert_eq!(round4(1.0), 1.0);
    }
}
