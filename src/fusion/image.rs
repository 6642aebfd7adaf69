// Image fusion — weighted visual sub-scores with a scam-text override.
//
// When a face is present the face-region artifact score dominates;
// otherwise error-level analysis carries most of the weight. Text found
// inside the image runs through the full text fusion; a SCAM result
// floors the final score regardless of how clean the pixels look.

use crate::explain;
use crate::signal::{clamp01, ImageSignals};

use super::text::TextFusion;
use super::{risk_score, round4, Category, ModelDetails, Verdict};

// Weights with a detected face region.
pub const FACE_WEIGHT: f64 = 0.5;
pub const ELA_WEIGHT_FACE: f64 = 0.3;
pub const GLOBAL_WEIGHT_FACE: f64 = 0.2;

// Weights without a face: compression artifacts dominate.
pub const GLOBAL_WEIGHT_NO_FACE: f64 = 0.4;
pub const ELA_WEIGHT_NO_FACE: f64 = 0.6;

/// Scam text forces the final score at least this high.
pub const SCAM_RISK_FLOOR: f64 = 0.85;

/// Three-tier classification bands.
pub const DEEPFAKE_THRESHOLD: f64 = 0.75;
pub const UNCERTAIN_THRESHOLD: f64 = 0.40;

/// Intermediate image fusion state.
#[derive(Debug, Clone)]
pub struct ImageFusion {
    pub face_score: Option<f64>,
    pub global_score: f64,
    pub ela_score: f64,
    pub base_visual: f64,
    /// Final score of the embedded-text fusion when it classified SCAM.
    pub text_risk: f64,
    pub is_scam_content: bool,
    /// The embedded-text fusion, kept for trigger chaining.
    pub text: Option<TextFusion>,
    pub final_score: f64,
    pub category: Category,
    pub confidence: f64,
}

/// Combine visual sub-scores (and an optional embedded-text fusion) into
/// a final score and three-tier category.
pub fn fuse(signals: &ImageSignals, embedded_text: Option<&TextFusion>) -> ImageFusion {
    let face_score = signals.face_artifact.map(clamp01);
    let global_score = clamp01(signals.global_artifact);
    let ela_score = clamp01(signals.ela_score);

    let base_visual = match face_score {
        Some(face) => {
            FACE_WEIGHT * face + ELA_WEIGHT_FACE * ela_score + GLOBAL_WEIGHT_FACE * global_score
        }
        None => GLOBAL_WEIGHT_NO_FACE * global_score + ELA_WEIGHT_NO_FACE * ela_score,
    };

    let (is_scam_content, text_risk) = match embedded_text {
        Some(tf) if tf.category == Category::Scam => (true, tf.final_score),
        _ => (false, 0.0),
    };

    let final_score = if is_scam_content {
        base_visual.max(text_risk).max(SCAM_RISK_FLOOR)
    } else {
        base_visual
    };

    let (category, confidence) = if is_scam_content || final_score >= DEEPFAKE_THRESHOLD {
        (Category::Deepfake, final_score)
    } else if final_score >= UNCERTAIN_THRESHOLD {
        (Category::Uncertain, final_score)
    } else {
        (Category::Real, 1.0 - final_score)
    };

    ImageFusion {
        face_score,
        global_score,
        ela_score,
        base_visual,
        text_risk,
        is_scam_content,
        text: embedded_text.cloned(),
        final_score,
        category,
        confidence,
    }
}

/// Assemble the full verdict for an image scan.
pub fn verdict(fusion: &ImageFusion) -> Verdict {
    let triggers = explain::image_triggers(fusion);
    let risk = risk_score(fusion.final_score);

    let features_analysed = if triggers.is_empty() {
        vec!["No specific anomalies".to_string()]
    } else {
        triggers.iter().map(|t| t.label().to_string()).collect()
    };

    Verdict {
        category: fusion.category,
        confidence: round4(fusion.confidence),
        risk_score: risk,
        explanation: explain::image_explanation(fusion),
        model_details: ModelDetails {
            architecture: "EfficientNet-B5 + MTCNN + EasyOCR".to_string(),
            features_analysed,
        },
        user_summary: explain::summary(fusion.category, risk, &triggers),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion::keywords::KeywordBoost;
    use crate::fusion::text;
    use crate::signal::TextSignals;

    fn no_text() -> ImageSignals {
        ImageSignals {
            face_artifact: None,
            global_artifact: 0.0,
            ela_score: 0.0,
            embedded_text: None,
        }
    }

    fn scam_text_fusion(score: f64) -> TextFusion {
        text::fuse(
            &TextSignals::new(score, 0.0),
            &KeywordBoost::default(),
        )
    }

    #[test]
    fn face_weighting_applies() {
        let f = fuse(
            &ImageSignals {
                face_artifact: Some(0.8),
                global_artifact: 0.5,
                ela_score: 0.2,
                embedded_text: None,
            },
            None,
        );
        // 0.5*0.8 + 0.3*0.2 + 0.2*0.5 = 0.56
        assert!((f.base_visual - 0.56).abs() < 1e-12);
        assert_eq!(f.category, Category::Uncertain);
        assert!((f.confidence - 0.56).abs() < 1e-12);
    }

    #[test]
    fn no_face_weighting_leans_on_ela() {
        let f = fuse(
            &ImageSignals {
                face_artifact: None,
                global_artifact: 0.5,
                ela_score: 0.9,
                embedded_text: None,
            },
            None,
        );
        // 0.4*0.5 + 0.6*0.9 = 0.74 → UNCERTAIN (just below 0.75)
        assert!((f.base_visual - 0.74).abs() < 1e-12);
        assert_eq!(f.category, Category::Uncertain);
    }

    #[test]
    fn scam_text_floors_final_score() {
        let tf = scam_text_fusion(0.51);
        assert_eq!(tf.category, Category::Scam);

        // base_visual = 0.1 via ELA-only weighting, text risk 0.51: the
        // floor dominates both.
        let f = fuse(
            &ImageSignals {
                face_artifact: None,
                global_artifact: 0.25,
                ela_score: 0.0,
                embedded_text: Some("free money".to_string()),
            },
            Some(&tf),
        );
        assert!((f.base_visual - 0.1).abs() < 1e-12);
        assert_eq!(f.final_score, SCAM_RISK_FLOOR);
        assert_eq!(f.category, Category::Deepfake);
        assert_eq!(f.confidence, SCAM_RISK_FLOOR);
    }

    #[test]
    fn scam_text_keeps_higher_visual_score() {
        let tf = scam_text_fusion(0.6);
        let f = fuse(
            &ImageSignals {
                face_artifact: Some(1.0),
                global_artifact: 1.0,
                ela_score: 1.0,
                embedded_text: Some("gift card".to_string()),
            },
            Some(&tf),
        );
        // Visual 1.0 beats both the text risk and the floor.
        assert_eq!(f.final_score, 1.0);
        assert_eq!(f.category, Category::Deepfake);
    }

    #[test]
    fn safe_embedded_text_changes_nothing() {
        let tf = scam_text_fusion(0.1);
        assert_eq!(tf.category, Category::Safe);
        let f = fuse(&no_text(), Some(&tf));
        assert!(!f.is_scam_content);
        assert_eq!(f.final_score, 0.0);
        assert_eq!(f.category, Category::Real);
    }

    #[test]
    fn three_tier_bands() {
        let mk = |ela: f64| {
            fuse(
                &ImageSignals {
                    face_artifact: None,
                    global_artifact: 0.0,
                    ela_score: ela,
                    embedded_text: None,
                },
                None,
            )
        };
        // 0.6 * ela
        assert_eq!(mk(0.5).category, Category::Real); // 0.30
        assert_eq!(mk(0.70).category, Category::Uncertain); // 0.42
        assert_eq!(mk(1.0).category, Category::Uncertain); // 0.60
        let high = fuse(
            &ImageSignals {
                face_artifact: Some(1.0),
                global_artifact: 1.0,
                ela_score: 1.0,
                embedded_text: None,
            },
            None,
        );
        assert_eq!(high.category, Category::Deepfake); // 1.0
    }

    #[test]
    fn real_branch_inverts_confidence() {
        let f = fuse(
            &ImageSignals {
                face_artifact: None,
                global_artifact: 0.25,
                ela_score: 0.1,
                embedded_text: None,
            },
            None,
        );
        // 0.4*0.25 + 0.6*0.1 = 0.16 → REAL with confidence 0.84
        assert_eq!(f.category, Category::Real);
        assert!((f.confidence - 0.84).abs() < 1e-12);
    }

    #[test]
    fn pristine_image_verdict() {
        let v = verdict(&fuse(&no_text(), None));
        assert_eq!(v.category, Category::Real);
        assert_eq!(v.risk_score, 0);
        assert_eq!(v.confidence, 1.0);
        assert_eq!(
            v.model_details.features_analysed,
            vec!["No specific anomalies".to_string()]
        );
    }
}
