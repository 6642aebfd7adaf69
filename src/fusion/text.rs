// Text fusion — spam ensemble score plus weighted toxicity plus the
// keyword boost, clamped to 1.

use crate::explain;
use crate::signal::{clamp01, TextSignals};

use super::keywords::KeywordBoost;
use super::{risk_score, round4, Category, ModelDetails, Verdict};

/// Weight applied to the toxicity sub-score. Toxicity alone should not
/// flag a message; it sharpens coercion/blackmail cases sitting on top of
/// a phishing-shaped base score.
pub const TOXICITY_WEIGHT: f64 = 0.25;

/// Scores strictly above this are SCAM.
pub const SCAM_THRESHOLD: f64 = 0.50;

/// Intermediate text fusion state, kept so the explanation builder works
/// from exactly the values fusion used.
#[derive(Debug, Clone)]
pub struct TextFusion {
    pub spam: f64,
    pub toxic: f64,
    pub boost: KeywordBoost,
    pub final_score: f64,
    pub category: Category,
    pub confidence: f64,
}

/// Combine text sub-scores into a final score and category.
pub fn fuse(signals: &TextSignals, boost: &KeywordBoost) -> TextFusion {
    let spam = clamp01(signals.spam_score);
    let toxic = clamp01(signals.toxic_score);

    let final_score = (spam + TOXICITY_WEIGHT * toxic + boost.boost).min(1.0);

    let category = if final_score > SCAM_THRESHOLD {
        Category::Scam
    } else {
        Category::Safe
    };
    let confidence = if category == Category::Scam {
        final_score
    } else {
        1.0 - final_score
    };

    TextFusion {
        spam,
        toxic,
        boost: boost.clone(),
        final_score,
        category,
        confidence,
    }
}

/// Assemble the full verdict for a text scan.
pub fn verdict(fusion: &TextFusion) -> Verdict {
    let triggers = explain::text_triggers(fusion);
    let risk = risk_score(fusion.final_score);

    Verdict {
        category: fusion.category,
        confidence: round4(fusion.confidence),
        risk_score: risk,
        explanation: explain::text_explanation(fusion),
        model_details: ModelDetails {
            architecture: "Ensemble (RoBERTa + ToxicBERT)".to_string(),
            features_analysed: vec![
                "semantic intent".to_string(),
                "aggression levels".to_string(),
                "urgent keyword patterns".to_string(),
            ],
        },
        user_summary: explain::summary(fusion.category, risk, &triggers),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
