// Audio fusion — fixed-weight rules over acoustic features.
//
// Synthetic speech is flagged by banded rules rather than a learned
// model: vocoders oversmooth timbre (low delta-MFCC variance), wash out
// micro-acoustic detail (low spectral flatness) and cut off high
// frequencies (low rolloff). Each rule contributes a fixed weight.

use crate::explain;
use crate::signal::AudioSignals;

use super::{risk_score, round4, Category, ModelDetails, Verdict};

/// Delta-MFCC variance below this reads as interpolated timbre.
pub const DELTA_VARIANCE_FLOOR: f64 = 5.0;
pub const TIMBRE_WEIGHT: f64 = 0.35;

/// Spectral flatness below this lacks natural micro-acoustic detail.
pub const FLATNESS_FLOOR: f64 = 0.001;
pub const FLATNESS_WEIGHT: f64 = 0.25;

/// Rolloff mean below this suggests a vocoder frequency cutoff.
pub const ROLLOFF_FLOOR_HZ: f64 = 3_000.0;
pub const ROLLOFF_WEIGHT: f64 = 0.2;

/// Conditional contribution when the MFCC variance itself is compressed.
pub const MFCC_VARIANCE_FLOOR: f64 = 400.0;
pub const MFCC_WEIGHT: f64 = 0.2;

/// Probabilities strictly above this are FAKE.
pub const FAKE_THRESHOLD: f64 = 0.50;

/// Intermediate audio fusion state.
#[derive(Debug, Clone)]
pub struct AudioFusion {
    pub signals: AudioSignals,
    pub fake_prob: f64,
    pub category: Category,
    pub confidence: f64,
}

/// Combine the acoustic features into a fake probability and category.
pub fn fuse(signals: &AudioSignals) -> AudioFusion {
    let mut score = 0.0;

    if signals.delta_variance < DELTA_VARIANCE_FLOOR {
        score += TIMBRE_WEIGHT;
    }
    if signals.flatness_mean < FLATNESS_FLOOR {
        score += FLATNESS_WEIGHT;
    }
    if signals.rolloff_mean < ROLLOFF_FLOOR_HZ {
        score += ROLLOFF_WEIGHT;
    }
    if signals.mfcc_variance < MFCC_VARIANCE_FLOOR {
        score += MFCC_WEIGHT;
    }

    let fake_prob = score.min(1.0);

    let category = if fake_prob > FAKE_THRESHOLD {
        Category::Fake
    } else {
        Category::Real
    };
    let confidence = if category == Category::Fake {
        fake_prob
    } else {
        1.0 - fake_prob
    };

    AudioFusion {
        signals: *signals,
        fake_prob,
        category,
        confidence,
    }
}

/// Assemble the full verdict for an audio scan.
pub fn verdict(fusion: &AudioFusion) -> Verdict {
    let triggers = explain::audio_triggers(fusion);
    let risk = risk_score(fusion.fake_prob);

    Verdict {
        category: fusion.category,
        confidence: round4(fusion.confidence),
        risk_score: risk,
        explanation: explain::audio_explanation(fusion),
        model_details: ModelDetails {
            architecture: "Signal Forensic Engine (Delta-MFCC + Rolloff)".to_string(),
            features_analysed: vec![
                "temporal timbre consistency".to_string(),
                "vocoder spectral cutoff".to_string(),
                "noise floor flatness".to_string(),
            ],
        },
        user_summary: explain::summary(fusion.category, risk, &triggers),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
