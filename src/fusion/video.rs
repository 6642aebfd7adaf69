// Video fusion — per-face frame ensemble, max-weighted aggregation and a
// blink-liveness penalty.
//
// The aggregate is deliberately max-weighted: a single clearly
// manipulated frame should flag the whole clip even when the average
// looks clean. Liveness rides on the eye-region brightness timeline; a
// near-constant series means no blinking, a wildly varying one means
// frame-level flicker.

use crate::explain;
use crate::signal::{clamp01, FaceFrameSignals, VideoSignals};

use super::{risk_score, round4, Category, ModelDetails, Verdict};

// Per-face ensemble weights.
pub const ARTIFACT_WEIGHT: f64 = 0.5;
pub const SPECTRAL_WEIGHT: f64 = 0.25;
pub const NOISE_WEIGHT: f64 = 0.25;

// Radial power-spectrum tail variance bands. Natural frames decay
// smoothly; generated frames come out either too smooth or spiky.
pub const SPECTRAL_TAIL_LOW: f64 = 3.0;
pub const SPECTRAL_TAIL_HIGH: f64 = 40.0;
pub const SPECTRAL_ANOMALY_SCORE: f64 = 0.8;
pub const SPECTRAL_CLEAN_SCORE: f64 = 0.2;

// Green-channel noise bands.
pub const NOISE_STD_LOW: f64 = 18.0;
pub const NOISE_STD_HIGH: f64 = 75.0;
pub const NOISE_ANOMALY_SCORE: f64 = 0.95;
pub const NOISE_CLEAN_SCORE: f64 = 0.15;

// Aggregation across face scores.
pub const MEAN_WEIGHT: f64 = 0.3;
pub const MAX_WEIGHT: f64 = 0.7;

// Liveness analysis.
pub const MIN_EYE_SAMPLES: usize = 10;
pub const STARE_VARIANCE_FLOOR: f64 = 1.0;
pub const STARE_PENALTY: f64 = 0.6;
pub const FLICKER_VARIANCE_CEIL: f64 = 60.0;
pub const FLICKER_PENALTY: f64 = 0.5;

// Three-tier classification bands.
pub const DEEPFAKE_THRESHOLD: f64 = 0.75;
pub const UNCERTAIN_THRESHOLD: f64 = 0.35;

/// Intermediate video fusion state.
#[derive(Debug, Clone)]
pub struct VideoFusion {
    pub face_count: usize,
    pub mean_face: f64,
    pub max_face: f64,
    pub cnn_final: f64,
    /// Standard deviation of the eye-brightness timeline, once enough
    /// samples exist.
    pub eye_variance: Option<f64>,
    pub liveness_penalty: f64,
    pub final_score: f64,
    pub category: Category,
    pub confidence: f64,
}

/// Score one detected face in one frame.
pub fn face_frame_score(signals: &FaceFrameSignals) -> f64 {
    let spectral = if signals.spectral_tail_variance < SPECTRAL_TAIL_LOW
        || signals.spectral_tail_variance > SPECTRAL_TAIL_HIGH
    {
        SPECTRAL_ANOMALY_SCORE
    } else {
        SPECTRAL_CLEAN_SCORE
    };

    let noise = if signals.channel_noise_std < NOISE_STD_LOW
        || signals.channel_noise_std > NOISE_STD_HIGH
    {
        NOISE_ANOMALY_SCORE
    } else {
        NOISE_CLEAN_SCORE
    };

    ARTIFACT_WEIGHT * clamp01(signals.artifact_score)
        + SPECTRAL_WEIGHT * spectral
        + NOISE_WEIGHT * noise
}

/// Combine all sampled-face scores and the liveness timeline.
///
/// A clip in which no face was ever detected gets the distinguished
/// UNKNOWN result with zero confidence and risk; none of the threshold
/// bands apply.
pub fn fuse(signals: &VideoSignals) -> VideoFusion {
    if signals.faces.is_empty() {
        return VideoFusion {
            face_count: 0,
            mean_face: 0.0,
            max_face: 0.0,
            cnn_final: 0.0,
            eye_variance: None,
            liveness_penalty: 0.0,
            final_score: 0.0,
            category: Category::Unknown,
            confidence: 0.0,
        };
    }

    let scores: Vec<f64> = signals.faces.iter().map(face_frame_score).collect();
    let mean_face = scores.iter().sum::<f64>() / scores.len() as f64;
    let max_face = scores.iter().copied().fold(0.0_f64, f64::max);

    let cnn_final = aggregate_face_scores(mean_face, max_face);

    let eye_variance = if signals.eye_brightness.len() >= MIN_EYE_SAMPLES {
        Some(std_dev(&signals.eye_brightness))
    } else {
        None
    };

    let liveness_penalty = match eye_variance {
        Some(v) if v < STARE_VARIANCE_FLOOR => STARE_PENALTY,
        Some(v) if v > FLICKER_VARIANCE_CEIL => FLICKER_PENALTY,
        _ => 0.0,
    };

    let final_score = (cnn_final + liveness_penalty).min(1.0);
    let (category, confidence) = classify(final_score);

    VideoFusion {
        face_count: signals.faces.len(),
        mean_face,
        max_face,
        cnn_final,
        eye_variance,
        liveness_penalty,
        final_score,
        category,
        confidence,
    }
}

/// Assemble the full verdict for a video scan.
pub fn verdict(fusion: &VideoFusion) -> Verdict {
    let triggers = explain::video_triggers(fusion);
    let risk = risk_score(fusion.final_score);

    let features_analysed = if fusion.category == Category::Unknown {
        vec!["No faces detected".to_string()]
    } else if triggers.is_empty() {
        vec!["Temporal consistency verified".to_string()]
    } else {
        triggers.iter().map(|t| t.label().to_string()).collect()
    };

    Verdict {
        category: fusion.category,
        confidence: round4(fusion.confidence),
        risk_score: risk,
        explanation: explain::video_explanation(fusion),
        model_details: ModelDetails {
            architecture: "Video-Xception (B5) + Blink Liveness".to_string(),
            features_analysed,
        },
        user_summary: explain::summary(fusion.category, risk, &triggers),
    }
}

/// Aggregate all per-face scores: max-weighted so an isolated manipulated
/// frame is not averaged away.
pub fn aggregate_face_scores(mean: f64, max: f64) -> f64 {
    MEAN_WEIGHT * mean + MAX_WEIGHT * max
}

/// Map a final score to the three-tier category and its confidence.
fn classify(final_score: f64) -> (Category, f64) {
    if final_score >= DEEPFAKE_THRESHOLD {
        (Category::Deepfake, final_score)
    } else if final_score >= UNCERTAIN_THRESHOLD {
        (Category::Uncertain, final_score)
    } else {
        (Category::Real, 1.0 - final_score)
    }
}

/// Population standard deviation.
fn std_dev(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / samples.len() as f64;
    var.sqrt()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
