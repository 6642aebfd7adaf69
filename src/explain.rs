// Explanation builder — maps fired fusion thresholds to fixed trigger
// strings and a user-facing summary.
//
// Everything here is a pure function of the fusion state, so the
// explanation list, the summary and the reported feature tags can never
// disagree about what fired. Triggers are emitted in detection-priority
// order: malicious content first, then face/frame artifacts, then
// global/texture anomalies.

use serde::Serialize;

use crate::fusion::audio::{
    AudioFusion, DELTA_VARIANCE_FLOOR, FLATNESS_FLOOR, MFCC_VARIANCE_FLOOR, ROLLOFF_FLOOR_HZ,
};
use crate::fusion::image::ImageFusion;
use crate::fusion::text::TextFusion;
use crate::fusion::video::{
    VideoFusion, FLICKER_VARIANCE_CEIL, STARE_VARIANCE_FLOOR,
};
use crate::fusion::Category;

// ---------------------------------------------------------------------------
// Trigger thresholds
// ---------------------------------------------------------------------------

// Floors above which a sub-score earns its own trigger line. These gate
// explanations only; the fusion formulas have their own constants.
pub const SPAM_TRIGGER_FLOOR: f64 = 0.5;
pub const TOXIC_TRIGGER_FLOOR: f64 = 0.5;
pub const FACE_TRIGGER_FLOOR: f64 = 0.6;
pub const FACE_SUSPICIOUS_FLOOR: f64 = 0.5;
pub const ELA_TRIGGER_FLOOR: f64 = 0.6;
pub const GLOBAL_TRIGGER_FLOOR: f64 = 0.7;
pub const FRAME_GLITCH_FLOOR: f64 = 0.8;
pub const FACE_GAN_FLOOR: f64 = 0.5;

// ---------------------------------------------------------------------------
// Triggers
// ---------------------------------------------------------------------------

/// A detection threshold that fired. Each trigger has a fixed long label
/// (explanation/features text) and a short tag (summary chip).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    MaliciousTextContent,
    PhishingIntent,
    CoerciveLanguage,
    UrgencyKeywords,
    GanFacialArtifacts,
    HighCompressionArtifacts,
    DeepSemanticAnomalies,
    TimbreOversmoothing,
    MicroAcousticFlatness,
    VocoderRolloffCutoff,
    CompressedTimbreRange,
    FrameMicroGlitching,
    FaceGanArtifacts,
    NoBlinkStare,
    EyeFlicker,
}

impl Trigger {
    pub fn label(&self) -> &'static str {
        match self {
            Trigger::MaliciousTextContent => "Malicious Text Content",
            Trigger::PhishingIntent => "Phishing Intent Detected",
            Trigger::CoerciveLanguage => "Coercive or Threatening Language",
            Trigger::UrgencyKeywords => "Urgency Keyword Patterns",
            Trigger::GanFacialArtifacts => "GAN Facial Artifacts Detected",
            Trigger::HighCompressionArtifacts => "High Compression Artifacts",
            Trigger::DeepSemanticAnomalies => "Deep Semantic Anomalies",
            Trigger::TimbreOversmoothing => "Unnatural Timbre Stability",
            Trigger::MicroAcousticFlatness => "Lack of Micro-Acoustic Detail",
            Trigger::VocoderRolloffCutoff => "Low-Frequency Cutoff (Vocoder Artifact)",
            Trigger::CompressedTimbreRange => "Compressed Timbre Range",
            Trigger::FrameMicroGlitching => "Micro-Glitching Detected (High Frame Anomaly)",
            Trigger::FaceGanArtifacts => "Deepfake GAN Artifacts (Face)",
            Trigger::NoBlinkStare => "Abnormal Eye Stare (No Blinking Detected)",
            Trigger::EyeFlicker => "Unnatural Eye Flickering",
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Trigger::MaliciousTextContent => "Malicious Text",
            Trigger::PhishingIntent => "Phishing Language",
            Trigger::CoerciveLanguage => "Coercion Signals",
            Trigger::UrgencyKeywords => "Urgency Keywords",
            Trigger::GanFacialArtifacts => "Facial Artifacts",
            Trigger::HighCompressionArtifacts => "Compression Artifacts",
            Trigger::DeepSemanticAnomalies => "Semantic Anomalies",
            Trigger::TimbreOversmoothing => "Timbre Stability",
            Trigger::MicroAcousticFlatness => "Spectral Flatness",
            Trigger::VocoderRolloffCutoff => "Rolloff Cutoff",
            Trigger::CompressedTimbreRange => "Timbre Range",
            Trigger::FrameMicroGlitching => "Frame Glitching",
            Trigger::FaceGanArtifacts => "GAN Artifacts",
            Trigger::NoBlinkStare => "No Blinking",
            Trigger::EyeFlicker => "Eye Flicker",
        }
    }
}

/// Stable first-occurrence deduplication.
pub fn dedup(triggers: Vec<Trigger>) -> Vec<Trigger> {
    let mut seen = std::collections::HashSet::new();
    triggers.into_iter().filter(|t| seen.insert(*t)).collect()
}

fn dedup_strings(lines: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    lines
        .into_iter()
        .filter(|l| seen.insert(l.clone()))
        .collect()
}

// ---------------------------------------------------------------------------
// Per-modality trigger extraction
// ---------------------------------------------------------------------------

pub fn text_triggers(fusion: &TextFusion) -> Vec<Trigger> {
    let mut triggers = Vec::new();
    if fusion.spam > SPAM_TRIGGER_FLOOR {
        triggers.push(Trigger::PhishingIntent);
    }
    if fusion.toxic > TOXIC_TRIGGER_FLOOR {
        triggers.push(Trigger::CoerciveLanguage);
    }
    if !fusion.boost.matched.is_empty() {
        triggers.push(Trigger::UrgencyKeywords);
    }
    dedup(triggers)
}

pub fn audio_triggers(fusion: &AudioFusion) -> Vec<Trigger> {
    let s = &fusion.signals;
    let mut triggers = Vec::new();
    if s.delta_variance < DELTA_VARIANCE_FLOOR {
        triggers.push(Trigger::TimbreOversmoothing);
    }
    if s.flatness_mean < FLATNESS_FLOOR {
        triggers.push(Trigger::MicroAcousticFlatness);
    }
    if s.rolloff_mean < ROLLOFF_FLOOR_HZ {
        triggers.push(Trigger::VocoderRolloffCutoff);
    }
    if s.mfcc_variance < MFCC_VARIANCE_FLOOR {
        triggers.push(Trigger::CompressedTimbreRange);
    }
    dedup(triggers)
}

pub fn image_triggers(fusion: &ImageFusion) -> Vec<Trigger> {
    let mut triggers = Vec::new();
    if fusion.is_scam_content {
        triggers.push(Trigger::MaliciousTextContent);
        if let Some(tf) = &fusion.text {
            triggers.extend(text_triggers(tf));
        }
    }
    if let Some(face) = fusion.face_score {
        if face > FACE_TRIGGER_FLOOR {
            triggers.push(Trigger::GanFacialArtifacts);
        }
    }
    if fusion.ela_score > ELA_TRIGGER_FLOOR {
        triggers.push(Trigger::HighCompressionArtifacts);
    }
    if fusion.global_score > GLOBAL_TRIGGER_FLOOR {
        triggers.push(Trigger::DeepSemanticAnomalies);
    }
    dedup(triggers)
}

pub fn video_triggers(fusion: &VideoFusion) -> Vec<Trigger> {
    let mut triggers = Vec::new();
    if fusion.max_face > FRAME_GLITCH_FLOOR {
        triggers.push(Trigger::FrameMicroGlitching);
    }
    if fusion.cnn_final > FACE_GAN_FLOOR {
        triggers.push(Trigger::FaceGanArtifacts);
    }
    match fusion.eye_variance {
        Some(v) if v < STARE_VARIANCE_FLOOR => triggers.push(Trigger::NoBlinkStare),
        Some(v) if v > FLICKER_VARIANCE_CEIL => triggers.push(Trigger::EyeFlicker),
        _ => {}
    }
    dedup(triggers)
}

// ---------------------------------------------------------------------------
// Explanation lines
// ---------------------------------------------------------------------------

pub fn text_explanation(fusion: &TextFusion) -> Vec<String> {
    dedup_strings(vec![
        format!("Phishing Probability: {}%", (fusion.spam * 100.0) as i64),
        format!("Coercion/Threat Level: {}%", (fusion.toxic * 100.0) as i64),
        format!(
            "Keyword Risk Factor: +{}%",
            (fusion.boost.boost * 100.0) as i64
        ),
    ])
}

pub fn audio_explanation(fusion: &AudioFusion) -> Vec<String> {
    let s = &fusion.signals;
    let timbre = if s.delta_variance < DELTA_VARIANCE_FLOOR {
        "Suspiciously Stable"
    } else {
        "Natural"
    };
    dedup_strings(vec![
        format!("Timbre Dynamics (Delta-MFCC): {timbre}"),
        format!("Spectral Flatness: {:.5}", s.flatness_mean),
        format!("Rolloff Frequency: {} Hz", s.rolloff_mean as i64),
    ])
}

pub fn image_explanation(fusion: &ImageFusion) -> Vec<String> {
    let face_line = match fusion.face_score {
        Some(face) if face > FACE_SUSPICIOUS_FLOOR => "Face Analysis: Suspicious".to_string(),
        Some(_) => "Face Analysis: Normal".to_string(),
        None => "No Face Detected".to_string(),
    };
    dedup_strings(vec![
        format!(
            "Visual Manipulation Risk: {}%",
            (fusion.base_visual * 100.0) as i64
        ),
        format!("Text Content Risk: {}%", (fusion.text_risk * 100.0) as i64),
        face_line,
    ])
}

pub fn video_explanation(fusion: &VideoFusion) -> Vec<String> {
    if fusion.category == Category::Unknown {
        return vec!["No faces detected across sampled frames".to_string()];
    }
    let liveness = if fusion.liveness_penalty > 0.0 {
        "Failed"
    } else {
        "Passed"
    };
    dedup_strings(vec![
        format!(
            "Frame Consistency Score: {}/100",
            ((1.0 - fusion.mean_face) * 100.0) as i64
        ),
        format!("Liveness Check: {liveness}"),
        "Per-Frame Artifact Ensemble".to_string(),
    ])
}

// ---------------------------------------------------------------------------
// User summary
// ---------------------------------------------------------------------------

/// Compact user-facing verdict: headline, one reason sentence and the
/// short tags of the fired triggers.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub verdict: String,
    pub reason: String,
    pub triggers: Vec<String>,
}

/// Build the summary from the same trigger set the explanation used.
pub fn summary(category: Category, risk_score: u8, triggers: &[Trigger]) -> UserSummary {
    let verdict = match category {
        Category::Scam => "SCAM DETECTED",
        Category::Deepfake => "DEEPFAKE DETECTED",
        Category::Fake => "SYNTHETIC AUDIO DETECTED",
        Category::Uncertain => "MANIPULATION SUSPECTED",
        Category::Safe => "NO THREAT DETECTED",
        Category::Real => "AUTHENTIC MEDIA",
        Category::Unknown => "INSUFFICIENT EVIDENCE",
    };

    let reason = if category == Category::Unknown {
        "No faces were detected in the sampled frames; there is not enough evidence to score this clip.".to_string()
    } else if triggers.is_empty() {
        format!("No detection thresholds fired; combined risk score {risk_score}/100.")
    } else {
        let labels: Vec<&str> = triggers.iter().take(3).map(|t| t.label()).collect();
        format!(
            "Detection of {} placed the risk score at {risk_score}/100.",
            labels.join(", ")
        )
    };

    UserSummary {
        verdict: verdict.to_string(),
        reason,
        triggers: triggers.iter().map(|t| t.tag().to_string()).collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
