// Copyright 2026 The Veracity Project
// SPDX-License-Identifier: Apache-2.0

// Signal extraction capability traits.
//
// The pretrained scorers (spam/toxicity classifiers, CNN artifact models,
// the audio forensic front end, the video frame sampler) are opaque
// collaborators: each is abstracted as an extractor that maps raw media to
// the signal struct for its modality. Concrete model backends are injected
// at startup; the engine and fusion code never depend on one.

use super::{AudioSignals, ImageSignals, TextSignals, VideoSignals};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures raised by a signal extractor.
///
/// `InvalidMedia` means the payload itself is unusable (truncated file,
/// audio shorter than the analysis window) and is surfaced to the caller
/// as an input rejection. `Inference` means the extractor broke; the
/// engine recovers with the modality's neutral signals and the scan
/// completes.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("media rejected by extractor: {0}")]
    InvalidMedia(String),

    #[error("signal extraction failed: {0}")]
    Inference(String),
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Scores raw text for spam/phishing and toxicity.
pub trait TextSignalExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Result<TextSignals, ExtractionError>;
}

/// Extracts visual sub-scores (and any embedded text) from a still image.
pub trait ImageSignalExtractor: Send + Sync {
    fn extract(&self, media: &[u8]) -> Result<ImageSignals, ExtractionError>;
}

/// Extracts acoustic features from an audio clip.
pub trait AudioSignalExtractor: Send + Sync {
    fn extract(&self, media: &[u8]) -> Result<AudioSignals, ExtractionError>;
}

/// Samples frames from a video and extracts per-face features plus the
/// eye-brightness timeline.
pub trait VideoSignalExtractor: Send + Sync {
    fn extract(&self, media: &[u8]) -> Result<VideoSignals, ExtractionError>;
}

// ---------------------------------------------------------------------------
// Neutral implementations
// ---------------------------------------------------------------------------

/// Extractors that report the risk-silent neutral signals for their
/// modality. Wired by default until a model backend is injected; text
/// scans still carry the keyword heuristics, which need no model.
pub struct NeutralTextExtractor;

impl TextSignalExtractor for NeutralTextExtractor {
    fn extract(&self, _text: &str) -> Result<TextSignals, ExtractionError> {
        Ok(TextSignals::neutral())
    }
}

pub struct NeutralImageExtractor;

impl ImageSignalExtractor for NeutralImageExtractor {
    fn extract(&self, _media: &[u8]) -> Result<ImageSignals, ExtractionError> {
        Ok(ImageSignals::neutral())
    }
}

pub struct NeutralAudioExtractor;

impl AudioSignalExtractor for NeutralAudioExtractor {
    fn extract(&self, _media: &[u8]) -> Result<AudioSignals, ExtractionError> {
        Ok(AudioSignals::neutral())
    }
}

pub struct NeutralVideoExtractor;

impl VideoSignalExtractor for NeutralVideoExtractor {
    fn extract(&self, _media: &[u8]) -> Result<VideoSignals, ExtractionError> {
        Ok(VideoSignals::neutral())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
