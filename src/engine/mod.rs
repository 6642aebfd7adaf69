// Scan engine — wires the pipeline together for one request:
// validate → decode → extract signals → fuse → fingerprint → anchor.
//
// Extractors are CPU-bound and run on the blocking pool; requests are
// otherwise independent and share no mutable state. An extractor
// breaking never kills the scan — fusion runs on the modality's neutral
// signals instead. Anchoring is infallible by construction, so a caller
// always receives either a full verdict bundle or an input rejection.

use std::sync::Arc;

use uuid::Uuid;

use crate::anchor::service::{AnchoringService, VerifyOutcome};
use crate::anchor::AnchorRecord;
use crate::evidence;
use crate::fusion::{self, Verdict};
use crate::media::{InputError, MediaKind, ScanRequest};
use crate::signal::extractor::{
    AudioSignalExtractor, ExtractionError, ImageSignalExtractor, TextSignalExtractor,
    VideoSignalExtractor,
};
use crate::signal::{AudioSignals, ImageSignals, TextSignals, VideoSignals};

/// Embedded text shorter than this is OCR noise, not content.
const EMBEDDED_TEXT_MIN_CHARS: usize = 5;

// ---------------------------------------------------------------------------
// Dependencies
// ---------------------------------------------------------------------------

/// Everything the engine needs, injected at startup.
pub struct EngineDeps {
    pub text: Arc<dyn TextSignalExtractor>,
    pub image: Arc<dyn ImageSignalExtractor>,
    pub audio: Arc<dyn AudioSignalExtractor>,
    pub video: Arc<dyn VideoSignalExtractor>,
    pub anchoring: Arc<AnchoringService>,
    pub max_media_bytes: usize,
}

/// The full response bundle for one scan.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub verdict: Verdict,
    pub evidence_hash: String,
    pub anchor: AnchorRecord,
}

pub struct ScanEngine {
    deps: EngineDeps,
}

impl ScanEngine {
    pub fn new(deps: EngineDeps) -> Self {
        Self { deps }
    }

    // -----------------------------------------------------------------
    // scan
    // -----------------------------------------------------------------

    pub async fn scan(&self, request: ScanRequest) -> Result<ScanOutcome, InputError> {
        let request_id = Uuid::new_v4().to_string();
        tracing::debug!(
            request_id = %request_id,
            kind = %request.kind,
            label = request.label.as_deref().unwrap_or("unlabeled"),
            "scan started"
        );

        let verdict = match request.kind {
            MediaKind::Text => self.scan_text(&request.content).await?,
            MediaKind::Image => {
                let media = request.decode_media(self.deps.max_media_bytes)?;
                self.scan_image(media).await?
            }
            MediaKind::Audio => {
                let media = request.decode_media(self.deps.max_media_bytes)?;
                self.scan_audio(media).await?
            }
            MediaKind::Video => {
                let media = request.decode_media(self.deps.max_media_bytes)?;
                self.scan_video(media).await?
            }
        };

        let evidence_hash = evidence::evidence_hash(&verdict);
        let anchor = self
            .deps
            .anchoring
            .anchor(&evidence_hash, verdict.category)
            .await;

        tracing::info!(
            request_id = %request_id,
            category = %verdict.category,
            risk_score = verdict.risk_score,
            evidence_hash = %evidence_hash,
            anchor_mode = %anchor.mode,
            "scan complete"
        );

        Ok(ScanOutcome {
            verdict,
            evidence_hash,
            anchor,
        })
    }

    /// Report whether and how a fingerprint was anchored.
    pub async fn verify(&self, evidence_hash: &str) -> VerifyOutcome {
        self.deps.anchoring.verify(evidence_hash).await
    }

    // -----------------------------------------------------------------
    // Per-modality paths
    // -----------------------------------------------------------------

    async fn scan_text(&self, text: &str) -> Result<Verdict, InputError> {
        let extractor = Arc::clone(&self.deps.text);
        let content = text.to_string();
        let result =
            tokio::task::spawn_blocking(move || extractor.extract(&content)).await;
        let signals = recover(result, TextSignals::neutral(), "text")?;

        let boost = fusion::keywords::scan(text);
        Ok(fusion::text::verdict(&fusion::text::fuse(&signals, &boost)))
    }

    async fn scan_image(&self, media: Vec<u8>) -> Result<Verdict, InputError> {
        let extractor = Arc::clone(&self.deps.image);
        let result = tokio::task::spawn_blocking(move || extractor.extract(&media)).await;
        let signals = recover(result, ImageSignals::neutral(), "image")?;

        // Text recovered from the pixels runs through the full text
        // fusion; a SCAM result overrides the visual score downstream.
        let text_fusion = match signals.embedded_text.as_deref() {
            Some(text) if text.chars().count() > EMBEDDED_TEXT_MIN_CHARS => {
                let text_extractor = Arc::clone(&self.deps.text);
                let owned = text.to_string();
                let result =
                    tokio::task::spawn_blocking(move || text_extractor.extract(&owned)).await;
                let text_signals = recover(result, TextSignals::neutral(), "embedded-text")?;
                let boost = fusion::keywords::scan(text);
                Some(fusion::text::fuse(&text_signals, &boost))
            }
            _ => None,
        };

        Ok(fusion::image::verdict(&fusion::image::fuse(
            &signals,
            text_fusion.as_ref(),
        )))
    }

    async fn scan_audio(&self, media: Vec<u8>) -> Result<Verdict, InputError> {
        let extractor = Arc::clone(&self.deps.audio);
        let result = tokio::task::spawn_blocking(move || extractor.extract(&media)).await;
        let signals = recover(result, AudioSignals::neutral(), "audio")?;
        Ok(fusion::audio::verdict(&fusion::audio::fuse(&signals)))
    }

    async fn scan_video(&self, media: Vec<u8>) -> Result<Verdict, InputError> {
        let extractor = Arc::clone(&self.deps.video);
        let result = tokio::task::spawn_blocking(move || extractor.extract(&media)).await;
        let signals = recover(result, VideoSignals::neutral(), "video")?;
        Ok(fusion::video::verdict(&fusion::video::fuse(&signals)))
    }
}

// ---------------------------------------------------------------------------
// Extraction recovery
// ---------------------------------------------------------------------------

/// Resolve an extractor call. Invalid media is the caller's problem; an
/// extractor crash (error or panic) degrades to the neutral signals so
/// fusion still completes.
fn recover<T>(
    result: Result<Result<T, ExtractionError>, tokio::task::JoinError>,
    neutral: T,
    modality: &'static str,
) -> Result<T, InputError> {
    match result {
        Ok(Ok(signals)) => Ok(signals),
        Ok(Err(ExtractionError::InvalidMedia(msg))) => Err(InputError::UndecodableMedia(msg)),
        Ok(Err(ExtractionError::Inference(msg))) => {
            tracing::warn!(modality, error = %msg, "signal extraction failed, using neutral signals");
            Ok(neutral)
        }
        Err(join_error) => {
            tracing::warn!(modality, error = %join_error, "signal extraction task failed, using neutral signals");
            Ok(neutral)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
