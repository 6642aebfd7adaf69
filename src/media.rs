// Scan request model — the collaborator boundary consumed by the engine.
//
// A request carries one modality of media: raw text, or base64-encoded
// binary for image/audio/video. Validation happens here so the engine
// only ever sees well-formed requests.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

// ---------------------------------------------------------------------------
// Media kinds
// ---------------------------------------------------------------------------

/// The four supported input modalities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Text,
    Image,
    Audio,
    Video,
}

impl MediaKind {
    /// Parse a wire-format type string (case-insensitive).
    pub fn parse(s: &str) -> Option<MediaKind> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Some(MediaKind::Text),
            "image" => Some(MediaKind::Image),
            "audio" => Some(MediaKind::Audio),
            "video" => Some(MediaKind::Video),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Text => "text",
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        }
    }

    /// Whether the request content is base64-encoded binary.
    pub fn is_binary(&self) -> bool {
        !matches!(self, MediaKind::Text)
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Request-level rejections. These surface to the caller as 4xx-equivalent
/// failures; no partial verdict is produced.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("request content is empty")]
    EmptyContent,

    #[error("unsupported scan type \"{0}\"")]
    UnsupportedType(String),

    #[error("content is not valid base64: {0}")]
    InvalidEncoding(String),

    #[error("media could not be decoded: {0}")]
    UndecodableMedia(String),

    #[error("media is {size} bytes, exceeding the {limit} byte limit")]
    OversizedMedia { size: usize, limit: usize },
}

// ---------------------------------------------------------------------------
// Scan request
// ---------------------------------------------------------------------------

/// A validated scan request.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub kind: MediaKind,
    pub content: String,
    pub label: Option<String>,
}

impl ScanRequest {
    /// Build a request from wire parts, rejecting unknown types and empty
    /// content up front.
    pub fn from_parts(
        kind: &str,
        content: String,
        label: Option<String>,
    ) -> Result<Self, InputError> {
        let kind = MediaKind::parse(kind)
            .ok_or_else(|| InputError::UnsupportedType(kind.to_string()))?;
        if content.trim().is_empty() {
            return Err(InputError::EmptyContent);
        }
        Ok(Self {
            kind,
            content,
            label,
        })
    }

    /// Decode the base64 payload of a binary request, enforcing the size
    /// limit on the decoded bytes.
    pub fn decode_media(&self, limit: usize) -> Result<Vec<u8>, InputError> {
        let bytes = BASE64
            .decode(self.content.trim())
            .map_err(|e| InputError::InvalidEncoding(e.to_string()))?;
        if bytes.is_empty() {
            return Err(InputError::EmptyContent);
        }
        if bytes.len() > limit {
            return Err(InputError::OversizedMedia {
                size: bytes.len(),
                limit,
            });
        }
        Ok(bytes)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
