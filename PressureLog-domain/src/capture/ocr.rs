use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::entities::{FieldCandidate, FieldKind, TextFragment};
use super::parser::parse_field;

/// A frame handed over by the camera view: encoded bytes plus dimensions
#[derive(Debug, Clone)]
pub struct ImageFrame {
    /// Encoded image bytes as captured
    pub bytes: Vec<u8>,

    /// Frame width in pixels
    pub width: u32,

    /// Frame height in pixels
    pub height: u32,
}

/// Error surfaced by an external recognition engine
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// The engine itself failed
    #[error("Recognition engine failed: {0}")]
    Engine(String),

    /// The frame could not be decoded
    #[error("Unsupported image frame: {0}")]
    BadFrame(String),
}

/// Capability interface for the external optical-recognition engine.
///
/// The extraction adapter is the sole consumer; tests drive it with a
/// [`StubRecognitionEngine`] returning deterministic fragments.
#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    /// Recognize text fragments in a captured frame
    async fn recognize(&self, frame: &ImageFrame) -> Result<Vec<TextFragment>, RecognitionError>;
}

/// Candidates extracted from one frame, one per expected field region
#[derive(Debug, Clone)]
pub struct ExtractedFields {
    pub systolic: FieldCandidate,
    pub diastolic: FieldCandidate,
    pub pulse: FieldCandidate,

    /// Number of fragments the engine recognized anywhere in the frame
    pub fragment_count: usize,
}

impl ExtractedFields {
    /// True when the engine recognized nothing at all, so the camera view
    /// can prompt "no readout detected" instead of reporting bad values
    pub fn nothing_detected(&self) -> bool {
        self.fragment_count == 0
    }
}

/// Maps raw recognition output onto the three expected field regions.
///
/// A home monitor readout stacks its values top-to-bottom: systolic, then
/// diastolic, then pulse. Each fragment is assigned to the horizontal band
/// its vertical center falls in, and the best-confidence fragment per band
/// becomes that field's candidate.
pub struct OcrExtractionAdapter<E: RecognitionEngine> {
    engine: E,
}

impl<E: RecognitionEngine> OcrExtractionAdapter<E> {
    /// Create an adapter over a recognition engine
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Extract one candidate per expected field from a captured frame.
    ///
    /// Never fails: an engine error degrades to an empty fragment set, and
    /// a field with no fragment yields an absent candidate for the
    /// validator to convert into a violation.
    pub async fn extract(&self, frame: &ImageFrame) -> ExtractedFields {
        let fragments = match self.engine.recognize(frame).await {
            Ok(fragments) => fragments,
            Err(e) => {
                warn!("Recognition engine failed, treating frame as empty: {}", e);
                Vec::new()
            }
        };

        let fragment_count = fragments.len();
        debug!("Recognized {} fragment(s) in captured frame", fragment_count);

        ExtractedFields {
            systolic: best_candidate_for(&fragments, frame, FieldKind::Systolic),
            diastolic: best_candidate_for(&fragments, frame, FieldKind::Diastolic),
            pulse: best_candidate_for(&fragments, frame, FieldKind::Pulse),
            fragment_count,
        }
    }
}

/// The field whose expected region a fragment overlaps, by vertical band
fn expected_field(frame: &ImageFrame, fragment: &TextFragment) -> FieldKind {
    let band_height = (frame.height / 3).max(1);
    match (fragment.region.center_y() / band_height).min(2) {
        0 => FieldKind::Systolic,
        1 => FieldKind::Diastolic,
        _ => FieldKind::Pulse,
    }
}

/// Select the most reliable fragment for a field and parse it.
///
/// Ties on confidence prefer the fragment whose value parsed; among two
/// parses, more recognized digits is more reliable for this bounded 2-3
/// digit domain, so the longer raw text wins.
fn best_candidate_for(
    fragments: &[TextFragment],
    frame: &ImageFrame,
    field_kind: FieldKind,
) -> FieldCandidate {
    let mut best: Option<FieldCandidate> = None;
    let mut best_confidence = 0.0f32;

    for fragment in fragments {
        if expected_field(frame, fragment) != field_kind {
            continue;
        }

        let mut candidate = parse_field(&fragment.text, field_kind);
        candidate.confidence = Some(fragment.confidence);

        let replace = match &best {
            None => true,
            Some(_) if fragment.confidence > best_confidence => true,
            Some(_) if fragment.confidence < best_confidence => false,
            Some(current) => match (candidate.parsed_value.is_some(), current.parsed_value.is_some()) {
                (true, false) => true,
                (false, true) => false,
                (true, true) => candidate.raw_text.trim().len() > current.raw_text.trim().len(),
                (false, false) => false,
            },
        };

        if replace {
            best_confidence = fragment.confidence;
            best = Some(candidate);
        }
    }

    best.unwrap_or_else(|| FieldCandidate::absent(field_kind))
}

/// Deterministic engine stub for unit testing without a real recognizer
pub struct StubRecognitionEngine {
    fragments: Vec<TextFragment>,
    fail: bool,
}

impl StubRecognitionEngine {
    /// An engine that recognizes exactly the given fragments
    pub fn with_fragments(fragments: Vec<TextFragment>) -> Self {
        Self { fragments, fail: false }
    }

    /// An engine that recognizes nothing
    pub fn empty() -> Self {
        Self::with_fragments(Vec::new())
    }

    /// An engine that fails every recognition call
    pub fn failing() -> Self {
        Self { fragments: Vec::new(), fail: true }
    }
}

#[async_trait]
impl RecognitionEngine for StubRecognitionEngine {
    async fn recognize(&self, _frame: &ImageFrame) -> Result<Vec<TextFragment>, RecognitionError> {
        if self.fail {
            return Err(RecognitionError::Engine("stub is configured to fail".to_string()));
        }
        Ok(self.fragments.clone())
    }
}
