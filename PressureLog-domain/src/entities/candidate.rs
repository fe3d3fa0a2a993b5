use serde::{Deserialize, Serialize};

use super::reading::FieldKind;

/// Pixel-space location of a recognized text fragment within a frame
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoundingRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingRegion {
    /// Vertical center of the region, used to assign fragments to field bands
    pub fn center_y(&self) -> u32 {
        self.y + self.height / 2
    }
}

/// A unit of recognized text plus its location and confidence, as returned
/// by the optical-recognition engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextFragment {
    /// Raw recognized text
    pub text: String,

    /// Where in the frame the text was found
    pub region: BoundingRegion,

    /// Recognition confidence in [0, 1]
    pub confidence: f32,
}

/// An unvalidated numeric value awaiting validation.
///
/// Owned by the in-flight parse/validate operation and dropped once assembly
/// succeeds or fails; candidates are never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldCandidate {
    /// The input as the user typed it or the engine recognized it
    pub raw_text: String,

    /// Parsed value, absent when the raw text is not a plain base-10 integer
    pub parsed_value: Option<u32>,

    /// Which measurement field this candidate is for
    pub field_kind: FieldKind,

    /// Recognition confidence for camera-derived candidates
    pub confidence: Option<f32>,
}

impl FieldCandidate {
    /// The candidate for a field no fragment was recognized for
    pub fn absent(field_kind: FieldKind) -> Self {
        Self {
            raw_text: String::new(),
            parsed_value: None,
            field_kind,
            confidence: None,
        }
    }
}
