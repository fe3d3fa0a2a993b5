use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Where a reading's values came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReadingSource {
    /// Typed into the entry form by the user
    Manual,

    /// Extracted from a captured image of the monitor display
    Camera,
}

impl ReadingSource {
    /// Stable label used at the storage boundary and in exports
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingSource::Manual => "manual",
            ReadingSource::Camera => "camera",
        }
    }
}

/// The measurement field a raw value belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// The higher pressure number, mmHg
    Systolic,

    /// The lower pressure number, mmHg
    Diastolic,

    /// Heart rate, bpm
    Pulse,
}

impl FieldKind {
    /// Label used when reporting violations against this field
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Systolic => "systolic",
            FieldKind::Diastolic => "diastolic",
            FieldKind::Pulse => "pulse",
        }
    }
}

/// Domain model for a validated blood pressure reading.
///
/// Constructed only by the validator once every domain rule has passed, and
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reading {
    /// Unique identifier for the reading
    pub id: String,

    /// Systolic blood pressure in mmHg (the higher number)
    pub systolic: u16,

    /// Diastolic blood pressure in mmHg (the lower number)
    pub diastolic: u16,

    /// Pulse rate in beats per minute
    pub pulse: u16,

    /// When the reading was taken
    pub captured_at: DateTime<Utc>,

    /// Whether the values were typed or extracted from a capture
    pub source: ReadingSource,

    /// Weakest per-field recognition confidence, camera captures only
    pub confidence: Option<f32>,
}
