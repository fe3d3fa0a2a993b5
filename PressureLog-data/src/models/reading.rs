use serde::{Deserialize, Serialize};

/// Storage model for a persisted reading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredReading {
    /// Unique identifier for the reading
    pub id: String,

    /// Systolic blood pressure in mmHg (the higher number)
    pub systolic: u16,

    /// Diastolic blood pressure in mmHg (the lower number)
    pub diastolic: u16,

    /// Pulse rate in beats per minute
    pub pulse: u16,

    /// When the reading was taken, as an RFC 3339 string
    pub taken: String,

    /// Input source label ("manual" or "camera")
    pub source: String,

    /// Weakest per-field recognition confidence, camera readings only
    pub confidence: Option<f32>,
}
