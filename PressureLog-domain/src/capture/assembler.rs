use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::entities::{FieldKind, Reading, ReadingSource, ValidationViolation};
use super::ocr::{ImageFrame, OcrExtractionAdapter, RecognitionEngine};
use super::parser::parse_field;
use super::validator;

/// Raw form input for one reading, exactly as the user typed it
#[derive(Debug, Clone)]
pub struct ManualEntry {
    /// Systolic field text
    pub systolic: String,

    /// Diastolic field text
    pub diastolic: String,

    /// Pulse field text
    pub pulse: String,

    /// When the measurement was taken
    pub taken: DateTime<Utc>,
}

impl ManualEntry {
    /// Build an entry from route-supplied prefill values, e.g. arriving at
    /// the form from a "correct this capture" redirect.
    ///
    /// Prefilled values re-enter the ordinary manual path; there is no
    /// privileged bypass of validation.
    pub fn from_route_params(
        systolic: &str,
        diastolic: &str,
        pulse: &str,
        taken: DateTime<Utc>,
    ) -> Self {
        Self {
            systolic: systolic.to_string(),
            diastolic: diastolic.to_string(),
            pulse: pulse.to_string(),
            taken,
        }
    }
}

/// A camera capture that survived validation
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedReading {
    /// The validated reading
    pub reading: Reading,

    /// The values validate but sit below the plausibility floor for a live
    /// readout; the camera view should ask the user to confirm them
    pub suspect: bool,
}

/// Why a capture attempt produced no reading
#[derive(Debug, Error, PartialEq)]
pub enum CaptureError {
    /// The engine recognized nothing in any field region
    #[error("No readout detected in the captured frame")]
    NoFieldsDetected,

    /// Values were recognized but rejected by validation
    #[error("Captured values failed validation")]
    Invalid(Vec<ValidationViolation>),

    /// The user navigated away or retook the capture mid-extraction
    #[error("Capture cancelled")]
    Cancelled,
}

/// Merges manual-entry and camera-derived candidates into one validation
/// path, so range rules and the accumulate-all policy stay uniform across
/// both input sources.
pub struct ReadingAssembler<E: RecognitionEngine> {
    adapter: OcrExtractionAdapter<E>,
}

impl<E: RecognitionEngine> ReadingAssembler<E> {
    /// Create an assembler over a recognition engine
    pub fn new(engine: E) -> Self {
        Self {
            adapter: OcrExtractionAdapter::new(engine),
        }
    }

    /// Assemble a reading from typed form fields
    pub fn assemble_from_manual_entry(
        &self,
        entry: &ManualEntry,
    ) -> Result<Reading, Vec<ValidationViolation>> {
        let systolic = parse_field(&entry.systolic, FieldKind::Systolic);
        let diastolic = parse_field(&entry.diastolic, FieldKind::Diastolic);
        let pulse = parse_field(&entry.pulse, FieldKind::Pulse);

        validator::validate(&systolic, &diastolic, &pulse, ReadingSource::Manual, entry.taken)
    }

    /// Assemble a reading from a captured image frame.
    ///
    /// The recognition call is the sole suspension point in the pipeline.
    /// Cancelling it discards every in-flight candidate and constructs
    /// nothing, so a retaken capture starts from a clean slate.
    pub async fn assemble_from_capture(
        &self,
        frame: &ImageFrame,
        taken: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> Result<CapturedReading, CaptureError> {
        let extracted = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Capture extraction cancelled");
                return Err(CaptureError::Cancelled);
            }
            extracted = self.adapter.extract(frame) => extracted,
        };

        // "Nothing was read" is not "wrong values were read": let the camera
        // view prompt for a retake instead of flagging fields
        if extracted.nothing_detected() {
            info!("No fragments recognized in captured frame");
            return Err(CaptureError::NoFieldsDetected);
        }

        let reading = validator::validate(
            &extracted.systolic,
            &extracted.diastolic,
            &extracted.pulse,
            ReadingSource::Camera,
            taken,
        )
        .map_err(CaptureError::Invalid)?;

        let suspect = is_unlikely_reading(&reading);
        if suspect {
            info!(
                "Captured reading {} validates but looks implausibly low",
                reading.id
            );
        }

        Ok(CapturedReading { reading, suspect })
    }
}

/// A readout row sometimes loses a digit to glare or tilt; the result can
/// still validate while being far too low for a conscious patient.
fn is_unlikely_reading(reading: &Reading) -> bool {
    reading.diastolic < 40 || reading.pulse < 40
}
