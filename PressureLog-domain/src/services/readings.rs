use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::capture::assembler::{CaptureError, CapturedReading, ManualEntry, ReadingAssembler};
use crate::capture::ocr::{ImageFrame, RecognitionEngine};
use crate::entities::conversions;
use crate::entities::{Reading, ValidationViolation};
use pressure_log_data::repository::{ReadingRepositoryTrait, RepositoryError};

use super::export;

/// Readings service errors
#[derive(Debug, Error)]
pub enum ReadingsServiceError {
    /// The submission was rejected by validation; every violation names its
    /// originating field so the form can highlight the offending input
    #[error("Validation failed with {} violation(s)", .0.len())]
    Invalid(Vec<ValidationViolation>),

    /// The capture produced no usable reading (nothing detected, or the
    /// extraction was cancelled)
    #[error(transparent)]
    Capture(CaptureError),

    /// Storage collaborator failure, propagated unchanged for the caller to
    /// retry or report
    #[error("Storage failure: {0}")]
    Storage(#[from] RepositoryError),

    /// A stored record could not be mapped back to a domain reading
    #[error("Corrupt stored reading: {0}")]
    Corrupt(String),
}

/// Trait for reading capture, retrieval and deletion operations
#[async_trait]
pub trait ReadingsServiceTrait {
    /// Validate and persist a reading typed into the entry form
    async fn record_manual_entry(&self, entry: &ManualEntry) -> Result<Reading, ReadingsServiceError>;

    /// Extract, validate and persist a reading from a captured frame
    async fn record_capture(
        &self,
        frame: &ImageFrame,
        taken: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> Result<CapturedReading, ReadingsServiceError>;

    /// Every stored reading in capture order, the input to `build_view`
    async fn list_readings(&self) -> Result<Vec<Reading>, ReadingsServiceError>;

    /// Forward a user's delete intent to the storage collaborator
    async fn delete_reading(&self, id: &str) -> Result<(), ReadingsServiceError>;

    /// Render the stored readings taken in the inclusive range as CSV
    async fn export_csv(
        &self,
        from_inclusive: DateTime<Utc>,
        to_inclusive: DateTime<Utc>,
    ) -> Result<String, ReadingsServiceError>;
}

/// Readings service wiring the capture pipeline to the storage collaborator
pub struct ReadingsService<R, E>
where
    R: ReadingRepositoryTrait,
    E: RecognitionEngine,
{
    repository: R,
    assembler: ReadingAssembler<E>,
}

impl<R, E> ReadingsService<R, E>
where
    R: ReadingRepositoryTrait,
    E: RecognitionEngine,
{
    /// Create a new readings service
    pub fn new(repository: R, engine: E) -> Self {
        Self {
            repository,
            assembler: ReadingAssembler::new(engine),
        }
    }

    /// Persist one validated reading
    async fn save(&self, reading: &Reading) -> Result<(), ReadingsServiceError> {
        let stored = conversions::convert_to_stored_reading(reading);
        self.repository.save(stored).await?;
        Ok(())
    }
}

#[async_trait]
impl<R, E> ReadingsServiceTrait for ReadingsService<R, E>
where
    R: ReadingRepositoryTrait + Send + Sync,
    E: RecognitionEngine + Send + Sync,
{
    /// Validate and persist a reading typed into the entry form
    async fn record_manual_entry(&self, entry: &ManualEntry) -> Result<Reading, ReadingsServiceError> {
        let reading = self
            .assembler
            .assemble_from_manual_entry(entry)
            .map_err(ReadingsServiceError::Invalid)?;

        self.save(&reading).await?;

        info!("Recorded manual reading: {}", reading.id);
        Ok(reading)
    }

    /// Extract, validate and persist a reading from a captured frame
    async fn record_capture(
        &self,
        frame: &ImageFrame,
        taken: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> Result<CapturedReading, ReadingsServiceError> {
        let outcome = self
            .assembler
            .assemble_from_capture(frame, taken, cancel)
            .await
            .map_err(|e| match e {
                // Violations keep one shape regardless of input source
                CaptureError::Invalid(violations) => ReadingsServiceError::Invalid(violations),
                other => ReadingsServiceError::Capture(other),
            })?;

        self.save(&outcome.reading).await?;

        info!(
            "Recorded captured reading: {} (suspect: {})",
            outcome.reading.id, outcome.suspect
        );
        Ok(outcome)
    }

    /// Every stored reading in capture order
    async fn list_readings(&self) -> Result<Vec<Reading>, ReadingsServiceError> {
        let stored = self.repository.list_all().await?;

        stored
            .into_iter()
            .map(|record| {
                conversions::convert_to_domain_reading(record).map_err(|message| {
                    error!("Dropping unreadable stored reading: {}", message);
                    ReadingsServiceError::Corrupt(message)
                })
            })
            .collect()
    }

    /// Forward a user's delete intent to the storage collaborator
    async fn delete_reading(&self, id: &str) -> Result<(), ReadingsServiceError> {
        self.repository.delete(id).await?;
        info!("Deleted reading: {}", id);
        Ok(())
    }

    /// Render the stored readings taken in the inclusive range as CSV
    async fn export_csv(
        &self,
        from_inclusive: DateTime<Utc>,
        to_inclusive: DateTime<Utc>,
    ) -> Result<String, ReadingsServiceError> {
        let readings = self.list_readings().await?;
        Ok(export::readings_to_csv(&readings, from_inclusive, to_inclusive))
    }
}
