// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

// Re-export useful test mocks from the data layer
pub use pressure_log_data::repository::tests::MockReadingRepository;

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::capture::assembler::{CaptureError, CapturedReading, ManualEntry};
use crate::capture::ocr::ImageFrame;
use crate::capture::{parser, validator};
use crate::entities::{FieldKind, Reading, ReadingSource};
use crate::services::export;
use crate::services::readings::{ReadingsServiceError, ReadingsServiceTrait};

/// Mock implementation of the ReadingsServiceTrait for testing view and
/// collaborator layers without a repository or recognition engine.
///
/// The manual path runs the real (pure) parser and validator so the mock
/// rejects exactly what the real service rejects; captures return a
/// preconfigured outcome instead of touching an engine.
pub struct MockReadingsService {
    readings: RwLock<Vec<Reading>>,
    capture_outcome: Option<CapturedReading>,
    should_fail_storage: bool,
}

impl Default for MockReadingsService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockReadingsService {
    /// Create a new mock readings service
    pub fn new() -> Self {
        Self {
            readings: RwLock::new(Vec::new()),
            capture_outcome: None,
            should_fail_storage: false,
        }
    }

    /// Add multiple pre-defined readings to the mock
    pub fn with_readings(self, readings: Vec<Reading>) -> Self {
        {
            let mut stored = self.readings.write().unwrap();
            stored.extend(readings);
        }
        self
    }

    /// Configure the outcome every capture attempt resolves to
    pub fn with_capture_outcome(mut self, outcome: CapturedReading) -> Self {
        self.capture_outcome = Some(outcome);
        self
    }

    /// Configure the mock to fail every storage operation
    pub fn with_storage_failure(mut self) -> Self {
        self.should_fail_storage = true;
        self
    }

    fn storage_failure(&self) -> Result<(), ReadingsServiceError> {
        if self.should_fail_storage {
            return Err(ReadingsServiceError::Storage(
                pressure_log_data::repository::RepositoryError::Storage(
                    "mock is configured to fail storage".to_string(),
                ),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ReadingsServiceTrait for MockReadingsService {
    async fn record_manual_entry(&self, entry: &ManualEntry) -> Result<Reading, ReadingsServiceError> {
        self.storage_failure()?;

        let reading = validator::validate(
            &parser::parse_field(&entry.systolic, FieldKind::Systolic),
            &parser::parse_field(&entry.diastolic, FieldKind::Diastolic),
            &parser::parse_field(&entry.pulse, FieldKind::Pulse),
            ReadingSource::Manual,
            entry.taken,
        )
        .map_err(ReadingsServiceError::Invalid)?;

        let mut readings = self.readings.write().unwrap();
        readings.push(reading.clone());
        Ok(reading)
    }

    async fn record_capture(
        &self,
        _frame: &ImageFrame,
        _taken: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> Result<CapturedReading, ReadingsServiceError> {
        self.storage_failure()?;

        if cancel.is_cancelled() {
            return Err(ReadingsServiceError::Capture(CaptureError::Cancelled));
        }

        match &self.capture_outcome {
            Some(outcome) => {
                let mut readings = self.readings.write().unwrap();
                readings.push(outcome.reading.clone());
                Ok(outcome.clone())
            }
            None => Err(ReadingsServiceError::Capture(CaptureError::NoFieldsDetected)),
        }
    }

    async fn list_readings(&self) -> Result<Vec<Reading>, ReadingsServiceError> {
        self.storage_failure()?;

        let readings = self.readings.read().unwrap();
        Ok(readings.clone())
    }

    async fn delete_reading(&self, id: &str) -> Result<(), ReadingsServiceError> {
        self.storage_failure()?;

        let mut readings = self.readings.write().unwrap();
        let before = readings.len();
        readings.retain(|reading| reading.id != id);

        if readings.len() == before {
            return Err(ReadingsServiceError::Storage(
                pressure_log_data::repository::RepositoryError::NotFound(id.to_string()),
            ));
        }
        Ok(())
    }

    async fn export_csv(
        &self,
        from_inclusive: DateTime<Utc>,
        to_inclusive: DateTime<Utc>,
    ) -> Result<String, ReadingsServiceError> {
        let readings = self.list_readings().await?;
        Ok(export::readings_to_csv(&readings, from_inclusive, to_inclusive))
    }
}

/// Factory function to create a mock readings service
pub fn create_mock_readings_service() -> impl ReadingsServiceTrait {
    MockReadingsService::new()
}
