use async_trait::async_trait;
use tracing::debug;

use crate::models::StoredReading;
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;

/// Repository trait for persisted readings.
///
/// This is the full contract the domain layer depends on; storage engines
/// (document stores, embedded databases) implement it outside this crate.
#[async_trait]
pub trait ReadingRepositoryTrait {
    /// Persist one reading
    async fn save(&self, reading: StoredReading) -> Result<StoredReading, RepositoryError>;

    /// Get every stored reading, in the order it was saved
    async fn list_all(&self) -> Result<Vec<StoredReading>, RepositoryError>;

    /// Remove one reading by ID
    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;
}

/// Default repository for readings, backed by in-memory storage.
#[derive(Debug, Clone, Default)]
pub struct ReadingRepository {
    /// In-memory storage for readings
    storage: InMemoryStorage,
}

impl ReadingRepository {
    /// Create a new repository
    pub fn new() -> Self {
        Self {
            storage: InMemoryStorage::new(),
        }
    }
}

#[async_trait]
impl ReadingRepositoryTrait for ReadingRepository {
    /// Persist one reading
    async fn save(&self, reading: StoredReading) -> Result<StoredReading, RepositoryError> {
        debug!("Storing reading: {}", reading.id);
        self.storage.store_reading(&reading).await
    }

    /// Get every stored reading, in the order it was saved
    async fn list_all(&self) -> Result<Vec<StoredReading>, RepositoryError> {
        debug!("Listing all stored readings");
        self.storage.list_all().await
    }

    /// Remove one reading by ID
    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        debug!("Deleting reading: {}", id);
        self.storage.delete(id).await
    }
}

/// Mock reading repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock implementation of ReadingRepository for testing
    pub struct MockReadingRepository {
        readings: Mutex<Vec<StoredReading>>,
        fail_save: bool,
        fail_list: bool,
    }

    impl Default for MockReadingRepository {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockReadingRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self {
                readings: Mutex::new(Vec::new()),
                fail_save: false,
                fail_list: false,
            }
        }

        /// Create a mock repository with predefined readings
        pub fn with_readings(readings: Vec<StoredReading>) -> Self {
            Self {
                readings: Mutex::new(readings),
                fail_save: false,
                fail_list: false,
            }
        }

        /// Configure the mock to fail every save
        pub fn with_save_failure(mut self) -> Self {
            self.fail_save = true;
            self
        }

        /// Configure the mock to fail every list
        pub fn with_list_failure(mut self) -> Self {
            self.fail_list = true;
            self
        }
    }

    #[async_trait]
    impl ReadingRepositoryTrait for MockReadingRepository {
        async fn save(&self, reading: StoredReading) -> Result<StoredReading, RepositoryError> {
            if self.fail_save {
                return Err(RepositoryError::Storage(
                    "mock is configured to fail save".to_string(),
                ));
            }

            let mut readings = self.readings.lock()?;
            readings.push(reading.clone());
            Ok(reading)
        }

        async fn list_all(&self) -> Result<Vec<StoredReading>, RepositoryError> {
            if self.fail_list {
                return Err(RepositoryError::Storage(
                    "mock is configured to fail list".to_string(),
                ));
            }

            let readings = self.readings.lock()?;
            Ok(readings.clone())
        }

        async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
            let mut readings = self.readings.lock()?;

            let before = readings.len();
            readings.retain(|reading| reading.id != id);

            if readings.len() == before {
                return Err(RepositoryError::NotFound(id.to_string()));
            }
            Ok(())
        }
    }
}
