use std::sync::{Arc, Mutex};

use crate::models::StoredReading;
use super::errors::RepositoryError;

/// In-memory storage implementation for readings.
///
/// Backed by a Vec rather than a map: `list_all` must return readings in
/// the order they were saved, because the presentation layer's stable sort
/// treats that capture order as the tie-break order.
#[derive(Debug, Clone)]
pub struct InMemoryStorage {
    /// Stored readings, oldest first
    readings: Arc<Mutex<Vec<StoredReading>>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            readings: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Store a reading in memory
    pub async fn store_reading(&self, reading: &StoredReading) -> Result<StoredReading, RepositoryError> {
        let mut store = self.readings.lock().map_err(|e| RepositoryError::MutexLock(e.to_string()))?;
        store.push(reading.clone());
        Ok(reading.clone())
    }

    /// Get all readings from memory, in the order they were stored
    pub async fn list_all(&self) -> Result<Vec<StoredReading>, RepositoryError> {
        let store = self.readings.lock().map_err(|e| RepositoryError::MutexLock(e.to_string()))?;
        Ok(store.clone())
    }

    /// Remove a reading by ID
    pub async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let mut store = self.readings.lock().map_err(|e| RepositoryError::MutexLock(e.to_string()))?;

        let before = store.len();
        store.retain(|reading| reading.id != id);

        if store.len() == before {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
