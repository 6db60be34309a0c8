use std::sync::Arc;

use study_core::model::ProgressRecord;

use crate::repository::{KeyValueStore, StorageError};

/// Key under which the progress record lives.
pub const PROGRESS_KEY: &str = "progress";

/// Reads and writes the whole progress record as one JSON value.
#[derive(Clone)]
pub struct ProgressStore {
    kv: Arc<dyn KeyValueStore>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load the stored record; `None` when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored value is not a
    /// progress record, or backend errors.
    pub async fn load(&self) -> Result<Option<ProgressRecord>, StorageError> {
        let Some(raw) = self.kv.get(PROGRESS_KEY).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    /// Replace the stored record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be encoded or written.
    pub async fn save(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let raw = serde_json::to_string(record)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.kv.set(PROGRESS_KEY, &raw).await?;
        tracing::trace!(bytes = raw.len(), "progress record saved");
        Ok(())
    }

    /// Forget all progress.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.kv.remove(PROGRESS_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;
    use study_core::model::{FlashcardProgress, WeekId};

    #[tokio::test]
    async fn round_trips_the_record() {
        let store = ProgressStore::new(Arc::new(InMemoryStore::new()));
        assert!(store.load().await.unwrap().is_none());

        let mut record = ProgressRecord::for_course();
        let week = WeekId::new(4).unwrap();
        record.set_flashcards(week, FlashcardProgress::new(3, 8));
        record.record_quiz(week, 75);
        store.save(&record).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, record);

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_value_is_a_serialization_error() {
        let kv = Arc::new(InMemoryStore::new());
        kv.set(PROGRESS_KEY, "not json").await.unwrap();
        let store = ProgressStore::new(kv);
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
