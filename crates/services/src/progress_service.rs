use std::sync::Arc;
use tokio::sync::Mutex;

use storage::ProgressStore;
use storage::repository::{KeyValueStore, StorageError};
use study_core::model::{
    ContentBundle, FlashcardProgress, ProgressRecord, QuizProgress, WeekId,
};

use crate::error::ProgressServiceError;

/// One row of the progress overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekProgressRow {
    pub week: WeekId,
    pub title: String,
    pub flashcards: FlashcardProgress,
    pub flashcard_percentage: u32,
    pub quiz_attempts: u32,
    pub quiz_percentage: u32,
}

/// Read-modify-write access to the persisted progress record.
///
/// Updates are serialized so two concurrent writers cannot lose each other's
/// changes.
#[derive(Clone)]
pub struct ProgressService {
    store: ProgressStore,
    write_lock: Arc<Mutex<()>>,
}

impl ProgressService {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store: ProgressStore::new(kv),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Writes a zeroed record for every course week when nothing usable is
    /// stored. An undecodable record is replaced.
    ///
    /// Returns true when a record was created.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn initialize(&self) -> Result<bool, ProgressServiceError> {
        let _guard = self.write_lock.lock().await;
        match self.store.load().await {
            Ok(Some(_)) => return Ok(false),
            Ok(None) => {}
            Err(StorageError::Serialization(err)) => {
                tracing::warn!(%err, "stored progress is unreadable, starting over");
            }
            Err(err) => return Err(err.into()),
        }
        self.store.save(&ProgressRecord::for_course()).await?;
        tracing::info!("progress record initialized");
        Ok(true)
    }

    /// The stored record, or an empty one when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn load(&self) -> Result<ProgressRecord, ProgressServiceError> {
        Ok(self.store.load().await?.unwrap_or_default())
    }

    /// Replaces the week's flashcard tally.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn record_flashcards(
        &self,
        week: WeekId,
        progress: FlashcardProgress,
    ) -> Result<(), ProgressServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut record = self.load().await?;
        record.set_flashcards(week, progress);
        self.store.save(&record).await?;
        tracing::debug!(%week, known = progress.known, total = progress.total, "flashcards recorded");
        Ok(())
    }

    /// Stores the quiz score and counts one more attempt.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn record_quiz(
        &self,
        week: WeekId,
        score: u32,
    ) -> Result<QuizProgress, ProgressServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut record = self.load().await?;
        let stored = record.record_quiz(week, score);
        self.store.save(&record).await?;
        tracing::info!(%week, score, attempts = stored.attempts, "quiz attempt recorded");
        Ok(stored)
    }

    /// Per-week rows for the whole course.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn overview(
        &self,
        content: &ContentBundle,
    ) -> Result<Vec<WeekProgressRow>, ProgressServiceError> {
        let record = self.load().await?;
        Ok(WeekId::all()
            .map(|week| {
                let flashcards = record.flashcards(week);
                let quiz = record.quiz(week);
                WeekProgressRow {
                    week,
                    title: content.week_title(week),
                    flashcards,
                    flashcard_percentage: flashcards.percentage(),
                    quiz_attempts: quiz.attempts,
                    quiz_percentage: quiz.percentage(),
                }
            })
            .collect())
    }

    /// Forgets all progress.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn reset(&self) -> Result<(), ProgressServiceError> {
        let _guard = self.write_lock.lock().await;
        self.store.clear().await?;
        tracing::info!("progress reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::{InMemoryStore, PROGRESS_KEY};
    use study_core::model::CheatSheet;

    fn week(n: u8) -> WeekId {
        WeekId::new(n).unwrap()
    }

    fn service() -> ProgressService {
        ProgressService::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn initialize_never_overwrites() {
        let progress = service();
        assert!(progress.initialize().await.unwrap());
        progress.record_quiz(week(2), 60).await.unwrap();

        assert!(!progress.initialize().await.unwrap());
        assert_eq!(progress.load().await.unwrap().quiz(week(2)).score, 60);
    }

    #[tokio::test]
    async fn initialize_replaces_unreadable_record() {
        let kv = Arc::new(InMemoryStore::new());
        kv.set(PROGRESS_KEY, "{not json").await.unwrap();
        let progress = ProgressService::new(kv);

        assert!(progress.load().await.is_err());
        assert!(progress.initialize().await.unwrap());
        assert_eq!(progress.load().await.unwrap(), ProgressRecord::for_course());
    }

    #[tokio::test]
    async fn overview_lists_every_week() {
        let progress = service();
        progress.initialize().await.unwrap();
        progress
            .record_flashcards(week(1), FlashcardProgress::new(7, 9))
            .await
            .unwrap();
        progress.record_quiz(week(1), 85).await.unwrap();

        let mut content = ContentBundle::default();
        content.cheatsheets.insert(
            week(1),
            CheatSheet {
                title: "Foundations".into(),
                points: vec![],
            },
        );

        let rows = progress.overview(&content).await.unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].title, "Foundations");
        assert_eq!(rows[0].flashcard_percentage, 78);
        assert_eq!(rows[0].quiz_percentage, 85);
        assert_eq!(rows[0].quiz_attempts, 1);
        assert_eq!(rows[4].title, "Week 5");
        assert_eq!(rows[4].quiz_percentage, 0);
    }

    #[tokio::test]
    async fn overview_without_stored_record_reads_zero() {
        let rows = service().overview(&ContentBundle::default()).await.unwrap();
        assert!(rows.iter().all(|r| r.flashcard_percentage == 0 && r.quiz_attempts == 0));
    }

    #[tokio::test]
    async fn reset_clears_everything() {
        let progress = service();
        progress.record_quiz(week(3), 90).await.unwrap();
        progress.reset().await.unwrap();
        assert_eq!(progress.load().await.unwrap(), ProgressRecord::default());
    }
}
