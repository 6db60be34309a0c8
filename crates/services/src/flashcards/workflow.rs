use study_core::model::FlashcardProgress;

use crate::error::SessionError;
use crate::progress_service::ProgressService;

use super::session::FlashcardSession;

/// Marks cards and persists the week's tally after every mark.
#[derive(Clone)]
pub struct FlashcardService {
    progress: ProgressService,
}

impl FlashcardService {
    #[must_use]
    pub fn new(progress: ProgressService) -> Self {
        Self { progress }
    }

    /// Mark the current card and store the updated tally.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when the card cannot be marked or the tally
    /// cannot be stored.
    pub async fn mark(
        &self,
        session: &mut FlashcardSession,
        known: bool,
    ) -> Result<FlashcardProgress, SessionError> {
        let tally = session.mark(known)?;
        self.progress
            .record_flashcards(session.week(), tally)
            .await?;
        Ok(tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use storage::InMemoryStore;
    use study_core::model::{Flashcard, WeekId};

    #[tokio::test]
    async fn every_mark_is_persisted() {
        let progress = ProgressService::new(Arc::new(InMemoryStore::new()));
        let service = FlashcardService::new(progress.clone());
        let week = WeekId::new(5).unwrap();
        let cards = vec![Flashcard::new("a", "1"), Flashcard::new("b", "2")];
        let mut session = FlashcardSession::new(week, &cards).unwrap();

        session.flip().unwrap();
        service.mark(&mut session, true).await.unwrap();
        assert_eq!(
            progress.load().await.unwrap().flashcards(week),
            FlashcardProgress::new(1, 2)
        );

        session.flip().unwrap();
        service.mark(&mut session, false).await.unwrap();
        assert_eq!(
            progress.load().await.unwrap().flashcards(week),
            FlashcardProgress::new(1, 2)
        );
    }

    #[tokio::test]
    async fn rejected_mark_stores_nothing() {
        let progress = ProgressService::new(Arc::new(InMemoryStore::new()));
        let service = FlashcardService::new(progress.clone());
        let week = WeekId::new(5).unwrap();
        let mut session = FlashcardSession::new(week, &[Flashcard::new("a", "1")]).unwrap();

        let err = service.mark(&mut session, true).await.unwrap_err();
        assert!(matches!(err, SessionError::NotRevealed));
        assert!(progress.load().await.unwrap().flashcards.is_empty());
    }
}
