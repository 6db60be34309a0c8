use std::sync::Arc;

use rand::Rng;

use storage::repository::Storage;
use study_core::Clock;
use study_core::exam::ExamSettings;
use study_core::model::{ContentBundle, WeekId};

use crate::cheatsheet::{self, CheatSheetSection};
use crate::content::{ContentSource, load_content};
use crate::error::{AppServicesError, SessionError};
use crate::exam::ExamSession;
use crate::flashcards::{FlashcardDeck, FlashcardService};
use crate::progress_service::ProgressService;
use crate::quiz::{QuizService, QuizSession};
use crate::search::{self, SearchOutcome};

/// Assembles app-facing services around loaded content and stored progress.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    exam_settings: ExamSettings,
    content: Arc<ContentBundle>,
    progress: ProgressService,
    flashcards: FlashcardService,
    quiz: QuizService,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and content from `source`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage cannot be opened, content cannot
    /// be loaded, or progress cannot be initialized.
    pub async fn new_sqlite(
        db_url: &str,
        source: &ContentSource,
        clock: Clock,
        exam_settings: ExamSettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let content = load_content(source).await?;
        Self::with_storage(&storage, content, clock, exam_settings).await
    }

    /// Build services over in-memory storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if progress cannot be initialized.
    pub async fn in_memory(
        content: ContentBundle,
        clock: Clock,
        exam_settings: ExamSettings,
    ) -> Result<Self, AppServicesError> {
        Self::with_storage(&Storage::in_memory(), content, clock, exam_settings).await
    }

    /// Build services over an already opened store.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if progress cannot be initialized.
    pub async fn with_storage(
        storage: &Storage,
        content: ContentBundle,
        clock: Clock,
        exam_settings: ExamSettings,
    ) -> Result<Self, AppServicesError> {
        let progress = ProgressService::new(Arc::clone(&storage.kv));
        progress.initialize().await?;
        Ok(Self {
            clock,
            exam_settings,
            content: Arc::new(content),
            flashcards: FlashcardService::new(progress.clone()),
            quiz: QuizService::new(progress.clone()),
            progress,
        })
    }

    #[must_use]
    pub fn content(&self) -> Arc<ContentBundle> {
        Arc::clone(&self.content)
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressService {
        &self.progress
    }

    #[must_use]
    pub fn flashcards(&self) -> &FlashcardService {
        &self.flashcards
    }

    #[must_use]
    pub fn quiz(&self) -> &QuizService {
        &self.quiz
    }

    #[must_use]
    pub fn exam_settings(&self) -> ExamSettings {
        self.exam_settings
    }

    #[must_use]
    pub fn cheatsheets(&self) -> Vec<CheatSheetSection> {
        cheatsheet::sections(&self.content)
    }

    #[must_use]
    pub fn search(&self, query: &str) -> SearchOutcome {
        search::search(&self.content, query)
    }

    #[must_use]
    pub fn flashcard_deck(&self) -> FlashcardDeck {
        FlashcardDeck::new(self.content.flashcards.clone())
    }

    /// `None` when the week has no questions.
    #[must_use]
    pub fn start_quiz(&self, week: WeekId) -> Option<QuizSession> {
        QuizSession::new(week, self.content.questions_for(week)?)
    }

    /// # Errors
    ///
    /// Returns `SessionError::Empty` when no week has questions.
    pub fn start_exam<R>(&self, rng: &mut R) -> Result<ExamSession, SessionError>
    where
        R: Rng + ?Sized,
    {
        ExamSession::start(&self.content.questions, self.exam_settings, rng, self.clock)
    }
}
