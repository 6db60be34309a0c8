use crate::error::SessionError;
use crate::progress_service::ProgressService;

use super::session::{QuizResults, QuizSession};

/// Writes finished quiz attempts to progress.
#[derive(Clone)]
pub struct QuizService {
    progress: ProgressService,
}

impl QuizService {
    #[must_use]
    pub fn new(progress: ProgressService) -> Self {
        Self { progress }
    }

    /// Records a finished attempt: the percentage becomes the week's score and
    /// the attempt count goes up by one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` for an unfinished session,
    /// `SessionError::AlreadyRecorded` when this attempt was already stored,
    /// or a progress error.
    pub async fn complete(&self, session: &mut QuizSession) -> Result<QuizResults, SessionError> {
        let results = session.results()?;
        if session.is_recorded() {
            return Err(SessionError::AlreadyRecorded);
        }
        self.progress
            .record_quiz(session.week(), results.percentage)
            .await?;
        session.set_recorded();
        Ok(results)
    }
}
