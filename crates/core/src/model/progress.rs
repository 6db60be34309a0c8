use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::WeekId;
use crate::scoring::percentage;

/// Flashcard mastery for one week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardProgress {
    pub known: u32,
    pub total: u32,
}

impl FlashcardProgress {
    #[must_use]
    pub fn new(known: u32, total: u32) -> Self {
        Self { known, total }
    }

    #[must_use]
    pub fn percentage(&self) -> u32 {
        percentage(self.known, self.total)
    }
}

/// Quiz mastery for one week: the latest score only, plus how many attempts
/// were completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizProgress {
    pub score: u32,
    pub attempts: u32,
}

impl QuizProgress {
    /// The score to display; weeks never attempted read as 0.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        if self.attempts > 0 { self.score } else { 0 }
    }
}

/// The persisted progress blob, read and written wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    #[serde(default)]
    pub flashcards: BTreeMap<WeekId, FlashcardProgress>,
    #[serde(default)]
    pub quizzes: BTreeMap<WeekId, QuizProgress>,
}

impl ProgressRecord {
    /// A record with zeroed entries for every course week.
    #[must_use]
    pub fn for_course() -> Self {
        Self {
            flashcards: WeekId::all()
                .map(|w| (w, FlashcardProgress::default()))
                .collect(),
            quizzes: WeekId::all().map(|w| (w, QuizProgress::default())).collect(),
        }
    }

    /// Replaces the week's flashcard entry with the latest tally.
    pub fn set_flashcards(&mut self, week: WeekId, progress: FlashcardProgress) {
        self.flashcards.insert(week, progress);
    }

    /// Stores the latest quiz score and counts the attempt.
    pub fn record_quiz(&mut self, week: WeekId, score: u32) -> QuizProgress {
        let entry = self.quizzes.entry(week).or_default();
        entry.score = score;
        entry.attempts = entry.attempts.saturating_add(1);
        *entry
    }

    #[must_use]
    pub fn flashcards(&self, week: WeekId) -> FlashcardProgress {
        self.flashcards.get(&week).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn quiz(&self, week: WeekId) -> QuizProgress {
        self.quizzes.get(&week).copied().unwrap_or_default()
    }
}
