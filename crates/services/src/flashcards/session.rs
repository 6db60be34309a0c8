use study_core::model::{Flashcard, FlashcardProgress, WeekId};
use study_core::scoring::{count, percentage};

use crate::error::SessionError;

/// How the user rated a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardMark {
    Known,
    Unknown,
}

/// The side of the current card that is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFace<'a> {
    Front(&'a str),
    Back(&'a str),
}

/// Shown once every card of the week has been marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashcardSummary {
    pub known: u32,
    pub unknown: u32,
    pub percentage: u32,
}

/// One pass through a week's flashcards.
#[derive(Debug, Clone)]
pub struct FlashcardSession {
    week: WeekId,
    cards: Vec<Flashcard>,
    index: usize,
    flipped: bool,
    marks: Vec<Option<CardMark>>,
}

impl FlashcardSession {
    /// Returns `None` when the week has no cards.
    #[must_use]
    pub fn new(week: WeekId, cards: &[Flashcard]) -> Option<Self> {
        if cards.is_empty() {
            return None;
        }
        Some(Self {
            week,
            cards: cards.to_vec(),
            index: 0,
            flipped: false,
            marks: vec![None; cards.len()],
        })
    }

    #[must_use]
    pub fn week(&self) -> WeekId {
        self.week
    }

    /// Zero-based index of the current card.
    #[must_use]
    pub fn position(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.index >= self.cards.len()
    }

    #[must_use]
    pub fn current(&self) -> Option<&Flashcard> {
        self.cards.get(self.index)
    }

    #[must_use]
    pub fn face(&self) -> Option<CardFace<'_>> {
        self.current().map(|card| {
            if self.flipped {
                CardFace::Back(&card.back)
            } else {
                CardFace::Front(&card.front)
            }
        })
    }

    /// Turns the current card over. Returns whether the back is showing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` when every card was already marked.
    pub fn flip(&mut self) -> Result<bool, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        self.flipped = !self.flipped;
        Ok(self.flipped)
    }

    /// Marks the current card and moves on.
    ///
    /// Returns the tally to persist. Marking a card that already had a mark
    /// overwrites it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` past the last card, or
    /// `SessionError::NotRevealed` while the front is showing.
    pub fn mark(&mut self, known: bool) -> Result<FlashcardProgress, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        if !self.flipped {
            return Err(SessionError::NotRevealed);
        }
        self.marks[self.index] = Some(if known {
            CardMark::Known
        } else {
            CardMark::Unknown
        });
        self.index += 1;
        self.flipped = false;
        Ok(self.tally())
    }

    /// Cards currently marked known against the deck size.
    #[must_use]
    pub fn tally(&self) -> FlashcardProgress {
        FlashcardProgress::new(self.count_marks(CardMark::Known), count(self.cards.len()))
    }

    /// Number of cards that carry a mark.
    #[must_use]
    pub fn reviewed(&self) -> usize {
        self.marks.iter().filter(|m| m.is_some()).count()
    }

    #[must_use]
    pub fn mark_at(&self, index: usize) -> Option<CardMark> {
        self.marks.get(index).copied().flatten()
    }

    /// `None` until the last card is marked.
    #[must_use]
    pub fn summary(&self) -> Option<FlashcardSummary> {
        if !self.is_complete() {
            return None;
        }
        let known = self.count_marks(CardMark::Known);
        Some(FlashcardSummary {
            known,
            unknown: self.count_marks(CardMark::Unknown),
            percentage: percentage(known, count(self.cards.len())),
        })
    }

    /// Starts over with every mark cleared.
    pub fn restart(&mut self) {
        self.marks.fill(None);
        self.reset_position();
    }

    /// Back to the first card, front up. Marks are kept.
    pub fn reset_position(&mut self) {
        self.index = 0;
        self.flipped = false;
    }

    fn count_marks(&self, wanted: CardMark) -> u32 {
        count(self.marks.iter().filter(|m| **m == Some(wanted)).count())
    }
}
