use std::collections::BTreeMap;

use study_core::model::{FlashcardDecks, WeekId};

use super::session::FlashcardSession;

/// Flashcards for the whole course, remembering each visited week's marks.
#[derive(Debug, Clone)]
pub struct FlashcardDeck {
    decks: FlashcardDecks,
    sessions: BTreeMap<WeekId, FlashcardSession>,
    current: Option<WeekId>,
}

impl FlashcardDeck {
    #[must_use]
    pub fn new(decks: FlashcardDecks) -> Self {
        Self {
            decks,
            sessions: BTreeMap::new(),
            current: None,
        }
    }

    /// Weeks that have at least one card.
    pub fn weeks(&self) -> impl Iterator<Item = WeekId> + '_ {
        self.decks
            .iter()
            .filter(|(_, cards)| !cards.is_empty())
            .map(|(week, _)| *week)
    }

    /// Switches to `week`, starting at its first card.
    ///
    /// Revisiting a week keeps its marks. Weeks without cards leave the deck
    /// untouched and return `None`.
    pub fn select_week(&mut self, week: WeekId) -> Option<&mut FlashcardSession> {
        let cards = self.decks.get(&week)?;
        if !self.sessions.contains_key(&week) {
            let session = FlashcardSession::new(week, cards)?;
            self.sessions.insert(week, session);
        }
        self.current = Some(week);
        let session = self.sessions.get_mut(&week)?;
        session.reset_position();
        Some(session)
    }

    #[must_use]
    pub fn current_week(&self) -> Option<WeekId> {
        self.current
    }

    #[must_use]
    pub fn current(&self) -> Option<&FlashcardSession> {
        self.current.and_then(|week| self.sessions.get(&week))
    }

    pub fn current_mut(&mut self) -> Option<&mut FlashcardSession> {
        self.current.and_then(|week| self.sessions.get_mut(&week))
    }
}
