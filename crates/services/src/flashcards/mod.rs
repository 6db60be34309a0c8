mod deck;
mod session;
mod workflow;

pub use crate::error::SessionError;
pub use deck::FlashcardDeck;
pub use session::{CardFace, CardMark, FlashcardSession, FlashcardSummary};
pub use workflow::FlashcardService;
