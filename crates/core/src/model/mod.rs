mod cheatsheet;
mod content;
mod flashcard;
mod progress;
mod question;
mod week;

pub use cheatsheet::CheatSheet;
pub use content::{CheatSheets, ContentBundle, ContentIssue, FlashcardDecks, QuestionBank};
pub use flashcard::Flashcard;
pub use progress::{FlashcardProgress, ProgressRecord, QuizProgress};
pub use question::{Question, WeekQuestion};
pub use week::{COURSE_WEEKS, WeekId, WeekIdError};
