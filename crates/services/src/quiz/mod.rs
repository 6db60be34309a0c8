mod session;
mod workflow;

pub use crate::error::SessionError;
pub use session::{AnswerCheck, QuizPhase, QuizResults, QuizSession};
pub use workflow::QuizService;
