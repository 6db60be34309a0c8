mod session;
mod timer;

pub use crate::error::SessionError;
pub use session::{ExamSession, ExamStep, ExamTick};
pub use timer::{ExamTimer, TICK_PERIOD, TimerTick};
