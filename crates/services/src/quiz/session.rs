use study_core::model::{Question, WeekId};
use study_core::scoring::{QuestionReview, QuizFeedback, Selection, count, percentage};

use crate::error::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// The current question is open for selection.
    Answering,
    /// The current question was checked; its answer is frozen.
    Reviewing,
    Finished,
}

/// Feedback for one checked question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerCheck {
    pub is_correct: bool,
    pub correct: Vec<usize>,
    /// Picked options that are not part of the answer.
    pub wrong_picks: Vec<usize>,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResults {
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
    pub feedback: QuizFeedback,
}

/// One attempt at a week's quiz.
#[derive(Debug, Clone)]
pub struct QuizSession {
    week: WeekId,
    questions: Vec<Question>,
    answers: Vec<Selection>,
    index: usize,
    phase: QuizPhase,
    score: u32,
    recorded: bool,
}

impl QuizSession {
    /// Returns `None` when the week has no questions.
    #[must_use]
    pub fn new(week: WeekId, questions: &[Question]) -> Option<Self> {
        if questions.is_empty() {
            return None;
        }
        Some(Self {
            week,
            questions: questions.to_vec(),
            answers: vec![Selection::new(); questions.len()],
            index: 0,
            phase: QuizPhase::Answering,
            score: 0,
            recorded: false,
        })
    }

    #[must_use]
    pub fn week(&self) -> WeekId {
        self.week
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    /// Zero-based index of the current question.
    #[must_use]
    pub fn position(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current(&self) -> Option<&Question> {
        if self.phase == QuizPhase::Finished {
            return None;
        }
        self.questions.get(self.index)
    }

    #[must_use]
    pub fn selection(&self) -> Option<&Selection> {
        self.answers.get(self.index)
    }

    /// Toggles `option` on the current question.
    ///
    /// While the question is being reviewed the selection is left as is.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after the last question, or
    /// `SessionError::InvalidOption` for an option the question lacks.
    pub fn select(&mut self, option: usize) -> Result<&Selection, SessionError> {
        let question = self.current().ok_or(SessionError::Completed)?;
        if !question.has_option(option) {
            return Err(SessionError::InvalidOption {
                index: option,
                options: question.options.len(),
            });
        }
        let single = question.is_single_answer();
        if self.phase == QuizPhase::Answering {
            self.answers[self.index].toggle(option, single);
        }
        Ok(&self.answers[self.index])
    }

    /// Scores the current question and freezes its answer.
    ///
    /// Checking again while reviewing repeats the feedback without rescoring.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after the last question, or
    /// `SessionError::NoSelection` when nothing was picked.
    pub fn check(&mut self) -> Result<AnswerCheck, SessionError> {
        let question = self.current().ok_or(SessionError::Completed)?;
        let selection = &self.answers[self.index];
        if selection.is_empty() {
            return Err(SessionError::NoSelection);
        }
        let is_correct = selection.matches(&question.answer);
        let mut correct = question.answer.clone();
        correct.sort_unstable();
        correct.dedup();
        let mut wrong_picks: Vec<usize> = selection
            .as_slice()
            .iter()
            .copied()
            .filter(|idx| !question.is_correct_option(*idx))
            .collect();
        wrong_picks.sort_unstable();
        let check = AnswerCheck {
            is_correct,
            correct,
            wrong_picks,
            explanation: question.explanation.clone(),
        };

        if self.phase == QuizPhase::Answering {
            if is_correct {
                self.score = self.score.saturating_add(1);
            }
            self.phase = QuizPhase::Reviewing;
        }
        Ok(check)
    }

    /// Moves past a checked question. Returns the new phase.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotChecked` while still answering, or
    /// `SessionError::Completed` after the last question.
    pub fn next(&mut self) -> Result<QuizPhase, SessionError> {
        match self.phase {
            QuizPhase::Answering => Err(SessionError::NotChecked),
            QuizPhase::Finished => Err(SessionError::Completed),
            QuizPhase::Reviewing => {
                self.index += 1;
                self.phase = if self.index >= self.questions.len() {
                    QuizPhase::Finished
                } else {
                    QuizPhase::Answering
                };
                Ok(self.phase)
            }
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == QuizPhase::Finished
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` before the last question is done.
    pub fn results(&self) -> Result<QuizResults, SessionError> {
        if !self.is_finished() {
            return Err(SessionError::NotFinished);
        }
        let total = count(self.questions.len());
        let pct = percentage(self.score, total);
        Ok(QuizResults {
            score: self.score,
            total,
            percentage: pct,
            feedback: QuizFeedback::for_percentage(pct),
        })
    }

    /// Every question with the answer given for it.
    #[must_use]
    pub fn review(&self) -> Vec<QuestionReview> {
        self.questions
            .iter()
            .zip(&self.answers)
            .map(|(question, selection)| QuestionReview::new(question, Some(selection)))
            .collect()
    }

    /// Whether this attempt was already written to progress.
    #[must_use]
    pub fn is_recorded(&self) -> bool {
        self.recorded
    }

    pub(crate) fn set_recorded(&mut self) {
        self.recorded = true;
    }

    /// Begins a fresh attempt over the same questions.
    pub fn restart(&mut self) {
        self.answers.fill(Selection::new());
        self.index = 0;
        self.phase = QuizPhase::Answering;
        self.score = 0;
        self.recorded = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: usize, answer: Vec<usize>) -> Question {
        Question {
            prompt: "q".into(),
            options: (0..options).map(|i| format!("o{i}")).collect(),
            answer,
            explanation: "because".into(),
        }
    }

    fn session() -> QuizSession {
        QuizSession::new(
            WeekId::new(2).unwrap(),
            &[question(3, vec![1]), question(4, vec![0, 2])],
        )
        .unwrap()
    }

    #[test]
    fn single_answer_selection_replaces() {
        let mut s = session();
        s.select(0).unwrap();
        assert_eq!(s.select(2).unwrap().as_slice(), &[2]);
        assert!(s.select(2).unwrap().is_empty());
    }

    #[test]
    fn invalid_option_is_rejected() {
        let mut s = session();
        assert!(matches!(
            s.select(3),
            Err(SessionError::InvalidOption { index: 3, options: 3 })
        ));
    }

    #[test]
    fn check_needs_selection_and_freezes_answer() {
        let mut s = session();
        assert!(matches!(s.check(), Err(SessionError::NoSelection)));
        assert!(matches!(s.next(), Err(SessionError::NotChecked)));

        s.select(0).unwrap();
        let check = s.check().unwrap();
        assert!(!check.is_correct);
        assert_eq!(check.correct, vec![1]);
        assert_eq!(check.wrong_picks, vec![0]);
        assert_eq!(s.phase(), QuizPhase::Reviewing);

        s.select(1).unwrap();
        assert_eq!(s.selection().unwrap().as_slice(), &[0]);
        s.check().unwrap();
        assert_eq!(s.next().unwrap(), QuizPhase::Answering);
    }

    #[test]
    fn full_run_produces_results() {
        let mut s = session();
        assert!(matches!(s.results(), Err(SessionError::NotFinished)));

        s.select(1).unwrap();
        assert!(s.check().unwrap().is_correct);
        s.next().unwrap();

        s.select(2).unwrap();
        s.select(0).unwrap();
        assert!(s.check().unwrap().is_correct);
        assert_eq!(s.next().unwrap(), QuizPhase::Finished);
        assert!(s.current().is_none());

        let results = s.results().unwrap();
        assert_eq!(results.score, 2);
        assert_eq!(results.percentage, 100);
        assert_eq!(results.feedback, QuizFeedback::Excellent);

        let review = s.review();
        assert_eq!(review.len(), 2);
        assert!(review.iter().all(|r| r.is_correct));
        assert!(matches!(s.select(0), Err(SessionError::Completed)));
    }

    #[test]
    fn restart_clears_the_attempt() {
        let mut s = session();
        s.select(1).unwrap();
        s.check().unwrap();
        s.next().unwrap();
        s.restart();
        assert_eq!(s.position(), 0);
        assert_eq!(s.phase(), QuizPhase::Answering);
        assert!(s.selection().unwrap().is_empty());
    }
}
