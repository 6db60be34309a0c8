use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use study_core::Clock;
use study_core::exam::{AttemptTiming, ExamResult, ExamSettings, score_exam};
use study_core::model::{QuestionBank, WeekQuestion};
use study_core::sampling::sample_questions;
use study_core::scoring::{QuestionReview, Selection};
use study_core::timer::{Countdown, FinishReason, TickOutcome};

use crate::error::SessionError;

/// What happened after moving past a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExamStep {
    /// Now on the question at this index.
    Next(usize),
    Finished(ExamResult),
}

/// What a timer tick did to the exam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExamTick {
    Running { remaining: u32, low: bool },
    /// Time ran out on this tick and the exam was submitted.
    Expired(ExamResult),
    /// The exam was not running.
    Idle,
}

/// A timed exam drawn from every week's questions.
#[derive(Debug, Clone)]
pub struct ExamSession {
    questions: Vec<WeekQuestion>,
    answers: Vec<Selection>,
    index: usize,
    countdown: Countdown,
    clock: Clock,
    started_at: DateTime<Utc>,
    result: Option<ExamResult>,
}

impl ExamSession {
    /// Draws the questions and starts the countdown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when the bank has no questions.
    pub fn start<R>(
        bank: &QuestionBank,
        settings: ExamSettings,
        rng: &mut R,
        clock: Clock,
    ) -> Result<Self, SessionError>
    where
        R: Rng + ?Sized,
    {
        let questions = sample_questions(bank, settings.question_count(), rng);
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        let mut countdown = Countdown::new(settings.time_limit_secs());
        countdown.start();
        tracing::info!(
            questions = questions.len(),
            limit_secs = settings.time_limit_secs(),
            "exam started"
        );
        Ok(Self {
            answers: vec![Selection::new(); questions.len()],
            questions,
            index: 0,
            countdown,
            clock,
            started_at: clock.now(),
            result: None,
        })
    }

    #[must_use]
    pub fn questions(&self) -> &[WeekQuestion] {
        &self.questions
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
    pub fn current(&self) -> Option<&WeekQuestion> {
        if self.is_finished() {
            return None;
        }
        self.questions.get(self.index)
    }

    #[must_use]
    pub fn selection(&self) -> Option<&Selection> {
        self.answers.get(self.index)
    }

    #[must_use]
    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    #[must_use]
    pub fn result(&self) -> Option<&ExamResult> {
        self.result.as_ref()
    }

    /// Picks `option` on the current question. Single-answer questions
    /// replace the pick, multi-answer questions toggle it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once the exam is over, or
    /// `SessionError::InvalidOption` for an option the question lacks.
    pub fn select(&mut self, option: usize) -> Result<&Selection, SessionError> {
        let item = self.current().ok_or(SessionError::Completed)?;
        if !item.question.has_option(option) {
            return Err(SessionError::InvalidOption {
                index: option,
                options: item.question.options.len(),
            });
        }
        let single = item.question.is_single_answer();
        self.answers[self.index].pick(option, single);
        Ok(&self.answers[self.index])
    }

    /// Moves to the next question, submitting after the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once the exam is over, or
    /// `SessionError::NoSelection` when the current question is unanswered.
    pub fn advance(&mut self) -> Result<ExamStep, SessionError> {
        if self.is_finished() {
            return Err(SessionError::Completed);
        }
        if self.answers[self.index].is_empty() {
            return Err(SessionError::NoSelection);
        }
        if self.index + 1 >= self.questions.len() {
            self.countdown.submit();
            return Ok(ExamStep::Finished(self.finish(FinishReason::Submitted)));
        }
        self.index += 1;
        Ok(ExamStep::Next(self.index))
    }

    /// Ends the exam now. Unanswered questions count as misses.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` when the exam already ended.
    pub fn submit(&mut self) -> Result<ExamResult, SessionError> {
        if self.is_finished() {
            return Err(SessionError::Completed);
        }
        self.countdown.submit();
        Ok(self.finish(FinishReason::Submitted))
    }

    /// Counts down one second, submitting when time runs out.
    pub fn tick(&mut self) -> ExamTick {
        if self.is_finished() {
            return ExamTick::Idle;
        }
        match self.countdown.tick() {
            TickOutcome::Running(remaining) => {
                self.clock.advance(Duration::seconds(1));
                ExamTick::Running {
                    remaining,
                    low: self.countdown.is_low(),
                }
            }
            TickOutcome::Expired => {
                self.clock.advance(Duration::seconds(1));
                ExamTick::Expired(self.finish(FinishReason::TimedOut))
            }
            TickOutcome::Idle => ExamTick::Idle,
        }
    }

    /// Every question with its pick, in exam order.
    #[must_use]
    pub fn review(&self) -> Vec<QuestionReview> {
        self.questions
            .iter()
            .zip(&self.answers)
            .map(|(item, selection)| QuestionReview::new(&item.question, Some(selection)))
            .collect()
    }

    fn finish(&mut self, reason: FinishReason) -> ExamResult {
        let timing = AttemptTiming {
            elapsed_secs: self.countdown.elapsed(),
            reason,
            started_at: self.started_at,
            finished_at: self.clock.now(),
        };
        let result = score_exam(&self.questions, &self.answers, timing);
        tracing::info!(
            correct = result.correct,
            total = result.total,
            elapsed_secs = result.elapsed_secs,
            reason = ?reason,
            "exam finished"
        );
        self.result = Some(result.clone());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use study_core::model::{Question, WeekId};
    use study_core::scoring::ExamGrade;
    use study_core::time::{fixed_clock, fixed_now};

    fn bank(weeks: u8, per_week: usize) -> QuestionBank {
        (1..=weeks)
            .map(|w| {
                let questions = (0..per_week)
                    .map(|i| Question {
                        prompt: format!("w{w} q{i}"),
                        options: vec!["a".into(), "b".into(), "c".into()],
                        answer: vec![0],
                        explanation: String::new(),
                    })
                    .collect();
                (WeekId::new(w).unwrap(), questions)
            })
            .collect()
    }

    fn start(bank: &QuestionBank, count: usize, secs: u32) -> ExamSession {
        let settings = ExamSettings::new(count, secs).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        ExamSession::start(bank, settings, &mut rng, fixed_clock()).unwrap()
    }

    #[test]
    fn empty_bank_cannot_start() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = ExamSession::start(
            &QuestionBank::new(),
            ExamSettings::default(),
            &mut rng,
            fixed_clock(),
        )
        .unwrap_err();
        assert!(matches!(err, SessionError::Empty));
    }

    #[test]
    fn samples_requested_count() {
        let exam = start(&bank(10, 5), 30, 2400);
        assert_eq!(exam.total(), 30);
        assert!(exam.countdown().is_running());
    }

    #[test]
    fn advance_requires_answer_and_submits_after_last() {
        let bank = bank(1, 2);
        let mut exam = start(&bank, 2, 60);
        assert!(matches!(exam.advance(), Err(SessionError::NoSelection)));

        exam.select(0).unwrap();
        assert_eq!(exam.advance().unwrap(), ExamStep::Next(1));
        exam.select(1).unwrap();
        exam.select(0).unwrap();
        let ExamStep::Finished(result) = exam.advance().unwrap() else {
            panic!("expected the exam to finish");
        };
        assert_eq!(result.correct, 2);
        assert_eq!(result.grade, ExamGrade::A);
        assert_eq!(result.reason, FinishReason::Submitted);
        assert!(matches!(exam.submit(), Err(SessionError::Completed)));
        assert_eq!(exam.tick(), ExamTick::Idle);
    }

    #[test]
    fn early_submit_counts_unanswered_as_misses() {
        let bank = bank(3, 1);
        let mut exam = start(&bank, 3, 60);
        exam.select(0).unwrap();
        exam.tick();
        exam.tick();

        let result = exam.submit().unwrap();
        assert_eq!(result.correct, 1);
        assert_eq!(result.total, 3);
        assert_eq!(result.elapsed_secs, 2);
        assert_eq!(result.finished_at, fixed_now() + Duration::seconds(2));
        assert_eq!(result.weak_weeks.len(), 2);
        assert!(result.weak_weeks.iter().all(|w| w.misses == 1));
    }

    #[test]
    fn expiry_submits_exactly_once() {
        let bank = bank(2, 2);
        let mut exam = start(&bank, 4, 3);
        assert_eq!(
            exam.tick(),
            ExamTick::Running {
                remaining: 2,
                low: true,
            }
        );
        exam.tick();
        let ExamTick::Expired(result) = exam.tick() else {
            panic!("expected expiry");
        };
        assert_eq!(result.reason, FinishReason::TimedOut);
        assert_eq!(result.elapsed_secs, 3);
        assert_eq!(result.correct, 0);
        assert_eq!(exam.tick(), ExamTick::Idle);
        assert_eq!(exam.result(), Some(&result));
    }

    #[test]
    fn single_answer_pick_replaces() {
        let bank = bank(1, 1);
        let mut exam = start(&bank, 1, 60);
        exam.select(1).unwrap();
        assert_eq!(exam.select(1).unwrap().as_slice(), &[1]);
        assert_eq!(exam.select(2).unwrap().as_slice(), &[2]);
        assert!(matches!(
            exam.select(5),
            Err(SessionError::InvalidOption { index: 5, options: 3 })
        ));
    }

    #[test]
    fn review_follows_exam_order() {
        let bank = bank(2, 1);
        let mut exam = start(&bank, 2, 60);
        exam.select(0).unwrap();
        exam.submit().unwrap();
        let review = exam.review();
        assert_eq!(review.len(), 2);
        assert!(review[0].is_correct);
        assert!(!review[1].is_correct);
        assert_eq!(review[0].prompt, exam.questions()[0].question.prompt);
    }
}
