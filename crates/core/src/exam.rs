use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::{WeekId, WeekQuestion};
use crate::sampling::EXAM_SAMPLE_SIZE;
use crate::scoring::{ExamGrade, Selection, count, percentage};
use crate::timer::FinishReason;

/// Default exam length: 40 minutes.
pub const EXAM_TIME_LIMIT_SECS: u32 = 40 * 60;

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamSettingsError {
    #[error("exam question count must be > 0")]
    InvalidQuestionCount,

    #[error("exam time limit must be > 0 seconds")]
    InvalidTimeLimit,
}

/// How many questions the exam draws and how long it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamSettings {
    question_count: usize,
    time_limit_secs: u32,
}

impl Default for ExamSettings {
    fn default() -> Self {
        Self {
            question_count: EXAM_SAMPLE_SIZE,
            time_limit_secs: EXAM_TIME_LIMIT_SECS,
        }
    }
}

impl ExamSettings {
    /// # Errors
    ///
    /// Returns `ExamSettingsError` if either value is zero.
    pub fn new(question_count: usize, time_limit_secs: u32) -> Result<Self, ExamSettingsError> {
        if question_count == 0 {
            return Err(ExamSettingsError::InvalidQuestionCount);
        }
        if time_limit_secs == 0 {
            return Err(ExamSettingsError::InvalidTimeLimit);
        }
        Ok(Self {
            question_count,
            time_limit_secs,
        })
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }
}

//
// ─── RESULT ────────────────────────────────────────────────────────────────────
//

/// Number of missed exam questions that came from one week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekMisses {
    pub week: WeekId,
    pub misses: u32,
}

/// Outcome of a finished exam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamResult {
    pub correct: u32,
    pub total: u32,
    pub percentage: u32,
    pub grade: ExamGrade,
    /// Weeks with at least one miss, most misses first.
    pub weak_weeks: Vec<WeekMisses>,
    pub elapsed_secs: u32,
    pub reason: FinishReason,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Timing facts about an attempt, recorded by the session that ran it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptTiming {
    pub elapsed_secs: u32,
    pub reason: FinishReason,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Scores an exam. `answers[i]` belongs to `questions[i]`; a missing or
/// empty answer counts as a miss.
#[must_use]
pub fn score_exam(
    questions: &[WeekQuestion],
    answers: &[Selection],
    timing: AttemptTiming,
) -> ExamResult {
    let mut correct = 0_u32;
    let mut misses: BTreeMap<WeekId, u32> = BTreeMap::new();

    for (idx, item) in questions.iter().enumerate() {
        let hit = answers
            .get(idx)
            .is_some_and(|sel| sel.matches(&item.question.answer));
        if hit {
            correct = correct.saturating_add(1);
        } else {
            *misses.entry(item.week).or_insert(0) += 1;
        }
    }

    let mut weak_weeks: Vec<WeekMisses> = misses
        .into_iter()
        .map(|(week, misses)| WeekMisses { week, misses })
        .collect();
    // Stable sort keeps week order among equal counts.
    weak_weeks.sort_by(|a, b| b.misses.cmp(&a.misses));

    let total = count(questions.len());
    let pct = percentage(correct, total);

    ExamResult {
        correct,
        total,
        percentage: pct,
        grade: ExamGrade::for_percentage(pct),
        weak_weeks,
        elapsed_secs: timing.elapsed_secs,
        reason: timing.reason,
        started_at: timing.started_at,
        finished_at: timing.finished_at,
    }
}
