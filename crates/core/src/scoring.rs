//! Answer checking, percentages and the feedback tiers shown after a quiz or exam.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::Question;

/// Returns true when the selected options are exactly the correct options.
///
/// Order and duplicates are irrelevant.
#[must_use]
pub fn is_correct(selected: &[usize], correct: &[usize]) -> bool {
    let selected: BTreeSet<usize> = selected.iter().copied().collect();
    let correct: BTreeSet<usize> = correct.iter().copied().collect();
    selected == correct
}

/// `part / total` as a whole percentage, rounding halves up.
///
/// An empty total yields `0`.
#[must_use]
pub fn percentage(part: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let part = u64::from(part);
    let total = u64::from(total);
    let rounded = (part * 200 + total) / (total * 2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// Converts a collection length to the `u32` counters used in scores.
#[must_use]
pub fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

//
// ─── SELECTION ─────────────────────────────────────────────────────────────────
//

/// The option indices picked for one question, in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection(Vec<usize>);

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Quiz-style editing: a picked option is removed when picked again,
    /// otherwise single-answer questions replace the selection and
    /// multi-answer questions append to it.
    pub fn toggle(&mut self, index: usize, single_answer: bool) {
        if let Some(pos) = self.0.iter().position(|i| *i == index) {
            self.0.remove(pos);
        } else if single_answer {
            self.0 = vec![index];
        } else {
            self.0.push(index);
        }
    }

    /// Exam-style editing: single-answer questions always replace the
    /// selection, multi-answer questions toggle.
    pub fn pick(&mut self, index: usize, single_answer: bool) {
        if single_answer {
            self.0 = vec![index];
        } else if let Some(pos) = self.0.iter().position(|i| *i == index) {
            self.0.remove(pos);
        } else {
            self.0.push(index);
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn matches(&self, correct: &[usize]) -> bool {
        is_correct(&self.0, correct)
    }
}

impl From<Vec<usize>> for Selection {
    fn from(value: Vec<usize>) -> Self {
        let mut out = Selection::new();
        for idx in value {
            if !out.contains(idx) {
                out.0.push(idx);
            }
        }
        out
    }
}

//
// ─── ANSWER REVIEW ─────────────────────────────────────────────────────────────
//

/// How an option is marked when answers are reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    /// Part of the correct answer.
    Correct,
    /// Picked by the user but not part of the answer.
    WrongPick,
    Neutral,
}

/// One question as shown in the post-attempt review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionReview {
    pub prompt: String,
    pub options: Vec<(String, OptionMark)>,
    pub selected: Vec<usize>,
    pub is_correct: bool,
    pub explanation: String,
}

impl QuestionReview {
    #[must_use]
    pub fn new(question: &Question, selection: Option<&Selection>) -> Self {
        let selected = selection.map(|s| s.as_slice().to_vec()).unwrap_or_default();
        let options = question
            .options
            .iter()
            .enumerate()
            .map(|(idx, text)| {
                let mark = if question.is_correct_option(idx) {
                    OptionMark::Correct
                } else if selected.contains(&idx) {
                    OptionMark::WrongPick
                } else {
                    OptionMark::Neutral
                };
                (text.clone(), mark)
            })
            .collect();
        Self {
            prompt: question.prompt.clone(),
            options,
            is_correct: is_correct(&selected, &question.answer),
            selected,
            explanation: question.explanation.clone(),
        }
    }
}

//
// ─── FEEDBACK TIERS ────────────────────────────────────────────────────────────
//

/// Verdict shown after a weekly quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizFeedback {
    Excellent,
    Good,
    Satisfactory,
    NeedsPractice,
}

impl QuizFeedback {
    #[must_use]
    pub fn for_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => Self::Excellent,
            70..=89 => Self::Good,
            50..=69 => Self::Satisfactory,
            _ => Self::NeedsPractice,
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent! You know this material well.",
            Self::Good => "Good! There are a few small gaps.",
            Self::Satisfactory => "Satisfactory. Reviewing the material is recommended.",
            Self::NeedsPractice => "More practice needed. Review the material and try again.",
        }
    }
}

/// Letter grade for the cumulative exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExamGrade {
    A,
    B,
    C,
    D,
    F,
}

impl ExamGrade {
    #[must_use]
    pub fn for_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => Self::A,
            80..=89 => Self::B,
            70..=79 => Self::C,
            60..=69 => Self::D,
            _ => Self::F,
        }
    }

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::F => 'F',
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::A => "Excellent! You are fully ready for the exam.",
            Self::B => "Good! Small gaps, but overall you are ready.",
            Self::C => "Satisfactory. Review your weak topics.",
            Self::D => "Additional preparation is needed.",
            Self::F => "Serious preparation is required. Review all the material.",
        }
    }
}
