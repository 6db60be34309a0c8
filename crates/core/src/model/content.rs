use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{CheatSheet, Flashcard, Question, WeekId};

pub type QuestionBank = BTreeMap<WeekId, Vec<Question>>;
pub type FlashcardDecks = BTreeMap<WeekId, Vec<Flashcard>>;
pub type CheatSheets = BTreeMap<WeekId, CheatSheet>;

/// All static course content, keyed by week.
///
/// Each map iterates in week order. A week may be absent from any map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBundle {
    #[serde(default)]
    pub cheatsheets: CheatSheets,
    #[serde(default)]
    pub flashcards: FlashcardDecks,
    #[serde(default)]
    pub questions: QuestionBank,
}

/// A content record that breaks the "answer indices reference options" rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentIssue {
    pub week: WeekId,
    pub question_index: usize,
    pub dangling: Vec<usize>,
}

impl ContentBundle {
    /// Cheat-sheet title for the week, falling back to `Week N`.
    #[must_use]
    pub fn week_title(&self, week: WeekId) -> String {
        self.cheatsheets
            .get(&week)
            .map_or_else(|| week.label(), |sheet| sheet.title.clone())
    }

    /// Questions for a week; `None` when the week is missing or empty.
    #[must_use]
    pub fn questions_for(&self, week: WeekId) -> Option<&[Question]> {
        self.questions
            .get(&week)
            .map(Vec::as_slice)
            .filter(|qs| !qs.is_empty())
    }

    /// Flashcards for a week; `None` when the week is missing or empty.
    #[must_use]
    pub fn flashcards_for(&self, week: WeekId) -> Option<&[Flashcard]> {
        self.flashcards
            .get(&week)
            .map(Vec::as_slice)
            .filter(|cards| !cards.is_empty())
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.values().map(Vec::len).sum()
    }

    /// Lists questions whose answer indices point past their options.
    #[must_use]
    pub fn issues(&self) -> Vec<ContentIssue> {
        self.questions
            .iter()
            .flat_map(|(week, questions)| {
                questions.iter().enumerate().filter_map(|(idx, q)| {
                    let dangling = q.dangling_answers();
                    (!dangling.is_empty()).then(|| ContentIssue {
                        week: *week,
                        question_index: idx,
                        dangling,
                    })
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week(n: u8) -> WeekId {
        WeekId::new(n).unwrap()
    }

    #[test]
    fn parses_keyed_content_in_week_order() {
        let json = r#"{
            "cheatsheets": {
                "week10": {"title": "Growth", "points": ["p"]},
                "week2": {"title": "Goals", "points": []}
            },
            "flashcards": {"week1": [{"front": "f", "back": "b"}]},
            "questions": {"week1": [{"question": "q", "options": ["a"], "answer": [0]}]}
        }"#;
        let bundle: ContentBundle = serde_json::from_str(json).unwrap();
        let order: Vec<u8> = bundle.cheatsheets.keys().map(|w| w.ordinal()).collect();
        assert_eq!(order, vec![2, 10]);
        assert_eq!(bundle.week_title(week(10)), "Growth");
        assert_eq!(bundle.week_title(week(3)), "Week 3");
        assert_eq!(bundle.total_questions(), 1);
    }

    #[test]
    fn missing_or_empty_weeks_read_as_none() {
        let mut bundle = ContentBundle::default();
        bundle.flashcards.insert(week(1), Vec::new());
        assert!(bundle.flashcards_for(week(1)).is_none());
        assert!(bundle.flashcards_for(week(2)).is_none());
        assert!(bundle.questions_for(week(1)).is_none());
    }

    #[test]
    fn issues_point_at_dangling_answers() {
        let mut bundle = ContentBundle::default();
        bundle.questions.insert(
            week(4),
            vec![
                Question {
                    prompt: "ok".into(),
                    options: vec!["a".into()],
                    answer: vec![0],
                    explanation: String::new(),
                },
                Question {
                    prompt: "bad".into(),
                    options: vec!["a".into()],
                    answer: vec![3],
                    explanation: String::new(),
                },
            ],
        );
        let issues = bundle.issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].week, week(4));
        assert_eq!(issues[0].question_index, 1);
        assert_eq!(issues[0].dangling, vec![3]);
    }

    #[test]
    fn typed_decoding_rejects_unknown_week_keys() {
        let json = r#"{"flashcards": {"week42": []}}"#;
        assert!(serde_json::from_str::<ContentBundle>(json).is_err());
    }
}
