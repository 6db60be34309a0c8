use serde::{Deserialize, Serialize};

use crate::model::WeekId;

/// A multiple-choice question as it appears in a week's question bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    /// Indices into `options` that make up the correct answer.
    pub answer: Vec<usize>,
    #[serde(default)]
    pub explanation: String,
}

impl Question {
    /// A question with exactly one correct option replaces the selection on
    /// every pick instead of accumulating picks.
    #[must_use]
    pub fn is_single_answer(&self) -> bool {
        self.answer.len() == 1
    }

    #[must_use]
    pub fn is_correct_option(&self, index: usize) -> bool {
        self.answer.contains(&index)
    }

    #[must_use]
    pub fn has_option(&self, index: usize) -> bool {
        index < self.options.len()
    }

    /// Answer indices that do not point at an option.
    #[must_use]
    pub fn dangling_answers(&self) -> Vec<usize> {
        self.answer
            .iter()
            .copied()
            .filter(|idx| !self.has_option(*idx))
            .collect()
    }
}

/// A question pooled for the exam, remembering which week it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekQuestion {
    pub week: WeekId,
    pub question: Question,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_content_shape() {
        let json = r#"{
            "question": "Which?",
            "options": ["a", "b", "c"],
            "answer": [2, 0],
            "explanation": "because"
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.prompt, "Which?");
        assert_eq!(q.answer, vec![2, 0]);
        assert!(!q.is_single_answer());
        assert!(q.is_correct_option(0));
        assert!(!q.is_correct_option(1));
    }

    #[test]
    fn explanation_is_optional() {
        let json = r#"{"question": "Q", "options": ["x"], "answer": [0]}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert!(q.explanation.is_empty());
        assert!(q.is_single_answer());
    }

    #[test]
    fn reports_dangling_answers() {
        let q = Question {
            prompt: "Q".into(),
            options: vec!["a".into(), "b".into()],
            answer: vec![1, 4],
            explanation: String::new(),
        };
        assert_eq!(q.dangling_answers(), vec![4]);
    }
}
