//! Loading course content from JSON files.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use study_core::model::{CheatSheet, ContentBundle, Flashcard, Question, WeekId};

use crate::error::ContentError;

/// Single-file bundle holding all three collections.
pub const BUNDLE_FILE: &str = "exam_data.json";
pub const CHEATSHEETS_FILE: &str = "cheatsheets.json";
pub const FLASHCARDS_FILE: &str = "flashcards.json";
pub const QUESTIONS_FILE: &str = "questions.json";

/// Where content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// One JSON object with `cheatsheets`, `flashcards` and `questions` keys.
    Bundle(PathBuf),
    /// A directory holding one file per collection.
    Directory(PathBuf),
}

impl ContentSource {
    /// Prefers the bundle file when `dir` contains one.
    #[must_use]
    pub fn discover(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let bundle = dir.join(BUNDLE_FILE);
        if bundle.is_file() {
            Self::Bundle(bundle)
        } else {
            Self::Directory(dir.to_path_buf())
        }
    }
}

/// Week-keyed collection as it sits in the file, before per-week validation.
type RawWeeks = BTreeMap<String, Value>;

#[derive(Debug, Deserialize)]
struct RawBundle {
    #[serde(default)]
    cheatsheets: Option<RawWeeks>,
    #[serde(default)]
    flashcards: Option<RawWeeks>,
    #[serde(default)]
    questions: Option<RawWeeks>,
}

/// Loads content from `source`.
///
/// The three per-collection files are read concurrently. Entries with an
/// unknown week key or a malformed value are skipped with a warning; the
/// remaining weeks still load.
///
/// # Errors
///
/// Returns `ContentError` if a file cannot be read or is not JSON of the
/// expected outer shape.
pub async fn load_content(source: &ContentSource) -> Result<ContentBundle, ContentError> {
    let raw = match source {
        ContentSource::Bundle(path) => read_json::<RawBundle>(path).await?,
        ContentSource::Directory(dir) => {
            let cheatsheets_path = dir.join(CHEATSHEETS_FILE);
            let flashcards_path = dir.join(FLASHCARDS_FILE);
            let questions_path = dir.join(QUESTIONS_FILE);
            let (cheatsheets, flashcards, questions) = tokio::try_join!(
                read_json::<Option<RawWeeks>>(&cheatsheets_path),
                read_json::<Option<RawWeeks>>(&flashcards_path),
                read_json::<Option<RawWeeks>>(&questions_path),
            )?;
            RawBundle {
                cheatsheets,
                flashcards,
                questions,
            }
        }
    };
    let bundle = ContentBundle {
        cheatsheets: collect_weeks::<CheatSheet>("cheatsheets", raw.cheatsheets),
        flashcards: collect_weeks::<Vec<Flashcard>>("flashcards", raw.flashcards),
        questions: collect_weeks::<Vec<Question>>("questions", raw.questions),
    };

    for issue in bundle.issues() {
        tracing::warn!(
            week = %issue.week,
            question = issue.question_index,
            dangling = ?issue.dangling,
            "answer indices point past the options"
        );
    }
    tracing::info!(
        cheatsheets = bundle.cheatsheets.len(),
        decks = bundle.flashcards.len(),
        questions = bundle.total_questions(),
        "content loaded"
    );
    Ok(bundle)
}

fn collect_weeks<T: DeserializeOwned>(
    collection: &'static str,
    raw: Option<RawWeeks>,
) -> BTreeMap<WeekId, T> {
    raw.unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| {
            let week = match key.parse::<WeekId>() {
                Ok(week) => week,
                Err(err) => {
                    tracing::warn!(collection, %key, %err, "skipping unknown week");
                    return None;
                }
            };
            match serde_json::from_value::<T>(value) {
                Ok(entry) => Some((week, entry)),
                Err(err) => {
                    tracing::warn!(collection, %week, %err, "skipping malformed week");
                    None
                }
            }
        })
        .collect()
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ContentError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&raw).map_err(|source| ContentError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
