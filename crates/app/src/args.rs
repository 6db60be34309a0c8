use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use thiserror::Error;

use study_core::exam::ExamSettings;
use study_core::model::WeekId;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArgsError {
    #[error("invalid --db value: {raw}")]
    InvalidDbUrl { raw: String },
    #[error(transparent)]
    Invalid(#[from] study_core::Error),
    #[error("failed to prepare database file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Parser)]
#[command(name = "study", about = "Course cheat sheets, flashcards, quizzes and a timed exam", version)]
pub struct Cli {
    /// `SQLite` database holding progress
    #[arg(long, global = true, env = "STUDY_DB_URL", default_value = "sqlite://study.sqlite3")]
    pub db: String,

    /// Directory with course content
    #[arg(long, global = true, env = "STUDY_DATA_DIR", default_value = "data")]
    pub data: PathBuf,

    /// Number of questions drawn for the exam
    #[arg(long, global = true, default_value_t = 30)]
    pub exam_questions: usize,

    /// Exam time limit in minutes
    #[arg(long, global = true, default_value_t = 40)]
    pub exam_minutes: u32,

    /// Log filter, e.g. `info` or `services=debug`
    #[arg(long, global = true, env = "STUDY_LOG", default_value = "warn")]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show per-week progress
    Progress {
        /// Forget all stored progress first
        #[arg(long)]
        reset: bool,
    },

    /// Print every cheat sheet
    Cheatsheets,

    /// Search cheat sheets and flashcards
    Search {
        /// At least two characters
        query: String,
    },

    /// Review flashcards
    Flashcards {
        /// Week to start with (1-10)
        #[arg(long, value_parser = parse_week)]
        week: Option<WeekId>,
    },

    /// Take a weekly quiz
    Quiz {
        /// Week to quiz (1-10)
        #[arg(long, value_parser = parse_week)]
        week: Option<WeekId>,
    },

    /// Take the timed exam over all weeks
    Exam {
        /// Seed for question sampling
        #[arg(long)]
        seed: Option<u64>,
    },
}

impl Cli {
    /// # Errors
    ///
    /// Returns `ArgsError::Invalid` when either exam value is zero.
    pub fn exam_settings(&self) -> Result<ExamSettings, ArgsError> {
        let settings = ExamSettings::new(self.exam_questions, self.exam_minutes.saturating_mul(60))
            .map_err(study_core::Error::from)?;
        Ok(settings)
    }
}

/// Accepts `3` as well as the stored key form `week3`.
fn parse_week(raw: &str) -> Result<WeekId, String> {
    let raw = raw.trim();
    if raw.starts_with("week") {
        return raw.parse().map_err(|err: study_core::model::WeekIdError| err.to_string());
    }
    let ordinal: u8 = raw
        .parse()
        .map_err(|_| format!("expected a week number, got {raw:?}"))?;
    WeekId::new(ordinal).map_err(|err| err.to_string())
}

pub fn normalize_sqlite_url(raw: &str) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw.to_string();
    }

    let trimmed = raw.trim();
    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Creates the database file and its parent directories when missing.
///
/// # Errors
///
/// Returns `ArgsError` for URLs without a path or on filesystem failures.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), ArgsError> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        });
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_accepts_number_or_key() {
        assert_eq!(parse_week("3").unwrap(), WeekId::new(3).unwrap());
        assert_eq!(parse_week("week10").unwrap(), WeekId::new(10).unwrap());
        assert!(parse_week("0").is_err());
        assert!(parse_week("11").is_err());
        assert!(parse_week("three").is_err());
    }

    #[test]
    fn sqlite_urls_are_made_absolute() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(normalize_sqlite_url("sqlite:///tmp/a.db"), "sqlite:///tmp/a.db");
        assert_eq!(normalize_sqlite_url("sqlite:/tmp/b.db"), "sqlite:///tmp/b.db");
        let relative = normalize_sqlite_url("study.sqlite3");
        assert!(relative.starts_with("sqlite:///"));
        assert!(relative.ends_with("/study.sqlite3"));
    }

    #[test]
    fn prepare_creates_missing_file() {
        let dir = std::env::temp_dir().join(format!("study-prepare-{}", std::process::id()));
        let file = dir.join("nested").join("progress.sqlite3");
        let url = format!("sqlite://{}", file.display());

        prepare_sqlite_file(&url).unwrap();
        assert!(file.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn prepare_rejects_urls_without_path() {
        assert!(matches!(
            prepare_sqlite_file("sqlite://"),
            Err(ArgsError::InvalidDbUrl { .. })
        ));
        assert!(prepare_sqlite_file("sqlite::memory:").is_ok());
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["study", "exam"]).unwrap();
        assert_eq!(cli.exam_questions, 30);
        let settings = cli.exam_settings().unwrap();
        assert_eq!(settings.time_limit_secs(), 2400);
        assert!(matches!(cli.command, Command::Exam { seed: None }));

        let cli = Cli::try_parse_from(["study", "quiz", "--week", "4", "--exam-minutes", "0"]).unwrap();
        assert!(matches!(cli.command, Command::Quiz { week: Some(w) } if w.ordinal() == 4));
        assert!(cli.exam_settings().is_err());
    }
}
