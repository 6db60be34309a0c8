//! Shared error types for the services crate.

use std::path::PathBuf;
use thiserror::Error;

use storage::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted while loading course content. All of them end the session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by flashcard, quiz and exam sessions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
    #[error("session already completed")]
    Completed,
    #[error("session has not finished yet")]
    NotFinished,
    #[error("no option selected")]
    NoSelection,
    #[error("option {index} does not exist (question has {options} options)")]
    InvalidOption { index: usize, options: usize },
    #[error("answer has not been checked yet")]
    NotChecked,
    #[error("card has not been flipped yet")]
    NotRevealed,
    #[error("attempt already recorded")]
    AlreadyRecorded,
    #[error(transparent)]
    Progress(#[from] ProgressServiceError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Progress(#[from] ProgressServiceError),
}
