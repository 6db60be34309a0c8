#![forbid(unsafe_code)]

pub mod app_services;
pub mod cheatsheet;
pub mod content;
pub mod error;
pub mod exam;
pub mod flashcards;
pub mod progress_service;
pub mod quiz;
pub mod search;

pub use study_core::Clock;

pub use app_services::AppServices;
pub use content::{ContentSource, load_content};
pub use error::{AppServicesError, ContentError, ProgressServiceError, SessionError};
pub use progress_service::{ProgressService, WeekProgressRow};
