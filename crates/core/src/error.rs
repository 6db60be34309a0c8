use thiserror::Error;

use crate::exam::ExamSettingsError;
use crate::model::WeekIdError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Week(#[from] WeekIdError),
    #[error(transparent)]
    ExamSettings(#[from] ExamSettingsError),
}
