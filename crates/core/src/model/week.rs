use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of weeks in the course.
pub const COURSE_WEEKS: u8 = 10;

const KEY_PREFIX: &str = "week";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WeekIdError {
    #[error("week ordinal must be between 1 and {max}, got {got}")]
    OutOfRange { got: u64, max: u8 },

    #[error("invalid week key: {0:?}")]
    InvalidKey(String),
}

/// Identifies one week of course content by its ordinal (1-based).
///
/// Content files and the persisted progress record key weeks as `week1`,
/// `week2`, ...; that form is what `Display`, `FromStr` and serde use.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekId(u8);

impl WeekId {
    /// Creates a `WeekId` from a 1-based ordinal.
    ///
    /// # Errors
    ///
    /// Returns `WeekIdError::OutOfRange` unless `1 <= ordinal <= COURSE_WEEKS`.
    pub fn new(ordinal: u8) -> Result<Self, WeekIdError> {
        if ordinal == 0 || ordinal > COURSE_WEEKS {
            return Err(WeekIdError::OutOfRange {
                got: u64::from(ordinal),
                max: COURSE_WEEKS,
            });
        }
        Ok(Self(ordinal))
    }

    #[must_use]
    pub fn ordinal(self) -> u8 {
        self.0
    }

    /// Every week of the course, in order.
    pub fn all() -> impl Iterator<Item = WeekId> {
        (1..=COURSE_WEEKS).map(WeekId)
    }

    /// Human label, e.g. `Week 3`.
    #[must_use]
    pub fn label(self) -> String {
        format!("Week {}", self.0)
    }
}

impl fmt::Debug for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WeekId({})", self.0)
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{KEY_PREFIX}{}", self.0)
    }
}

impl FromStr for WeekId {
    type Err = WeekIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(KEY_PREFIX)
            .filter(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| WeekIdError::InvalidKey(s.to_string()))?;
        let ordinal: u64 = digits
            .parse()
            .map_err(|_| WeekIdError::InvalidKey(s.to_string()))?;
        let ordinal = u8::try_from(ordinal).map_err(|_| WeekIdError::OutOfRange {
            got: ordinal,
            max: COURSE_WEEKS,
        })?;
        Self::new(ordinal)
    }
}

impl TryFrom<String> for WeekId {
    type Error = WeekIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeekId> for String {
    fn from(week: WeekId) -> Self {
        week.to_string()
    }
}
