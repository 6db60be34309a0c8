use std::io::IsTerminal;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use services::search::Segment;
use study_core::model::{COURSE_WEEKS, WeekId};

/// Line-oriented stdin reader for the interactive commands.
pub struct Console {
    lines: Lines<BufReader<Stdin>>,
    ansi: bool,
}

impl Default for Console {
    fn default() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            ansi: std::io::stdout().is_terminal(),
        }
    }
}

impl Console {

    /// Next trimmed line; `None` at end of input. Cancel safe.
    pub async fn read_line(&mut self) -> std::io::Result<Option<String>> {
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }

    pub fn highlight(&self, segments: &[Segment<'_>]) -> String {
        segments
            .iter()
            .map(|segment| match segment {
                Segment::Plain(text) => (*text).to_string(),
                Segment::Match(text) if self.ansi => format!("\x1b[1;33m{text}\x1b[0m"),
                Segment::Match(text) => format!("[{text}]"),
            })
            .collect()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChoiceError {
    #[error("{0:?} is not an option number")]
    NotANumber(String),
    #[error("option {got} does not exist, pick 1-{max}")]
    OutOfRange { got: usize, max: usize },
    #[error("{0:?} is not a week, pick 1-{max}", max = COURSE_WEEKS)]
    NoSuchWeek(String),
}

/// Recognizes the `w N` week switch; `None` for any other input.
pub fn parse_week_switch(input: &str) -> Option<Result<WeekId, ChoiceError>> {
    let raw = input.strip_prefix("w ")?.trim();
    Some(
        raw.parse::<u8>()
            .ok()
            .and_then(|n| WeekId::new(n).ok())
            .ok_or_else(|| ChoiceError::NoSuchWeek(raw.to_string())),
    )
}

/// Parses 1-based option numbers such as `2` or `1,3` into 0-based indices.
pub fn parse_choices(input: &str, option_count: usize) -> Result<Vec<usize>, ChoiceError> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let got: usize = part
                .parse()
                .map_err(|_| ChoiceError::NotANumber(part.to_string()))?;
            if got == 0 || got > option_count {
                return Err(ChoiceError::OutOfRange {
                    got,
                    max: option_count,
                });
            }
            Ok(got - 1)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_and_multiple_choices() {
        assert_eq!(parse_choices("2", 4).unwrap(), vec![1]);
        assert_eq!(parse_choices("1,3", 4).unwrap(), vec![0, 2]);
        assert_eq!(parse_choices(" 4 1 ", 4).unwrap(), vec![3, 0]);
        assert!(parse_choices("", 4).unwrap().is_empty());
    }

    #[test]
    fn rejects_bad_choices() {
        assert_eq!(
            parse_choices("5", 4),
            Err(ChoiceError::OutOfRange { got: 5, max: 4 })
        );
        assert_eq!(
            parse_choices("0", 4),
            Err(ChoiceError::OutOfRange { got: 0, max: 4 })
        );
        assert_eq!(
            parse_choices("x", 4),
            Err(ChoiceError::NotANumber("x".into()))
        );
    }

    #[test]
    fn week_switch_needs_prefix_and_course_week() {
        assert_eq!(parse_week_switch("w 3"), Some(Ok(WeekId::new(3).unwrap())));
        assert_eq!(parse_week_switch("w  10 "), Some(Ok(WeekId::new(10).unwrap())));
        assert_eq!(
            parse_week_switch("w 11"),
            Some(Err(ChoiceError::NoSuchWeek("11".into())))
        );
        assert_eq!(
            parse_week_switch("w x"),
            Some(Err(ChoiceError::NoSuchWeek("x".into())))
        );
        assert_eq!(parse_week_switch("2"), None);
        assert_eq!(parse_week_switch("v"), None);
    }
}
