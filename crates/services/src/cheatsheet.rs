use study_core::model::{ContentBundle, WeekId};

/// A cheat sheet ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheatSheetSection {
    pub week: WeekId,
    pub heading: String,
    pub points: Vec<String>,
}

/// Every cheat sheet in week order, headed `Week N: title`.
#[must_use]
pub fn sections(content: &ContentBundle) -> Vec<CheatSheetSection> {
    content
        .cheatsheets
        .iter()
        .map(|(week, sheet)| CheatSheetSection {
            week: *week,
            heading: format!("{}: {}", week.label(), sheet.title),
            points: sheet.points.clone(),
        })
        .collect()
}
