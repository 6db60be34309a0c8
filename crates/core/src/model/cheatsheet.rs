use serde::{Deserialize, Serialize};

/// Summary notes for one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheatSheet {
    pub title: String,
    #[serde(default)]
    pub points: Vec<String>,
}
