use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalogue status of a watched book as of its last completed check
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    /// No owned copy matched the title on the last check (or never checked)
    #[default]
    NotFound,
    /// The library owns a copy matching the title
    Found,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::NotFound => "not_found",
            BookStatus::Found => "found",
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, BookStatus::Found)
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
