use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use crate::status::BookStatus;

/// Format of `last_checked` in the persisted watchlist (local time, whole seconds)
pub const LAST_CHECKED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A book on the watchlist together with its check history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchlistEntry {
    pub title: String,
    /// Empty when the author is unknown
    #[serde(default)]
    pub author: String,
    /// Catalogue (library) code the book is searched in, e.g. "telaviv"
    pub library: String,
    pub added: NaiveDate,
    #[serde(rename = "last_status", default)]
    pub status: BookStatus,
    #[serde(default, with = "last_checked_format")]
    pub last_checked: Option<NaiveDateTime>,
    /// Date the book was first seen in the catalogue. Never cleared.
    #[serde(default)]
    pub found_date: Option<NaiveDate>,
}

impl WatchlistEntry {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        library: impl Into<String>,
        added: NaiveDate,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            library: library.into(),
            added,
            status: BookStatus::NotFound,
            last_checked: None,
            found_date: None,
        }
    }

    /// Free-text query sent to the catalogue: title followed by author
    pub fn search_query(&self) -> String {
        format!("{} {}", self.title, self.author).trim().to_string()
    }

    pub fn is_found(&self) -> bool {
        self.status.is_found()
    }

    /// Apply the result of a completed catalogue check.
    ///
    /// Returns `true` only on a NotFound -> Found transition. A book that was
    /// already found stays found without being reported again, and a miss always
    /// resets the status to NotFound while keeping `found_date`.
    pub fn record_check(&mut self, matched: bool, now: NaiveDateTime) -> bool {
        self.last_checked = Some(now);

        if !matched {
            self.status = BookStatus::NotFound;
            return false;
        }

        if self.status.is_found() {
            return false;
        }

        self.status = BookStatus::Found;
        if self.found_date.is_none() {
            self.found_date = Some(now.date());
        }
        true
    }
}

/// Case-insensitive title identity used for watch/unwatch
pub fn same_title(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

mod last_checked_format {
    use super::LAST_CHECKED_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&ts.format(LAST_CHECKED_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            // Accept fractional seconds written by other tools
            Some(s) => NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f")
                .map(Some)
                .map_err(|e| serde::de::Error::custom(format!("invalid last_checked '{}': {}", s, e))),
        }
    }
}
