use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use crate::book::{same_title, WatchlistEntry};

/// Current version of the persisted watchlist document.
/// Documents written before versioning deserialize with version 0.
pub const WATCHLIST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Watchlist {
    #[serde(default)]
    pub version: u32,
    pub books: Vec<WatchlistEntry>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self {
            version: WATCHLIST_VERSION,
            books: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.books.iter().any(|b| same_title(&b.title, title))
    }

    /// Append an entry unless a book with the same title (ignoring case) is
    /// already watched. Returns whether the entry was added.
    pub fn watch(&mut self, entry: WatchlistEntry) -> bool {
        if self.contains(&entry.title) {
            return false;
        }
        self.books.push(entry);
        true
    }

    /// Remove every entry whose title matches (ignoring case).
    /// Returns the number of removed entries.
    pub fn unwatch(&mut self, title: &str) -> usize {
        let before = self.books.len();
        self.books.retain(|b| !same_title(&b.title, title));
        before - self.books.len()
    }

    pub fn found(&self) -> impl Iterator<Item = &WatchlistEntry> {
        self.books.iter().filter(|b| b.is_found())
    }

    /// First title that appears more than once (ignoring case), if any
    pub fn duplicate_title(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.books
            .iter()
            .find(|b| !seen.insert(b.title.to_lowercase()))
            .map(|b| b.title.as_str())
    }
}

impl Default for Watchlist {
    fn default() -> Self {
        Self::new()
    }
}
