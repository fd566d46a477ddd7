//! Text and JSON renderings of check runs, searches and the watchlist.
//!
//! Renderers return lines so the CLI decides where they go (stdout, quiet
//! mode, JSON wrapping) and tests can assert on exact output.

use libby_monitor_models::{CatalogueResponse, Watchlist, WatchlistEntry, LAST_CHECKED_FORMAT};
use serde::Serialize;
use crate::reconcile::{CheckOutcome, NewFind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// Summary of every run
    Full,
    /// Only new finds and the found-books reminder (for cron)
    Notify,
}

/// Machine-readable summary of a check run
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub checked: usize,
    pub failed: usize,
    pub new_finds: Vec<NewFindReport>,
    /// Titles currently found, candidates for `unwatch`
    pub in_catalogue: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewFindReport {
    pub title: String,
    pub author: String,
    pub library: String,
    pub owned_copies: u32,
    pub is_available: bool,
}

impl CheckReport {
    pub fn new(outcome: &CheckOutcome, watchlist: &Watchlist) -> Self {
        Self {
            checked: outcome.checked,
            failed: outcome.failed,
            new_finds: outcome.new_finds.iter().map(NewFindReport::from).collect(),
            in_catalogue: watchlist.found().map(|b| b.title.clone()).collect(),
        }
    }
}

impl From<&NewFind> for NewFindReport {
    fn from(find: &NewFind) -> Self {
        Self {
            title: display_title(find).to_string(),
            author: display_author(find).to_string(),
            library: find.entry.library.clone(),
            owned_copies: find.item.owned_copies,
            is_available: find.item.is_available,
        }
    }
}

// Prefer what the catalogue reports, fall back to what the user typed
fn display_title(find: &NewFind) -> &str {
    non_empty(&find.item.title).unwrap_or(&find.entry.title)
}

fn display_author(find: &NewFind) -> &str {
    non_empty(&find.item.first_creator_name).unwrap_or(&find.entry.author)
}

fn non_empty(s: &str) -> Option<&str> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

pub fn check_lines(outcome: &CheckOutcome, watchlist: &Watchlist, mode: ReportMode) -> Vec<String> {
    let mut lines = Vec::new();

    if outcome.checked == 0 {
        if mode == ReportMode::Full {
            lines.push("Watchlist is empty.".to_string());
        }
        return lines;
    }

    match mode {
        ReportMode::Full => {
            lines.push(format!("Checked {} book(s).", outcome.checked));
            if !outcome.new_finds.is_empty() {
                lines.push(format!("{} new addition(s) found!", outcome.new_finds.len()));
            }
        }
        ReportMode::Notify if !outcome.new_finds.is_empty() => {
            lines.push("New on Libby:".to_string());
            lines.push(String::new());
            for find in &outcome.new_finds {
                lines.push(format!("  {} - {}", display_title(find), display_author(find)));
                lines.push(format!(
                    "    Library: {} | Copies: {} | Available: {}",
                    find.entry.library,
                    find.item.owned_copies,
                    yes_no(find.item.is_available)
                ));
                lines.push(String::new());
            }
        }
        ReportMode::Notify => {}
    }

    // The reminder is printed every run, whatever the mode
    lines.extend(found_digest(watchlist));
    lines
}

/// Reminder listing every book already in the catalogue
pub fn found_digest(watchlist: &Watchlist) -> Vec<String> {
    let found: Vec<&WatchlistEntry> = watchlist.found().collect();
    if found.is_empty() {
        return Vec::new();
    }

    let mut lines = vec![String::new(), format!("{} book(s) already in catalogue:", found.len())];
    lines.extend(found.iter().map(|b| format!("  - {}", b.title)));
    lines.push("Consider removing them with 'unwatch'.".to_string());
    lines
}

pub fn search_lines(response: &CatalogueResponse) -> Vec<String> {
    if response.is_empty() {
        return vec!["No results found.".to_string()];
    }

    let mut lines = Vec::new();
    for (idx, item) in response.items.iter().enumerate() {
        let title = non_empty(&item.title).unwrap_or("Unknown");
        let author = non_empty(&item.first_creator_name).unwrap_or("Unknown");
        let status = if item.is_owned { "In catalogue" } else { "Not owned" };
        let available = if item.is_available {
            format!("Yes ({})", item.available_copies)
        } else {
            "No".to_string()
        };

        lines.push(format!("  {}. {} - {}", idx + 1, title, author));
        lines.push(format!(
            "     {} | Copies: {} | Available: {}",
            status, item.owned_copies, available
        ));
        lines.push(String::new());
    }
    lines.push(format!("{} result(s) total", response.total_items));
    lines
}

pub fn list_lines(watchlist: &Watchlist, profile: Option<&str>) -> Vec<String> {
    if watchlist.is_empty() {
        return vec!["Watchlist is empty.".to_string()];
    }

    let count = watchlist.len();
    let header = match profile {
        Some(name) => format!("Watchlist [{}] ({} book{}):", name, count, plural(count)),
        None => format!("Watchlist ({} book{}):", count, plural(count)),
    };
    let mut lines = vec![header, String::new()];

    for (idx, book) in watchlist.books.iter().enumerate() {
        let marker = if book.is_found() { "*" } else { " " };
        let checked = book
            .last_checked
            .map(|ts| ts.format(LAST_CHECKED_FORMAT).to_string())
            .unwrap_or_else(|| "never".to_string());

        lines.push(format!("  {} {}. {}", marker, idx + 1, book.title));
        if !book.author.is_empty() {
            lines.push(format!("       Author: {}", book.author));
        }
        lines.push(format!(
            "       Library: {} | Status: {} | Checked: {}",
            book.library, book.status, checked
        ));
        if let Some(found) = book.found_date {
            lines.push(format!("       Found on: {}", found.format("%Y-%m-%d")));
        }
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use libby_monitor_models::{BookStatus, CatalogueItem};

    fn book(title: &str, author: &str, status: BookStatus) -> WatchlistEntry {
        let mut entry =
            WatchlistEntry::new(title, author, "telaviv", NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        entry.status = status;
        if status.is_found() {
            entry.found_date = NaiveDate::from_ymd_opt(2026, 10, 17);
            entry.last_checked =
                NaiveDateTime::parse_from_str("2026-10-17T09:30:00", LAST_CHECKED_FORMAT).ok();
        }
        entry
    }

    fn find(entry: WatchlistEntry, item_title: &str, creator: &str) -> NewFind {
        NewFind {
            entry,
            item: CatalogueItem {
                title: item_title.to_string(),
                first_creator_name: creator.to_string(),
                is_owned: true,
                owned_copies: 3,
                is_available: true,
                available_copies: 1,
            },
        }
    }

    fn list_of(books: Vec<WatchlistEntry>) -> Watchlist {
        let mut watchlist = Watchlist::new();
        watchlist.books = books;
        watchlist
    }

    #[test]
    fn test_full_mode_with_new_find() {
        let dune = book("Dune", "Frank Herbert", BookStatus::Found);
        let watchlist = list_of(vec![dune.clone(), book("Borne", "", BookStatus::NotFound)]);
        let outcome = CheckOutcome {
            checked: 2,
            failed: 0,
            new_finds: vec![find(dune, "Dune", "Frank Herbert")],
        };

        assert_eq!(
            check_lines(&outcome, &watchlist, ReportMode::Full),
            vec![
                "Checked 2 book(s).",
                "1 new addition(s) found!",
                "",
                "1 book(s) already in catalogue:",
                "  - Dune",
                "Consider removing them with 'unwatch'.",
            ]
        );
    }

    #[test]
    fn test_full_mode_without_finds_has_no_digest() {
        let watchlist = list_of(vec![book("Borne", "", BookStatus::NotFound)]);
        let outcome = CheckOutcome {
            checked: 1,
            ..CheckOutcome::default()
        };
        assert_eq!(
            check_lines(&outcome, &watchlist, ReportMode::Full),
            vec!["Checked 1 book(s)."]
        );
    }

    #[test]
    fn test_notify_mode_keeps_digest_without_new_finds() {
        let watchlist = list_of(vec![book("Dune", "", BookStatus::Found)]);
        let outcome = CheckOutcome {
            checked: 1,
            ..CheckOutcome::default()
        };
        assert_eq!(
            check_lines(&outcome, &watchlist, ReportMode::Notify),
            vec![
                "",
                "1 book(s) already in catalogue:",
                "  - Dune",
                "Consider removing them with 'unwatch'.",
            ]
        );
    }

    #[test]
    fn test_notify_mode_is_silent_when_nothing_found() {
        let watchlist = list_of(vec![book("Borne", "", BookStatus::NotFound)]);
        let outcome = CheckOutcome {
            checked: 1,
            ..CheckOutcome::default()
        };
        assert!(check_lines(&outcome, &watchlist, ReportMode::Notify).is_empty());
    }

    #[test]
    fn test_notify_mode_lists_finds_with_author_fallback() {
        let dune = book("Dune", "Frank Herbert", BookStatus::Found);
        let watchlist = list_of(vec![dune.clone()]);
        let outcome = CheckOutcome {
            checked: 1,
            failed: 0,
            new_finds: vec![find(dune, "Dune (Deluxe)", "")],
        };

        let lines = check_lines(&outcome, &watchlist, ReportMode::Notify);
        assert_eq!(lines[0], "New on Libby:");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "  Dune (Deluxe) - Frank Herbert");
        assert_eq!(lines[3], "    Library: telaviv | Copies: 3 | Available: Yes");
        assert!(lines.contains(&"1 book(s) already in catalogue:".to_string()));
    }

    #[test]
    fn test_empty_watchlist_messages() {
        let outcome = CheckOutcome::default();
        let watchlist = Watchlist::new();
        assert_eq!(
            check_lines(&outcome, &watchlist, ReportMode::Full),
            vec!["Watchlist is empty."]
        );
        assert!(check_lines(&outcome, &watchlist, ReportMode::Notify).is_empty());
    }

    #[test]
    fn test_check_report_summary() {
        let dune = book("Dune", "Frank Herbert", BookStatus::Found);
        let watchlist = list_of(vec![dune.clone(), book("Borne", "", BookStatus::NotFound)]);
        let outcome = CheckOutcome {
            checked: 2,
            failed: 1,
            new_finds: vec![find(dune, "", "")],
        };

        let report = CheckReport::new(&outcome, &watchlist);
        assert_eq!(report.failed, 1);
        assert_eq!(report.in_catalogue, vec!["Dune"]);
        assert_eq!(report.new_finds[0].title, "Dune");
        assert_eq!(report.new_finds[0].author, "Frank Herbert");
        assert_eq!(report.new_finds[0].owned_copies, 3);
    }

    #[test]
    fn test_search_lines() {
        let response = CatalogueResponse {
            total_items: 2,
            items: vec![
                CatalogueItem {
                    title: "The Hobbit".to_string(),
                    first_creator_name: "J. R. R. Tolkien".to_string(),
                    is_owned: true,
                    owned_copies: 4,
                    is_available: true,
                    available_copies: 2,
                },
                CatalogueItem::default(),
            ],
        };

        assert_eq!(
            search_lines(&response),
            vec![
                "  1. The Hobbit - J. R. R. Tolkien",
                "     In catalogue | Copies: 4 | Available: Yes (2)",
                "",
                "  2. Unknown - Unknown",
                "     Not owned | Copies: 0 | Available: No",
                "",
                "2 result(s) total",
            ]
        );
    }

    #[test]
    fn test_search_lines_no_results() {
        assert_eq!(search_lines(&CatalogueResponse::default()), vec!["No results found."]);
    }

    #[test]
    fn test_list_lines() {
        let watchlist = list_of(vec![
            book("Dune", "Frank Herbert", BookStatus::Found),
            book("Borne", "", BookStatus::NotFound),
        ]);

        assert_eq!(
            list_lines(&watchlist, Some("kids")),
            vec![
                "Watchlist [kids] (2 books):",
                "",
                "  * 1. Dune",
                "       Author: Frank Herbert",
                "       Library: telaviv | Status: found | Checked: 2026-10-17T09:30:00",
                "       Found on: 2026-10-17",
                "",
                "    2. Borne",
                "       Library: telaviv | Status: not_found | Checked: never",
                "",
            ]
        );
    }

    #[test]
    fn test_list_lines_singular_and_empty() {
        let watchlist = list_of(vec![book("Borne", "", BookStatus::NotFound)]);
        assert_eq!(list_lines(&watchlist, None)[0], "Watchlist (1 book):");
        assert_eq!(list_lines(&Watchlist::new(), None), vec!["Watchlist is empty."]);
    }
}
