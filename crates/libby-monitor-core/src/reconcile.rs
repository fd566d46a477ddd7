use async_trait::async_trait;
use chrono::{Local, NaiveDateTime, Timelike};
use libby_monitor_models::{CatalogueItem, Watchlist, WatchlistEntry};
use libby_monitor_sources::CatalogueSource;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use crate::matching::find_genuine_match;

/// Spacing between consecutive catalogue queries during a check
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self);
}

/// Sleeps for a fixed interval between queries
pub struct FixedIntervalPacer {
    interval: Duration,
}

impl FixedIntervalPacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

#[async_trait]
impl Pacer for FixedIntervalPacer {
    async fn pause(&self) {
        if !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }
    }
}

/// Called before each query with (index, total, entry)
pub type ProgressFn = Box<dyn Fn(usize, usize, &WatchlistEntry) + Send + Sync>;

/// A book that moved from NotFound to Found in this run, with the catalogue
/// result that matched it
#[derive(Debug, Clone, Serialize)]
pub struct NewFind {
    pub entry: WatchlistEntry,
    pub item: CatalogueItem,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckOutcome {
    /// Books on the watchlist when the run started
    pub checked: usize,
    /// Books whose query failed and were left untouched
    pub failed: usize,
    pub new_finds: Vec<NewFind>,
}

/// Checks every watchlist entry against the catalogue, one query at a time
pub struct Reconciler<'a> {
    source: &'a dyn CatalogueSource,
    pacer: &'a dyn Pacer,
    progress: Option<ProgressFn>,
}

impl<'a> Reconciler<'a> {
    pub fn new(source: &'a dyn CatalogueSource, pacer: &'a dyn Pacer) -> Self {
        Self {
            source,
            pacer,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Check the whole watchlist, stamping each entry with the local time its
    /// query completed.
    pub async fn reconcile(&self, watchlist: &mut Watchlist) -> CheckOutcome {
        self.run(watchlist, &local_now).await
    }

    /// Same as [`Reconciler::reconcile`] with a fixed check time
    pub async fn reconcile_at(&self, watchlist: &mut Watchlist, now: NaiveDateTime) -> CheckOutcome {
        self.run(watchlist, &move || now).await
    }

    #[instrument(skip_all, fields(source = self.source.source_name(), books = watchlist.len()))]
    async fn run(
        &self,
        watchlist: &mut Watchlist,
        clock: &(dyn Fn() -> NaiveDateTime + Sync),
    ) -> CheckOutcome {
        let total = watchlist.len();
        let mut outcome = CheckOutcome {
            checked: total,
            ..CheckOutcome::default()
        };

        for (idx, entry) in watchlist.books.iter_mut().enumerate() {
            if let Some(progress) = &self.progress {
                progress(idx, total, entry);
            }

            let query = entry.search_query();
            match self.source.search(&entry.library, &query).await {
                Ok(response) => {
                    let matched = find_genuine_match(&entry.title, &response.items).cloned();
                    let previous = entry.status;
                    let newly_found = entry.record_check(matched.is_some(), clock());
                    debug!(
                        operation = "book_checked",
                        title = %entry.title,
                        library = %entry.library,
                        results = response.items.len(),
                        previous = %previous,
                        status = %entry.status,
                        "Book checked"
                    );

                    if let (true, Some(item)) = (newly_found, matched) {
                        info!(
                            operation = "book_found",
                            title = %entry.title,
                            library = %entry.library,
                            owned_copies = item.owned_copies,
                            "Book newly found in catalogue"
                        );
                        outcome.new_finds.push(NewFind {
                            entry: entry.clone(),
                            item,
                        });
                    }
                }
                Err(e) => {
                    error!(
                        operation = "catalogue_search",
                        title = %entry.title,
                        library = %entry.library,
                        error = %e,
                        "Catalogue search failed, skipping book this round"
                    );
                    outcome.failed += 1;
                }
            }

            if idx + 1 < total {
                self.pacer.pause().await;
            }
        }

        outcome
    }
}

fn local_now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

#[cfg(test)]
mod tests;
