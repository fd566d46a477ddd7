use super::*;
use chrono::NaiveDate;
use libby_monitor_models::{BookStatus, CatalogueResponse};
use libby_monitor_sources::SourceError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

type EventLog = Arc<Mutex<Vec<String>>>;

enum Scripted {
    Respond(Vec<CatalogueItem>),
    Fail,
}

/// Catalogue answering from a script keyed by query; unknown queries return no results
struct FakeCatalogue {
    script: Mutex<HashMap<String, Scripted>>,
    events: EventLog,
}

impl FakeCatalogue {
    fn new(events: EventLog) -> Self {
        Self {
            script: Mutex::new(HashMap::new()),
            events,
        }
    }

    fn respond(&self, query: &str, items: Vec<CatalogueItem>) {
        self.script.lock().unwrap().insert(query.to_string(), Scripted::Respond(items));
    }

    fn fail(&self, query: &str) {
        self.script.lock().unwrap().insert(query.to_string(), Scripted::Fail);
    }
}

#[async_trait]
impl CatalogueSource for FakeCatalogue {
    fn source_name(&self) -> &str {
        "fake"
    }

    async fn search(&self, library: &str, query: &str) -> Result<CatalogueResponse, SourceError> {
        self.events.lock().unwrap().push(format!("search {}:{}", library, query));
        match self.script.lock().unwrap().get(query) {
            Some(Scripted::Respond(items)) => Ok(CatalogueResponse {
                total_items: items.len() as u64,
                items: items.clone(),
            }),
            Some(Scripted::Fail) => Err(SourceError::Timeout),
            None => Ok(CatalogueResponse::default()),
        }
    }
}

struct RecordingPacer {
    pauses: AtomicUsize,
    events: EventLog,
}

impl RecordingPacer {
    fn new(events: EventLog) -> Self {
        Self {
            pauses: AtomicUsize::new(0),
            events,
        }
    }

    fn pauses(&self) -> usize {
        self.pauses.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
        self.events.lock().unwrap().push("pause".to_string());
    }
}

fn harness() -> (FakeCatalogue, RecordingPacer, EventLog) {
    let events: EventLog = Arc::new(Mutex::new(Vec::new()));
    (
        FakeCatalogue::new(events.clone()),
        RecordingPacer::new(events.clone()),
        events,
    )
}

fn owned(title: &str, copies: u32, available: bool) -> CatalogueItem {
    CatalogueItem {
        title: title.to_string(),
        first_creator_name: String::new(),
        is_owned: true,
        owned_copies: copies,
        is_available: available,
        available_copies: if available { 1 } else { 0 },
    }
}

fn book(title: &str) -> WatchlistEntry {
    WatchlistEntry::new(title, "", "telaviv", NaiveDate::from_ymd_opt(2026, 1, 10).unwrap())
}

fn watchlist(titles: &[&str]) -> Watchlist {
    let mut watchlist = Watchlist::new();
    for title in titles {
        watchlist.watch(book(title));
    }
    watchlist
}

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
}

#[tokio::test]
async fn test_dune_becomes_found() {
    let (catalogue, pacer, _) = harness();
    catalogue.respond("Dune", vec![owned("Dune", 3, true)]);
    let mut list = watchlist(&["Dune"]);

    let outcome = Reconciler::new(&catalogue, &pacer)
        .reconcile_at(&mut list, at("2026-10-17T09:30:00"))
        .await;

    let dune = &list.books[0];
    assert_eq!(dune.status, BookStatus::Found);
    assert_eq!(dune.found_date, NaiveDate::from_ymd_opt(2026, 10, 17));
    assert_eq!(dune.last_checked, Some(at("2026-10-17T09:30:00")));
    assert_eq!(outcome.checked, 1);
    assert_eq!(outcome.failed, 0);
    assert_eq!(outcome.new_finds.len(), 1);
    assert_eq!(outcome.new_finds[0].item.owned_copies, 3);
    assert_eq!(outcome.new_finds[0].entry.title, "Dune");
}

#[tokio::test]
async fn test_transport_failure_skips_only_that_book() {
    let (catalogue, pacer, _) = harness();
    catalogue.respond("Dune", vec![owned("Dune", 1, false)]);
    catalogue.fail("Borne");
    catalogue.respond("Anathem", vec![owned("Anathem", 2, true)]);
    let mut list = watchlist(&["Dune", "Borne", "Anathem"]);
    let borne_before = list.books[1].clone();

    let outcome = Reconciler::new(&catalogue, &pacer)
        .reconcile_at(&mut list, at("2026-10-17T09:30:00"))
        .await;

    assert_eq!(list.books[1], borne_before);
    assert_eq!(list.books[0].status, BookStatus::Found);
    assert_eq!(list.books[2].status, BookStatus::Found);
    assert!(list.books[0].last_checked.is_some());
    assert!(list.books[2].last_checked.is_some());
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.new_finds.len(), 2);
    // Failed books still count toward the pause schedule
    assert_eq!(pacer.pauses(), 2);
}

#[tokio::test]
async fn test_pauses_only_between_queries() {
    let (catalogue, pacer, events) = harness();
    let mut list = watchlist(&["Dune", "Borne", "Anathem", "Piranesi"]);

    Reconciler::new(&catalogue, &pacer)
        .reconcile_at(&mut list, at("2026-10-17T09:30:00"))
        .await;

    assert_eq!(pacer.pauses(), 3);
    let events = events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            "search telaviv:Dune",
            "pause",
            "search telaviv:Borne",
            "pause",
            "search telaviv:Anathem",
            "pause",
            "search telaviv:Piranesi",
        ]
    );
}

#[tokio::test]
async fn test_single_and_empty_watchlists_never_pause() {
    let (catalogue, pacer, events) = harness();

    let mut single = watchlist(&["Dune"]);
    Reconciler::new(&catalogue, &pacer)
        .reconcile_at(&mut single, at("2026-10-17T09:30:00"))
        .await;
    assert_eq!(pacer.pauses(), 0);

    let mut empty = Watchlist::new();
    let outcome = Reconciler::new(&catalogue, &pacer)
        .reconcile_at(&mut empty, at("2026-10-17T09:30:00"))
        .await;
    assert_eq!(pacer.pauses(), 0);
    assert_eq!(outcome.checked, 0);
    assert_eq!(events.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_query_includes_author_and_library() {
    let (catalogue, pacer, events) = harness();
    let mut list = Watchlist::new();
    let mut entry = book("Dune");
    entry.author = "Frank Herbert".to_string();
    entry.library = "nypl".to_string();
    list.watch(entry);

    Reconciler::new(&catalogue, &pacer)
        .reconcile_at(&mut list, at("2026-10-17T09:30:00"))
        .await;

    assert_eq!(events.lock().unwrap()[0], "search nypl:Dune Frank Herbert");
}

#[tokio::test]
async fn test_new_find_reported_once_per_transition() {
    let (catalogue, pacer, _) = harness();
    let reconciler = Reconciler::new(&catalogue, &pacer);
    let mut list = watchlist(&["Dune"]);

    catalogue.respond("Dune", vec![owned("Dune", 1, true)]);
    let first = reconciler.reconcile_at(&mut list, at("2026-10-01T08:00:00")).await;
    let second = reconciler.reconcile_at(&mut list, at("2026-10-02T08:00:00")).await;
    assert_eq!(first.new_finds.len(), 1);
    assert!(second.new_finds.is_empty());
    assert_eq!(list.books[0].status, BookStatus::Found);

    catalogue.respond("Dune", vec![]);
    let third = reconciler.reconcile_at(&mut list, at("2026-10-03T08:00:00")).await;
    assert!(third.new_finds.is_empty());
    assert_eq!(list.books[0].status, BookStatus::NotFound);

    catalogue.respond("Dune", vec![owned("Dune", 1, true)]);
    let fourth = reconciler.reconcile_at(&mut list, at("2026-10-04T08:00:00")).await;
    assert_eq!(fourth.new_finds.len(), 1);

    // First discovery date is kept through every round
    assert_eq!(list.books[0].found_date, NaiveDate::from_ymd_opt(2026, 10, 1));
    assert_eq!(list.books[0].last_checked, Some(at("2026-10-04T08:00:00")));
}

#[tokio::test]
async fn test_unowned_match_regresses_found_book() {
    let (catalogue, pacer, _) = harness();
    let mut list = watchlist(&["Dune"]);
    list.books[0].status = BookStatus::Found;
    list.books[0].found_date = NaiveDate::from_ymd_opt(2026, 5, 5);

    let mut unowned = owned("Dune", 0, false);
    unowned.is_owned = false;
    catalogue.respond("Dune", vec![unowned]);

    let outcome = Reconciler::new(&catalogue, &pacer)
        .reconcile_at(&mut list, at("2026-10-17T09:30:00"))
        .await;

    assert!(outcome.new_finds.is_empty());
    assert_eq!(list.books[0].status, BookStatus::NotFound);
    assert_eq!(list.books[0].found_date, NaiveDate::from_ymd_opt(2026, 5, 5));
}

#[tokio::test]
async fn test_first_genuine_match_is_reported() {
    let (catalogue, pacer, _) = harness();
    let mut unowned = owned("Dune", 9, true);
    unowned.is_owned = false;
    catalogue.respond(
        "Dune",
        vec![unowned, owned("Dune: Deluxe Edition", 2, false), owned("Dune", 5, true)],
    );
    let mut list = watchlist(&["Dune"]);

    let outcome = Reconciler::new(&catalogue, &pacer)
        .reconcile_at(&mut list, at("2026-10-17T09:30:00"))
        .await;

    assert_eq!(outcome.new_finds[0].item.title, "Dune: Deluxe Edition");
    assert_eq!(outcome.new_finds[0].item.owned_copies, 2);
}

#[tokio::test]
async fn test_progress_called_for_each_book() {
    let (catalogue, pacer, _) = harness();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let reconciler = Reconciler::new(&catalogue, &pacer).with_progress(Box::new(
        move |idx: usize, total: usize, entry: &WatchlistEntry| {
            sink.lock().unwrap().push(format!("{}/{} {}", idx + 1, total, entry.title));
        },
    ));
    let mut list = watchlist(&["Dune", "Borne"]);

    reconciler.reconcile_at(&mut list, at("2026-10-17T09:30:00")).await;

    assert_eq!(*seen.lock().unwrap(), vec!["1/2 Dune", "2/2 Borne"]);
}

#[tokio::test]
async fn test_fixed_interval_pacer_zero_returns_immediately() {
    let pacer = FixedIntervalPacer::new(Duration::ZERO);
    let start = std::time::Instant::now();
    pacer.pause().await;
    assert!(start.elapsed() < Duration::from_millis(100));
}
