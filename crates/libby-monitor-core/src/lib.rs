pub mod matching;
pub mod reconcile;
pub mod report;
pub mod store;

pub use matching::{find_genuine_match, is_genuine_match, title_matches};
pub use reconcile::{CheckOutcome, FixedIntervalPacer, NewFind, Pacer, Reconciler};
pub use report::{CheckReport, ReportMode};
pub use store::{StoreError, WatchlistStore};
