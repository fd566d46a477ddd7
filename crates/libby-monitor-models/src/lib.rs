pub mod book;
pub mod catalogue;
pub mod status;
pub mod watchlist;

pub use book::{same_title, WatchlistEntry, LAST_CHECKED_FORMAT};
pub use catalogue::{CatalogueItem, CatalogueResponse};
pub use status::BookStatus;
pub use watchlist::{Watchlist, WATCHLIST_VERSION};
