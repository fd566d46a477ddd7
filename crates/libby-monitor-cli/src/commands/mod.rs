pub mod check;
pub mod check_ui;
pub mod config;
pub mod daemon;
pub mod list;
pub mod search;
pub mod unwatch;
pub mod watch;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use libby_monitor_config::{Config, PathManager};
use libby_monitor_core::WatchlistStore;

/// Settings resolved once in `main` and handed to every command
pub struct Context {
    pub paths: PathManager,
    pub profile: Option<String>,
}

impl Context {
    pub fn new(paths: PathManager, profile: Option<String>) -> Self {
        Self { paths, profile }
    }

    pub fn load_config(&self) -> Result<Config> {
        Config::load_or_create(&self.paths).wrap_err_with(|| {
            format!("Failed to load configuration from {}", self.paths.config_file().display())
        })
    }

    pub fn store(&self) -> Result<WatchlistStore> {
        Ok(WatchlistStore::new(&self.paths, self.profile.as_deref())?)
    }
}
