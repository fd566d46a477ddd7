use libby_monitor_config::{ConfigError, PathManager};
use libby_monitor_models::{Watchlist, WATCHLIST_VERSION};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt watchlist {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Watchlist {path} has version {found}; this build supports up to version {supported}")]
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        supported: u32,
    },

    #[error("Watchlist {path} lists '{title}' more than once")]
    DuplicateTitle { path: PathBuf, title: String },

    #[error("Failed to serialize watchlist: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Loads and saves the watchlist of one profile as a whole document
pub struct WatchlistStore {
    data_dir: PathBuf,
    path: PathBuf,
    profile: Option<String>,
}

impl WatchlistStore {
    pub fn new(paths: &PathManager, profile: Option<&str>) -> Result<Self, StoreError> {
        Ok(Self {
            data_dir: paths.data_dir().to_path_buf(),
            path: paths.watchlist_file(profile)?,
            profile: profile.map(str::to_string),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    /// Load the watchlist, or an empty one if the file does not exist yet.
    ///
    /// Unversioned documents from earlier releases are upgraded in memory and
    /// written back in the current format on the next save.
    pub fn load(&self) -> Result<Watchlist, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No watchlist file yet, starting empty");
            return Ok(Watchlist::new());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        let mut watchlist: Watchlist =
            serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        if watchlist.version > WATCHLIST_VERSION {
            return Err(StoreError::UnsupportedVersion {
                path: self.path.clone(),
                found: watchlist.version,
                supported: WATCHLIST_VERSION,
            });
        }
        if watchlist.version < WATCHLIST_VERSION {
            info!(
                operation = "watchlist_migrate",
                path = %self.path.display(),
                from = watchlist.version,
                to = WATCHLIST_VERSION,
                "Upgrading watchlist document"
            );
            watchlist.version = WATCHLIST_VERSION;
        }

        if let Some(title) = watchlist.duplicate_title() {
            return Err(StoreError::DuplicateTitle {
                path: self.path.clone(),
                title: title.to_string(),
            });
        }

        debug!(path = %self.path.display(), books = watchlist.len(), "Watchlist loaded");
        Ok(watchlist)
    }

    /// Replace the stored watchlist. The document is written to a temporary
    /// file first and renamed into place.
    pub fn save(&self, watchlist: &Watchlist) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.data_dir).map_err(|e| StoreError::io(&self.data_dir, e))?;

        let mut json = serde_json::to_string_pretty(watchlist).map_err(StoreError::Serialize)?;
        json.push('\n');

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json).map_err(|e| StoreError::io(&tmp_path, e))?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::io(&self.path, e))?;

        debug!(path = %self.path.display(), books = watchlist.len(), "Watchlist saved");
        Ok(())
    }
}
