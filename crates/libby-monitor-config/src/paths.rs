use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "LIBBY_BOOK_MONITOR_DATA";

const DEFAULT_DIR_NAME: &str = ".libby-book-monitor";

/// Locations of every file the monitor reads or writes, rooted at one data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathManager {
    data_dir: PathBuf,
}

impl PathManager {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Resolve the data directory: explicit flag, then `LIBBY_BOOK_MONITOR_DATA`,
    /// then `~/.libby-book-monitor`.
    pub fn resolve(flag: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::resolve_with(flag, std::env::var(DATA_DIR_ENV).ok())
    }

    fn resolve_with(flag: Option<PathBuf>, env: Option<String>) -> Result<Self, ConfigError> {
        if let Some(dir) = flag {
            return Ok(Self::new(dir));
        }
        if let Some(dir) = env.filter(|v| !v.is_empty()) {
            return Ok(Self::new(dir));
        }
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir(DATA_DIR_ENV))?;
        Ok(Self::new(home.join(DEFAULT_DIR_NAME)))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join("config.toml")
    }

    /// JSON config written by earlier releases, imported once into `config.toml`
    pub fn legacy_config_file(&self) -> PathBuf {
        self.data_dir.join("config.json")
    }

    /// `watchlist.json`, or `watchlist-<profile>.json` for a named profile
    pub fn watchlist_file(&self, profile: Option<&str>) -> Result<PathBuf, ConfigError> {
        match profile {
            Some(name) => {
                validate_profile(name)?;
                Ok(self.data_dir.join(format!("watchlist-{}.json", name)))
            }
            None => Ok(self.data_dir.join("watchlist.json")),
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    pub fn daemon_log_file(&self) -> PathBuf {
        self.log_dir().join("libby-book-monitor.log")
    }

    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.data_dir).map_err(|e| ConfigError::io(&self.data_dir, e))
    }
}

/// Profile names become part of a file name, so they may not contain path separators
pub fn validate_profile(name: &str) -> Result<(), ConfigError> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidProfile(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins_over_env() {
        let paths = PathManager::resolve_with(
            Some(PathBuf::from("/tmp/flag")),
            Some("/tmp/env".to_string()),
        )
        .unwrap();
        assert_eq!(paths.data_dir(), Path::new("/tmp/flag"));
    }

    #[test]
    fn test_env_used_without_flag() {
        let paths = PathManager::resolve_with(None, Some("/tmp/env".to_string())).unwrap();
        assert_eq!(paths.data_dir(), Path::new("/tmp/env"));
    }

    #[test]
    fn test_empty_env_falls_back_to_home() {
        if let Some(home) = dirs::home_dir() {
            let paths = PathManager::resolve_with(None, Some(String::new())).unwrap();
            assert_eq!(paths.data_dir(), home.join(".libby-book-monitor"));
        }
    }

    #[test]
    fn test_profile_qualified_watchlist_names() {
        let paths = PathManager::new("/data");
        assert_eq!(
            paths.watchlist_file(None).unwrap(),
            PathBuf::from("/data/watchlist.json")
        );
        assert_eq!(
            paths.watchlist_file(Some("alice")).unwrap(),
            PathBuf::from("/data/watchlist-alice.json")
        );
    }

    #[test]
    fn test_profile_with_separator_rejected() {
        let paths = PathManager::new("/data");
        assert!(paths.watchlist_file(Some("../etc")).is_err());
        assert!(paths.watchlist_file(Some("a/b")).is_err());
        assert!(paths.watchlist_file(Some("")).is_err());
        assert!(validate_profile("kids_2026.v1").is_ok());
    }
}
