pub mod config;
pub mod error;
pub mod paths;

pub use config::{CatalogueSettings, Config, SchedulerConfig};
pub use error::ConfigError;
pub use paths::PathManager;
