//! CLI command implementations.

pub mod check;
pub mod onboard;
pub mod run;

use drumbeat_config::{AppConfig, ConfigError};
use std::path::PathBuf;

/// Load configuration from an explicit path or the default search order.
pub(crate) fn load_config(path: Option<&PathBuf>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
}
