//! Centralized path management for the zeitmaschine CLI
//!
//! This module provides utilities for consistently locating the data
//! directory, the image cache database and the session file.

use std::path::PathBuf;
use zeitmaschine_core::cache::sqlite_cache::STORE_FILE;

/// The name of the application directory used across all platforms
const APP_DATA_DIR: &str = "zeitmaschine";

/// The name of the session file
const SESSION_FILE: &str = "session.json";

/// Returns the base data directory for the application
///
/// On Unix-like systems this is `~/.local/share/zeitmaschine`, on Windows
/// `%APPDATA%/zeitmaschine`. Falls back to `.zeitmaschine` in the current
/// directory if the platform directory cannot be determined.
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DATA_DIR))
        .unwrap_or_else(|| PathBuf::from(".zeitmaschine"))
}

/// Returns the path to the image cache database
pub fn get_cache_db_path() -> PathBuf {
    get_data_dir().join(STORE_FILE)
}

/// Returns the path to the stored login session
pub fn get_session_path() -> PathBuf {
    get_data_dir().join(SESSION_FILE)
}

/// Returns the configuration directory
///
/// Honors `XDG_CONFIG_HOME` on Unix-like systems.
pub fn get_config_dir() -> PathBuf {
    #[cfg(not(target_os = "windows"))]
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        return PathBuf::from(xdg_config).join(APP_DATA_DIR);
    }

    dirs::config_dir()
        .map(|d| d.join(APP_DATA_DIR))
        .unwrap_or_else(|| PathBuf::from(".zeitmaschine"))
}

/// Returns the path to the configuration file
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.toml")
}
