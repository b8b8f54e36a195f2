//! Data directory configuration.
//!
//! Precedence:
//! 1. `--data-dir` flag (handled by the caller)
//! 2. `MATCHPOINT_DATA_DIR` environment variable
//! 3. `$HOME/.config/matchpoint/data` if HOME is set
//! 4. `./data` as fallback

use std::path::PathBuf;

const DEFAULT_CONFIG_DIR: &str = ".config/matchpoint/data";
const DEV_DATA_DIR: &str = "./data";

/// Get the data directory for persistence.
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MATCHPOINT_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(DEFAULT_CONFIG_DIR);
    }

    PathBuf::from(DEV_DATA_DIR)
}
