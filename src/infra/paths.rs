// src/infra/paths.rs - Config path resolution
//
// UNIBOT_HOME overrides the config directory. Otherwise ~/.unibot/ is used.

use std::path::PathBuf;

/// Returns the UNIBOT_HOME override, if set.
fn unibot_home() -> Option<PathBuf> {
    std::env::var_os("UNIBOT_HOME").map(PathBuf::from)
}

/// Home directory, or the working directory if it cannot be determined.
pub fn dirs_home() -> PathBuf {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Configuration directory: $UNIBOT_HOME/ or ~/.unibot/
pub fn config_dir() -> PathBuf {
    unibot_home().unwrap_or_else(|| dirs_home().join(".unibot"))
}

pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
