//! Centralized path resolution.
//!
//! Every place that needs a solace directory goes through this module so the
//! environment overrides apply uniformly.

use std::path::PathBuf;

/// Application data directory, used for the transcript log.
///
/// Resolves to `dirs::data_dir()/solace/` by default. Override with the
/// `SOLACE_DATA_DIR` environment variable.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("SOLACE_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("solace"))
        .unwrap_or_else(|| PathBuf::from("/tmp/solace-data"))
}

/// Application config directory, holding `config.toml`.
///
/// Resolves to `$XDG_CONFIG_HOME/solace/`, then `dirs::config_dir()/solace/`.
/// Override with the `SOLACE_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("SOLACE_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("solace");
    }
    dirs::config_dir()
        .map(|d| d.join("solace"))
        .unwrap_or_else(|| PathBuf::from("/tmp/solace-config"))
}

/// `config_dir()/config.toml`
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// `data_dir()/transcript.jsonl`
#[must_use]
pub fn transcript_file() -> PathBuf {
    data_dir().join("transcript.jsonl")
}
