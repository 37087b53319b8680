//! Locating, loading and writing the configuration file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use memtodo_core::Config;

/// Load from `path` when given, otherwise from the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")
}

/// Write a default configuration file and return where it went.
///
/// An existing file is left alone.
pub fn init_config(path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::config_path()?,
    };
    if path.exists() {
        bail!("Config file already exists: {}", path.display());
    }
    Config::default().save_to(&path)?;
    Ok(path)
}
