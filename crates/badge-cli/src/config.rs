//! Runtime configuration.
//!
//! Values come from an optional TOML file layered under `BADGE_*` environment
//! variables, e.g. `BADGE_STORE_PATH=/tmp/officers.db`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  /// SQLite database file. A leading `~/` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_store_path() -> PathBuf { PathBuf::from("badge.db") }

impl Config {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("BADGE"))
      .build()
      .context("failed to read config file")?;

    let mut cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise Config")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
