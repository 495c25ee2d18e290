//! Client configuration: serde defaults, an optional TOML file, then CLI/env overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "docreview.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("failed to parse config {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewConfig {
  /// Base URL of the review backend
  #[serde(default = "default_api_url")]
  pub api_url: String,
  /// Per-request timeout in seconds
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
  /// Documents fetched per listing request
  #[serde(default = "default_page_size")]
  pub page_size: u32,
}

fn default_api_url() -> String {
  "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
  60
}

fn default_page_size() -> u32 {
  20
}

impl Default for ReviewConfig {
  fn default() -> Self {
    Self {
      api_url: default_api_url(),
      timeout_secs: default_timeout_secs(),
      page_size: default_page_size(),
    }
  }
}

impl ReviewConfig {
  pub fn from_toml_str(contents: &str, path: &Path) -> Result<Self, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Loads `explicit` if given (it must exist), else `docreview.toml` in the working
  /// directory if present, else defaults.
  pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
    let path = match explicit {
      Some(path) => path.to_path_buf(),
      None => {
        let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
        if !fallback.exists() {
          return Ok(Self::default());
        }
        fallback
      }
    };

    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
      path: path.clone(),
      source,
    })?;
    Self::from_toml_str(&contents, &path)
  }

  pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
    if let Some(url) = api_url {
      self.api_url = url;
    }
    self
  }
}
