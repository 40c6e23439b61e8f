use std::path::PathBuf;
use thiserror::Error;

/// Errors loading or saving type tables
#[derive(Error, Debug)]
pub enum SymbolError {
  #[error("Failed to read type table {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Invalid type table: {0}")]
  Json(#[from] serde_json::Error),
}

/// Errors loading or writing configuration
#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Invalid config {path}: {source}")]
  Toml {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },

  #[error("Failed to serialize config: {0}")]
  Serialize(#[from] toml::ser::Error),
}
