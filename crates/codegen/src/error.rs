use hookgen_core::SymbolError;
use index::ScanError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
  #[error("Scan failed: {0}")]
  Scan(#[from] ScanError),

  #[error("Type table error: {0}")]
  Symbols(#[from] SymbolError),

  #[error("IO error at {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

pub type Result<T> = std::result::Result<T, GenerateError>;
