//! Source file discovery for hookgen
//!
//! Walks a project directory (respecting `.gitignore` and `.hookgenignore`) and returns the files
//! that may contain hook references or type declarations, in a stable order.

mod scanner;

pub use scanner::{IGNORE_FILE_NAME, ScanError, ScanResult, ScannedFile, SourceScanner};
