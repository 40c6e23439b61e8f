use hookgen_core::{GENERATED_EXTENSION, ScanConfig};
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// Per-project ignore file, same syntax as .gitignore
pub const IGNORE_FILE_NAME: &str = ".hookgenignore";

#[derive(Error, Debug)]
pub enum ScanError {
  #[error("Not a directory: {0}")]
  NotADirectory(PathBuf),
}

/// A source file selected for analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
  pub path: PathBuf,
  /// Path relative to the scan root, with `/` separators
  pub relative_path: String,
  pub size: u64,
}

/// Result of scanning a directory
#[derive(Debug)]
pub struct ScanResult {
  /// Files sorted by relative path
  pub files: Vec<ScannedFile>,
  pub skipped_count: u32,
  pub total_bytes: u64,
  pub scan_duration: Duration,
}

/// Source file scanner with gitignore support
pub struct SourceScanner {
  extensions: Vec<String>,
  max_file_size: u64,
  skip_generated: bool,
  follow_links: bool,
}

impl Default for SourceScanner {
  fn default() -> Self {
    Self::new()
  }
}

impl SourceScanner {
  pub fn new() -> Self {
    Self::from_config(&ScanConfig::default())
  }

  pub fn from_config(config: &ScanConfig) -> Self {
    Self {
      extensions: config
        .extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .collect(),
      max_file_size: config.max_file_size,
      skip_generated: config.skip_generated,
      follow_links: config.follow_links,
    }
  }

  fn wants_extension(&self, path: &Path) -> bool {
    path
      .extension()
      .and_then(|e| e.to_str())
      .is_some_and(|ext| self.extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(ext)))
  }

  fn is_generated(path: &Path) -> bool {
    path
      .file_name()
      .and_then(|n| n.to_str())
      .is_some_and(|name| name.ends_with(GENERATED_EXTENSION))
  }

  /// Scan directory in parallel, respecting .gitignore.
  ///
  /// The walk order is not deterministic, so the result is sorted by relative path.
  pub fn scan(&self, root: &Path) -> Result<ScanResult, ScanError> {
    if !root.is_dir() {
      return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let start = Instant::now();
    let skipped = AtomicU32::new(0);
    let total_bytes = AtomicU64::new(0);

    let walker = WalkBuilder::new(root)
      .follow_links(self.follow_links)
      .hidden(true) // Skip hidden files and directories
      .git_ignore(true)
      .git_global(true)
      .git_exclude(true)
      .add_custom_ignore_filename(IGNORE_FILE_NAME)
      .build();

    let mut files: Vec<ScannedFile> = walker
      .filter_map(|e| match e {
        Ok(entry) => Some(entry),
        Err(err) => {
          debug!(error = %err, "walk error");
          None
        }
      })
      .par_bridge()
      .filter_map(|entry| {
        let path = entry.path();

        // Skip directories
        if entry.file_type().is_none_or(|ft| ft.is_dir()) {
          return None;
        }

        if !self.wants_extension(path) {
          return None;
        }

        if self.skip_generated && Self::is_generated(path) {
          skipped.fetch_add(1, Ordering::Relaxed);
          return None;
        }

        // Skip empty or large files
        let metadata = entry.metadata().ok()?;
        if metadata.len() == 0 || metadata.len() > self.max_file_size {
          debug!(path = %path.display(), size = metadata.len(), "skipping file");
          skipped.fetch_add(1, Ordering::Relaxed);
          return None;
        }

        total_bytes.fetch_add(metadata.len(), Ordering::Relaxed);

        Some(ScannedFile {
          path: path.to_path_buf(),
          relative_path: relative_path(path, root)?,
          size: metadata.len(),
        })
      })
      .collect();

    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    Ok(ScanResult {
      files,
      skipped_count: skipped.load(Ordering::Relaxed),
      total_bytes: total_bytes.load(Ordering::Relaxed),
      scan_duration: start.elapsed(),
    })
  }
}

fn relative_path(path: &Path, root: &Path) -> Option<String> {
  let relative = path.strip_prefix(root).ok()?;
  Some(relative.to_string_lossy().replace('\\', "/"))
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn test_scan_basic() {
    let dir = TempDir::new().unwrap();

    std::fs::write(dir.path().join("Player.cs"), "class Player {}").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();

    let result = SourceScanner::new().scan(dir.path()).unwrap();

    // Only the .cs file is a source file
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].relative_path, "Player.cs");
  }

  #[test]
  fn test_scan_sorted_by_relative_path() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("b")).unwrap();
    std::fs::create_dir_all(dir.path().join("a")).unwrap();
    std::fs::write(dir.path().join("b/Z.cs"), "class Z {}").unwrap();
    std::fs::write(dir.path().join("a/Y.cs"), "class Y {}").unwrap();
    std::fs::write(dir.path().join("X.cs"), "class X {}").unwrap();

    let result = SourceScanner::new().scan(dir.path()).unwrap();
    let paths: Vec<_> = result.files.iter().map(|f| f.relative_path.as_str()).collect();
    assert_eq!(paths, vec!["X.cs", "a/Y.cs", "b/Z.cs"]);
  }

  #[test]
  fn test_scan_respects_gitignore() {
    let dir = TempDir::new().unwrap();

    // Create .git directory so the ignore crate recognizes this as a git repo
    std::fs::create_dir(dir.path().join(".git")).unwrap();
    std::fs::write(dir.path().join(".gitignore"), "ignored/\n").unwrap();

    std::fs::write(dir.path().join("Main.cs"), "class Main {}").unwrap();
    std::fs::create_dir(dir.path().join("ignored")).unwrap();
    std::fs::write(dir.path().join("ignored/Hidden.cs"), "class Hidden {}").unwrap();

    let result = SourceScanner::new().scan(dir.path()).unwrap();
    let paths: Vec<_> = result.files.iter().map(|f| &f.relative_path).collect();
    assert_eq!(result.files.len(), 1, "Expected 1 file, found {:?}", paths);
    assert_eq!(result.files[0].relative_path, "Main.cs");
  }

  #[test]
  fn test_scan_respects_hookgenignore() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(IGNORE_FILE_NAME), "Decompiled/\n").unwrap();
    std::fs::write(dir.path().join("Mod.cs"), "class Mod {}").unwrap();
    std::fs::create_dir(dir.path().join("Decompiled")).unwrap();
    std::fs::write(dir.path().join("Decompiled/Game.cs"), "class Game {}").unwrap();

    let result = SourceScanner::new().scan(dir.path()).unwrap();
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].relative_path, "Mod.cs");
  }

  #[test]
  fn test_scan_skips_generated_files() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("Mod.cs"), "class Mod {}").unwrap();
    std::fs::write(dir.path().join("On.Game.Player.g.cs"), "namespace On.Game {}").unwrap();

    let result = SourceScanner::new().scan(dir.path()).unwrap();
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.skipped_count, 1);

    let config = ScanConfig {
      skip_generated: false,
      ..Default::default()
    };
    let result = SourceScanner::from_config(&config).scan(dir.path()).unwrap();
    assert_eq!(result.files.len(), 2);
  }

  #[test]
  fn test_scan_skips_large_and_empty_files() {
    let dir = TempDir::new().unwrap();

    std::fs::write(dir.path().join("Small.cs"), "class Small {}").unwrap();
    std::fs::write(dir.path().join("Empty.cs"), "").unwrap();
    let large_content = "x".repeat(2 * 1024 * 1024);
    std::fs::write(dir.path().join("Large.cs"), large_content).unwrap();

    let scanner = SourceScanner::from_config(&ScanConfig {
      max_file_size: 1024 * 1024,
      ..Default::default()
    });
    let result = scanner.scan(dir.path()).unwrap();

    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].relative_path, "Small.cs");
    assert_eq!(result.skipped_count, 2);
  }

  #[test]
  fn test_custom_extensions() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("A.cs"), "class A {}").unwrap();
    std::fs::write(dir.path().join("B.csx"), "class B {}").unwrap();

    let config = ScanConfig {
      extensions: vec![".csx".to_string()],
      ..Default::default()
    };
    let result = SourceScanner::from_config(&config).scan(dir.path()).unwrap();
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].relative_path, "B.csx");
  }

  #[test]
  fn test_scan_missing_root() {
    let dir = TempDir::new().unwrap();
    let err = SourceScanner::new().scan(&dir.path().join("missing")).unwrap_err();
    assert!(matches!(err, ScanError::NotADirectory(_)));
  }
}
