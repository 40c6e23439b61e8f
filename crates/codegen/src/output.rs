//! Writing generated units to disk

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use hookgen_core::{GENERATED_EXTENSION, GeneratedUnit, HookKind};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{GenerateError, Result};

#[derive(Debug, Clone, Default, Serialize)]
pub struct WriteSummary {
  pub written: Vec<PathBuf>,
  pub unchanged: usize,
  pub removed: Vec<PathBuf>,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> GenerateError + '_ {
  move |source| GenerateError::Io {
    path: path.to_path_buf(),
    source,
  }
}

/// Whether a file name looks like something this tool generated
fn is_generated_file(name: &str) -> bool {
  name.ends_with(GENERATED_EXTENSION)
    && HookKind::ALL
      .iter()
      .any(|kind| name.starts_with(&format!("{}.", kind.prefix())))
}

/// Write units into `dir`, touching only files whose content changed.
///
/// With `prune`, generated files in `dir` that no longer correspond to a unit are removed. Other
/// files are never touched.
pub fn write_units(dir: &Path, units: &[GeneratedUnit], prune: bool) -> Result<WriteSummary> {
  std::fs::create_dir_all(dir).map_err(io_error(dir))?;

  let mut summary = WriteSummary::default();
  let mut current: HashSet<String> = HashSet::with_capacity(units.len());

  for unit in units {
    let file_name = unit.file_name();
    let path = dir.join(&file_name);
    current.insert(file_name);

    if std::fs::read_to_string(&path).is_ok_and(|existing| existing == unit.text) {
      summary.unchanged += 1;
      continue;
    }

    std::fs::write(&path, &unit.text).map_err(io_error(&path))?;
    debug!(path = %path.display(), "wrote unit");
    summary.written.push(path);
  }

  if prune {
    for entry in std::fs::read_dir(dir).map_err(io_error(dir))? {
      let entry = entry.map_err(io_error(dir))?;
      let Some(name) = entry.file_name().to_str().map(str::to_string) else {
        continue;
      };
      if !is_generated_file(&name) || current.contains(&name) {
        continue;
      }

      let path = entry.path();
      if !path.is_file() {
        continue;
      }
      std::fs::remove_file(&path).map_err(io_error(&path))?;
      debug!(path = %path.display(), "removed stale unit");
      summary.removed.push(path);
    }
    summary.removed.sort();
  }

  info!(
    written = summary.written.len(),
    unchanged = summary.unchanged,
    removed = summary.removed.len(),
    "output updated"
  );
  Ok(summary)
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn unit(name: &str, text: &str) -> GeneratedUnit {
    GeneratedUnit {
      name: name.to_string(),
      text: text.to_string(),
    }
  }

  #[test]
  fn test_writes_and_skips_unchanged() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("Generated");
    let units = vec![unit("On.Foo", "namespace On {}\n"), unit("IL.Foo", "namespace IL {}\n")];

    let first = write_units(&out, &units, true).unwrap();
    assert_eq!(first.written.len(), 2);
    assert_eq!(
      std::fs::read_to_string(out.join("On.Foo.g.cs")).unwrap(),
      "namespace On {}\n"
    );

    let second = write_units(&out, &units, true).unwrap();
    assert!(second.written.is_empty());
    assert_eq!(second.unchanged, 2);
  }

  #[test]
  fn test_prune_removes_only_stale_generated_files() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("On.Old.g.cs"), "stale").unwrap();
    std::fs::write(dir.path().join("Helper.g.cs"), "keep").unwrap();
    std::fs::write(dir.path().join("On.Notes.txt"), "keep").unwrap();

    let summary = write_units(dir.path(), &[unit("On.Foo", "x")], true).unwrap();
    assert_eq!(summary.removed, vec![dir.path().join("On.Old.g.cs")]);
    assert!(!dir.path().join("On.Old.g.cs").exists());
    assert!(dir.path().join("Helper.g.cs").exists());
    assert!(dir.path().join("On.Notes.txt").exists());
  }

  #[test]
  fn test_no_prune_keeps_stale_files() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("IL.Old.g.cs"), "stale").unwrap();

    let summary = write_units(dir.path(), &[], false).unwrap();
    assert!(summary.removed.is_empty());
    assert!(dir.path().join("IL.Old.g.cs").exists());
  }

  #[test]
  fn test_is_generated_file() {
    assert!(is_generated_file("On.Game.Player.g.cs"));
    assert!(is_generated_file("IL.Foo.g.cs"));
    assert!(!is_generated_file("Online.g.cs"));
    assert!(!is_generated_file("On.Foo.cs"));
  }
}
