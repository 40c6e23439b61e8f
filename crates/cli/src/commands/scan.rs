//! `hookgen scan`

use anyhow::{Context, Result};
use codegen::{analyze_project, resolve};
use hookgen_core::{Config, HookKind};
use std::path::Path;

/// List hook references found in a project, per kind
pub fn cmd_scan(root: &Path, config: &Config, json: bool) -> Result<()> {
  let analysis = analyze_project(root, config, &[]).context("Failed to scan project")?;

  if json {
    println!("{}", serde_json::to_string_pretty(&analysis.references)?);
    return Ok(());
  }

  println!(
    "Scanned {} file(s) in {:.2?}",
    analysis.files.len(),
    analysis.scan_duration
  );

  for kind in HookKind::ALL {
    let references = analysis.references.get(kind);
    println!("\n{} ({}): {}", kind.prefix(), kind, references.len());
    for reference in references {
      match resolve(&analysis.types, reference) {
        Ok(_) => println!("  {}", reference.text),
        Err(reason) => println!("  {}  ({:?})", reference.text, reason),
      }
    }
  }

  Ok(())
}
