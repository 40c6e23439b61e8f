//! `hookgen generate`

use anyhow::{Context, Result};
use codegen::{WriteSummary, generate_project, write_units};
use hookgen_core::Config;
use serde_json::json;
use std::path::{Path, PathBuf};

pub struct GenerateOptions {
  pub out: Option<PathBuf>,
  pub types: Vec<PathBuf>,
  pub dry_run: bool,
  pub json: bool,
}

/// Run the full pass over a project and write (or list) the generated units
pub fn cmd_generate(root: &Path, config: &Config, options: GenerateOptions) -> Result<()> {
  let output = generate_project(root, config, &options.types).context("Failed to generate hooks")?;
  let out_dir = options.out.unwrap_or_else(|| config.output_dir(root));

  let summary = if options.dry_run {
    None
  } else {
    Some(
      write_units(&out_dir, &output.generation.units, config.output.prune)
        .with_context(|| format!("Failed to write units to {}", out_dir.display()))?,
    )
  };

  let generation = &output.generation;
  let analysis = &output.analysis;

  if options.json {
    let value = json!({
      "output": out_dir,
      "dry_run": options.dry_run,
      "files": analysis.files.len(),
      "failed_files": analysis.failed_files,
      "units": generation.units.iter().map(|u| u.file_name()).collect::<Vec<_>>(),
      "stats": generation.stats,
      "unresolved": generation.unresolved,
      "write": summary,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    return Ok(());
  }

  println!(
    "Generated {} unit(s) with {} hook(s) from {} file(s)",
    generation.stats.units,
    generation.stats.members,
    analysis.files.len()
  );

  match &summary {
    Some(summary) => print_summary(&out_dir, summary),
    None => {
      println!("Dry run, nothing written to {}", out_dir.display());
      for unit in &generation.units {
        println!("  {}", unit.file_name());
      }
    }
  }

  if !generation.unresolved.is_empty() {
    println!("\nSkipped {} unresolved reference(s):", generation.unresolved.len());
    for unresolved in &generation.unresolved {
      println!("  {} ({:?})", unresolved.reference, unresolved.reason);
    }
  }

  if analysis.failed_files > 0 {
    println!("\n{} file(s) could not be read or parsed", analysis.failed_files);
  }

  Ok(())
}

fn print_summary(out_dir: &Path, summary: &WriteSummary) {
  println!("Output:    {}", out_dir.display());
  println!("Written:   {}", summary.written.len());
  println!("Unchanged: {}", summary.unchanged);
  if !summary.removed.is_empty() {
    println!("Removed:   {}", summary.removed.len());
  }

  for path in &summary.written {
    println!("  + {}", display_name(path));
  }
  for path in &summary.removed {
    println!("  - {}", display_name(path));
  }
}

fn display_name(path: &Path) -> String {
  path
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_else(|| path.display().to_string())
}
