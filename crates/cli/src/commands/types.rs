//! `hookgen types`

use anyhow::{Context, Result};
use codegen::analyze_project;
use hookgen_core::{Config, MethodSymbol};
use std::path::Path;

fn format_method(method: &MethodSymbol) -> String {
  format!(
    "{}{} {}({})",
    if method.is_static { "static " } else { "" },
    method.return_type.as_deref().unwrap_or("void"),
    method.name,
    method.parameters.join(", ")
  )
}

/// Show or export the type table collected from a project's sources
pub fn cmd_types(root: &Path, config: &Config, export: Option<&Path>, json: bool) -> Result<()> {
  let analysis = analyze_project(root, config, &[]).context("Failed to collect types")?;
  let types = &analysis.types;

  if let Some(path) = export {
    std::fs::write(path, types.to_json()?).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Exported {} type(s) to {}", types.len(), path.display());
    return Ok(());
  }

  if json {
    println!("{}", types.to_json()?);
    return Ok(());
  }

  println!("{} type(s), {} method(s)", types.len(), types.method_count());
  for symbol in types.iter() {
    println!("\n{}", symbol.qualified_name());
    for method in symbol.methods() {
      println!("  {}", format_method(method));
    }
  }

  Ok(())
}
