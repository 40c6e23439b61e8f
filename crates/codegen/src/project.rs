//! Project driver: scan a directory, analyze every source file, then generate

use std::path::{Path, PathBuf};
use std::time::Duration;

use hookgen_core::{Config, HookReferences, TypeTable};
use index::{ScannedFile, SourceScanner};
use parser::{CSharpParser, FileAnalysis, qualify_type_references};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::pipeline::{Generation, generate};

/// Merged view of every analyzed file in a project
#[derive(Debug, Default)]
pub struct ProjectAnalysis {
  pub references: HookReferences,
  pub types: TypeTable,
  pub files: Vec<ScannedFile>,
  /// Files that could not be read or parsed
  pub failed_files: usize,
  pub scan_duration: Duration,
}

#[derive(Debug)]
pub struct ProjectOutput {
  pub analysis: ProjectAnalysis,
  pub generation: Generation,
}

fn analyze_file(parser: &mut CSharpParser, file: &ScannedFile) -> Option<FileAnalysis> {
  let content = match std::fs::read_to_string(&file.path) {
    Ok(content) => content,
    Err(e) => {
      warn!(path = %file.relative_path, error = %e, "failed to read source file, skipping");
      return None;
    }
  };

  match parser.analyze(&content) {
    Ok(analysis) => {
      debug!(
        path = %file.relative_path,
        references = analysis.references.len(),
        types = analysis.types.len(),
        "analyzed"
      );
      Some(analysis)
    }
    Err(e) => {
      warn!(path = %file.relative_path, error = %e, "failed to parse source file, skipping");
      None
    }
  }
}

/// Scan and analyze a project.
///
/// Files are parsed in parallel but merged in relative-path order. Types declared in source come
/// first; configured and `extra_type_tables` JSON tables are merged after them.
pub fn analyze_project(root: &Path, config: &Config, extra_type_tables: &[PathBuf]) -> Result<ProjectAnalysis> {
  let scanner = SourceScanner::from_config(&config.scan);
  let scan = scanner.scan(root)?;
  info!(
    files = scan.files.len(),
    skipped = scan.skipped_count,
    bytes = scan.total_bytes,
    "scan complete"
  );

  let analyses: Vec<Option<FileAnalysis>> = scan
    .files
    .par_iter()
    .map_init(CSharpParser::new, analyze_file)
    .collect();

  let mut references = HookReferences::new();
  let mut source_types = TypeTable::new();
  let mut failed_files = 0;
  for analysis in analyses {
    match analysis {
      Some(analysis) => {
        references.merge(analysis.references);
        source_types.extend(analysis.types);
      }
      None => failed_files += 1,
    }
  }

  let mut types = qualify_type_references(&source_types);
  for path in config.type_table_paths(root).iter().chain(extra_type_tables) {
    let table = TypeTable::load(path)?;
    debug!(path = %path.display(), types = table.len(), "loaded type table");
    types.merge(table);
  }

  Ok(ProjectAnalysis {
    references,
    types,
    files: scan.files,
    failed_files,
    scan_duration: scan.scan_duration,
  })
}

/// Analyze a project and run the generation pass over it
pub fn generate_project(root: &Path, config: &Config, extra_type_tables: &[PathBuf]) -> Result<ProjectOutput> {
  let analysis = analyze_project(root, config, extra_type_tables)?;
  let generation = generate(&analysis.references, &analysis.types, &config.generator);
  Ok(ProjectOutput { analysis, generation })
}
