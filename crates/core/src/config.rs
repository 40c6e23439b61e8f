//! Configuration system for hookgen with per-project overrides.
//!
//! Config priority: project-relative (.hookgen.toml) > user (~/.config/hookgen/config.toml) > defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Project-relative config file name
pub const PROJECT_CONFIG_FILE: &str = ".hookgen.toml";

// ============================================================================
// Generator Configuration
// ============================================================================

/// Names of the runtime hook-registration library referenced by generated code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
  /// Namespace holding the endpoint manager (e.g., "MonoMod.RuntimeDetour.HookGen")
  pub runtime_namespace: String,

  /// Type exposing Add/Remove/Modify/Unmodify (e.g., "HookEndpointManager")
  pub endpoint_manager: String,

  /// Callback type for IL hooks (e.g., "MonoMod.Cil.ILContext.Manipulator")
  pub manipulator_type: String,

  /// Spaces per indentation level in generated code
  pub indent: usize,

  /// Emit the `// <auto-generated />` header
  pub header: bool,
}

impl Default for GeneratorConfig {
  fn default() -> Self {
    Self {
      runtime_namespace: "MonoMod.RuntimeDetour.HookGen".to_string(),
      endpoint_manager: "HookEndpointManager".to_string(),
      manipulator_type: "MonoMod.Cil.ILContext.Manipulator".to_string(),
      indent: 4,
      header: true,
    }
  }
}

impl GeneratorConfig {
  /// `global::`-qualified endpoint manager type
  pub fn endpoint_manager_path(&self) -> String {
    qualify(&format!("{}.{}", self.runtime_namespace, self.endpoint_manager))
  }

  /// `global::`-qualified manipulator type
  pub fn manipulator_path(&self) -> String {
    qualify(&self.manipulator_type)
  }
}

fn qualify(path: &str) -> String {
  let path = path.trim_matches('.');
  if path.starts_with("global::") {
    path.to_string()
  } else {
    format!("global::{}", path)
  }
}

// ============================================================================
// Scan Configuration
// ============================================================================

/// Source discovery settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
  /// File extensions to scan (without the dot)
  pub extensions: Vec<String>,

  /// Skip files larger than this many bytes (default: 1 MiB)
  pub max_file_size: u64,

  /// Ignore previously generated `*.g.cs` files
  pub skip_generated: bool,

  /// Follow symbolic links while walking
  pub follow_links: bool,

  /// Extra JSON type tables (project-relative or absolute paths)
  pub type_tables: Vec<PathBuf>,
}

impl Default for ScanConfig {
  fn default() -> Self {
    Self {
      extensions: vec!["cs".to_string()],
      max_file_size: 1024 * 1024,
      skip_generated: true,
      follow_links: false,
      type_tables: Vec::new(),
    }
  }
}

// ============================================================================
// Output Configuration
// ============================================================================

/// Where generated units are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
  /// Output directory, relative to the project root unless absolute
  pub directory: PathBuf,

  /// Remove generated files that are no longer produced
  pub prune: bool,
}

impl Default for OutputConfig {
  fn default() -> Self {
    Self {
      directory: PathBuf::from("Generated").join("Hooks"),
      prune: true,
    }
  }
}

// ============================================================================
// Log Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
  /// Log level: error, warn, info, debug, trace (RUST_LOG overrides)
  pub level: String,
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      level: "info".to_string(),
    }
  }
}

// ============================================================================
// Main Configuration
// ============================================================================

/// hookgen configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Generated code settings
  #[serde(default)]
  pub generator: GeneratorConfig,

  /// Source discovery settings
  #[serde(default)]
  pub scan: ScanConfig,

  /// Output settings
  #[serde(default)]
  pub output: OutputConfig,

  /// Logging settings
  #[serde(default)]
  pub log: LogConfig,
}

impl Config {
  /// Load config for a project, with fallback to user config, then defaults.
  ///
  /// A config file that exists but does not parse is an error.
  pub fn load_for_project(project_path: &Path) -> Result<Self, ConfigError> {
    let project_config = Self::project_config_path(project_path);
    if project_config.exists() {
      return Self::load_file(&project_config);
    }

    if let Some(user_config_path) = Self::user_config_path()
      && user_config_path.exists()
    {
      return Self::load_file(&user_config_path);
    }

    Ok(Self::default())
  }

  /// Parse a single config file
  pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|source| ConfigError::Toml {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Get the user-level config path
  pub fn user_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("HOOKGEN_CONFIG_DIR") {
      return Some(PathBuf::from(path).join("config.toml"));
    }

    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
      return Some(PathBuf::from(path).join("hookgen").join("config.toml"));
    }

    dirs::config_dir().map(|p: PathBuf| p.join("hookgen").join("config.toml"))
  }

  /// Get the project-relative config path
  pub fn project_config_path(project_path: &Path) -> PathBuf {
    project_path.join(PROJECT_CONFIG_FILE)
  }

  /// Resolve the output directory against a project root
  pub fn output_dir(&self, project_path: &Path) -> PathBuf {
    project_path.join(&self.output.directory)
  }

  /// Resolve configured type tables against a project root
  pub fn type_table_paths(&self, project_path: &Path) -> Vec<PathBuf> {
    self.scan.type_tables.iter().map(|p| project_path.join(p)).collect()
  }

  /// Serialize the effective configuration
  pub fn to_toml(&self) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(self)?)
  }

  /// Generate a default config file as a string
  pub fn generate_template() -> String {
    let defaults = Self::default();
    format!(
      r#"# hookgen Configuration
# Place in .hookgen.toml (project) or ~/.config/hookgen/config.toml (user)

# ============================================================================
# Generated Code
# ============================================================================

[generator]
# Namespace and type of the runtime hook endpoint manager
runtime_namespace = "{runtime_namespace}"
endpoint_manager = "{endpoint_manager}"

# Callback type used by IL (transform) hooks
manipulator_type = "{manipulator_type}"

# Spaces per indentation level
indent = {indent}

# Emit an <auto-generated /> header
header = true

# ============================================================================
# Source Discovery
# ============================================================================

[scan]
# Extensions to scan for hook references and type declarations
extensions = ["cs"]

# Skip files larger than this (bytes)
max_file_size = {max_file_size}

# Ignore previously generated *.g.cs files
skip_generated = true

# Follow symlinks while walking the project
follow_links = false

# Extra type tables exported from referenced assemblies (JSON):
# type_tables = ["metadata/Assembly-CSharp.json"]

# ============================================================================
# Output
# ============================================================================

[output]
# Directory for generated files (relative to project root)
directory = "Generated/Hooks"

# Remove On.*/IL.* files that are no longer generated
prune = true

# ============================================================================
# Logging
# ============================================================================

[log]
# Log level: error, warn, info, debug, trace (RUST_LOG overrides)
level = "info"
"#,
      runtime_namespace = defaults.generator.runtime_namespace,
      endpoint_manager = defaults.generator.endpoint_manager,
      manipulator_type = defaults.generator.manipulator_type,
      indent = defaults.generator.indent,
      max_file_size = defaults.scan.max_file_size,
    )
  }
}
