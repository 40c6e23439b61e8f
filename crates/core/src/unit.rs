use serde::Serialize;

/// Extension of generated files on disk
pub const GENERATED_EXTENSION: &str = ".g.cs";

/// One synthesized source file, named after its hook kind and original type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedUnit {
  pub name: String,
  pub text: String,
}

impl GeneratedUnit {
  pub fn file_name(&self) -> String {
    format!("{}{}", self.name, GENERATED_EXTENSION)
  }
}
