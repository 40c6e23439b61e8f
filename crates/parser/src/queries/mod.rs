//! Tree-sitter query loading and compilation

use tree_sitter::{Language as TsLanguage, Query};

use crate::error::ParseError;

mod csharp;

/// Compiled queries for the C# grammar
pub struct CSharpQueries {
  /// Compound assignments whose left side is a member access
  pub hook_assignments: Query,
}

/// Compile every query used by the scanner
pub fn load_queries(grammar: &TsLanguage) -> Result<CSharpQueries, ParseError> {
  Ok(CSharpQueries {
    hook_assignments: compile_query(grammar, "hook_assignments", csharp::HOOK_ASSIGNMENTS_QUERY)?,
  })
}

/// Helper to compile a query, naming it in the error
pub fn compile_query(grammar: &TsLanguage, name: &'static str, source: &str) -> Result<Query, ParseError> {
  Query::new(grammar, source).map_err(|e| ParseError::Query {
    name,
    message: e.to_string(),
  })
}
