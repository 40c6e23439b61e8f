//! CSharpParser implementation

use hookgen_core::{HookReferences, TypeSymbol};
use tree_sitter::{Language as TsLanguage, Parser, QueryCursor, Tree};

use crate::error::ParseError;
use crate::queries::{self, CSharpQueries};
use crate::{scanner, symbols};

/// Cached parse tree for the last file
struct CachedTree {
  content_hash: u64,
  tree: Tree,
}

/// Everything extracted from one source file
#[derive(Debug, Clone, Default)]
pub struct FileAnalysis {
  pub references: HookReferences,
  pub types: Vec<TypeSymbol>,
}

/// Tree-sitter based C# parser
///
/// Lazily loads the grammar and queries on first use. Caches the last parsed tree so that
/// scanning references and collecting types from the same content parses it only once.
///
/// Not `Sync`: use one instance per thread.
pub struct CSharpParser {
  parser: Option<Parser>,
  queries: Option<CSharpQueries>,
  tree_cache: Option<CachedTree>,
  /// Reusable query cursor (avoids allocation per query)
  query_cursor: QueryCursor,
}

impl CSharpParser {
  /// Create a new CSharpParser
  pub fn new() -> Self {
    Self {
      parser: None,
      queries: None,
      tree_cache: None,
      query_cursor: QueryCursor::new(),
    }
  }

  /// Simple hash for content (for cache invalidation)
  fn hash_content(content: &str) -> u64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
  }

  fn ensure_loaded(&mut self) -> Result<(), ParseError> {
    if self.parser.is_some() && self.queries.is_some() {
      return Ok(());
    }

    let grammar: TsLanguage = tree_sitter_c_sharp::LANGUAGE.into();
    let mut parser = Parser::new();
    parser
      .set_language(&grammar)
      .map_err(|e| ParseError::Language(e.to_string()))?;

    self.queries = Some(queries::load_queries(&grammar)?);
    self.parser = Some(parser);
    Ok(())
  }

  /// Parse content, reusing the cached tree if the content is unchanged
  fn parse_cached(&mut self, content: &str) -> Result<&Tree, ParseError> {
    self.ensure_loaded()?;

    let content_hash = Self::hash_content(content);
    let cached = self.tree_cache.as_ref().is_some_and(|c| c.content_hash == content_hash);

    if !cached {
      let parser = self.parser.as_mut().ok_or(ParseError::Failed)?;
      let tree = parser.parse(content, None).ok_or(ParseError::Failed)?;
      self.tree_cache = Some(CachedTree { content_hash, tree });
    }

    self.tree_cache.as_ref().map(|c| &c.tree).ok_or(ParseError::Failed)
  }

  /// Collect `On.` / `IL.` hook references in document order
  pub fn scan_references(&mut self, content: &str) -> Result<HookReferences, ParseError> {
    self.parse_cached(content)?;

    let (Some(cached), Some(queries)) = (&self.tree_cache, &self.queries) else {
      return Err(ParseError::Failed);
    };

    Ok(scanner::collect_references(
      &queries.hook_assignments,
      &mut self.query_cursor,
      &cached.tree,
      content,
    ))
  }

  /// Collect declared types with their members
  pub fn collect_types(&mut self, content: &str) -> Result<Vec<TypeSymbol>, ParseError> {
    let tree = self.parse_cached(content)?;
    Ok(symbols::collect_types(tree, content))
  }

  /// Scan references and collect types from one parse
  pub fn analyze(&mut self, content: &str) -> Result<FileAnalysis, ParseError> {
    let references = self.scan_references(content)?;
    let types = self.collect_types(content)?;
    Ok(FileAnalysis { references, types })
  }
}

impl Default for CSharpParser {
  fn default() -> Self {
    Self::new()
  }
}
