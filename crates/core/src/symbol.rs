//! Type information used to resolve hook references.
//!
//! [`TypeTable`] is the in-memory semantic model. It is filled either from C# declarations found in
//! scanned sources or from JSON dumps of referenced assemblies, and queried through [`SemanticModel`].

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::SymbolError;

/// A method as seen by the resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSymbol {
  pub name: String,
  #[serde(default, rename = "static")]
  pub is_static: bool,
  /// Parameter types in declaration order, as type text
  #[serde(default)]
  pub parameters: Vec<String>,
  /// `None` for methods without a return value
  #[serde(
    default,
    skip_serializing_if = "Option::is_none",
    deserialize_with = "deserialize_return_type"
  )]
  pub return_type: Option<String>,
  /// Method type parameters (`T` in `Get<T>()`)
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub type_parameters: Vec<String>,
}

/// Return type spellings that mean "no return value"
const VOID_TYPES: &[&str] = &["void", "System.Void", "global::System.Void"];

fn normalize_return_type(return_type: String) -> Option<String> {
  let trimmed = return_type.trim();
  if trimmed.is_empty() || VOID_TYPES.contains(&trimmed) {
    None
  } else {
    Some(return_type)
  }
}

fn deserialize_return_type<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<String>::deserialize(deserializer)?.and_then(normalize_return_type))
}

impl MethodSymbol {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      is_static: false,
      parameters: Vec::new(),
      return_type: None,
      type_parameters: Vec::new(),
    }
  }

  pub fn with_static(mut self, is_static: bool) -> Self {
    self.is_static = is_static;
    self
  }

  pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.parameters = parameters.into_iter().map(Into::into).collect();
    self
  }

  /// Set the return type; `void` means no return value
  pub fn with_return_type(mut self, return_type: impl Into<String>) -> Self {
    self.return_type = normalize_return_type(return_type.into());
    self
  }

  pub fn with_type_parameters<I, S>(mut self, type_parameters: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.type_parameters = type_parameters.into_iter().map(Into::into).collect();
    self
  }

  pub fn is_generic(&self) -> bool {
    !self.type_parameters.is_empty()
  }
}

/// A direct member of a type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Member {
  Method(MethodSymbol),
  Field { name: String },
  Property { name: String },
  NestedType { name: String },
}

impl Member {
  pub fn name(&self) -> &str {
    match self {
      Member::Method(method) => &method.name,
      Member::Field { name } | Member::Property { name } | Member::NestedType { name } => name,
    }
  }

  pub fn as_method(&self) -> Option<&MethodSymbol> {
    match self {
      Member::Method(method) => Some(method),
      _ => None,
    }
  }
}

/// A declared type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSymbol {
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub namespace: Option<String>,
  /// Enclosing types, outermost first
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub containing_types: Vec<String>,
  #[serde(default)]
  pub members: Vec<Member>,
  /// Type parameters (`T` in `Box<T>`)
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub type_parameters: Vec<String>,
  /// `using` directives in scope at the declaration, as written after `using`
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub usings: Vec<String>,
}

impl TypeSymbol {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      namespace: None,
      containing_types: Vec::new(),
      members: Vec::new(),
      type_parameters: Vec::new(),
      usings: Vec::new(),
    }
  }

  pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
    let namespace = namespace.into();
    self.namespace = if namespace.is_empty() { None } else { Some(namespace) };
    self
  }

  pub fn nested_in<I, S>(mut self, containing_types: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.containing_types = containing_types.into_iter().map(Into::into).collect();
    self
  }

  pub fn with_member(mut self, member: Member) -> Self {
    self.members.push(member);
    self
  }

  pub fn with_method(self, method: MethodSymbol) -> Self {
    self.with_member(Member::Method(method))
  }

  pub fn with_type_parameters<I, S>(mut self, type_parameters: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.type_parameters = type_parameters.into_iter().map(Into::into).collect();
    self
  }

  pub fn with_usings<I, S>(mut self, usings: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.usings = usings.into_iter().map(Into::into).collect();
    self
  }

  pub fn is_generic(&self) -> bool {
    !self.type_parameters.is_empty()
  }

  /// Qualified names of the enclosing types, outermost first
  pub fn container_names(&self) -> Vec<String> {
    let mut names = Vec::with_capacity(self.containing_types.len());
    let mut current = self.namespace.clone().unwrap_or_default();
    for container in &self.containing_types {
      current = if current.is_empty() {
        container.clone()
      } else {
        format!("{}.{}", current, container)
      };
      names.push(current.clone());
    }
    names
  }

  /// `Namespace.Outer.Name`
  pub fn qualified_name(&self) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(self.containing_types.len() + 2);
    if let Some(namespace) = &self.namespace {
      parts.push(namespace);
    }
    parts.extend(self.nesting_chain());
    parts.join(".")
  }

  /// Containing types outermost first, then this type
  pub fn nesting_chain(&self) -> impl Iterator<Item = &str> {
    self
      .containing_types
      .iter()
      .map(String::as_str)
      .chain(std::iter::once(self.name.as_str()))
  }

  /// First method with this exact name in declaration order.
  ///
  /// Overloads are not distinguished: the first declared one wins.
  pub fn method_named(&self, name: &str) -> Option<&MethodSymbol> {
    self.members.iter().filter_map(Member::as_method).find(|m| m.name == name)
  }

  pub fn methods(&self) -> impl Iterator<Item = &MethodSymbol> {
    self.members.iter().filter_map(Member::as_method)
  }
}

/// Type lookup service consumed by the resolver
pub trait SemanticModel {
  /// Find a type by its dotted fully-qualified name
  fn lookup_type(&self, qualified_name: &str) -> Option<&TypeSymbol>;
}

/// Ordered table of types keyed by qualified name
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
  types: Vec<TypeSymbol>,
  index: HashMap<String, usize>,
}

/// On-disk shape of a type table
#[derive(Serialize, Deserialize)]
struct TypeTableFile {
  types: Vec<TypeSymbol>,
}

impl TypeTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a type. If a type with the same qualified name exists (partial declarations, or the same type
  /// from another source), the new members are appended after the existing ones and any `using`
  /// directives not yet recorded are added.
  pub fn insert(&mut self, symbol: TypeSymbol) {
    let key = symbol.qualified_name();
    if let Some(&slot) = self.index.get(&key) {
      let existing = &mut self.types[slot];
      existing.members.extend(symbol.members);
      for using in symbol.usings {
        if !existing.usings.contains(&using) {
          existing.usings.push(using);
        }
      }
      if existing.type_parameters.is_empty() {
        existing.type_parameters = symbol.type_parameters;
      }
      return;
    }
    self.index.insert(key, self.types.len());
    self.types.push(symbol);
  }

  pub fn extend<I: IntoIterator<Item = TypeSymbol>>(&mut self, symbols: I) {
    for symbol in symbols {
      self.insert(symbol);
    }
  }

  pub fn merge(&mut self, other: TypeTable) {
    self.extend(other.types);
  }

  pub fn get(&self, qualified_name: &str) -> Option<&TypeSymbol> {
    self.index.get(qualified_name).map(|&slot| &self.types[slot])
  }

  pub fn contains(&self, qualified_name: &str) -> bool {
    self.index.contains_key(qualified_name)
  }

  pub fn iter(&self) -> std::slice::Iter<'_, TypeSymbol> {
    self.types.iter()
  }

  pub fn len(&self) -> usize {
    self.types.len()
  }

  pub fn is_empty(&self) -> bool {
    self.types.is_empty()
  }

  pub fn method_count(&self) -> usize {
    self.types.iter().map(|t| t.methods().count()).sum()
  }

  pub fn from_json(content: &str) -> Result<Self, SymbolError> {
    let file: TypeTableFile = serde_json::from_str(content)?;
    let mut table = Self::new();
    table.extend(file.types);
    Ok(table)
  }

  pub fn to_json(&self) -> Result<String, SymbolError> {
    let file = TypeTableFile {
      types: self.types.clone(),
    };
    Ok(serde_json::to_string_pretty(&file)?)
  }

  /// Load a JSON type table from disk
  pub fn load(path: &Path) -> Result<Self, SymbolError> {
    let content = std::fs::read_to_string(path).map_err(|source| SymbolError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_json(&content)
  }
}

impl SemanticModel for TypeTable {
  fn lookup_type(&self, qualified_name: &str) -> Option<&TypeSymbol> {
    self.get(qualified_name)
  }
}

impl FromIterator<TypeSymbol> for TypeTable {
  fn from_iter<I: IntoIterator<Item = TypeSymbol>>(iter: I) -> Self {
    let mut table = Self::new();
    table.extend(iter);
    table
  }
}
