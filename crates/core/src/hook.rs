//! Hook references as they appear in source.
//!
//! A hook reference is the left-hand side of a `+=` / `-=` compound assignment such as
//! `On.Game.Player.Update += ...`. The leading segment selects the [`HookKind`], the last
//! segment names the method and everything in between is the declaring type.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Which interception facility a reference targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookKind {
  /// `On.` hooks: callbacks wrapping the original call
  Subscribe,
  /// `IL.` hooks: callbacks rewriting the method body
  Transform,
}

impl HookKind {
  pub const ALL: [HookKind; 2] = [HookKind::Subscribe, HookKind::Transform];

  /// Source prefix, also used as the root namespace of generated code
  pub fn prefix(&self) -> &'static str {
    match self {
      HookKind::Subscribe => "On",
      HookKind::Transform => "IL",
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      HookKind::Subscribe => "subscribe",
      HookKind::Transform => "transform",
    }
  }

  /// Split a reference expression into its kind and the text after `On.` / `IL.`
  pub fn classify(text: &str) -> Option<(HookKind, &str)> {
    Self::ALL.into_iter().find_map(|kind| {
      text
        .strip_prefix(kind.prefix())
        .and_then(|rest| rest.strip_prefix('.'))
        .map(|rest| (kind, rest))
    })
  }
}

impl fmt::Display for HookKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A classified hook reference expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookReference {
  pub kind: HookKind,
  /// Trimmed expression text; the dedup key
  pub text: String,
  /// Candidate fully-qualified type name (prefix and method stripped)
  pub type_name: String,
  pub method_name: String,
}

impl HookReference {
  /// Classify an expression, returning `None` unless it has the shape `On.<Type>.<Method>` or
  /// `IL.<Type>.<Method>`.
  pub fn parse(text: &str) -> Option<Self> {
    let text = text.trim();
    let (kind, rest) = HookKind::classify(text)?;
    let (type_path, method) = rest.rsplit_once('.')?;

    let type_name = type_path.split('.').map(str::trim).collect::<Vec<_>>().join(".");
    let method_name = method.trim();
    if method_name.is_empty() || type_name.split('.').any(str::is_empty) {
      return None;
    }

    Some(Self {
      kind,
      text: text.to_string(),
      type_name,
      method_name: method_name.to_string(),
    })
  }
}

impl fmt::Display for HookReference {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.text)
  }
}

/// Insertion-ordered set of references keyed by their normalized text
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ReferenceSet {
  references: Vec<HookReference>,
  #[serde(skip)]
  seen: HashSet<String>,
}

impl ReferenceSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a reference unless one with the same text is already present.
  /// Returns true if it was added.
  pub fn insert(&mut self, reference: HookReference) -> bool {
    if !self.seen.insert(reference.text.clone()) {
      return false;
    }
    self.references.push(reference);
    true
  }

  pub fn iter(&self) -> std::slice::Iter<'_, HookReference> {
    self.references.iter()
  }

  pub fn len(&self) -> usize {
    self.references.len()
  }

  pub fn is_empty(&self) -> bool {
    self.references.is_empty()
  }
}

impl<'a> IntoIterator for &'a ReferenceSet {
  type Item = &'a HookReference;
  type IntoIter = std::slice::Iter<'a, HookReference>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

/// Hook references found in one or more files, one ordered set per kind
#[derive(Debug, Clone, Default, Serialize)]
pub struct HookReferences {
  pub subscribe: ReferenceSet,
  pub transform: ReferenceSet,
}

impl HookReferences {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, kind: HookKind) -> &ReferenceSet {
    match kind {
      HookKind::Subscribe => &self.subscribe,
      HookKind::Transform => &self.transform,
    }
  }

  /// Route a reference into its kind's set
  pub fn insert(&mut self, reference: HookReference) -> bool {
    match reference.kind {
      HookKind::Subscribe => self.subscribe.insert(reference),
      HookKind::Transform => self.transform.insert(reference),
    }
  }

  /// Append another file's references after ours, keeping first-seen order
  pub fn merge(&mut self, other: HookReferences) {
    for reference in other.subscribe.references.into_iter().chain(other.transform.references) {
      self.insert(reference);
    }
  }

  /// All references, Subscribe-style first
  pub fn iter(&self) -> impl Iterator<Item = &HookReference> {
    self.subscribe.iter().chain(self.transform.iter())
  }

  pub fn len(&self) -> usize {
    self.subscribe.len() + self.transform.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}
