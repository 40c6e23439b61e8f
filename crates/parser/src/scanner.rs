//! Hook reference discovery
//!
//! Folds the matches of the hook assignment query into one ordered, de-duplicated set per hook kind.
//! Only `+=` and `-=` assignments count; the left operand's text decides the kind.

use hookgen_core::{HookReference, HookReferences};
use tree_sitter::{Node, Query, QueryCursor, StreamingIterator, Tree};
use tracing::trace;

/// Operators that register or unregister a hook
const HOOK_OPERATORS: &[&str] = &["+=", "-="];

/// Node kinds a dotted path may parse as
const TARGET_KINDS: &[&str] = &["member_access_expression", "qualified_name"];

/// Collect hook references from a parsed tree in document order
pub fn collect_references(query: &Query, cursor: &mut QueryCursor, tree: &Tree, source: &str) -> HookReferences {
  let mut references = HookReferences::new();

  let Some(assignment_idx) = query.capture_index_for_name("assignment") else {
    return references;
  };

  let bytes = source.as_bytes();
  let mut matches = cursor.matches(query, tree.root_node(), bytes);

  while let Some(match_) = matches.next() {
    let Some(assignment) = match_.captures.iter().find(|c| c.index == assignment_idx).map(|c| c.node) else {
      continue;
    };
    let Some(target) = member_access_target(assignment) else {
      continue;
    };

    if !assignment_operator(assignment).is_some_and(|op| HOOK_OPERATORS.contains(&op)) {
      continue;
    }

    let Ok(text) = target.utf8_text(bytes) else {
      continue;
    };

    if let Some(reference) = HookReference::parse(text) {
      let kind = reference.kind;
      if references.insert(reference) {
        trace!(kind = %kind, text = text.trim(), line = target.start_position().row + 1, "hook reference");
      }
    }
  }

  references
}

/// Left operand, if it is a dotted member access (`A.B.C`)
fn member_access_target(assignment: Node) -> Option<Node> {
  let left = assignment.child_by_field_name("left")?;
  TARGET_KINDS.contains(&left.kind()).then_some(left)
}

/// The assignment's operator token (comments around it are separate nodes)
fn assignment_operator(assignment: Node) -> Option<&'static str> {
  assignment.child_by_field_name("operator").map(|op| op.kind())
}

#[cfg(test)]
mod tests {
  use crate::CSharpParser;
  use hookgen_core::HookKind;

  fn scan(source: &str) -> hookgen_core::HookReferences {
    CSharpParser::new().scan_references(source).unwrap()
  }

  fn texts(refs: &hookgen_core::HookReferences, kind: HookKind) -> Vec<String> {
    refs.get(kind).iter().map(|r| r.text.clone()).collect()
  }

  #[test]
  fn test_collects_both_kinds() {
    let refs = scan(
      r#"
class Mod {
  void Load() {
    On.Game.Player.Update += OnUpdate;
    IL.Game.Player.Jump += PatchJump;
  }
}
"#,
    );
    assert_eq!(texts(&refs, HookKind::Subscribe), vec!["On.Game.Player.Update"]);
    assert_eq!(texts(&refs, HookKind::Transform), vec!["IL.Game.Player.Jump"]);
  }

  #[test]
  fn test_identical_references_deduplicated() {
    let refs = scan(
      r#"
class Mod {
  void Load() { On.Player.Update += OnUpdate; }
  void Unload() { On.Player.Update -= OnUpdate; }
  void Again() { On.Player.Update += Other; }
}
"#,
    );
    assert_eq!(refs.subscribe.len(), 1);
    assert!(refs.transform.is_empty());
  }

  #[test]
  fn test_ignores_other_prefixes_and_operators() {
    let refs = scan(
      r#"
class Mod {
  void Load() {
    Events.Player.Update += OnUpdate;
    On.Player.Update = null;
    On.Player.Score *= 2;
    counter += 1;
    this.On.Player.Update += OnUpdate;
  }
}
"#,
    );
    assert!(refs.is_empty(), "unexpected references: {:?}", refs);
  }

  #[test]
  fn test_first_occurrence_order() {
    let refs = scan(
      r#"
class Mod {
  void Load() {
    On.B.Second += H;
    On.A.First += H;
    IL.C.Third += P;
    On.B.Second += H;
  }
}
"#,
    );
    assert_eq!(texts(&refs, HookKind::Subscribe), vec!["On.B.Second", "On.A.First"]);
    assert_eq!(texts(&refs, HookKind::Transform), vec!["IL.C.Third"]);
  }

  #[test]
  fn test_lambda_callbacks() {
    let refs = scan(
      r#"
class Mod {
  void Load() {
    On.Game.Player.Hurt += (orig, self, amount) => orig(self, amount * 2);
    IL.Game.Player.Hurt += il => { };
  }
}
"#,
    );
    assert_eq!(refs.len(), 2);
    let hurt = refs.subscribe.iter().next().unwrap();
    assert_eq!(hurt.type_name, "Game.Player");
    assert_eq!(hurt.method_name, "Hurt");
  }

  #[test]
  fn test_comments_around_operator() {
    let refs = scan(
      r#"
class Mod {
  void Load() {
    On.Game.Player.Update /* hook */ += OnUpdate;
    IL.Game.Player.Jump // patch
      -= PatchJump;
    On.Game.Player.Hurt += /* trailing */ OnHurt;
  }
}
"#,
    );
    assert_eq!(
      texts(&refs, HookKind::Subscribe),
      vec!["On.Game.Player.Update", "On.Game.Player.Hurt"]
    );
    assert_eq!(texts(&refs, HookKind::Transform), vec!["IL.Game.Player.Jump"]);
  }
}
