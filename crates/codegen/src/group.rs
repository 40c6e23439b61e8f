use std::collections::HashMap;

use hookgen_core::{HookKind, MethodSymbol, TypeSymbol};

use crate::resolver::ResolvedHook;

/// All resolved hooks sharing a hook kind and declaring type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationGroup<'m> {
  pub kind: HookKind,
  pub declaring_type: &'m TypeSymbol,
  /// First-resolved order, one entry per method name
  pub methods: Vec<&'m MethodSymbol>,
}

impl<'m> GenerationGroup<'m> {
  fn new(kind: HookKind, declaring_type: &'m TypeSymbol) -> Self {
    Self {
      kind,
      declaring_type,
      methods: Vec::new(),
    }
  }

  /// Name of the unit this group produces: `Prefix.Namespace.Outer.Type`
  pub fn unit_name(&self) -> String {
    let mut parts: Vec<&str> = vec![self.kind.prefix()];
    if let Some(namespace) = &self.declaring_type.namespace {
      parts.push(namespace);
    }
    parts.extend(self.declaring_type.nesting_chain());
    parts.join(".")
  }

  fn add_method(&mut self, method: &'m MethodSymbol) {
    if !self.methods.iter().any(|m| m.name == method.name) {
      self.methods.push(method);
    }
  }
}

/// Group hooks by (kind, declaring type), preserving first-resolved order
pub fn group_hooks<'m>(hooks: &[ResolvedHook<'m>]) -> Vec<GenerationGroup<'m>> {
  let mut groups: Vec<GenerationGroup<'m>> = Vec::new();
  let mut slots: HashMap<(HookKind, String), usize> = HashMap::new();

  for hook in hooks {
    let key = (hook.kind, hook.declaring_type.qualified_name());
    let slot = *slots.entry(key).or_insert_with(|| {
      groups.push(GenerationGroup::new(hook.kind, hook.declaring_type));
      groups.len() - 1
    });
    groups[slot].add_method(hook.method);
  }

  groups
}

#[cfg(test)]
mod tests {
  use super::*;

  fn hook<'m>(kind: HookKind, ty: &'m TypeSymbol, name: &str) -> ResolvedHook<'m> {
    ResolvedHook {
      kind,
      declaring_type: ty,
      method: ty.method_named(name).unwrap(),
    }
  }

  fn player() -> TypeSymbol {
    TypeSymbol::new("Player")
      .in_namespace("Game")
      .with_method(MethodSymbol::new("Update"))
      .with_method(MethodSymbol::new("Hurt"))
  }

  #[test]
  fn test_groups_by_kind_and_type() {
    let player = player();
    let world = TypeSymbol::new("World").with_method(MethodSymbol::new("Tick"));

    let hooks = vec![
      hook(HookKind::Subscribe, &player, "Hurt"),
      hook(HookKind::Subscribe, &world, "Tick"),
      hook(HookKind::Subscribe, &player, "Update"),
      hook(HookKind::Transform, &player, "Update"),
    ];

    let groups = group_hooks(&hooks);
    let summary: Vec<_> = groups
      .iter()
      .map(|g| {
        (
          g.unit_name(),
          g.methods.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
        )
      })
      .collect();

    assert_eq!(
      summary,
      vec![
        ("On.Game.Player".to_string(), vec!["Hurt", "Update"]),
        ("On.World".to_string(), vec!["Tick"]),
        ("IL.Game.Player".to_string(), vec!["Update"]),
      ]
    );
  }

  #[test]
  fn test_duplicate_methods_added_once() {
    let player = player();
    let hooks = vec![
      hook(HookKind::Subscribe, &player, "Update"),
      hook(HookKind::Subscribe, &player, "Update"),
    ];
    let groups = group_hooks(&hooks);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].methods.len(), 1);
  }

  #[test]
  fn test_unit_name_includes_containing_types() {
    let inner = TypeSymbol::new("Inner")
      .in_namespace("Game.Core")
      .nested_in(["Outer"])
      .with_method(MethodSymbol::new("Run"));
    let groups = group_hooks(&[hook(HookKind::Transform, &inner, "Run")]);
    assert_eq!(groups[0].unit_name(), "IL.Game.Core.Outer.Inner");
  }

  #[test]
  fn test_empty_input() {
    assert!(group_hooks(&[]).is_empty());
  }
}
