//! Symbol resolution for hook references
//!
//! A reference resolves when its type name is known to the semantic model and that type declares a
//! method with the referenced name. Anything else is skipped: hook-shaped text that does not name a
//! known method must never break generation for the rest of the program.
//!
//! Generic targets are skipped too. An open generic type or method has no single `MethodInfo` for
//! `typeof(..).GetMethod(..)` to return, and the generated partial class would lack its parameters.

use hookgen_core::{HookKind, HookReference, HookReferences, MethodSymbol, SemanticModel, TypeSymbol};
use serde::Serialize;
use tracing::debug;

/// A reference bound to a concrete declaring type and method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedHook<'m> {
  pub kind: HookKind,
  pub declaring_type: &'m TypeSymbol,
  pub method: &'m MethodSymbol,
}

/// Why a reference was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
  UnknownType,
  UnknownMethod,
  /// The declaring type, or a type it is nested in, has type parameters
  GenericType,
  GenericMethod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unresolved {
  pub reference: HookReference,
  pub reason: UnresolvedReason,
}

/// Outcome of resolving a batch of references
#[derive(Debug, Clone, Default)]
pub struct Resolution<'m> {
  /// Resolved hooks in reference order
  pub hooks: Vec<ResolvedHook<'m>>,
  pub unresolved: Vec<Unresolved>,
}

/// Resolve one reference.
///
/// Methods are matched by name only and the first declared match wins; overloads are not
/// disambiguated by parameter list.
pub fn resolve<'m, M>(model: &'m M, reference: &HookReference) -> Result<ResolvedHook<'m>, UnresolvedReason>
where
  M: SemanticModel + ?Sized,
{
  let declaring_type = model
    .lookup_type(&reference.type_name)
    .ok_or(UnresolvedReason::UnknownType)?;
  let method = declaring_type
    .method_named(&reference.method_name)
    .ok_or(UnresolvedReason::UnknownMethod)?;

  let generic_container = declaring_type
    .container_names()
    .iter()
    .any(|name| model.lookup_type(name).is_some_and(TypeSymbol::is_generic));
  if declaring_type.is_generic() || generic_container {
    return Err(UnresolvedReason::GenericType);
  }
  if method.is_generic() {
    return Err(UnresolvedReason::GenericMethod);
  }

  Ok(ResolvedHook {
    kind: reference.kind,
    declaring_type,
    method,
  })
}

/// Resolve every reference, Subscribe-style first, keeping first-seen order
pub fn resolve_all<'m, M>(model: &'m M, references: &HookReferences) -> Resolution<'m>
where
  M: SemanticModel + ?Sized,
{
  let mut resolution = Resolution::default();

  for reference in references.iter() {
    match resolve(model, reference) {
      Ok(hook) => resolution.hooks.push(hook),
      Err(reason) => {
        debug!(reference = %reference, ?reason, "skipping unresolved hook reference");
        resolution.unresolved.push(Unresolved {
          reference: reference.clone(),
          reason,
        });
      }
    }
  }

  resolution
}

#[cfg(test)]
mod tests {
  use super::*;
  use hookgen_core::{Member, TypeTable};

  fn table() -> TypeTable {
    [
      TypeSymbol::new("Player")
        .in_namespace("Game")
        .with_member(Member::Property {
          name: "Health".to_string(),
        })
        .with_method(MethodSymbol::new("Hurt").with_parameters(["int"]))
        .with_method(MethodSymbol::new("Hurt").with_parameters(["int", "string"])),
      TypeSymbol::new("World").in_namespace("Game"),
      TypeSymbol::new("Pool")
        .in_namespace("Game")
        .with_type_parameters(["T"])
        .with_method(MethodSymbol::new("Fill")),
      TypeSymbol::new("Slot")
        .in_namespace("Game")
        .nested_in(["Pool"])
        .with_method(MethodSymbol::new("Clear")),
      TypeSymbol::new("Spawner")
        .in_namespace("Game")
        .with_method(MethodSymbol::new("Spawn").with_type_parameters(["TEnemy"]))
        .with_method(MethodSymbol::new("Reset")),
    ]
    .into_iter()
    .collect()
  }

  fn reference(text: &str) -> HookReference {
    HookReference::parse(text).unwrap()
  }

  #[test]
  fn test_resolves_known_method() {
    let table = table();
    let hook = resolve(&table, &reference("On.Game.Player.Hurt")).unwrap();
    assert_eq!(hook.kind, HookKind::Subscribe);
    assert_eq!(hook.declaring_type.qualified_name(), "Game.Player");
    assert_eq!(hook.method.name, "Hurt");
  }

  #[test]
  fn test_overloads_resolve_to_first_declared() {
    let table = table();
    for _ in 0..3 {
      let hook = resolve(&table, &reference("IL.Game.Player.Hurt")).unwrap();
      assert_eq!(hook.method.parameters, vec!["int"]);
    }
  }

  #[test]
  fn test_unknown_type_is_skipped() {
    let table = table();
    assert_eq!(
      resolve(&table, &reference("On.Game.Enemy.Hurt")),
      Err(UnresolvedReason::UnknownType)
    );
    // partial names do not resolve
    assert_eq!(
      resolve(&table, &reference("On.Player.Hurt")),
      Err(UnresolvedReason::UnknownType)
    );
  }

  #[test]
  fn test_non_method_members_do_not_resolve() {
    let table = table();
    assert_eq!(
      resolve(&table, &reference("On.Game.Player.Health")),
      Err(UnresolvedReason::UnknownMethod)
    );
    assert_eq!(
      resolve(&table, &reference("On.Game.World.Tick")),
      Err(UnresolvedReason::UnknownMethod)
    );
  }

  #[test]
  fn test_resolve_all_absorbs_failures() {
    let table = table();
    let mut refs = HookReferences::new();
    refs.insert(reference("On.Game.Missing.Hurt"));
    refs.insert(reference("On.Game.Player.Hurt"));
    refs.insert(reference("On.Game.World.Tick"));
    refs.insert(reference("IL.Game.Player.Hurt"));

    let resolution = resolve_all(&table, &refs);
    let resolved: Vec<_> = resolution.hooks.iter().map(|h| (h.kind, h.method.name.as_str())).collect();
    assert_eq!(
      resolved,
      vec![(HookKind::Subscribe, "Hurt"), (HookKind::Transform, "Hurt")]
    );

    let reasons: Vec<_> = resolution.unresolved.iter().map(|u| u.reason).collect();
    assert_eq!(
      reasons,
      vec![UnresolvedReason::UnknownType, UnresolvedReason::UnknownMethod]
    );
  }

  #[test]
  fn test_generic_targets_are_skipped() {
    let table = table();
    assert_eq!(
      resolve(&table, &reference("On.Game.Pool.Fill")),
      Err(UnresolvedReason::GenericType)
    );
    assert_eq!(
      resolve(&table, &reference("IL.Game.Pool.Slot.Clear")),
      Err(UnresolvedReason::GenericType)
    );
    assert_eq!(
      resolve(&table, &reference("On.Game.Spawner.Spawn")),
      Err(UnresolvedReason::GenericMethod)
    );
    assert!(resolve(&table, &reference("On.Game.Spawner.Reset")).is_ok());
  }
}
