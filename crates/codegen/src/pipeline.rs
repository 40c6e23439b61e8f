//! The pure generation pass: references + semantic model -> generated units

use hookgen_core::{GeneratedUnit, GeneratorConfig, HookKind, HookReferences, SemanticModel};
use serde::Serialize;
use tracing::info;

use crate::emit::emit_unit;
use crate::group::group_hooks;
use crate::resolver::{Unresolved, UnresolvedReason, resolve_all};

/// Counters for one generation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
  pub subscribe_references: usize,
  pub transform_references: usize,
  pub resolved: usize,
  pub unknown_types: usize,
  pub unknown_methods: usize,
  /// Generic declaring types or methods, which have no endpoint to emit
  pub generic_skipped: usize,
  pub units: usize,
  pub members: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Generation {
  pub units: Vec<GeneratedUnit>,
  pub unresolved: Vec<Unresolved>,
  pub stats: GenerationStats,
}

/// Resolve, group and emit.
///
/// Deterministic: the same references, model and config always produce the same units in the same
/// order, Subscribe-style units first.
pub fn generate<M>(references: &HookReferences, model: &M, config: &GeneratorConfig) -> Generation
where
  M: SemanticModel + ?Sized,
{
  let resolution = resolve_all(model, references);
  let groups = group_hooks(&resolution.hooks);
  let units: Vec<GeneratedUnit> = groups.iter().map(|group| emit_unit(group, config)).collect();

  let count_reason = |reason: UnresolvedReason| resolution.unresolved.iter().filter(|u| u.reason == reason).count();
  let stats = GenerationStats {
    subscribe_references: references.get(HookKind::Subscribe).len(),
    transform_references: references.get(HookKind::Transform).len(),
    resolved: resolution.hooks.len(),
    unknown_types: count_reason(UnresolvedReason::UnknownType),
    unknown_methods: count_reason(UnresolvedReason::UnknownMethod),
    generic_skipped: count_reason(UnresolvedReason::GenericType) + count_reason(UnresolvedReason::GenericMethod),
    units: units.len(),
    members: groups.iter().map(|g| g.methods.len()).sum(),
  };

  info!(
    references = references.len(),
    resolved = stats.resolved,
    units = stats.units,
    "generation complete"
  );

  Generation {
    units,
    unresolved: resolution.unresolved,
    stats,
  }
}
