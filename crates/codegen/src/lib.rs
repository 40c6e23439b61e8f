//! Hook resolution and C# synthesis.
//!
//! [`generate`] is the pure pass from hook references and a semantic model to generated units.
//! [`generate_project`] drives it over a directory of C# sources and [`write_units`] puts the result on
//! disk.

mod emit;
mod error;
mod group;
mod output;
mod pipeline;
mod project;
pub mod resolver;
pub mod signature;

pub use emit::emit_unit;
pub use error::{GenerateError, Result};
pub use group::{GenerationGroup, group_hooks};
pub use output::{WriteSummary, write_units};
pub use pipeline::{Generation, GenerationStats, generate};
pub use project::{ProjectAnalysis, ProjectOutput, analyze_project, generate_project};
pub use resolver::{Resolution, ResolvedHook, Unresolved, UnresolvedReason, resolve, resolve_all};
pub use signature::{CallbackShape, CallbackSignature, callback_type};
