//! Shared data model for hookgen: hook references, type symbols, generated units and configuration.

pub mod config;
pub mod error;
pub mod hook;
pub mod symbol;
pub mod unit;

pub use config::{Config, GeneratorConfig, LogConfig, OutputConfig, PROJECT_CONFIG_FILE, ScanConfig};
pub use error::{ConfigError, SymbolError};
pub use hook::{HookKind, HookReference, HookReferences, ReferenceSet};
pub use symbol::{Member, MethodSymbol, SemanticModel, TypeSymbol, TypeTable};
pub use unit::{GENERATED_EXTENSION, GeneratedUnit};
