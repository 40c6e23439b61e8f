//! Tree-sitter based C# scanning for hookgen
//!
//! This crate provides:
//! - Hook reference discovery (`On.<Type>.<Method> += ...`, `IL.<Type>.<Method> -= ...`)
//! - Type declaration collection for building a [`hookgen_core::TypeTable`]
//!
//! # Example
//! ```ignore
//! use parser::CSharpParser;
//!
//! let mut parser = CSharpParser::new();
//! let analysis = parser.analyze(code)?;
//! println!("{} hook references", analysis.references.len());
//! ```

mod error;
mod parser;
mod queries;
pub mod scanner;
pub mod symbols;

pub use error::ParseError;
pub use parser::{CSharpParser, FileAnalysis};
pub use symbols::qualify_type_references;
