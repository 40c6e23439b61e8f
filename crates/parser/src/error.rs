use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
  #[error("Failed to load C# grammar: {0}")]
  Language(String),

  #[error("Failed to compile {name} query: {message}")]
  Query { name: &'static str, message: String },

  #[error("Parser produced no tree")]
  Failed,
}
