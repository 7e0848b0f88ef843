//! Error types for the badge-export codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("input has no header row")]
  MissingHeader,

  #[error("unexpected header: expected {expected:?}, found {found:?}")]
  UnexpectedHeader { expected: String, found: String },

  #[error("line {line}: expected {expected} cells, found {found}")]
  CellCount {
    line:     usize,
    expected: usize,
    found:    usize,
  },

  #[error("line {line}: unterminated quoted cell")]
  UnterminatedQuote { line: usize },

  #[error("line {line}: stray quote inside an unquoted cell")]
  StrayQuote { line: usize },

  #[error("line {line}: {source}")]
  Record {
    line:   usize,
    #[source]
    source: badge_core::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
