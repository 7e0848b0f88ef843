//! Error type for `badge-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Validation, cardinality, and not-found errors from the model.
  #[error("{0}")]
  Core(#[from] badge_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl Error {
  /// The model-level error, if this is one.
  pub fn as_core(&self) -> Option<&badge_core::Error> {
    match self {
      Self::Core(e) => Some(e),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
