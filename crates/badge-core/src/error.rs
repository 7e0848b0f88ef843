//! Error types for `badge-core`.

use thiserror::Error;

use crate::ids::{OfficerUid, StateIdKey};

#[derive(Debug, Error)]
pub enum Error {
  /// A `StateID` would resolve to zero or several owning officers.
  #[error(
    "state id {state_id} must have exactly one owning officer, found {found}"
  )]
  CardinalityViolation { state_id: StateIdKey, found: usize },

  /// A value outside a closed enumeration.
  #[error("invalid {field} value: {value:?}")]
  InvalidEnumValue { field: &'static str, value: String },

  #[error("officer uid {0} is already taken")]
  DuplicateUid(OfficerUid),

  #[error("officer not found: {0}")]
  OfficerNotFound(OfficerUid),

  #[error("state id not found: {0}")]
  StateIdNotFound(StateIdKey),

  #[error("attribute {0:?} cannot be changed after creation")]
  ImmutableAttribute(&'static str),

  #[error("unknown officer attribute: {0:?}")]
  UnknownAttribute(String),

  #[error("missing required attribute: {0}")]
  MissingAttribute(&'static str),

  #[error("invalid officer uid: {0:?}")]
  InvalidUid(String),

  #[error("unknown edge label: {0:?}")]
  UnknownEdgeLabel(String),

  #[error("{0} is not a plain officer link")]
  NotPlainEdge(&'static str),

  #[error("invalid date for {field}: {value:?}")]
  InvalidDate { field: &'static str, value: String },

  #[error("invalid citation diff: {0}")]
  InvalidCitationDiff(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
