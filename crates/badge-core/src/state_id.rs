//! `StateID`: a state-wide identifier that follows an officer as they move
//! between agencies inside one jurisdiction (e.g. the New York Tax ID Number).
//!
//! A `StateID` is owned by exactly one officer through the `HAS_STATE_ID`
//! edge. The node itself does not carry its owner; stores resolve ownership
//! from the edge and guard it with [`crate::cardinality::exactly_one_owner`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  enums::State,
  ids::{OfficerUid, StateIdKey},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateId {
  pub key:        StateIdKey,
  /// Kind of identifier, e.g. "Tax ID Number".
  pub id_name:    Option<String>,
  pub state:      State,
  /// The identifier exactly as issued. Formats vary by jurisdiction, so it
  /// is never validated.
  pub value:      Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::OfficerStore::add_state_id`].
///
/// A `StateID` cannot exist without its owner, so the owner is part of the
/// constructor rather than a later attach step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStateId {
  pub owner:   OfficerUid,
  pub id_name: Option<String>,
  pub state:   State,
  pub value:   Option<String>,
}

impl NewStateId {
  pub fn new(owner: OfficerUid, state: State) -> Self {
    Self { owner, id_name: None, state, value: None }
  }

  /// Build from a raw jurisdiction code, validating it against [`State`].
  pub fn parse(
    owner: OfficerUid,
    state: &str,
    id_name: Option<String>,
    value: Option<String>,
  ) -> Result<Self> {
    Ok(Self { owner, id_name, state: State::parse(state)?, value })
  }
}

/// A `StateID` together with the officer it resolves to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnedStateId {
  pub state_id: StateId,
  pub owner:    OfficerUid,
}
