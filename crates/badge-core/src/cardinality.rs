//! The exactly-one ownership contract between `StateID` and `Officer`.
//!
//! Graph backends generally cannot express "exactly one incoming edge", so the
//! rule lives here as plain functions over the prospective owner set. A store
//! calls them inside the same transaction as the write they guard.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::{
  Error, Result,
  ids::{OfficerUid, StateIdKey},
};

/// Resolve the single owner of `state_id` from its `HAS_STATE_ID` edges.
///
/// Duplicate edges to the same officer count separately: the edge set itself
/// must have exactly one member.
pub fn exactly_one_owner(
  state_id: StateIdKey,
  owners: &[OfficerUid],
) -> Result<OfficerUid> {
  match owners {
    [owner] => Ok(*owner),
    _ => Err(Error::CardinalityViolation { state_id, found: owners.len() }),
  }
}

/// What attaching a state ID to an officer must do to the edge set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attach {
  /// The officer already owns it; nothing to write.
  Unchanged,
  /// Insert the one ownership edge.
  Insert,
}

/// Decide whether `new_owner` may take an ownership edge to `state_id`, given
/// the owners it currently has.
pub fn plan_attach(
  state_id: StateIdKey,
  current: &[OfficerUid],
  new_owner: OfficerUid,
) -> Result<Attach> {
  match current {
    [] => Ok(Attach::Insert),
    [owner] if *owner == new_owner => Ok(Attach::Unchanged),
    _ if current.contains(&new_owner) => {
      Err(Error::CardinalityViolation { state_id, found: current.len() })
    }
    _ => Err(Error::CardinalityViolation {
      state_id,
      found: current.len() + 1,
    }),
  }
}

/// One state ID whose ownership is broken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnershipViolation {
  pub state_id: StateIdKey,
  pub owners:   Vec<OfficerUid>,
}

/// Check every known state ID against the full `HAS_STATE_ID` edge list.
///
/// Returns one entry per state ID with zero or several owners, ordered by
/// key. Edges pointing at unknown state IDs are reported as well.
pub fn audit(
  state_ids: &[StateIdKey],
  edges: &[(OfficerUid, StateIdKey)],
) -> Vec<OwnershipViolation> {
  let mut owners: BTreeMap<StateIdKey, Vec<OfficerUid>> = state_ids
    .iter()
    .map(|key| (*key, Vec::new()))
    .collect();
  for (officer, key) in edges {
    owners.entry(*key).or_default().push(*officer);
  }

  let known: BTreeSet<StateIdKey> = state_ids.iter().copied().collect();
  owners
    .into_iter()
    .filter(|(key, owners)| owners.len() != 1 || !known.contains(key))
    .map(|(state_id, owners)| OwnershipViolation { state_id, owners })
    .collect()
}
