//! The assembled read model for one officer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  citation::Citation,
  officer::Officer,
  relation::{Edge, EdgeLabel, Link},
  state_id::StateId,
};

/// Everything attached to an officer. Never stored; always derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficerView {
  pub officer:   Officer,
  /// The point in time at which this view was materialised.
  pub as_of:     DateTime<Utc>,
  pub state_ids: Vec<StateId>,
  /// Plain edges, oldest first.
  pub edges:     Vec<Edge>,
  /// `UPDATED_BY` edges, oldest first.
  pub citations: Vec<Citation>,
}

impl OfficerView {
  /// Targets of every edge with the given label, oldest first.
  pub fn links(&self, label: EdgeLabel) -> impl Iterator<Item = &Link> {
    self
      .edges
      .iter()
      .map(|e| &e.link)
      .filter(move |l| l.label() == label)
  }
}
