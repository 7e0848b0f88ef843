//! Node labels, edge labels, and the plain (unattributed) edges that hang off
//! an officer.
//!
//! Labels are the interoperability contract with whatever graph store backs
//! the model: a backend must persist and return exactly these strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::{
  Error, Result,
  ids::{AllegationId, EdgeId, InvestigationId, LitigationId, OfficerUid, UnitId},
};

// ─── Labels ──────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr,
)]
pub enum NodeLabel {
  Officer,
  #[strum(serialize = "StateID")]
  StateId,
  Unit,
  Litigation,
  Allegation,
  Investigation,
  Source,
}

impl NodeLabel {
  pub fn as_str(self) -> &'static str { self.into() }
}

/// How many edges of a label may point at a single target node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
  /// Exactly one edge; the target cannot exist without it.
  One,
  ZeroOrMore,
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  EnumIter,
  EnumString,
  IntoStaticStr,
  Serialize,
  Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeLabel {
  HasStateId,
  MemberOfUnit,
  NamedIn,
  AccusedOf,
  LeadBy,
  Commands,
  UpdatedBy,
}

impl EdgeLabel {
  pub fn parse(label: &str) -> Result<Self> {
    label
      .parse()
      .map_err(|_| Error::UnknownEdgeLabel(label.to_owned()))
  }

  pub fn as_str(self) -> &'static str { self.into() }

  /// Every edge starts at an officer; this is the other end.
  pub fn target(self) -> NodeLabel {
    match self {
      Self::HasStateId => NodeLabel::StateId,
      Self::MemberOfUnit | Self::Commands => NodeLabel::Unit,
      Self::NamedIn => NodeLabel::Litigation,
      Self::AccusedOf => NodeLabel::Allegation,
      Self::LeadBy => NodeLabel::Investigation,
      Self::UpdatedBy => NodeLabel::Source,
    }
  }

  /// Multiplicity on the target side: how many officers a single target node
  /// may be reached from through this label.
  pub fn target_cardinality(self) -> Cardinality {
    match self {
      Self::HasStateId => Cardinality::One,
      _ => Cardinality::ZeroOrMore,
    }
  }

  /// Whether the edge carries its own attributes (see
  /// [`crate::citation::Citation`]).
  pub fn is_attributed(self) -> bool { matches!(self, Self::UpdatedBy) }
}

impl std::fmt::Display for EdgeLabel {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Links ───────────────────────────────────────────────────────────────────

/// The target of a plain many-to-many edge, typed by label. The variant name
/// is the edge label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "label", content = "target", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Link {
  MemberOfUnit(UnitId),
  NamedIn(LitigationId),
  AccusedOf(AllegationId),
  LeadBy(InvestigationId),
  Commands(UnitId),
}

impl Link {
  pub fn label(&self) -> EdgeLabel {
    match self {
      Self::MemberOfUnit(_) => EdgeLabel::MemberOfUnit,
      Self::NamedIn(_) => EdgeLabel::NamedIn,
      Self::AccusedOf(_) => EdgeLabel::AccusedOf,
      Self::LeadBy(_) => EdgeLabel::LeadBy,
      Self::Commands(_) => EdgeLabel::Commands,
    }
  }

  pub fn target(&self) -> Uuid {
    match *self {
      Self::MemberOfUnit(id) | Self::Commands(id) => id.0,
      Self::NamedIn(id) => id.0,
      Self::AccusedOf(id) => id.0,
      Self::LeadBy(id) => id.0,
    }
  }

  /// Rebuild a link from a stored label and target ID.
  ///
  /// `HAS_STATE_ID` and `UPDATED_BY` are not plain links and are rejected.
  pub fn from_parts(label: EdgeLabel, target: Uuid) -> Result<Self> {
    match label {
      EdgeLabel::MemberOfUnit => Ok(Self::MemberOfUnit(target.into())),
      EdgeLabel::NamedIn => Ok(Self::NamedIn(target.into())),
      EdgeLabel::AccusedOf => Ok(Self::AccusedOf(target.into())),
      EdgeLabel::LeadBy => Ok(Self::LeadBy(target.into())),
      EdgeLabel::Commands => Ok(Self::Commands(target.into())),
      EdgeLabel::HasStateId | EdgeLabel::UpdatedBy => {
        Err(Error::NotPlainEdge(label.as_str()))
      }
    }
  }
}

/// A plain edge from an officer. Edges are append-only; attaching a second
/// unit never displaces the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
  pub edge_id:     EdgeId,
  pub officer:     OfficerUid,
  pub link:        Link,
  pub recorded_at: DateTime<Utc>,
}
