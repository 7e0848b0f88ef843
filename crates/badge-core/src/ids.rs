//! Strongly-typed node identifiers.
//!
//! Every node in the officer graph is addressed by a UUID. Wrapping each in
//! its own newtype keeps an officer's `uid` from being passed where a unit or
//! source handle is expected. Foreign entities (`Unit`, `Litigation`, ...) are
//! defined elsewhere; at this layer they are nothing more than their ID.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
  (
    $(#[$meta:meta])*
    $name:ident
  ) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
      Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(pub Uuid);

    impl $name {
      /// Generate a fresh random (v4) identifier.
      pub fn new() -> Self { Self(Uuid::new_v4()) }

      pub const fn into_inner(self) -> Uuid { self.0 }
    }

    impl Default for $name {
      fn default() -> Self { Self::new() }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
      }
    }

    impl FromStr for $name {
      type Err = uuid::Error;

      fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
      }
    }

    impl From<Uuid> for $name {
      fn from(id: Uuid) -> Self { Self(id) }
    }

    impl From<$name> for Uuid {
      fn from(id: $name) -> Self { id.0 }
    }
  };
}

// ─── Owned nodes ─────────────────────────────────────────────────────────────

define_id! {
  /// The immutable, globally unique identity of an officer.
  OfficerUid
}

define_id! {
  /// Node identity of a [`StateId`](crate::state_id::StateId).
  StateIdKey
}

define_id! {
  /// Identity of a single `UPDATED_BY` edge.
  CitationId
}

define_id! {
  /// Identity of a plain (unattributed) edge.
  EdgeId
}

// ─── Foreign handles ─────────────────────────────────────────────────────────

define_id! {
  /// An organisational unit within an agency.
  UnitId
}

define_id! {
  /// A lawsuit or other legal proceeding.
  LitigationId
}

define_id! {
  /// A single allegation within a complaint.
  AllegationId
}

define_id! {
  /// A complaint investigation.
  InvestigationId
}

define_id! {
  /// A source record (news article, court filing, agency roster, ...).
  SourceId
}
