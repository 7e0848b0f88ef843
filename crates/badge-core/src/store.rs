//! The `OfficerStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `badge-store-sqlite`).
//! Tools that author or read officer records depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  citation::{Citation, NewCitation},
  ids::{OfficerUid, StateIdKey},
  officer::{Attribute, NewOfficer, Officer},
  relation::{Edge, EdgeLabel, Link},
  state_id::{NewStateId, OwnedStateId, StateId},
  view::OfficerView,
};

/// Abstraction over an officer graph backend.
///
/// Nodes and edges are only ever added. The one exception is
/// [`reassign_state_id`](OfficerStore::reassign_state_id), which swaps a
/// single ownership edge for another in one atomic step.
///
/// Any write that touches a `HAS_STATE_ID` edge must check the exactly-one
/// rule (see [`crate::cardinality`]) and commit in the same transaction, so a
/// concurrent reader never sees a state ID with zero or two owners.
pub trait OfficerStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Officers ──────────────────────────────────────────────────────────

  /// Create an officer under a freshly generated uid.
  fn add_officer(
    &self,
    input: NewOfficer,
  ) -> impl Future<Output = Result<Officer, Self::Error>> + Send + '_;

  /// Create an officer under a caller-supplied uid, e.g. when re-importing
  /// an export. Fails if the uid is already taken.
  fn add_officer_with_uid(
    &self,
    uid: OfficerUid,
    input: NewOfficer,
  ) -> impl Future<Output = Result<Officer, Self::Error>> + Send + '_;

  /// Retrieve an officer by uid. Returns `None` if not found.
  fn get_officer(
    &self,
    uid: OfficerUid,
  ) -> impl Future<Output = Result<Option<Officer>, Self::Error>> + Send + '_;

  /// All officers, oldest first.
  fn list_officers(
    &self,
  ) -> impl Future<Output = Result<Vec<Officer>, Self::Error>> + Send + '_;

  /// Write one attribute from its text form and return the updated officer.
  ///
  /// Enumeration and date values are validated first; a rejected write
  /// changes nothing.
  fn set_attribute(
    &self,
    uid: OfficerUid,
    attr: Attribute,
    value: Option<String>,
  ) -> impl Future<Output = Result<Officer, Self::Error>> + Send + '_;

  // ── State IDs ─────────────────────────────────────────────────────────

  /// Create a state ID and its single ownership edge together.
  fn add_state_id(
    &self,
    input: NewStateId,
  ) -> impl Future<Output = Result<StateId, Self::Error>> + Send + '_;

  /// Attach an existing state ID to `officer`.
  ///
  /// A no-op if `officer` already owns it; a cardinality violation if anyone
  /// else does.
  fn attach_state_id(
    &self,
    key: StateIdKey,
    officer: OfficerUid,
  ) -> impl Future<Output = Result<OwnedStateId, Self::Error>> + Send + '_;

  /// Move ownership of a state ID to `officer`, replacing the old edge.
  fn reassign_state_id(
    &self,
    key: StateIdKey,
    officer: OfficerUid,
  ) -> impl Future<Output = Result<OwnedStateId, Self::Error>> + Send + '_;

  /// Retrieve a state ID with its resolved owner. Returns `None` if not
  /// found.
  fn get_state_id(
    &self,
    key: StateIdKey,
  ) -> impl Future<Output = Result<Option<OwnedStateId>, Self::Error>> + Send + '_;

  /// All state IDs held by `officer`, oldest first.
  fn state_ids_of(
    &self,
    officer: OfficerUid,
  ) -> impl Future<Output = Result<Vec<StateId>, Self::Error>> + Send + '_;

  // ── Plain edges ───────────────────────────────────────────────────────

  /// Add a many-to-many edge. Existing edges of the same label stay.
  fn link(
    &self,
    officer: OfficerUid,
    link: Link,
  ) -> impl Future<Output = Result<Edge, Self::Error>> + Send + '_;

  /// Plain edges of `officer`, oldest first, optionally restricted to one
  /// label.
  fn edges_of(
    &self,
    officer: OfficerUid,
    label: Option<EdgeLabel>,
  ) -> impl Future<Output = Result<Vec<Edge>, Self::Error>> + Send + '_;

  // ── Citations ─────────────────────────────────────────────────────────

  /// Record an `UPDATED_BY` edge. The `recorded_at` timestamp is set by the
  /// store.
  fn cite(
    &self,
    input: NewCitation,
  ) -> impl Future<Output = Result<Citation, Self::Error>> + Send + '_;

  /// Citations of `officer`, oldest first.
  fn citations_of(
    &self,
    officer: OfficerUid,
  ) -> impl Future<Output = Result<Vec<Citation>, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Materialise an [`OfficerView`]. Returns `None` if the officer does not
  /// exist.
  fn materialize(
    &self,
    uid: OfficerUid,
  ) -> impl Future<Output = Result<Option<OfficerView>, Self::Error>> + Send + '_;
}
