//! [`SqliteStore`], the SQLite implementation of [`OfficerStore`].

use std::path::Path;

use badge_core::{
  Error as CoreError,
  cardinality::{self, Attach, OwnershipViolation},
  citation::{Citation, NewCitation},
  ids::{EdgeId, OfficerUid, StateIdKey},
  officer::{Attribute, NewOfficer, Officer},
  relation::{Edge, EdgeLabel, Link},
  state_id::{NewStateId, OwnedStateId, StateId},
  store::OfficerStore,
  view::OfficerView,
};
use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Result,
  encode::{
    OFFICER_COLUMNS, RawCitation, RawEdge, RawOfficer, RawStateId,
    STATE_ID_COLUMNS, decode_uuid, encode_date, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

/// The edge label guarded by the exactly-one rule.
const HAS_STATE_ID: &str = "HAS_STATE_ID";

// ─── Store ───────────────────────────────────────────────────────────────────

/// An officer graph backed by a single SQLite file.
///
/// Clones share the same connection.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` inside one transaction.
  ///
  /// The transaction commits only if `f` yields `Ok(Ok(_))`. A model error
  /// (`Ok(Err(_))`) or a database error drops it, which rolls back every
  /// statement `f` issued.
  async fn guarded<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(
        &rusqlite::Transaction<'_>,
      ) -> tokio_rusqlite::Result<badge_core::Result<T>>
      + Send
      + 'static,
  {
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let outcome = f(&tx)?;
        if outcome.is_ok() {
          tx.commit()?;
        }
        Ok(outcome)
      })
      .await?;

    if let Err(e) = &outcome {
      tracing::warn!(error = %e, "write rejected");
    }
    Ok(outcome?)
  }

  async fn insert_officer(&self, officer: Officer) -> Result<Officer> {
    let uid = officer.uid;
    let row = officer.clone();

    self
      .guarded(move |tx| {
        let uid_str = encode_uuid(row.uid);
        if officer_exists(tx, &uid_str)? {
          return Ok(Err(CoreError::DuplicateUid(row.uid)));
        }
        tx.execute(
          "INSERT INTO officers (
             uid, first_name, middle_name, last_name, suffix,
             ethnicity, gender, date_of_birth, year_of_birth, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            uid_str,
            row.first_name,
            row.middle_name,
            row.last_name,
            row.suffix,
            row.ethnicity.map(|e| e.code()),
            row.gender.map(|g| g.code()),
            encode_date(row.date_of_birth),
            row.year_of_birth,
            encode_dt(row.created_at),
          ],
        )?;
        Ok(Ok(()))
      })
      .await?;

    tracing::debug!(%uid, "officer created");
    Ok(officer)
  }

  /// Check every state ID against the exactly-one ownership rule.
  ///
  /// The write paths make violations impossible through this store; the
  /// audit exists for databases that other tools also write to.
  pub async fn audit_state_ids(&self) -> Result<Vec<OwnershipViolation>> {
    let (keys, edges): (Vec<String>, Vec<(String, String)>) = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT state_id FROM state_ids")?;
        let keys = stmt
          .query_map([], |r| r.get::<_, String>(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt =
          conn.prepare("SELECT from_id, to_id FROM edges WHERE label = ?1")?;
        let edges = stmt
          .query_map([HAS_STATE_ID], |r| {
            Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((keys, edges))
      })
      .await?;

    let keys = keys
      .iter()
      .map(|k| decode_uuid(k))
      .collect::<Result<Vec<StateIdKey>>>()?;
    let edges = edges
      .iter()
      .map(|(from, to)| Ok((decode_uuid(from)?, decode_uuid(to)?)))
      .collect::<Result<Vec<(OfficerUid, StateIdKey)>>>()?;

    Ok(cardinality::audit(&keys, &edges))
  }
}

// ─── Transaction helpers ─────────────────────────────────────────────────────

fn officer_exists(conn: &rusqlite::Connection, uid: &str) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row("SELECT 1 FROM officers WHERE uid = ?1", [uid], |_| Ok(()))
      .optional()?
      .is_some(),
  )
}

fn load_state_id(
  conn: &rusqlite::Connection,
  key: &str,
) -> rusqlite::Result<Option<RawStateId>> {
  conn
    .query_row(
      &format!("SELECT {STATE_ID_COLUMNS} FROM state_ids WHERE state_id = ?1"),
      [key],
      RawStateId::from_row,
    )
    .optional()
}

/// Every officer holding a `HAS_STATE_ID` edge to `key`, oldest edge first.
fn owners_of(
  conn: &rusqlite::Connection,
  key: &str,
) -> tokio_rusqlite::Result<Vec<OfficerUid>> {
  let mut stmt = conn.prepare(
    "SELECT from_id FROM edges
     WHERE label = ?1 AND to_id = ?2
     ORDER BY recorded_at, rowid",
  )?;
  let ids = stmt
    .query_map(rusqlite::params![HAS_STATE_ID, key], |r| {
      r.get::<_, String>(0)
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  ids
    .iter()
    .map(|s| {
      Uuid::parse_str(s)
        .map(OfficerUid::from)
        .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))
    })
    .collect()
}

fn insert_edge(
  conn: &rusqlite::Connection,
  label: &str,
  from: &str,
  to: &str,
  at: &str,
) -> rusqlite::Result<String> {
  let edge_id = encode_uuid(EdgeId::new());
  conn.execute(
    "INSERT INTO edges (edge_id, label, from_id, to_id, recorded_at)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    rusqlite::params![edge_id, label, from, to, at],
  )?;
  Ok(edge_id)
}

// ─── OfficerStore impl ───────────────────────────────────────────────────────

impl OfficerStore for SqliteStore {
  type Error = crate::Error;

  // ── Officers ──────────────────────────────────────────────────────────────

  async fn add_officer(&self, input: NewOfficer) -> Result<Officer> {
    self
      .insert_officer(Officer::from_new(OfficerUid::new(), input, Utc::now()))
      .await
  }

  async fn add_officer_with_uid(
    &self,
    uid: OfficerUid,
    input: NewOfficer,
  ) -> Result<Officer> {
    self
      .insert_officer(Officer::from_new(uid, input, Utc::now()))
      .await
  }

  async fn get_officer(&self, uid: OfficerUid) -> Result<Option<Officer>> {
    let uid_str = encode_uuid(uid);

    let raw: Option<RawOfficer> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {OFFICER_COLUMNS} FROM officers WHERE uid = ?1"),
              [uid_str],
              RawOfficer::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawOfficer::into_officer).transpose()
  }

  async fn list_officers(&self) -> Result<Vec<Officer>> {
    let raws: Vec<RawOfficer> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {OFFICER_COLUMNS} FROM officers ORDER BY created_at, rowid"
        ))?;
        let rows = stmt
          .query_map([], RawOfficer::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawOfficer::into_officer).collect()
  }

  async fn set_attribute(
    &self,
    uid: OfficerUid,
    attr: Attribute,
    value: Option<String>,
  ) -> Result<Officer> {
    let mut officer = self
      .get_officer(uid)
      .await?
      .ok_or(CoreError::OfficerNotFound(uid))?;

    // Validates before anything is written.
    officer.set_attribute(attr, value.as_deref())?;

    let text = officer.get(attr);
    let uid_str = encode_uuid(uid);
    let sql = format!("UPDATE officers SET {} = ?1 WHERE uid = ?2", attr.name());

    self
      .conn
      .call(move |conn| {
        conn.execute(&sql, rusqlite::params![text, uid_str])?;
        Ok(())
      })
      .await?;

    tracing::debug!(%uid, attribute = %attr, "officer attribute updated");
    Ok(officer)
  }

  // ── State IDs ─────────────────────────────────────────────────────────────

  async fn add_state_id(&self, input: NewStateId) -> Result<StateId> {
    let owner = input.owner;
    let state_id = StateId {
      key:        StateIdKey::new(),
      id_name:    input.id_name,
      state:      input.state,
      value:      input.value,
      created_at: Utc::now(),
    };
    let row = state_id.clone();

    self
      .guarded(move |tx| {
        let key_str = encode_uuid(row.key);
        let owner_str = encode_uuid(owner);
        let at_str = encode_dt(row.created_at);

        let owners = if officer_exists(tx, &owner_str)? {
          vec![owner]
        } else {
          Vec::new()
        };
        if let Err(e) = cardinality::exactly_one_owner(row.key, &owners) {
          return Ok(Err(e));
        }

        tx.execute(
          "INSERT INTO state_ids (state_id, id_name, state, value, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            key_str,
            row.id_name,
            row.state.code(),
            row.value,
            at_str
          ],
        )?;
        insert_edge(tx, HAS_STATE_ID, &owner_str, &key_str, &at_str)?;

        Ok(cardinality::exactly_one_owner(
          row.key,
          &owners_of(tx, &key_str)?,
        ))
      })
      .await?;

    tracing::debug!(key = %state_id.key, %owner, state = %state_id.state, "state id created");
    Ok(state_id)
  }

  async fn attach_state_id(
    &self,
    key: StateIdKey,
    officer: OfficerUid,
  ) -> Result<OwnedStateId> {
    let (raw, owner) = self
      .guarded(move |tx| {
        let key_str = encode_uuid(key);
        let officer_str = encode_uuid(officer);

        let Some(raw) = load_state_id(tx, &key_str)? else {
          return Ok(Err(CoreError::StateIdNotFound(key)));
        };
        if !officer_exists(tx, &officer_str)? {
          return Ok(Err(CoreError::OfficerNotFound(officer)));
        }

        let current = owners_of(tx, &key_str)?;
        match cardinality::plan_attach(key, &current, officer) {
          Err(e) => return Ok(Err(e)),
          Ok(Attach::Unchanged) => {}
          Ok(Attach::Insert) => {
            let at_str = encode_dt(Utc::now());
            insert_edge(tx, HAS_STATE_ID, &officer_str, &key_str, &at_str)?;
          }
        }

        let resolved =
          cardinality::exactly_one_owner(key, &owners_of(tx, &key_str)?);
        Ok(resolved.map(|owner| (raw, owner)))
      })
      .await?;

    tracing::debug!(%key, %owner, "state id attached");
    Ok(OwnedStateId { state_id: raw.into_state_id()?, owner })
  }

  async fn reassign_state_id(
    &self,
    key: StateIdKey,
    officer: OfficerUid,
  ) -> Result<OwnedStateId> {
    let (raw, previous, owner) = self
      .guarded(move |tx| {
        let key_str = encode_uuid(key);
        let officer_str = encode_uuid(officer);

        let Some(raw) = load_state_id(tx, &key_str)? else {
          return Ok(Err(CoreError::StateIdNotFound(key)));
        };
        if !officer_exists(tx, &officer_str)? {
          return Ok(Err(CoreError::OfficerNotFound(officer)));
        }

        let previous = owners_of(tx, &key_str)?;
        if previous != [officer] {
          tx.execute(
            "DELETE FROM edges WHERE label = ?1 AND to_id = ?2",
            rusqlite::params![HAS_STATE_ID, key_str],
          )?;
          let at_str = encode_dt(Utc::now());
          insert_edge(tx, HAS_STATE_ID, &officer_str, &key_str, &at_str)?;
        }

        let resolved =
          cardinality::exactly_one_owner(key, &owners_of(tx, &key_str)?);
        Ok(resolved.map(|owner| (raw, previous, owner)))
      })
      .await?;

    tracing::info!(%key, ?previous, %owner, "state id reassigned");
    Ok(OwnedStateId { state_id: raw.into_state_id()?, owner })
  }

  async fn get_state_id(&self, key: StateIdKey) -> Result<Option<OwnedStateId>> {
    let key_str = encode_uuid(key);

    let found: Option<(RawStateId, Vec<OfficerUid>)> = self
      .conn
      .call(move |conn| {
        let Some(raw) = load_state_id(conn, &key_str)? else {
          return Ok(None);
        };
        Ok(Some((raw, owners_of(conn, &key_str)?)))
      })
      .await?;

    let Some((raw, owners)) = found else {
      return Ok(None);
    };
    // A broken edge set is reported, never papered over.
    let owner = cardinality::exactly_one_owner(key, &owners)?;
    Ok(Some(OwnedStateId { state_id: raw.into_state_id()?, owner }))
  }

  async fn state_ids_of(&self, officer: OfficerUid) -> Result<Vec<StateId>> {
    let officer_str = encode_uuid(officer);

    let raws: Vec<RawStateId> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT s.state_id, s.id_name, s.state, s.value, s.created_at
           FROM state_ids s
           JOIN edges e ON e.to_id = s.state_id AND e.label = ?1
           WHERE e.from_id = ?2
           ORDER BY s.created_at, s.rowid",
        )?;
        let rows = stmt
          .query_map(
            rusqlite::params![HAS_STATE_ID, officer_str],
            RawStateId::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStateId::into_state_id).collect()
  }

  // ── Plain edges ───────────────────────────────────────────────────────────

  async fn link(&self, officer: OfficerUid, link: Link) -> Result<Edge> {
    let recorded_at = Utc::now();

    let edge_id: String = self
      .guarded(move |tx| {
        let officer_str = encode_uuid(officer);
        if !officer_exists(tx, &officer_str)? {
          return Ok(Err(CoreError::OfficerNotFound(officer)));
        }
        let edge_id = insert_edge(
          tx,
          link.label().as_str(),
          &officer_str,
          &encode_uuid(link.target()),
          &encode_dt(recorded_at),
        )?;
        Ok(Ok(edge_id))
      })
      .await?;

    tracing::debug!(%officer, label = %link.label(), target = %link.target(), "edge added");
    Ok(Edge {
      edge_id: Uuid::parse_str(&edge_id)?.into(),
      officer,
      link,
      recorded_at,
    })
  }

  async fn edges_of(
    &self,
    officer: OfficerUid,
    label: Option<EdgeLabel>,
  ) -> Result<Vec<Edge>> {
    let officer_str = encode_uuid(officer);
    let label_str = label.map(EdgeLabel::as_str);

    let raws: Vec<RawEdge> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT edge_id, label, from_id, to_id, recorded_at
           FROM edges
           WHERE from_id = ?1
             AND label != ?2
             AND (?3 IS NULL OR label = ?3)
           ORDER BY recorded_at, rowid",
        )?;
        let rows = stmt
          .query_map(
            rusqlite::params![officer_str, HAS_STATE_ID, label_str],
            RawEdge::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEdge::into_edge).collect()
  }

  // ── Citations ─────────────────────────────────────────────────────────────

  async fn cite(&self, input: NewCitation) -> Result<Citation> {
    input.validate()?;
    let citation = input.into_citation(Utc::now());

    let id_str = encode_uuid(citation.citation_id);
    let officer = citation.officer;
    let source_str = encode_uuid(citation.source);
    let at_str = encode_dt(citation.recorded_at);
    let as_of_str = encode_date(citation.as_of);
    let url = citation.url.clone();
    let diff_str = serde_json::to_string(&citation.diff)?;

    self
      .guarded(move |tx| {
        let officer_str = encode_uuid(officer);
        if !officer_exists(tx, &officer_str)? {
          return Ok(Err(CoreError::OfficerNotFound(officer)));
        }
        tx.execute(
          "INSERT INTO citations (
             citation_id, officer_uid, source_id, recorded_at, as_of, url, diff
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            officer_str,
            source_str,
            at_str,
            as_of_str,
            url,
            diff_str
          ],
        )?;
        Ok(Ok(()))
      })
      .await?;

    tracing::debug!(%officer, source = %citation.source, "citation recorded");
    Ok(citation)
  }

  async fn citations_of(&self, officer: OfficerUid) -> Result<Vec<Citation>> {
    let officer_str = encode_uuid(officer);

    let raws: Vec<RawCitation> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT citation_id, officer_uid, source_id, recorded_at, as_of, url, diff
           FROM citations
           WHERE officer_uid = ?1
           ORDER BY recorded_at, rowid",
        )?;
        let rows = stmt
          .query_map([officer_str], RawCitation::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCitation::into_citation).collect()
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn materialize(&self, uid: OfficerUid) -> Result<Option<OfficerView>> {
    let officer = match self.get_officer(uid).await? {
      Some(o) => o,
      None => return Ok(None),
    };

    let as_of = Utc::now();
    let state_ids = self.state_ids_of(uid).await?;
    let edges = self.edges_of(uid, None).await?;
    let citations = self.citations_of(uid).await?;

    Ok(Some(OfficerView { officer, as_of, state_ids, edges, citations }))
  }
}
