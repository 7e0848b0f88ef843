//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, calendar dates are `YYYY-MM-DD`, UUIDs
//! are hyphenated lowercase strings. Enumerations are stored as their codes
//! and re-validated on the way out, so a row edited behind the store's back
//! cannot smuggle an invalid value into the model.

use badge_core::{
  citation::Citation,
  enums::{Ethnicity, Gender, State},
  officer::{Officer, format_date, parse_date},
  relation::{Edge, EdgeLabel, Link},
  state_id::StateId,
};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: impl Into<Uuid>) -> String {
  id.into().hyphenated().to_string()
}

pub fn decode_uuid<T: From<Uuid>>(s: &str) -> Result<T> {
  Ok(Uuid::parse_str(s)?.into())
}

// ─── DateTime<Utc> / NaiveDate ───────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: Option<NaiveDate>) -> Option<String> {
  d.map(format_date)
}

fn decode_date(field: &'static str, s: Option<&str>) -> Result<Option<NaiveDate>> {
  Ok(s.map(|v| parse_date(field, v)).transpose()?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawOfficer::from_row`].
pub const OFFICER_COLUMNS: &str = "uid, first_name, middle_name, last_name, \
                                   suffix, ethnicity, gender, date_of_birth, \
                                   year_of_birth, created_at";

/// Raw strings read directly from an `officers` row.
pub struct RawOfficer {
  pub uid:           String,
  pub first_name:    Option<String>,
  pub middle_name:   Option<String>,
  pub last_name:     Option<String>,
  pub suffix:        Option<String>,
  pub ethnicity:     Option<String>,
  pub gender:        Option<String>,
  pub date_of_birth: Option<String>,
  pub year_of_birth: Option<String>,
  pub created_at:    String,
}

impl RawOfficer {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      uid:           row.get(0)?,
      first_name:    row.get(1)?,
      middle_name:   row.get(2)?,
      last_name:     row.get(3)?,
      suffix:        row.get(4)?,
      ethnicity:     row.get(5)?,
      gender:        row.get(6)?,
      date_of_birth: row.get(7)?,
      year_of_birth: row.get(8)?,
      created_at:    row.get(9)?,
    })
  }

  pub fn into_officer(self) -> Result<Officer> {
    Ok(Officer {
      uid:           decode_uuid(&self.uid)?,
      first_name:    self.first_name,
      middle_name:   self.middle_name,
      last_name:     self.last_name,
      suffix:        self.suffix,
      ethnicity:     self
        .ethnicity
        .as_deref()
        .map(Ethnicity::parse)
        .transpose()?,
      gender:        self.gender.as_deref().map(Gender::parse).transpose()?,
      date_of_birth: decode_date("date_of_birth", self.date_of_birth.as_deref())?,
      year_of_birth: self.year_of_birth,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Column list matching [`RawStateId::from_row`].
pub const STATE_ID_COLUMNS: &str = "state_id, id_name, state, value, created_at";

/// Raw strings read directly from a `state_ids` row.
pub struct RawStateId {
  pub state_id:   String,
  pub id_name:    Option<String>,
  pub state:      String,
  pub value:      Option<String>,
  pub created_at: String,
}

impl RawStateId {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      state_id:   row.get(0)?,
      id_name:    row.get(1)?,
      state:      row.get(2)?,
      value:      row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn into_state_id(self) -> Result<StateId> {
    Ok(StateId {
      key:        decode_uuid(&self.state_id)?,
      id_name:    self.id_name,
      state:      State::parse(&self.state)?,
      value:      self.value,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from an `edges` row.
pub struct RawEdge {
  pub edge_id:     String,
  pub label:       String,
  pub from_id:     String,
  pub to_id:       String,
  pub recorded_at: String,
}

impl RawEdge {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      edge_id:     row.get(0)?,
      label:       row.get(1)?,
      from_id:     row.get(2)?,
      to_id:       row.get(3)?,
      recorded_at: row.get(4)?,
    })
  }

  pub fn into_edge(self) -> Result<Edge> {
    let label = EdgeLabel::parse(&self.label)?;
    Ok(Edge {
      edge_id:     decode_uuid(&self.edge_id)?,
      officer:     decode_uuid(&self.from_id)?,
      link:        Link::from_parts(label, decode_uuid(&self.to_id)?)?,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}

/// Raw strings read directly from a `citations` row.
pub struct RawCitation {
  pub citation_id: String,
  pub officer_uid: String,
  pub source_id:   String,
  pub recorded_at: String,
  pub as_of:       Option<String>,
  pub url:         Option<String>,
  pub diff:        String,
}

impl RawCitation {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      citation_id: row.get(0)?,
      officer_uid: row.get(1)?,
      source_id:   row.get(2)?,
      recorded_at: row.get(3)?,
      as_of:       row.get(4)?,
      url:         row.get(5)?,
      diff:        row.get(6)?,
    })
  }

  pub fn into_citation(self) -> Result<Citation> {
    Ok(Citation {
      citation_id: decode_uuid(&self.citation_id)?,
      officer:     decode_uuid(&self.officer_uid)?,
      source:      decode_uuid(&self.source_id)?,
      recorded_at: decode_dt(&self.recorded_at)?,
      as_of:       decode_date("as_of", self.as_of.as_deref())?,
      url:         self.url,
      diff:        serde_json::from_str(&self.diff)?,
    })
  }
}
