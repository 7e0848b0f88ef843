//! Citations: the attributed `UPDATED_BY` edge from an officer to a source.
//!
//! A citation records that a particular source substantiates some facts about
//! an officer. Citations are never updated or deleted. The same source may
//! cite the same officer any number of times, and citations need not agree
//! with one another; choosing between them is left to whoever presents the
//! record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
  Error, Result,
  ids::{CitationId, OfficerUid, SourceId},
  officer::Attribute,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
  pub citation_id: CitationId,
  pub officer:     OfficerUid,
  pub source:      SourceId,
  /// Server-assigned timestamp.
  pub recorded_at: DateTime<Utc>,
  /// The date the source speaks for, when it says so.
  pub as_of:       Option<NaiveDate>,
  /// Link to the cited document.
  pub url:         Option<String>,
  /// Officer attributes this source substantiates, with the values it gives.
  pub diff:        Map<String, Value>,
}

impl Citation {
  /// Attribute names covered by this citation.
  pub fn attributes(&self) -> impl Iterator<Item = &str> {
    self.diff.keys().map(String::as_str)
  }

  pub fn covers(&self, attr: Attribute) -> bool {
    self.diff.contains_key(attr.name())
  }
}

/// Input to [`crate::store::OfficerStore::cite`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCitation {
  pub officer: OfficerUid,
  pub source:  SourceId,
  pub as_of:   Option<NaiveDate>,
  pub url:     Option<String>,
  #[serde(default)]
  pub diff:    Map<String, Value>,
}

impl NewCitation {
  pub fn new(officer: OfficerUid, source: SourceId) -> Self {
    Self { officer, source, as_of: None, url: None, diff: Map::new() }
  }

  /// Add one substantiated attribute to the diff.
  pub fn with(mut self, attr: Attribute, value: impl Into<Value>) -> Self {
    self.diff.insert(attr.name().to_owned(), value.into());
    self
  }

  /// Accept a diff given as arbitrary JSON; it must be an object.
  pub fn with_diff_json(mut self, diff: Value) -> Result<Self> {
    match diff {
      Value::Object(map) => {
        self.diff = map;
        Ok(self)
      }
      other => Err(Error::InvalidCitationDiff(format!(
        "expected a JSON object, got {other}"
      ))),
    }
  }

  /// Every diff key must name an officer attribute. `uid` is allowed: a
  /// source may well confirm an identity.
  pub fn validate(&self) -> Result<()> {
    for key in self.diff.keys() {
      Attribute::parse(key).map_err(|_| {
        Error::InvalidCitationDiff(format!("unknown attribute {key:?}"))
      })?;
    }
    Ok(())
  }

  pub fn into_citation(self, recorded_at: DateTime<Utc>) -> Citation {
    Citation {
      citation_id: CitationId::new(),
      officer: self.officer,
      source: self.source,
      recorded_at,
      as_of: self.as_of,
      url: self.url,
      diff: self.diff,
    }
  }
}
