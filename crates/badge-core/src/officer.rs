//! The `Officer` node: canonical identity record for a law-enforcement
//! officer.
//!
//! An officer is created once with a fresh [`OfficerUid`] and then filled in
//! incrementally. Every attribute write goes through
//! [`Officer::set_attribute`], which validates the new value completely before
//! touching the record.

use chrono::{DateTime, Datelike as _, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::{
  Error, Result,
  enums::{Ethnicity, Gender},
  ids::OfficerUid,
};

/// Storage format of `date_of_birth`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── Attributes ──────────────────────────────────────────────────────────────

/// A named officer attribute.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Attribute {
  Uid,
  FirstName,
  MiddleName,
  LastName,
  Suffix,
  Ethnicity,
  Gender,
  DateOfBirth,
  YearOfBirth,
}

/// Presentation order for any consumer that displays or exports an officer.
/// Storage does not depend on it. `year_of_birth` is deliberately absent.
pub const PROPERTY_ORDER: [Attribute; 8] = [
  Attribute::Uid,
  Attribute::FirstName,
  Attribute::MiddleName,
  Attribute::LastName,
  Attribute::Suffix,
  Attribute::Ethnicity,
  Attribute::Gender,
  Attribute::DateOfBirth,
];

impl Attribute {
  pub fn parse(name: &str) -> Result<Self> {
    name
      .parse()
      .map_err(|_| Error::UnknownAttribute(name.to_owned()))
  }

  pub fn name(self) -> &'static str { self.into() }
}

impl std::fmt::Display for Attribute {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.name())
  }
}

pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| Error::InvalidDate {
    field,
    value: value.to_owned(),
  })
}

pub fn format_date(date: NaiveDate) -> String {
  date.format(DATE_FORMAT).to_string()
}

// ─── Officer ─────────────────────────────────────────────────────────────────

/// An officer node. Field order follows [`PROPERTY_ORDER`] so serialised
/// records come out in the declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Officer {
  pub uid:           OfficerUid,
  pub first_name:    Option<String>,
  pub middle_name:   Option<String>,
  pub last_name:     Option<String>,
  pub suffix:        Option<String>,
  pub ethnicity:     Option<Ethnicity>,
  pub gender:        Option<Gender>,
  pub date_of_birth: Option<NaiveDate>,
  /// Free-text fallback for officers without a known birth date.
  pub year_of_birth: Option<String>,
  /// Store-assigned; never changes after creation.
  pub created_at:    DateTime<Utc>,
}

impl Officer {
  /// Build a new officer from `input` under the given `uid`.
  pub fn from_new(
    uid: OfficerUid,
    input: NewOfficer,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      uid,
      first_name: input.first_name,
      middle_name: input.middle_name,
      last_name: input.last_name,
      suffix: input.suffix,
      ethnicity: input.ethnicity,
      gender: input.gender,
      date_of_birth: input.date_of_birth,
      year_of_birth: input.year_of_birth,
      created_at,
    }
  }

  /// The text form of one attribute, as exported or displayed.
  pub fn get(&self, attr: Attribute) -> Option<String> {
    match attr {
      Attribute::Uid => Some(self.uid.to_string()),
      Attribute::FirstName => self.first_name.clone(),
      Attribute::MiddleName => self.middle_name.clone(),
      Attribute::LastName => self.last_name.clone(),
      Attribute::Suffix => self.suffix.clone(),
      Attribute::Ethnicity => self.ethnicity.map(|e| e.code().to_owned()),
      Attribute::Gender => self.gender.map(|g| g.code().to_owned()),
      Attribute::DateOfBirth => self.date_of_birth.map(format_date),
      Attribute::YearOfBirth => self.year_of_birth.clone(),
    }
  }

  /// Write a single attribute from its text form. `None` clears it.
  ///
  /// The value is parsed and validated before the record is touched, so a
  /// rejected write leaves every field as it was.
  pub fn set_attribute(
    &mut self,
    attr: Attribute,
    value: Option<&str>,
  ) -> Result<()> {
    match attr {
      Attribute::Uid => return Err(Error::ImmutableAttribute("uid")),
      Attribute::Ethnicity => {
        self.ethnicity = value.map(Ethnicity::parse).transpose()?;
      }
      Attribute::Gender => {
        self.gender = value.map(Gender::parse).transpose()?;
      }
      Attribute::DateOfBirth => {
        self.date_of_birth = value
          .map(|v| parse_date("date_of_birth", v))
          .transpose()?;
      }
      Attribute::FirstName => self.first_name = value.map(str::to_owned),
      Attribute::MiddleName => self.middle_name = value.map(str::to_owned),
      Attribute::LastName => self.last_name = value.map(str::to_owned),
      Attribute::Suffix => self.suffix = value.map(str::to_owned),
      Attribute::YearOfBirth => self.year_of_birth = value.map(str::to_owned),
    }
    Ok(())
  }

  /// The declared attributes only, in presentation order.
  pub fn record(&self) -> OfficerRecord {
    OfficerRecord {
      uid:           self.uid,
      first_name:    self.first_name.clone(),
      middle_name:   self.middle_name.clone(),
      last_name:     self.last_name.clone(),
      suffix:        self.suffix.clone(),
      ethnicity:     self.ethnicity,
      gender:        self.gender,
      date_of_birth: self.date_of_birth,
    }
  }

  /// Best known birth year.
  ///
  /// `date_of_birth` wins whenever present; `year_of_birth` is only read
  /// when there is no full date, and only if it holds a four-digit year.
  pub fn birth_year(&self) -> Option<i32> {
    if let Some(dob) = self.date_of_birth {
      return Some(dob.year());
    }
    self
      .year_of_birth
      .as_deref()
      .map(str::trim)
      .filter(|y| y.len() == 4)
      .and_then(|y| y.parse().ok())
  }

  /// "First Middle Last Suffix", skipping missing parts.
  pub fn display_name(&self) -> String {
    [
      &self.first_name,
      &self.middle_name,
      &self.last_name,
      &self.suffix,
    ]
    .into_iter()
    .flatten()
    .map(String::as_str)
    .collect::<Vec<_>>()
    .join(" ")
  }
}

// ─── NewOfficer ──────────────────────────────────────────────────────────────

/// Input to [`crate::store::OfficerStore::add_officer`]. The `uid` and
/// `created_at` are always assigned by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewOfficer {
  pub first_name:    Option<String>,
  pub middle_name:   Option<String>,
  pub last_name:     Option<String>,
  pub suffix:        Option<String>,
  pub ethnicity:     Option<Ethnicity>,
  pub gender:        Option<Gender>,
  pub date_of_birth: Option<NaiveDate>,
  pub year_of_birth: Option<String>,
}

impl NewOfficer {
  pub fn with_last_name(last_name: impl Into<String>) -> Self {
    Self {
      last_name: Some(last_name.into()),
      ..Default::default()
    }
  }
}

// ─── OfficerRecord ───────────────────────────────────────────────────────────

/// The declared attributes of an officer, nothing else. This is the unit of
/// tabular export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficerRecord {
  pub uid:           OfficerUid,
  pub first_name:    Option<String>,
  pub middle_name:   Option<String>,
  pub last_name:     Option<String>,
  pub suffix:        Option<String>,
  pub ethnicity:     Option<Ethnicity>,
  pub gender:        Option<Gender>,
  pub date_of_birth: Option<NaiveDate>,
}

impl OfficerRecord {
  /// Text values in [`PROPERTY_ORDER`].
  pub fn cells(&self) -> [Option<String>; 8] {
    [
      Some(self.uid.to_string()),
      self.first_name.clone(),
      self.middle_name.clone(),
      self.last_name.clone(),
      self.suffix.clone(),
      self.ethnicity.map(|e| e.code().to_owned()),
      self.gender.map(|g| g.code().to_owned()),
      self.date_of_birth.map(format_date),
    ]
  }

  /// Split into the uid and the input needed to recreate the officer.
  pub fn into_parts(self) -> (OfficerUid, NewOfficer) {
    (self.uid, NewOfficer {
      first_name:    self.first_name,
      middle_name:   self.middle_name,
      last_name:     self.last_name,
      suffix:        self.suffix,
      ethnicity:     self.ethnicity,
      gender:        self.gender,
      date_of_birth: self.date_of_birth,
      year_of_birth: None,
    })
  }

  /// Rebuild a record from text values in [`PROPERTY_ORDER`].
  pub fn from_cells(cells: [Option<&str>; 8]) -> Result<Self> {
    let [uid, first, middle, last, suffix, ethnicity, gender, dob] = cells;
    let uid = uid.ok_or(Error::MissingAttribute("uid"))?;
    Ok(Self {
      uid:           uid
        .parse()
        .map_err(|_| Error::InvalidUid(uid.to_owned()))?,
      first_name:    first.map(str::to_owned),
      middle_name:   middle.map(str::to_owned),
      last_name:     last.map(str::to_owned),
      suffix:        suffix.map(str::to_owned),
      ethnicity:     ethnicity.map(Ethnicity::parse).transpose()?,
      gender:        gender.map(Gender::parse).transpose()?,
      date_of_birth: dob
        .map(|v| parse_date("date_of_birth", v))
        .transpose()?,
    })
  }
}
