//! Closed value sets for officer and state-ID attributes.
//!
//! Each enumeration persists as a fixed string code. Anything outside the set
//! is rejected with [`Error::InvalidEnumValue`] wherever a raw string crosses
//! into the model: attribute writes, CSV import, and rows read back from a
//! store.

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator as _, IntoStaticStr};

use crate::{Error, Result};

/// Parsing, code access, and serde plumbing shared by every closed set.
macro_rules! closed_set {
  ($ty:ident, $field:literal) => {
    impl $ty {
      /// Attribute name reported in validation errors.
      pub const FIELD: &'static str = $field;

      /// Parse a persisted code, rejecting anything outside the set.
      pub fn parse(value: &str) -> Result<Self> {
        value.parse().map_err(|_| Error::InvalidEnumValue {
          field: $field,
          value: value.to_owned(),
        })
      }

      /// The code stored for this member.
      pub fn code(self) -> &'static str { self.into() }

      /// Every accepted code, in declaration order.
      pub fn codes() -> impl Iterator<Item = &'static str> {
        Self::iter().map(Self::code)
      }
    }

    impl std::fmt::Display for $ty {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
      }
    }

    impl TryFrom<String> for $ty {
      type Error = Error;

      fn try_from(value: String) -> Result<Self> { Self::parse(&value) }
    }

    impl From<$ty> for String {
      fn from(value: $ty) -> Self { value.code().to_owned() }
    }
  };
}

// ─── Gender ──────────────────────────────────────────────────────────────────

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
#[serde(try_from = "String", into = "String")]
pub enum Gender {
  #[strum(serialize = "M")]
  Male,
  #[strum(serialize = "F")]
  Female,
  #[strum(serialize = "Other")]
  Other,
  #[strum(serialize = "Unknown")]
  Unknown,
}

closed_set!(Gender, "gender");

// ─── Ethnicity ───────────────────────────────────────────────────────────────

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
#[serde(try_from = "String", into = "String")]
pub enum Ethnicity {
  #[strum(serialize = "American Indian or Alaska Native")]
  AmericanIndian,
  #[strum(serialize = "Asian")]
  Asian,
  #[strum(serialize = "Black, African American")]
  BlackAfricanAmerican,
  #[strum(serialize = "Hispanic, Latino")]
  HispanicLatino,
  #[strum(serialize = "Middle Eastern, North African")]
  MiddleEasternNorthAfrican,
  #[strum(serialize = "Native Hawaiian, Other Pacific Islander")]
  NativeHawaiianPacificIslander,
  #[strum(serialize = "White")]
  White,
  #[strum(serialize = "Unknown")]
  Unknown,
}

closed_set!(Ethnicity, "ethnicity");

// ─── State ───────────────────────────────────────────────────────────────────

/// Jurisdictions that issue state-wide officer identifiers. Codes are USPS
/// two-letter abbreviations.
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
#[serde(try_from = "String", into = "String")]
pub enum State {
  #[strum(serialize = "AL")]
  Alabama,
  #[strum(serialize = "AK")]
  Alaska,
  #[strum(serialize = "AZ")]
  Arizona,
  #[strum(serialize = "AR")]
  Arkansas,
  #[strum(serialize = "CA")]
  California,
  #[strum(serialize = "CO")]
  Colorado,
  #[strum(serialize = "CT")]
  Connecticut,
  #[strum(serialize = "DE")]
  Delaware,
  #[strum(serialize = "DC")]
  DistrictOfColumbia,
  #[strum(serialize = "FL")]
  Florida,
  #[strum(serialize = "GA")]
  Georgia,
  #[strum(serialize = "HI")]
  Hawaii,
  #[strum(serialize = "ID")]
  Idaho,
  #[strum(serialize = "IL")]
  Illinois,
  #[strum(serialize = "IN")]
  Indiana,
  #[strum(serialize = "IA")]
  Iowa,
  #[strum(serialize = "KS")]
  Kansas,
  #[strum(serialize = "KY")]
  Kentucky,
  #[strum(serialize = "LA")]
  Louisiana,
  #[strum(serialize = "ME")]
  Maine,
  #[strum(serialize = "MD")]
  Maryland,
  #[strum(serialize = "MA")]
  Massachusetts,
  #[strum(serialize = "MI")]
  Michigan,
  #[strum(serialize = "MN")]
  Minnesota,
  #[strum(serialize = "MS")]
  Mississippi,
  #[strum(serialize = "MO")]
  Missouri,
  #[strum(serialize = "MT")]
  Montana,
  #[strum(serialize = "NE")]
  Nebraska,
  #[strum(serialize = "NV")]
  Nevada,
  #[strum(serialize = "NH")]
  NewHampshire,
  #[strum(serialize = "NJ")]
  NewJersey,
  #[strum(serialize = "NM")]
  NewMexico,
  #[strum(serialize = "NY")]
  NewYork,
  #[strum(serialize = "NC")]
  NorthCarolina,
  #[strum(serialize = "ND")]
  NorthDakota,
  #[strum(serialize = "OH")]
  Ohio,
  #[strum(serialize = "OK")]
  Oklahoma,
  #[strum(serialize = "OR")]
  Oregon,
  #[strum(serialize = "PA")]
  Pennsylvania,
  #[strum(serialize = "RI")]
  RhodeIsland,
  #[strum(serialize = "SC")]
  SouthCarolina,
  #[strum(serialize = "SD")]
  SouthDakota,
  #[strum(serialize = "TN")]
  Tennessee,
  #[strum(serialize = "TX")]
  Texas,
  #[strum(serialize = "UT")]
  Utah,
  #[strum(serialize = "VT")]
  Vermont,
  #[strum(serialize = "VA")]
  Virginia,
  #[strum(serialize = "WA")]
  Washington,
  #[strum(serialize = "WV")]
  WestVirginia,
  #[strum(serialize = "WI")]
  Wisconsin,
  #[strum(serialize = "WY")]
  Wyoming,
  #[strum(serialize = "AS")]
  AmericanSamoa,
  #[strum(serialize = "GU")]
  Guam,
  #[strum(serialize = "MP")]
  NorthernMarianaIslands,
  #[strum(serialize = "PR")]
  PuertoRico,
  #[strum(serialize = "VI")]
  VirginIslands,
}

closed_set!(State, "state");
