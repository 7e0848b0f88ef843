//! Tabular (CSV) codec for officer records.
//!
//! Columns follow the declared officer attribute order. Pure synchronous; no
//! database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use badge_export::{parse, serialize};
//!
//! let csv = "uid,first_name,middle_name,last_name,suffix,ethnicity,gender,date_of_birth\r\n";
//! let rows = parse(csv).unwrap();
//! let records: Vec<_> = rows.into_iter().filter_map(|r| r.record.ok()).collect();
//! assert_eq!(serialize(&records), csv);
//! ```

pub mod error;
mod parse;
mod serialize;

pub use error::{Error, Result};
pub use parse::ParsedRow;
pub use serialize::{header, serialize};

/// Parse an export back into records.
///
/// A bad header or broken quoting fails the whole input. Each data row is
/// then decoded independently; a malformed row yields `Err(…)` in its
/// [`ParsedRow`] without aborting the rest.
pub fn parse(input: &str) -> Result<Vec<ParsedRow>> { parse::parse_table(input) }
