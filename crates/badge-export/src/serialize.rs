//! CSV serializer.
//!
//! Produces CRLF line endings per RFC 4180. An absent attribute is an empty
//! unquoted cell; a present but empty string is `""`, so the two survive a
//! round trip as distinct values.

use badge_core::officer::{OfficerRecord, PROPERTY_ORDER};

// ─── Cell quoting ────────────────────────────────────────────────────────────

fn needs_quotes(s: &str) -> bool {
  s.is_empty() || s.contains([',', '"', '\r', '\n']) || s.trim() != s
}

pub(crate) fn write_cell(out: &mut String, cell: Option<&str>) {
  match cell {
    None => {}
    Some(s) if needs_quotes(s) => {
      out.push('"');
      out.push_str(&s.replace('"', "\"\""));
      out.push('"');
    }
    Some(s) => out.push_str(s),
  }
}

fn write_row<'a>(out: &mut String, cells: impl IntoIterator<Item = Option<&'a str>>) {
  for (i, cell) in cells.into_iter().enumerate() {
    if i > 0 {
      out.push(',');
    }
    write_cell(out, cell);
  }
  out.push_str("\r\n");
}

// ─── Public entry points ─────────────────────────────────────────────────────

/// The header row, without line ending.
pub fn header() -> String {
  PROPERTY_ORDER
    .iter()
    .map(|a| a.name())
    .collect::<Vec<_>>()
    .join(",")
}

pub fn serialize<'a>(records: impl IntoIterator<Item = &'a OfficerRecord>) -> String {
  let mut out = String::new();
  write_row(&mut out, PROPERTY_ORDER.iter().map(|a| Some(a.name())));
  for record in records {
    let cells = record.cells();
    write_row(&mut out, cells.iter().map(Option::as_deref));
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  fn cell(s: Option<&str>) -> String {
    let mut out = String::new();
    write_cell(&mut out, s);
    out
  }

  #[test]
  fn quoting() {
    assert_eq!(cell(None), "");
    assert_eq!(cell(Some("")), "\"\"");
    assert_eq!(cell(Some("Doe")), "Doe");
    assert_eq!(cell(Some("Black, African American")), "\"Black, African American\"");
    assert_eq!(cell(Some("\"Bud\" Smith")), "\"\"\"Bud\"\" Smith\"");
    assert_eq!(cell(Some(" padded")), "\" padded\"");
  }

  #[test]
  fn header_follows_declared_order() {
    assert_eq!(
      header(),
      "uid,first_name,middle_name,last_name,suffix,ethnicity,gender,date_of_birth"
    );
    assert!(serialize([]).starts_with(&format!("{}\r\n", header())));
  }
}
