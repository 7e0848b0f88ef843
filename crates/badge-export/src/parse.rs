//! CSV parser.
//!
//! Accepts exactly what [`crate::serialize`] emits plus bare-LF line endings.
//! Quoted cells may span lines.

use badge_core::officer::{OfficerRecord, PROPERTY_ORDER};

use crate::{
  error::{Error, Result},
  serialize::header,
};

/// One raw row: its starting line number and its cells.
pub(crate) struct RawRow {
  pub line:  usize,
  pub cells: Vec<Option<String>>,
}

/// Split `input` into rows of cells. Unquoted empty cells become `None`.
pub(crate) fn split_rows(input: &str) -> Result<Vec<RawRow>> {
  let mut rows = Vec::new();
  let mut chars = input.chars().peekable();
  let mut line = 1usize;

  while chars.peek().is_some() {
    let start = line;
    let mut cells = Vec::new();

    loop {
      // One cell.
      let cell = if chars.peek() == Some(&'"') {
        chars.next();
        let mut value = String::new();
        loop {
          match chars.next() {
            None => return Err(Error::UnterminatedQuote { line: start }),
            Some('"') if chars.peek() == Some(&'"') => {
              chars.next();
              value.push('"');
            }
            Some('"') => break,
            Some(c) => {
              if c == '\n' {
                line += 1;
              }
              value.push(c);
            }
          }
        }
        Some(value)
      } else {
        let mut value = String::new();
        while let Some(&c) = chars.peek() {
          match c {
            ',' | '\r' | '\n' => break,
            '"' => return Err(Error::StrayQuote { line }),
            _ => {
              value.push(c);
              chars.next();
            }
          }
        }
        (!value.is_empty()).then_some(value)
      };
      cells.push(cell);

      match chars.next() {
        Some(',') => continue,
        Some('\r') => {
          if chars.peek() == Some(&'\n') {
            chars.next();
          }
          line += 1;
          break;
        }
        Some('\n') => {
          line += 1;
          break;
        }
        None => break,
        Some(_) => return Err(Error::StrayQuote { line }),
      }
    }

    rows.push(RawRow { line: start, cells });
  }

  Ok(rows)
}

/// One parsed data row.
pub struct ParsedRow {
  /// Line on which the row starts (the header is line 1).
  pub line:   usize,
  pub record: Result<OfficerRecord>,
}

pub(crate) fn parse_table(input: &str) -> Result<Vec<ParsedRow>> {
  let mut rows = split_rows(input)?.into_iter();

  let head = rows.next().ok_or(Error::MissingHeader)?;
  let found = head
    .cells
    .iter()
    .map(|c| c.as_deref().unwrap_or(""))
    .collect::<Vec<_>>()
    .join(",");
  let expected = header();
  if found != expected {
    return Err(Error::UnexpectedHeader { expected, found });
  }

  Ok(rows.map(|row| ParsedRow { line: row.line, record: parse_row(row) }).collect())
}

fn parse_row(row: RawRow) -> Result<OfficerRecord> {
  let line = row.line;
  let cells: [Option<String>; 8] =
    row.cells.try_into().map_err(|cells: Vec<_>| Error::CellCount {
      line,
      expected: PROPERTY_ORDER.len(),
      found: cells.len(),
    })?;

  OfficerRecord::from_cells(cells.each_ref().map(|c| c.as_deref()))
    .map_err(|source| Error::Record { line, source })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn splits_quoted_and_multiline_cells() {
    let rows = split_rows("a,\"b,c\",\r\n\"x\ny\",\"\"\"q\"\"\",z\n").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].line, 1);
    assert_eq!(rows[0].cells, vec![
      Some("a".to_owned()),
      Some("b,c".to_owned()),
      None
    ]);
    assert_eq!(rows[1].line, 2);
    assert_eq!(rows[1].cells, vec![
      Some("x\ny".to_owned()),
      Some("\"q\"".to_owned()),
      Some("z".to_owned())
    ]);
  }

  #[test]
  fn empty_quoted_cell_is_present() {
    let rows = split_rows("\"\",\n").unwrap();
    assert_eq!(rows[0].cells, vec![Some(String::new()), None]);
  }

  #[test]
  fn unterminated_quote() {
    assert!(matches!(
      split_rows("a,\"open\r\n"),
      Err(Error::UnterminatedQuote { line: 1 })
    ));
  }

  #[test]
  fn stray_quote() {
    assert!(matches!(
      split_rows("ab\"c\r\n"),
      Err(Error::StrayQuote { line: 1 })
    ));
    assert!(matches!(
      split_rows("\"ab\"c\r\n"),
      Err(Error::StrayQuote { line: 1 })
    ));
  }

  #[test]
  fn missing_and_wrong_header() {
    assert!(matches!(parse_table(""), Err(Error::MissingHeader)));
    assert!(matches!(
      parse_table("uid,last_name,first_name\r\n"),
      Err(Error::UnexpectedHeader { .. })
    ));
  }

  #[test]
  fn short_row_reports_its_line() {
    let input = format!("{}\r\nabc,def\r\n", header());
    let rows = parse_table(&input).unwrap();
    assert_eq!(rows.len(), 1);
    assert!(matches!(
      rows[0].record,
      Err(Error::CellCount { line: 2, expected: 8, found: 2 })
    ));
  }
}
