//! Datavyu CSV reader
//!
//! Input files carry a single header line followed by rows of the form
//! `ordinal,onset,offset,"code"`. Rows that cannot be parsed are quarantined
//! with their line number instead of discarding the whole file.

use std::path::Path;

use serde::Serialize;
use tracing::warn;

use crate::error::{ConvertError, RowError, RowErrorKind};
use crate::types::Record;

const FIELD_COUNT: usize = 4;

/// Parsed contents of one Datavyu export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedFile {
    /// Well-formed rows in file order
    pub records: Vec<Record>,
    /// Rows that were skipped, in file order
    pub row_errors: Vec<RowError>,
}

impl ParsedFile {
    pub fn is_clean(&self) -> bool {
        self.row_errors.is_empty()
    }
}

/// Parse the text of a Datavyu export, skipping the header line
pub fn parse_records(text: &str) -> ParsedFile {
    let mut parsed = ParsedFile::default();

    for (idx, line) in text.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(line) {
            Ok(record) => parsed.records.push(record),
            Err(kind) => parsed.row_errors.push(RowError {
                line: idx + 1,
                kind,
            }),
        }
    }

    parsed
}

/// Read and parse a Datavyu export from disk
pub fn read_file(path: &Path) -> Result<ParsedFile, ConvertError> {
    let text = std::fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
    let parsed = parse_records(&text);

    for err in &parsed.row_errors {
        warn!(file = %path.display(), "skipping malformed row, {}", err);
    }

    Ok(parsed)
}

fn parse_line(line: &str) -> Result<Record, RowErrorKind> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != FIELD_COUNT {
        return Err(RowErrorKind::FieldCount {
            found: fields.len(),
        });
    }

    Ok(Record {
        ordinal: parse_field("ordinal", fields[0])?,
        onset_ms: parse_field("onset", fields[1])?,
        offset_ms: parse_field("offset", fields[2])?,
        code: fields[3].replace('"', ""),
    })
}

fn parse_field(field: &'static str, value: &str) -> Result<u64, RowErrorKind> {
    value
        .parse::<u64>()
        .map_err(|_| RowErrorKind::InvalidInteger {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const SAMPLE: &str = "ordinal,onset,offset,code\n\
                          1,1000,2000,\"X\"\n\
                          2,3000,0,\"B\"\n";

    #[test]
    fn test_parse_skips_header_and_strips_quotes() {
        let parsed = parse_records(SAMPLE);

        assert!(parsed.is_clean());
        assert_eq!(
            parsed.records,
            vec![Record::new(1, 1000, 2000, "X"), Record::new(2, 3000, 0, "B")]
        );
    }

    #[test]
    fn test_header_only_and_empty_input() {
        assert_eq!(parse_records("ordinal,onset,offset,code\n"), ParsedFile::default());
        assert_eq!(parse_records(""), ParsedFile::default());
    }

    #[test]
    fn test_header_is_skipped_even_if_numeric() {
        let parsed = parse_records("1,1,1,\"A\"\n2,2,2,\"B\"\n");
        assert_eq!(parsed.records, vec![Record::new(2, 2, 2, "B")]);
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let parsed = parse_records("header\r\n1,1000,2000,\"X\"\r\n\r\n2,3000,0,B\r\n");
        assert!(parsed.is_clean());
        assert_eq!(
            parsed.records,
            vec![Record::new(1, 1000, 2000, "X"), Record::new(2, 3000, 0, "B")]
        );
    }

    #[test]
    fn test_whitespace_around_fields() {
        let parsed = parse_records("header\n 1 , 1000 ,0, \"C\" \n");
        assert_eq!(parsed.records, vec![Record::new(1, 1000, 0, "C")]);
    }

    #[test]
    fn test_malformed_rows_are_quarantined() {
        let text = "ordinal,onset,offset,code\n\
                    1,1000,2000,\"X\"\n\
                    2,abc,0,\"B\"\n\
                    3,4000\n\
                    4,5000,6000,\"B\"\n\
                    5,-10,0,\"Y\"\n\
                    6,1,2,\"a\",extra\n";
        let parsed = parse_records(text);

        assert_eq!(
            parsed.records,
            vec![Record::new(1, 1000, 2000, "X"), Record::new(4, 5000, 6000, "B")]
        );
        assert_eq!(
            parsed.row_errors,
            vec![
                RowError {
                    line: 3,
                    kind: RowErrorKind::InvalidInteger {
                        field: "onset",
                        value: "abc".to_string(),
                    },
                },
                RowError {
                    line: 4,
                    kind: RowErrorKind::FieldCount { found: 2 },
                },
                RowError {
                    line: 6,
                    kind: RowErrorKind::InvalidInteger {
                        field: "onset",
                        value: "-10".to_string(),
                    },
                },
                RowError {
                    line: 7,
                    kind: RowErrorKind::FieldCount { found: 5 },
                },
            ]
        );
    }

    #[test]
    fn test_empty_code_is_kept() {
        let parsed = parse_records("header\n1,0,0,\"\"\n");
        assert_eq!(parsed.records, vec![Record::new(1, 0, 0, "")]);
    }

    #[test]
    fn test_read_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session1.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let parsed = read_file(&path).unwrap();
        assert_eq!(parsed.records.len(), 2);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = read_file(&dir.path().join("missing.csv"));
        assert!(matches!(result, Err(ConvertError::Io { .. })));
    }
}
