//! Record codec
//!
//! Converts between a record and its flat three-field row representation,
//! and between rows and the delimited text stored in the backing file.
//!
//! ## Row Format
//!
//! ```text
//! key,timestamp,value\n
//! ```
//!
//! One row per record. A field containing the delimiter, a double quote,
//! or a line break is wrapped in double quotes, with embedded quotes
//! doubled:
//!
//! ```text
//! "a,b",1000,"say ""hi"""
//! ```
//!
//! The timestamp field is a base-10 integer with no leading zeros and a
//! leading `-` only for negative values. The format round-trips exactly:
//! decoding what was serialized yields the original record.

use std::io::{Read, Write};

use crate::error::{EpochError, Result};
use crate::record::Record;

/// Fields in one row: key, timestamp, value
pub const FIELDS_PER_ROW: usize = 3;

const DELIMITER: char = ',';
const QUOTE: char = '"';

// =============================================================================
// Record Encoding/Decoding
// =============================================================================

/// Encode a record as a three-field row
pub fn encode_record(record: &Record) -> [String; FIELDS_PER_ROW] {
    [
        record.key.clone(),
        record.timestamp.to_string(),
        record.value.clone(),
    ]
}

/// Decode a record from a row of fields
///
/// Field 0 is the key verbatim, field 1 is parsed as a base-10 integer
/// timestamp, field 2 is the value verbatim. Extra fields are ignored.
pub fn decode_record(fields: &[String]) -> Result<Record> {
    if fields.len() < FIELDS_PER_ROW {
        return Err(EpochError::MalformedRow(format!(
            "expected {} fields, got {}",
            FIELDS_PER_ROW,
            fields.len()
        )));
    }

    let timestamp = fields[1].parse::<i64>().map_err(|_| {
        EpochError::MalformedTimestamp(format!("'{}' is not a base-10 integer", fields[1]))
    })?;

    Ok(Record {
        key: fields[0].clone(),
        timestamp,
        value: fields[2].clone(),
    })
}

// =============================================================================
// Row Framing
// =============================================================================

/// Serialize a row to one line of delimited text (with trailing newline)
pub fn serialize_row(fields: &[String; FIELDS_PER_ROW]) -> String {
    let mut line = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push(DELIMITER);
        }
        if needs_quoting(field) {
            line.push(QUOTE);
            for c in field.chars() {
                if c == QUOTE {
                    line.push(QUOTE);
                }
                line.push(c);
            }
            line.push(QUOTE);
        } else {
            line.push_str(field);
        }
    }
    line.push('\n');
    line
}

/// Parse delimited text into rows of fields
///
/// Handles quoted fields, doubled quotes, and quoted line breaks (a row
/// may span physical lines). Blank lines are skipped. Fails with
/// `MalformedRow` on an unterminated quoted field.
pub fn parse_rows(text: &str) -> Result<Vec<Vec<String>>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut row_started = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == QUOTE {
                if chars.peek() == Some(&QUOTE) {
                    // Doubled quote: literal quote character
                    chars.next();
                    field.push(QUOTE);
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            QUOTE if at_field_start => {
                in_quotes = true;
                at_field_start = false;
                row_started = true;
            }
            DELIMITER => {
                fields.push(std::mem::take(&mut field));
                at_field_start = true;
                row_started = true;
            }
            '\n' | '\r' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                if row_started {
                    fields.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut fields));
                }
                at_field_start = true;
                row_started = false;
            }
            _ => {
                field.push(c);
                at_field_start = false;
                row_started = true;
            }
        }
    }

    if in_quotes {
        return Err(EpochError::MalformedRow(
            "unterminated quoted field at end of file".to_string(),
        ));
    }

    // Final row without a trailing newline
    if row_started {
        fields.push(field);
        rows.push(fields);
    }

    Ok(rows)
}

fn needs_quoting(field: &str) -> bool {
    field
        .chars()
        .any(|c| matches!(c, DELIMITER | QUOTE | '\n' | '\r'))
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read and decode every record from a reader
///
/// Used by the engine to load the backing file at startup. Any decode
/// failure aborts the whole read; the error names the offending row.
pub fn read_records<R: Read>(reader: &mut R) -> Result<Vec<Record>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let rows = parse_rows(&text)?;
    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let record = decode_record(row).map_err(|e| match e {
            EpochError::MalformedRow(msg) => {
                EpochError::MalformedRow(format!("row {}: {}", index + 1, msg))
            }
            EpochError::MalformedTimestamp(msg) => {
                EpochError::MalformedTimestamp(format!("row {}: {}", index + 1, msg))
            }
            other => other,
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Encode and write every record to a writer, one row per record
pub fn write_records<'a, W, I>(writer: &mut W, records: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Record>,
{
    for record in records {
        let row = encode_record(record);
        writer.write_all(serialize_row(&row).as_bytes())?;
    }
    Ok(())
}
