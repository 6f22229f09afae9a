//! # Uploaded Sheets
//!
//! Turns an uploaded task file into [`UploadedTaskRow`]s for the import
//! transform. Two encodings are accepted:
//!
//! - JSON: an array of objects, one per row (the shape spreadsheet tools
//!   produce with "sheet to JSON"). Numeric cells stay numeric, so Excel
//!   serial dates survive.
//! - CSV: a header line followed by data lines. Fields may be wrapped in
//!   double quotes; `""` inside a quoted field is a literal quote. Every
//!   cell is read as text.
//!
//! The encoding is chosen by file extension, falling back to sniffing the
//! first non-blank character.

use serde_json::{Map, Value};

use crate::error::ImportError;
use crate::import::UploadedTaskRow;

/// Parse an uploaded task file.
pub fn parse_sheet(file_name: &str, bytes: &[u8]) -> Result<Vec<UploadedTaskRow>, ImportError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ImportError::Sheet(format!("{file_name} is not UTF-8: {e}")))?;
    let text = text.trim_start_matches('\u{feff}');
    let lower = file_name.to_ascii_lowercase();
    let looks_json = lower.ends_with(".json")
        || (!lower.ends_with(".csv") && text.trim_start().starts_with('['));
    if looks_json {
        rows_from_json(text)
    } else {
        rows_from_csv(text)
    }
}

/// Rows from a JSON array of objects.
pub fn rows_from_json(text: &str) -> Result<Vec<UploadedTaskRow>, ImportError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ImportError::Sheet(format!("invalid JSON: {e}")))?;
    let Value::Array(items) = value else {
        return Err(ImportError::Sheet("expected a JSON array of rows".into()));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::Object(map) => Ok(UploadedTaskRow::new(map)),
            _ => Err(ImportError::Sheet(format!("row {} is not an object", idx + 1))),
        })
        .collect()
}

/// Rows from CSV text with a header line.
pub fn rows_from_csv(text: &str) -> Result<Vec<UploadedTaskRow>, ImportError> {
    let mut records = split_records(text)?.into_iter();
    let Some(headers) = records.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = headers.into_iter().map(|h| h.trim().to_string()).collect();
    if headers.iter().all(String::is_empty) {
        return Err(ImportError::Sheet("header row is empty".into()));
    }

    Ok(records
        .map(|fields| {
            let mut cells = Map::new();
            for (header, field) in headers.iter().zip(fields) {
                if !header.is_empty() {
                    cells.insert(header.clone(), Value::String(field));
                }
            }
            UploadedTaskRow::new(cells)
        })
        .collect())
}

/// Split CSV text into records of fields. Quoted fields may span lines.
fn split_records(text: &str) -> Result<Vec<Vec<String>>, ImportError> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                push_record(&mut records, std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }
    if in_quotes {
        return Err(ImportError::Sheet("unterminated quoted field".into()));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        push_record(&mut records, record);
    }
    Ok(records)
}

fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    // Blank lines carry no fields worth keeping.
    if record.len() == 1 && record[0].trim().is_empty() {
        return;
    }
    records.push(record);
}
