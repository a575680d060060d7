// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV input for the batch assignment command.
//!
//! The file must have a header row naming a `username` or `email` column.
//! An optional `group` column overrides the run-wide group for that row.

use csv::StringRecord;
use std::collections::HashMap;
use std::path::Path;

use kentsel_domain::{AssignmentInput, GroupName};
use tracing::debug;

use crate::error::ApiError;

/// Columns that can carry the identifier, in priority order.
const IDENTIFIER_HEADERS: &[&str] = &["username", "email"];

/// Column that carries the per-row group.
const GROUP_HEADER: &str = "group";

/// Normalizes a CSV header string for case-insensitive, whitespace-tolerant matching.
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

fn header_map(headers: &StringRecord) -> Result<HashMap<String, usize>, ApiError> {
    let mut map: HashMap<String, usize> = HashMap::new();
    for (idx, header) in headers.iter().enumerate() {
        map.entry(normalize_header(header)).or_insert(idx);
    }

    if !IDENTIFIER_HEADERS.iter().any(|h| map.contains_key(*h)) {
        return Err(ApiError::InvalidCsvFormat {
            reason: String::from("CSV must have a 'username' or 'email' column"),
        });
    }

    Ok(map)
}

fn parse_row(record: &StringRecord, map: &HashMap<String, usize>) -> AssignmentInput {
    let get_field = |name: &str| -> Option<&str> {
        map.get(name)
            .and_then(|&idx| record.get(idx))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    let identifier: String = IDENTIFIER_HEADERS
        .iter()
        .find_map(|h| get_field(h))
        .unwrap_or_default()
        .to_string();

    AssignmentInput::CsvRow {
        identifier,
        group: GroupName::parse_optional(get_field(GROUP_HEADER)),
    }
}

/// Parses CSV text into assignment inputs, one per data row.
///
/// Rows with a blank identifier are kept so they show up in the report.
///
/// # Errors
///
/// Returns an error if the header is missing the identifier column or
/// the CSV is malformed.
pub fn parse_assignment_csv(content: &str) -> Result<Vec<AssignmentInput>, ApiError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: StringRecord = reader
        .headers()
        .map_err(|e| ApiError::InvalidCsvFormat {
            reason: format!("Failed to read CSV header: {e}"),
        })?
        .clone();
    let map: HashMap<String, usize> = header_map(&headers)?;

    let mut inputs: Vec<AssignmentInput> = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record: StringRecord = record.map_err(|e| ApiError::InvalidCsvFormat {
            reason: format!("Failed to read CSV row {}: {e}", idx + 1),
        })?;
        inputs.push(parse_row(&record, &map));
    }

    debug!(rows = inputs.len(), "Parsed assignment CSV");
    Ok(inputs)
}

/// Reads and parses a CSV input file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid input.
pub fn read_assignment_csv(path: &Path) -> Result<Vec<AssignmentInput>, ApiError> {
    let content: String = std::fs::read_to_string(path).map_err(|e| ApiError::InvalidInput {
        field: String::from("file"),
        message: format!("cannot read '{}': {e}", path.display()),
    })?;
    parse_assignment_csv(&content)
}
