// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Report files for assignment runs.
//!
//! Reports are written once at the end of a run and never modified. CSV
//! reports always carry a header and render absent fields as empty strings;
//! JSON reports are an indented array of row objects.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use kentsel_domain::{AssignmentStatus, ReportFormat, ReportRow, sanitize_label};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::error::{ApiError, translate_domain_error};

/// Directory (under the media root) for generated report paths.
pub const REPORTS_DIR: &str = "reports";
/// File name prefix for batch command reports.
pub const DEFAULT_REPORT_PREFIX: &str = "proje_assign";
/// File name prefix for admin owner-assignment reports.
pub const OWNER_REPORT_PREFIX: &str = "owner_assign";
/// CSV column order.
pub const REPORT_COLUMNS: [&str; 5] = ["ident", "user", "group", "status", "reason"];

/// Returns the current local time, or UTC when the local offset is unknown.
#[must_use]
pub fn report_timestamp() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Builds `reports/<prefix>[_<label>]_<YYYYMMDD_HHMMSS>.<ext>`.
///
/// The label is sanitized; a label that is blank is left out.
#[must_use]
pub fn generate_report_path(
    prefix: &str,
    label: Option<&str>,
    format: ReportFormat,
    now: OffsetDateTime,
) -> PathBuf {
    let stamp: String = format!(
        "{:04}{:02}{:02}_{:02}{:02}{:02}",
        now.year(),
        u8::from(now.month()),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    );

    let mut name: String = prefix.to_string();
    if let Some(label) = label.map(sanitize_label).filter(|l| !l.is_empty()) {
        name.push('_');
        name.push_str(&label);
    }
    name.push('_');
    name.push_str(&stamp);
    name.push('.');
    name.push_str(format.extension());

    Path::new(REPORTS_DIR).join(name)
}

fn io_error(path: &Path, message: impl std::fmt::Display) -> ApiError {
    ApiError::ReportIo {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

/// Writes `rows` to `path` and returns the path actually written.
///
/// Relative paths are placed under `media_root`. Missing parent
/// directories are created.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn write_report(
    rows: &[ReportRow],
    path: &Path,
    format: ReportFormat,
    media_root: &Path,
) -> Result<PathBuf, ApiError> {
    let target: PathBuf = if path.is_absolute() {
        path.to_path_buf()
    } else {
        media_root.join(path)
    };

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    match format {
        ReportFormat::Csv => write_csv(rows, &target)?,
        ReportFormat::Json => {
            let body: String =
                serde_json::to_string_pretty(rows).map_err(|e| io_error(&target, e))?;
            fs::write(&target, body).map_err(|e| io_error(&target, e))?;
        }
    }

    info!(path = %target.display(), rows = rows.len(), %format, "Report written");
    Ok(target)
}

fn write_csv(rows: &[ReportRow], target: &Path) -> Result<(), ApiError> {
    let mut writer = csv::Writer::from_path(target).map_err(|e| io_error(target, e))?;
    writer
        .write_record(REPORT_COLUMNS)
        .map_err(|e| io_error(target, e))?;

    for row in rows {
        writer
            .write_record([
                row.ident.as_str(),
                row.user.as_deref().unwrap_or_default(),
                row.group.as_deref().unwrap_or_default(),
                row.status.as_str(),
                row.reason.as_deref().unwrap_or_default(),
            ])
            .map_err(|e| io_error(target, e))?;
    }

    writer.flush().map_err(|e| io_error(target, e))
}

/// Reads a CSV report back into rows.
///
/// Empty `user`, `group` and `reason` cells become `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a column is missing, or a
/// status value is unknown.
pub fn read_report_csv(path: &Path) -> Result<Vec<ReportRow>, ApiError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| io_error(path, e))?;

    let headers: HashMap<String, usize> = reader
        .headers()
        .map_err(|e| io_error(path, e))?
        .iter()
        .enumerate()
        .map(|(index, name)| (name.trim().to_string(), index))
        .collect();

    let column = |name: &str| -> Result<usize, ApiError> {
        headers
            .get(name)
            .copied()
            .ok_or_else(|| ApiError::InvalidCsvFormat {
                reason: format!("report is missing the '{name}' column"),
            })
    };
    let ident_col: usize = column("ident")?;
    let user_col: usize = column("user")?;
    let group_col: usize = column("group")?;
    let status_col: usize = column("status")?;
    let reason_col: usize = column("reason")?;

    let mut rows: Vec<ReportRow> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| io_error(path, e))?;
        let cell = |index: usize| -> Option<String> {
            record
                .get(index)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let status: AssignmentStatus = record
            .get(status_col)
            .unwrap_or_default()
            .parse()
            .map_err(translate_domain_error)?;

        rows.push(ReportRow {
            ident: record.get(ident_col).unwrap_or_default().to_string(),
            user: cell(user_col),
            group: cell(group_col),
            status,
            reason: cell(reason_col),
        });
    }

    debug!(path = %path.display(), rows = rows.len(), "Report read");
    Ok(rows)
}
