// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The `assign-group` batch workflow.
//!
//! Output is returned as lines rather than printed so the binary decides
//! where it goes.

use std::path::PathBuf;

use kentsel::{AccountHandle, AssignmentOptions, AssignmentOutcome, assign, resolve_identifier};
use kentsel_domain::{AssignmentInput, AssignmentStatus, GroupName, ReportFormat, ReportRow};
use kentsel_persistence::Persistence;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::csv_input::read_assignment_csv;
use crate::error::{ApiError, translate_core_error};
use crate::report::{DEFAULT_REPORT_PREFIX, generate_report_path, write_report};
use crate::settings::Settings;
use crate::upload::{ReportUploader, UploadInfo, UploadRequest, try_upload};

/// User-facing command failures. These exit non-zero.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("{0}")]
    MissingArguments(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Where the identifiers come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchSource {
    /// One username or email.
    Username(String),
    /// Comma-separated usernames or emails.
    Users(String),
    /// CSV file with a `username` or `email` column and optional `group`.
    File(PathBuf),
}

/// Options of one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    pub source: BatchSource,
    /// Run-wide group; required unless reading a CSV file.
    pub group: Option<String>,
    pub dry_run: bool,
    /// Report path; generated under `reports/` when absent.
    pub report_file: Option<PathBuf>,
    pub report_format: ReportFormat,
    /// Free text included in generated report names.
    pub label: Option<String>,
    pub upload_s3: bool,
    pub s3_bucket: Option<String>,
    pub s3_key: Option<String>,
    pub s3_public: bool,
    /// Print one line per row that did not succeed.
    pub verbose_rows: bool,
}

impl BatchOptions {
    /// Creates options for a source with everything else off.
    #[must_use]
    pub const fn new(source: BatchSource, group: Option<String>) -> Self {
        Self {
            source,
            group,
            dry_run: false,
            report_file: None,
            report_format: ReportFormat::Csv,
            label: None,
            upload_s3: false,
            s3_bucket: None,
            s3_key: None,
            s3_public: false,
            verbose_rows: false,
        }
    }
}

/// What a batch run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    /// Lines for standard output.
    pub lines: Vec<String>,
    /// Non-fatal problems, such as a failed upload.
    pub warnings: Vec<String>,
    pub outcome: AssignmentOutcome,
    /// The report written, if any rows were produced.
    pub report_path: Option<PathBuf>,
    pub upload: Option<UploadInfo>,
}

/// Splits a comma-separated identifier list, dropping blank entries.
#[must_use]
pub fn split_identifiers(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn require_group(group: Option<GroupName>, flag: &str) -> Result<GroupName, CommandError> {
    group.ok_or_else(|| CommandError::MissingArguments(format!("--group is required with {flag}")))
}

fn row_line(row: &ReportRow) -> String {
    let mut line: String = format!("{}: {}", row.status, row.ident);
    if let Some(group) = &row.group {
        line.push_str(&format!(" (group '{group}')"));
    }
    if let Some(reason) = &row.reason {
        line.push_str(&format!(" [{reason}]"));
    }
    line
}

/// Runs a batch assignment and writes its report.
///
/// # Errors
///
/// Returns an error if required arguments are missing, a single named
/// user cannot be found, the input cannot be read, or the report cannot
/// be written. Upload failures are reported as warnings instead.
pub async fn run_batch(
    persistence: &mut Persistence,
    settings: &Settings,
    uploader: Option<&dyn ReportUploader>,
    options: &BatchOptions,
    now: OffsetDateTime,
) -> Result<BatchSummary, CommandError> {
    let default_group: Option<GroupName> = GroupName::parse_optional(options.group.as_deref());

    let (inputs, default_group, single): (Vec<AssignmentInput>, Option<GroupName>, bool) =
        match &options.source {
            BatchSource::Username(identifier) => {
                let group: GroupName = require_group(default_group, "--username")?;
                let identifier: &str = identifier.trim();
                if identifier.is_empty() {
                    return Err(CommandError::MissingArguments(String::from(
                        "--username must not be empty",
                    )));
                }
                let account: Option<AccountHandle> =
                    resolve_identifier(persistence, identifier).map_err(ApiError::from)?;
                if account.is_none() {
                    return Err(CommandError::UserNotFound(identifier.to_string()));
                }
                (
                    vec![AssignmentInput::Identifier(identifier.to_string())],
                    Some(group),
                    true,
                )
            }
            BatchSource::Users(list) => {
                let group: GroupName = require_group(default_group, "--users")?;
                let identifiers: Vec<String> = split_identifiers(list);
                if identifiers.is_empty() {
                    return Err(CommandError::MissingArguments(String::from(
                        "--users must name at least one user",
                    )));
                }
                (
                    identifiers
                        .into_iter()
                        .map(AssignmentInput::Identifier)
                        .collect(),
                    Some(group),
                    false,
                )
            }
            BatchSource::File(path) => (read_assignment_csv(path)?, default_group, false),
        };

    debug!(inputs = inputs.len(), dry_run = options.dry_run, "Batch inputs collected");

    let assignment: AssignmentOptions = AssignmentOptions::new(default_group, options.dry_run);
    let outcome: AssignmentOutcome =
        assign(persistence, &inputs, &assignment).map_err(translate_core_error)?;

    let mut lines: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if single {
        for row in outcome.rows.iter().filter(|r| r.status.is_success()) {
            let verb: &str = if options.dry_run { "Would add" } else { "Added" };
            lines.push(format!(
                "{verb} user {} to group '{}'",
                row.user.as_deref().unwrap_or_default(),
                row.group.as_deref().unwrap_or_default()
            ));
        }
    } else if options.dry_run {
        lines.push(format!(
            "Would add {} of {}",
            outcome.count(AssignmentStatus::WouldAssign),
            outcome.rows.len()
        ));
    } else {
        lines.push(format!("Assigned {} of {}", outcome.assigned, outcome.rows.len()));
    }

    if options.verbose_rows {
        lines.extend(outcome.failures().map(row_line));
    }

    let mut report_path: Option<PathBuf> = None;
    let mut upload: Option<UploadInfo> = None;

    if !outcome.rows.is_empty() {
        let path: PathBuf = options.report_file.clone().unwrap_or_else(|| {
            generate_report_path(
                DEFAULT_REPORT_PREFIX,
                options.label.as_deref(),
                options.report_format,
                now,
            )
        });
        let written: PathBuf = write_report(
            &outcome.rows,
            &path,
            options.report_format,
            &settings.media_root,
        )?;
        lines.push(format!("Report written to {}", written.display()));

        if options.upload_s3 {
            let (info, warning): (Option<UploadInfo>, Option<String>) = match uploader {
                Some(uploader) => {
                    let request: UploadRequest = UploadRequest {
                        key: options.s3_key.clone(),
                        ..UploadRequest::new(options.s3_bucket.clone(), options.s3_public)
                    };
                    try_upload(uploader, &written, &request).await
                }
                None => (None, Some(String::from("S3 upload is not configured"))),
            };
            if let Some(info) = &info {
                lines.push(format!("Uploaded report to S3: {}", info.url));
            }
            warnings.extend(warning);
            upload = info;
        }

        report_path = Some(written);
    }

    info!(
        rows = outcome.rows.len(),
        assigned = outcome.assigned,
        dry_run = options.dry_run,
        "Batch assignment complete"
    );

    Ok(BatchSummary {
        lines,
        warnings,
        outcome,
        report_path,
        upload,
    })
}
