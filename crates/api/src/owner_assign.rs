// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The "assign group to owner users" admin action.
//!
//! The action runs in two phases so the HTTP layer can hold the database
//! lock only while group membership changes:
//! [`run_owner_assignment`] resolves owners and assigns them, then
//! [`finish_owner_assignment`] writes the report and uploads it.

use std::path::{Component, Path, PathBuf};

use kentsel::{AssignmentOptions, AssignmentOutcome, assign};
use kentsel_domain::{AssignmentInput, GroupName, Owner};
use kentsel_persistence::{GroupData, OwnerData, Persistence};
use time::OffsetDateTime;
use tracing::info;

use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::report::{OWNER_REPORT_PREFIX, generate_report_path, write_report};
use crate::request_response::{
    GroupOption, OwnerAssignConfirmation, OwnerAssignRequest, OwnerAssignResult, OwnerSummary,
};
use crate::settings::Settings;
use crate::upload::{ReportUploader, UploadInfo, UploadRequest, try_upload};

/// Name of the admin action.
pub const OWNER_ASSIGN_ACTION: &str = "assign_group_to_owner_users";

/// URL prefix of the staff report download route.
pub const REPORT_DOWNLOAD_PREFIX: &str = "/reports/download/";

/// Result of the database phase of an owner assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerRun {
    /// The selected group.
    pub group: GroupName,
    /// Rows and counts from the engine.
    pub outcome: AssignmentOutcome,
    /// Validated report path, if the caller supplied one.
    pub report_path: Option<PathBuf>,
}

/// Builds the confirmation context for the selected owners.
///
/// # Errors
///
/// Returns an error if the database cannot be read.
pub fn build_confirmation(
    persistence: &mut Persistence,
    owner_ids: &[i64],
) -> Result<OwnerAssignConfirmation, ApiError> {
    let owners: Vec<OwnerSummary> = persistence
        .get_owners_by_ids(owner_ids)?
        .into_iter()
        .map(|data: OwnerData| {
            let owner: Owner = data.into();
            OwnerSummary {
                owner_id: owner.owner_id,
                name: owner.display_name(),
                email: owner.usable_email().map(str::to_string),
            }
        })
        .collect();

    let groups: Vec<GroupOption> = persistence
        .list_groups()?
        .into_iter()
        .map(|g: GroupData| GroupOption {
            group_id: g.group_id,
            name: g.name,
        })
        .collect();

    Ok(OwnerAssignConfirmation {
        action: String::from(OWNER_ASSIGN_ACTION),
        owners,
        groups,
    })
}

/// Checks a caller-supplied report path.
///
/// Only relative paths that stay under the media root are accepted.
///
/// # Errors
///
/// Returns an error for absolute paths or paths with `..` components.
pub fn validate_report_file(report_file: Option<&str>) -> Result<Option<PathBuf>, ApiError> {
    let Some(raw) = report_file.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let path: &Path = Path::new(raw);
    let escapes: bool = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(ApiError::InvalidInput {
            field: String::from("report_file"),
            message: String::from("must be a relative path inside the media root"),
        });
    }

    Ok(Some(path.to_path_buf()))
}

/// Assigns the selected owners to the selected group.
///
/// # Errors
///
/// Returns [`ApiError::GroupNotFound`] if the group does not exist, in
/// which case nothing is assigned and no report is produced.
pub fn run_owner_assignment(
    persistence: &mut Persistence,
    request: &OwnerAssignRequest,
) -> Result<OwnerRun, ApiError> {
    let report_path: Option<PathBuf> = validate_report_file(request.report_file.as_deref())?;

    let group: GroupData =
        persistence
            .get_group_by_id(request.group_id)?
            .ok_or(ApiError::GroupNotFound {
                group_id: request.group_id,
            })?;
    let group: GroupName = GroupName::new(&group.name).map_err(translate_domain_error)?;

    let inputs: Vec<AssignmentInput> = persistence
        .get_owners_by_ids(&request.owner_ids)?
        .into_iter()
        .map(|data: OwnerData| AssignmentInput::Owner(data.into()))
        .collect();

    let options: AssignmentOptions = AssignmentOptions::new(Some(group.clone()), request.dry_run);
    let outcome: AssignmentOutcome =
        assign(persistence, &inputs, &options).map_err(translate_core_error)?;

    Ok(OwnerRun {
        group,
        outcome,
        report_path,
    })
}

/// Returns the summary line shown after an owner assignment.
#[must_use]
pub fn owner_assign_message(assigned: usize, group: &GroupName, dry_run: bool) -> String {
    format!("Assigned {assigned} users to group '{group}' (dry-run={dry_run})")
}

/// Writes the report, optionally uploads it, and builds the result view.
///
/// Upload failures, including a missing uploader, become
/// `upload_warning` rather than errors.
///
/// # Errors
///
/// Returns an error if the report cannot be written.
pub async fn finish_owner_assignment(
    settings: &Settings,
    uploader: Option<&dyn ReportUploader>,
    request: &OwnerAssignRequest,
    run: OwnerRun,
    now: OffsetDateTime,
) -> Result<OwnerAssignResult, ApiError> {
    let path: PathBuf = run.report_path.unwrap_or_else(|| {
        generate_report_path(OWNER_REPORT_PREFIX, None, request.report_format, now)
    });
    let written: PathBuf = write_report(
        &run.outcome.rows,
        &path,
        request.report_format,
        &settings.media_root,
    )?;

    let report_file: Option<String> = settings.media_relative(&written);
    let report_download_url: Option<String> = report_file
        .as_ref()
        .map(|rel| format!("{REPORT_DOWNLOAD_PREFIX}{rel}"));
    let report_media_url: Option<String> =
        report_file.as_deref().map(|rel| settings.media_url_for(rel));

    let (upload, upload_warning): (Option<UploadInfo>, Option<String>) = if request.upload_s3 {
        match uploader {
            Some(uploader) => {
                let upload_request: UploadRequest =
                    UploadRequest::new(request.s3_bucket.clone(), request.s3_public);
                try_upload(uploader, &written, &upload_request).await
            }
            None => (None, Some(String::from("S3 upload is not configured"))),
        }
    } else {
        (None, None)
    };

    let message: String = owner_assign_message(run.outcome.assigned, &run.group, request.dry_run);
    info!(%message, report = %written.display(), "Owner group assignment complete");

    Ok(OwnerAssignResult {
        rows: run.outcome.rows,
        assigned: run.outcome.assigned,
        group: run.group.as_str().to_string(),
        dry_run: request.dry_run,
        report_file,
        report_download_url,
        media_url: settings.media_url.clone(),
        report_media_url,
        s3_url: upload.map(|u| u.url),
        upload_warning,
        message,
    })
}
