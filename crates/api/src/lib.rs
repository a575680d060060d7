// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Workflows shared by the HTTP server and the command-line tool:
//! report files, report upload, the owner admin action, the batch
//! command, defaults bootstrap and session authentication.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod batch;
mod bootstrap;
mod csv_input;
mod download;
mod error;
mod owner_assign;
mod report;
mod request_response;
mod settings;
mod upload;

#[cfg(test)]
mod tests;

pub use auth::AuthenticationService;
pub use batch::{BatchOptions, BatchSource, BatchSummary, CommandError, run_batch, split_identifiers};
pub use bootstrap::{BootstrapSummary, bootstrap_defaults};
pub use csv_input::{parse_assignment_csv, read_assignment_csv};
pub use download::resolve_download;
pub use error::{ApiError, AuthError, translate_core_error, translate_domain_error};
pub use owner_assign::{
    OWNER_ASSIGN_ACTION, OwnerRun, REPORT_DOWNLOAD_PREFIX, build_confirmation,
    finish_owner_assignment, owner_assign_message, run_owner_assignment, validate_report_file,
};
pub use report::{
    DEFAULT_REPORT_PREFIX, OWNER_REPORT_PREFIX, REPORT_COLUMNS, REPORTS_DIR,
    generate_report_path, read_report_csv, report_timestamp, write_report,
};
pub use request_response::{
    GroupOption, LoginRequest, LoginResponse, OwnerAssignConfirmRequest,
    OwnerAssignConfirmation, OwnerAssignRequest, OwnerAssignResult, OwnerSummary,
};
pub use settings::{DEFAULT_PRESIGN_EXPIRY_SECONDS, S3Settings, Settings};
pub use upload::{
    ReportUploader, S3ReportUploader, UploadError, UploadInfo, UploadRequest, object_key,
    public_url, resolve_bucket, try_upload,
};
