// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use kentsel_domain::{ReportFormat, ReportRow};

/// Login credentials.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// A successful login.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub session_token: String,
    /// The account's username.
    pub username: String,
    /// When the session expires (ISO 8601).
    pub expires_at: String,
}

/// Owners selected for group assignment.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OwnerAssignConfirmRequest {
    pub owner_ids: Vec<i64>,
}

/// An owner as listed on the confirmation view.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OwnerSummary {
    pub owner_id: i64,
    pub name: String,
    pub email: Option<String>,
}

/// A group offered by the group picker.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GroupOption {
    pub group_id: i64,
    pub name: String,
}

/// Context for the confirmation view.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OwnerAssignConfirmation {
    /// The action to post back.
    pub action: String,
    /// The selected owners that exist, ordered by id.
    pub owners: Vec<OwnerSummary>,
    /// Every group, ordered by name.
    pub groups: Vec<GroupOption>,
}

/// A confirmed owner group assignment.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OwnerAssignRequest {
    pub owner_ids: Vec<i64>,
    pub group_id: i64,
    #[serde(default)]
    pub dry_run: bool,
    /// Report path relative to the media root; generated when absent.
    #[serde(default)]
    pub report_file: Option<String>,
    #[serde(default)]
    pub report_format: ReportFormat,
    #[serde(default)]
    pub upload_s3: bool,
    #[serde(default)]
    pub s3_bucket: Option<String>,
    #[serde(default)]
    pub s3_public: bool,
}

/// Context for the results view.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OwnerAssignResult {
    /// One row per selected owner.
    pub rows: Vec<ReportRow>,
    /// Number of `assigned` rows.
    pub assigned: usize,
    /// The selected group's name.
    pub group: String,
    pub dry_run: bool,
    /// Report path relative to the media root.
    pub report_file: Option<String>,
    /// Staff download link for the report.
    pub report_download_url: Option<String>,
    /// Public media URL prefix.
    pub media_url: String,
    /// Public media URL of the report itself.
    pub report_media_url: Option<String>,
    /// URL of the uploaded copy.
    pub s3_url: Option<String>,
    /// Set when the upload was requested but failed.
    pub upload_warning: Option<String>,
    /// Summary line.
    pub message: String,
}
