// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Reason recorded when an owner has no email address.
pub const REASON_NO_EMAIL: &str = "no_email";
/// Reason recorded when no group applies to a row.
pub const REASON_NO_GROUP: &str = "no_group";
/// Reason recorded when no account matches the identifier.
pub const REASON_USER_NOT_FOUND: &str = "user_not_found";

/// Outcome of resolving and assigning one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// The account was added to the group.
    Assigned,
    /// Dry-run: the account would have been added.
    WouldAssign,
    /// No account matched the identifier.
    NotFound,
    /// The owner record has no email to match on.
    NoEmail,
    /// The row was not processed (see reason).
    Skipped,
}

impl AssignmentStatus {
    /// Returns the wire representation used in reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::WouldAssign => "would_assign",
            Self::NotFound => "not_found",
            Self::NoEmail => "no_email",
            Self::Skipped => "skipped",
        }
    }

    /// Returns whether this status counts as a successful match.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Assigned | Self::WouldAssign)
    }
}

impl FromStr for AssignmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assigned" => Ok(Self::Assigned),
            "would_assign" => Ok(Self::WouldAssign),
            "not_found" => Ok(Self::NotFound),
            "no_email" => Ok(Self::NoEmail),
            "skipped" => Ok(Self::Skipped),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of an assignment report.
///
/// Field names are the report column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// The identifier as supplied (email for owners).
    pub ident: String,
    /// The resolved account's username.
    pub user: Option<String>,
    /// The effective group name.
    pub group: Option<String>,
    /// The outcome.
    pub status: AssignmentStatus,
    /// Why the row did not succeed.
    pub reason: Option<String>,
}

impl ReportRow {
    /// Creates a row for a successful match.
    #[must_use]
    pub const fn matched(
        ident: String,
        user: String,
        group: String,
        status: AssignmentStatus,
    ) -> Self {
        Self {
            ident,
            user: Some(user),
            group: Some(group),
            status,
            reason: None,
        }
    }

    /// Creates a row for an input that did not produce an assignment.
    #[must_use]
    pub fn unmatched(
        ident: String,
        group: Option<String>,
        status: AssignmentStatus,
        reason: &str,
    ) -> Self {
        Self {
            ident,
            user: None,
            group,
            status,
            reason: Some(reason.to_string()),
        }
    }
}

/// Serialization format of a report file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Comma-separated values with a header row.
    #[default]
    Csv,
    /// Indented JSON array of row objects.
    Json,
}

impl ReportFormat {
    /// Returns the file extension (without the dot).
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(DomainError::InvalidReportFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Makes a free-text label safe for use in a file name.
///
/// The label is trimmed, then every character outside `[A-Za-z0-9_-]` is
/// replaced with `_`.
#[must_use]
pub fn sanitize_label(label: &str) -> String {
    label
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
