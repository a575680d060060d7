// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A group name is empty after trimming.
    InvalidGroupName(String),
    /// A report format string is not `csv` or `json`.
    InvalidReportFormat(String),
    /// A report status string is not one of the known statuses.
    InvalidStatus(String),
    /// A permission action string is not `add`, `change`, `delete` or `view`.
    InvalidPermissionAction(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidGroupName(msg) => write!(f, "Invalid group name: {msg}"),
            Self::InvalidReportFormat(value) => {
                write!(f, "Invalid report format '{value}' (must be csv or json)")
            }
            Self::InvalidStatus(value) => write!(f, "Invalid assignment status '{value}'"),
            Self::InvalidPermissionAction(value) => {
                write!(
                    f,
                    "Invalid permission action '{value}' (must be add, change, delete or view)"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
