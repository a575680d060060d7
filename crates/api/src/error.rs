// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use kentsel::CoreError;
use kentsel_domain::DomainError;
use kentsel_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The account may not use admin routes.
    NotStaff {
        /// The account's username.
        username: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::NotStaff { username } => {
                write!(f, "Unauthorized: '{username}' is not a staff account")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The caller is authenticated but not allowed to act.
    Unauthorized {
        /// The action that was attempted.
        action: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// An uploaded or supplied CSV could not be read.
    InvalidCsvFormat {
        /// Why the CSV was rejected.
        reason: String,
    },
    /// The explicitly selected group does not exist.
    GroupNotFound {
        /// The id that was requested.
        group_id: i64,
    },
    /// A report path is missing, not a file, or outside the media root.
    ReportNotFound {
        /// The path as requested.
        path: String,
    },
    /// A report file could not be written or read.
    ReportIo {
        /// The file involved.
        path: String,
        /// The underlying error.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { action } => write!(f, "Unauthorized: {action}"),
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::InvalidCsvFormat { reason } => write!(f, "Invalid CSV: {reason}"),
            Self::GroupNotFound { .. } => write!(f, "No group selected"),
            Self::ReportNotFound { path } => write!(f, "Report not found: {path}"),
            Self::ReportIo { path, message } => {
                write!(f, "Report file error for '{path}': {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::NotStaff { username } => Self::Unauthorized {
                action: format!("admin access for '{username}'"),
            },
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidGroupName(msg) => ApiError::InvalidInput {
            field: String::from("group"),
            message: msg,
        },
        DomainError::InvalidReportFormat(value) => ApiError::InvalidInput {
            field: String::from("report_format"),
            message: format!("'{value}' is not csv or json"),
        },
        DomainError::InvalidStatus(value) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("unknown assignment status '{value}'"),
        },
        DomainError::InvalidPermissionAction(value) => ApiError::InvalidInput {
            field: String::from("action"),
            message: format!("unknown permission action '{value}'"),
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::Store(msg) => ApiError::Internal {
            message: format!("Identity store failure: {msg}"),
        },
    }
}
