// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bearer-token session extraction for the admin routes.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use kentsel_api::{AuthError, AuthenticationService};
use kentsel_persistence::UserData;
use tracing::{debug, warn};

use crate::AppState;

/// An authenticated staff or superuser account.
///
/// Reads `Authorization: Bearer <token>` and validates the session.
/// Carries the account and the token (for logout).
///
/// Rejects with 401 when the header or session is missing or invalid, and
/// with 403 when the account is not staff.
pub struct StaffSession(pub UserData, pub String);

impl FromRequestParts<AppState> for StaffSession {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .ok_or_else(|| {
                debug!("Missing Authorization header");
                SessionError::MissingAuthorizationHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header encoding");
                SessionError::InvalidAuthorizationHeader
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            warn!("Authorization header does not start with 'Bearer '");
            SessionError::InvalidAuthorizationHeader
        })?;

        let user: UserData = {
            let mut persistence = state.persistence.lock().await;
            AuthenticationService::require_staff(&mut persistence, token).map_err(|e| {
                warn!(error = %e, "Session rejected");
                match e {
                    AuthError::NotStaff { .. } => SessionError::NotStaff(e.to_string()),
                    AuthError::AuthenticationFailed { .. } => {
                        SessionError::InvalidSession(e.to_string())
                    }
                }
            })?
        };

        debug!(username = %user.username, "Session validated");
        Ok(Self(user, token.to_string()))
    }
}

/// Session extraction errors.
#[derive(Debug)]
pub enum SessionError {
    /// Authorization header is missing.
    MissingAuthorizationHeader,
    /// Authorization header format is invalid.
    InvalidAuthorizationHeader,
    /// Session validation failed.
    InvalidSession(String),
    /// The account may not use admin routes.
    NotStaff(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingAuthorizationHeader => {
                (StatusCode::UNAUTHORIZED, "Missing Authorization header").into_response()
            }
            Self::InvalidAuthorizationHeader => (
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header format. Expected: 'Bearer <token>'",
            )
                .into_response(),
            Self::InvalidSession(reason) => (
                StatusCode::UNAUTHORIZED,
                format!("Session validation failed: {reason}"),
            )
                .into_response(),
            Self::NotStaff(reason) => (StatusCode::FORBIDDEN, reason).into_response(),
        }
    }
}
