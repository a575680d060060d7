// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session-based authentication for the admin routes.

use kentsel_persistence::{Persistence, PersistenceError, SessionData, UserData};
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};

use crate::error::AuthError;

/// Authentication service backed by the `sessions` table.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Lifetime of a new session.
    const DEFAULT_SESSION_EXPIRATION: Duration = Duration::hours(12);

    /// Verifies a username and password and creates a session.
    ///
    /// Returns the session token, its expiry (ISO 8601) and the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are wrong, the account is
    /// inactive, or the session cannot be stored.
    pub fn login(
        persistence: &mut Persistence,
        username: &str,
        password: &str,
    ) -> Result<(String, String, UserData), AuthError> {
        let invalid = || AuthError::AuthenticationFailed {
            reason: String::from("Invalid username or password"),
        };

        let user: UserData = persistence
            .get_user_by_username(username.trim())
            .map_err(Self::map_persistence_error)?
            .ok_or_else(invalid)?;

        if !Persistence::verify_password(password, &user.password_hash)
            .map_err(Self::map_persistence_error)?
        {
            warn!(username = %user.username, "Rejected login with wrong password");
            return Err(invalid());
        }

        if !user.is_active {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Account is disabled"),
            });
        }

        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let purged: usize = persistence
            .delete_expired_sessions(&Self::format_timestamp(now)?)
            .map_err(Self::map_persistence_error)?;
        if purged > 0 {
            info!(purged, "Removed expired sessions");
        }

        let session_token: String = Self::generate_session_token();
        let expires_at_str: String =
            Self::format_timestamp(now + Self::DEFAULT_SESSION_EXPIRATION)?;

        persistence
            .create_session(&session_token, user.user_id, &expires_at_str)
            .map_err(Self::map_persistence_error)?;

        info!(username = %user.username, "User logged in");
        Ok((session_token, expires_at_str, user))
    }

    /// Validates a session token and returns its account.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or expired, or the
    /// account no longer exists or is inactive.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<UserData, AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime = OffsetDateTime::parse(
            &session.expires_at,
            &time::format_description::well_known::Iso8601::DEFAULT,
        )
        .map_err(|e| AuthError::AuthenticationFailed {
            reason: format!("Failed to parse session expiration: {e}"),
        })?;

        if OffsetDateTime::now_utc() > expires_at {
            persistence
                .delete_session(session_token)
                .map_err(Self::map_persistence_error)?;
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let user: UserData = persistence
            .get_user_by_id(session.user_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Account not found"),
            })?;

        if !user.is_active {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Account is disabled"),
            });
        }

        persistence
            .update_session_activity(session.session_id)
            .map_err(Self::map_persistence_error)?;

        Ok(user)
    }

    /// Validates a session and requires a staff or superuser account.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is invalid or the account is not
    /// allowed to use admin routes.
    pub fn require_staff(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<UserData, AuthError> {
        let user: UserData = Self::validate_session(persistence, session_token)?;
        if !user.is_admin() {
            return Err(AuthError::NotStaff {
                username: user.username,
            });
        }
        Ok(user)
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be deleted.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(Self::map_persistence_error)
    }

    fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, AuthError> {
        timestamp
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to format timestamp: {e}"),
            })
    }

    fn generate_session_token() -> String {
        let timestamp: i128 = OffsetDateTime::now_utc().unix_timestamp_nanos();
        format!("session_{timestamp}_{}", rand::random::<u64>())
    }

    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::AuthenticationFailed {
            reason: format!("Database error: {err}"),
        }
    }
}
