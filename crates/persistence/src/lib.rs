// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Kentsel back-office.
//!
//! Accounts, groups, permissions, sessions, projects and owners are stored
//! in `SQLite` through Diesel. The schema ships as embedded migrations and
//! is applied whenever a connection is opened.
//!
//! [`Persistence`] implements [`kentsel::IdentityStore`], so the
//! assignment engine runs directly against the database.
//!
//! ## Testing
//!
//! [`Persistence::new_in_memory`] gives every caller its own shared-cache
//! in-memory database, so tests never observe each other's rows.

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

use diesel::SqliteConnection;
use kentsel_domain::Permission;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod identity;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{GroupData, NewUser, OwnerData, ProjectData, SessionData, UserData};
pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a persistence adapter backed by a fresh in-memory database.
    ///
    /// Each call receives a unique database name from an atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::initialize_database(&shared_memory_url)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Opens (or creates) a file-based database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::initialize_database(path_str)?;
        backend::enable_wal_mode(&mut conn)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Creates an account and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the username is taken or the insert fails.
    pub fn create_user(&mut self, new_user: &NewUser<'_>) -> Result<i64, PersistenceError> {
        mutations::accounts::create_user(&mut self.conn, new_user)
    }

    /// Retrieves an account by exact username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_username(
        &mut self,
        username: &str,
    ) -> Result<Option<UserData>, PersistenceError> {
        queries::accounts::get_user_by_username(&mut self.conn, username)
    }

    /// Retrieves the lowest-id account with the given email, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_email(&mut self, email: &str) -> Result<Option<UserData>, PersistenceError> {
        queries::accounts::get_user_by_email(&mut self.conn, email)
    }

    /// Retrieves an account by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_id(&mut self, user_id: i64) -> Result<Option<UserData>, PersistenceError> {
        queries::accounts::get_user_by_id(&mut self.conn, user_id)
    }

    /// Lists all accounts ordered by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_users(&mut self) -> Result<Vec<UserData>, PersistenceError> {
        queries::accounts::list_users(&mut self.conn)
    }

    /// Verifies a password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the hash cannot be parsed.
    pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
        queries::accounts::verify_password(password, password_hash)
    }

    // ========================================================================
    // Groups
    // ========================================================================

    /// Retrieves a group by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_group_by_id(&mut self, group_id: i64) -> Result<Option<GroupData>, PersistenceError> {
        queries::groups::get_group_by_id(&mut self.conn, group_id)
    }

    /// Retrieves a group by exact name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_group_by_name(&mut self, name: &str) -> Result<Option<GroupData>, PersistenceError> {
        queries::groups::get_group_by_name(&mut self.conn, name)
    }

    /// Lists all groups ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_groups(&mut self) -> Result<Vec<GroupData>, PersistenceError> {
        queries::groups::list_groups(&mut self.conn)
    }

    /// Returns the named group, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query or insert fails.
    pub fn get_or_create_group(
        &mut self,
        name: &str,
    ) -> Result<(GroupData, bool), PersistenceError> {
        mutations::groups::get_or_create_group(&mut self.conn, name)
    }

    /// Adds a user to a group; returns `true` when newly added.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add_group_member(&mut self, group_id: i64, user_id: i64) -> Result<bool, PersistenceError> {
        mutations::groups::add_group_member(&mut self.conn, group_id, user_id)
    }

    /// Lists the usernames in a group, ordered by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_group_members(&mut self, group_id: i64) -> Result<Vec<String>, PersistenceError> {
        queries::groups::list_group_members(&mut self.conn, group_id)
    }

    // ========================================================================
    // Permissions, departments, titles
    // ========================================================================

    /// Ensures the permission row exists and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query or insert fails.
    pub fn ensure_permission(&mut self, permission: &Permission) -> Result<i64, PersistenceError> {
        let (permission_id, _created): (i64, bool) = mutations::catalogue::get_or_create_permission(
            &mut self.conn,
            &permission.app_label,
            &permission.codename,
        )?;
        Ok(permission_id)
    }

    /// Grants a permission to a group; returns `true` when newly granted.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn grant_group_permission(
        &mut self,
        group_id: i64,
        permission_id: i64,
    ) -> Result<bool, PersistenceError> {
        mutations::groups::grant_group_permission(&mut self.conn, group_id, permission_id)
    }

    /// Lists the permissions granted to a group.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_group_permissions(
        &mut self,
        group_id: i64,
    ) -> Result<Vec<Permission>, PersistenceError> {
        queries::groups::list_group_permissions(&mut self.conn, group_id)
    }

    /// Returns the department id and whether it was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query or insert fails.
    pub fn get_or_create_department(&mut self, name: &str) -> Result<(i64, bool), PersistenceError> {
        mutations::catalogue::get_or_create_department(&mut self.conn, name)
    }

    /// Returns the title id and whether it was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query or insert fails.
    pub fn get_or_create_title(&mut self, name: &str) -> Result<(i64, bool), PersistenceError> {
        mutations::catalogue::get_or_create_title(&mut self.conn, name)
    }

    /// Lists department names in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_departments(&mut self) -> Result<Vec<String>, PersistenceError> {
        queries::catalogue::list_departments(&mut self.conn)
    }

    /// Lists title names in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_titles(&mut self) -> Result<Vec<String>, PersistenceError> {
        queries::catalogue::list_titles(&mut self.conn)
    }

    // ========================================================================
    // Projects & owners
    // ========================================================================

    /// Creates a project and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is taken or the insert fails.
    pub fn create_project(&mut self, code: &str, name: &str) -> Result<i64, PersistenceError> {
        mutations::owners::create_project(&mut self.conn, code, name)
    }

    /// Retrieves a project by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_project_by_code(
        &mut self,
        code: &str,
    ) -> Result<Option<ProjectData>, PersistenceError> {
        queries::owners::get_project_by_code(&mut self.conn, code)
    }

    /// Creates an owner and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the project does not exist or the insert fails.
    pub fn create_owner(
        &mut self,
        project_id: i64,
        first_name: &str,
        last_name: &str,
        email: Option<&str>,
    ) -> Result<i64, PersistenceError> {
        mutations::owners::create_owner(&mut self.conn, project_id, first_name, last_name, email)
    }

    /// Retrieves owners by id, ordered by id. Unknown ids are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_owners_by_ids(&mut self, owner_ids: &[i64]) -> Result<Vec<OwnerData>, PersistenceError> {
        queries::owners::get_owners_by_ids(&mut self.conn, owner_ids)
    }

    /// Lists a project's owners, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_project_owners(
        &mut self,
        project_id: i64,
    ) -> Result<Vec<OwnerData>, PersistenceError> {
        queries::owners::list_project_owners(&mut self.conn, project_id)
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Creates a session and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be created.
    pub fn create_session(
        &mut self,
        session_token: &str,
        user_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::sessions::create_session(&mut self.conn, session_token, user_id, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::sessions::get_session_by_token(&mut self.conn, session_token)
    }

    /// Touches a session's last activity timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::sessions::update_session_activity(&mut self.conn, session_id)
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::sessions::delete_session(&mut self.conn, session_token)
    }

    /// Deletes sessions that expired before `now` (ISO 8601).
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_expired_sessions(&mut self, now: &str) -> Result<usize, PersistenceError> {
        mutations::sessions::delete_expired_sessions(&mut self.conn, now)
    }
}
