// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use kentsel_domain::fold_email;
use tracing::info;

use crate::backend::get_last_insert_rowid;
use crate::data_models::NewUser;
use crate::diesel_schema::users;
use crate::error::PersistenceError;
use crate::queries::accounts::get_user_by_username;

/// Creates an account with a bcrypt-hashed password.
///
/// A blank email is stored as `NULL`. The folded email is stored
/// alongside it for lookups.
///
/// # Errors
///
/// Returns an error if the username is taken, the password cannot be
/// hashed, or the insert fails.
pub fn create_user(
    conn: &mut SqliteConnection,
    new_user: &NewUser<'_>,
) -> Result<i64, PersistenceError> {
    let username: &str = new_user.username.trim();
    if get_user_by_username(conn, username)?.is_some() {
        return Err(PersistenceError::DuplicateUsername(username.to_string()));
    }

    info!(
        username,
        is_staff = new_user.is_staff,
        is_superuser = new_user.is_superuser,
        "Creating user"
    );

    let password_hash: String = bcrypt::hash(new_user.password, bcrypt::DEFAULT_COST)?;
    let email: Option<&str> = new_user
        .email
        .map(str::trim)
        .filter(|e| !e.is_empty());

    diesel::insert_into(users::table)
        .values((
            users::username.eq(username),
            users::email.eq(email),
            users::email_folded.eq(email.map(fold_email)),
            users::password_hash.eq(&password_hash),
            users::is_staff.eq(i32::from(new_user.is_staff)),
            users::is_superuser.eq(i32::from(new_user.is_superuser)),
        ))
        .execute(conn)?;

    let user_id: i64 = get_last_insert_rowid(conn)?;
    info!(user_id, "User created");
    Ok(user_id)
}
