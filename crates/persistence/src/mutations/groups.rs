// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info};

use crate::backend::get_last_insert_rowid;
use crate::data_models::GroupData;
use crate::diesel_schema::{account_groups, group_members, group_permissions};
use crate::error::PersistenceError;
use crate::queries::groups::get_group_by_name;

/// Returns the named group, creating it if needed.
///
/// The boolean is `true` when the group was created by this call.
///
/// # Errors
///
/// Returns an error if the database query or insert fails.
pub fn get_or_create_group(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<(GroupData, bool), PersistenceError> {
    if let Some(existing) = get_group_by_name(conn, name)? {
        return Ok((existing, false));
    }

    diesel::insert_into(account_groups::table)
        .values(account_groups::name.eq(name))
        .execute(conn)?;

    let group_id: i64 = get_last_insert_rowid(conn)?;
    info!(group_id, name, "Created group");

    Ok((
        GroupData {
            group_id,
            name: name.to_string(),
        },
        true,
    ))
}

/// Adds a user to a group.
///
/// Uses `INSERT OR IGNORE` on the unique `(user_id, group_id)` pair, so
/// repeating the call is a no-op. Returns `true` when a row was inserted.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn add_group_member(
    conn: &mut SqliteConnection,
    group_id: i64,
    user_id: i64,
) -> Result<bool, PersistenceError> {
    let inserted: usize = diesel::insert_or_ignore_into(group_members::table)
        .values((
            group_members::group_id.eq(group_id),
            group_members::user_id.eq(user_id),
        ))
        .execute(conn)?;

    debug!(group_id, user_id, inserted, "Group membership write");
    Ok(inserted > 0)
}

/// Grants a permission to a group. Returns `true` when newly granted.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn grant_group_permission(
    conn: &mut SqliteConnection,
    group_id: i64,
    permission_id: i64,
) -> Result<bool, PersistenceError> {
    let inserted: usize = diesel::insert_or_ignore_into(group_permissions::table)
        .values((
            group_permissions::group_id.eq(group_id),
            group_permissions::permission_id.eq(permission_id),
        ))
        .execute(conn)?;

    Ok(inserted > 0)
}
