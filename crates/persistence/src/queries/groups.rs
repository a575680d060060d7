// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use kentsel_domain::Permission;
use tracing::debug;

use crate::data_models::GroupData;
use crate::diesel_schema::{account_groups, group_members, group_permissions, permissions, users};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = account_groups)]
struct GroupRow {
    group_id: i64,
    name: String,
}

impl From<GroupRow> for GroupData {
    fn from(row: GroupRow) -> Self {
        Self {
            group_id: row.group_id,
            name: row.name,
        }
    }
}

/// Retrieves a group by exact name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_group_by_name(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Option<GroupData>, PersistenceError> {
    debug!(name, "Looking up group by name");

    let row: Option<GroupRow> = account_groups::table
        .filter(account_groups::name.eq(name))
        .select(GroupRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(GroupData::from))
}

/// Retrieves a group by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_group_by_id(
    conn: &mut SqliteConnection,
    group_id: i64,
) -> Result<Option<GroupData>, PersistenceError> {
    debug!(group_id, "Looking up group by ID");

    let row: Option<GroupRow> = account_groups::table
        .filter(account_groups::group_id.eq(group_id))
        .select(GroupRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(GroupData::from))
}

/// Lists all groups ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_groups(conn: &mut SqliteConnection) -> Result<Vec<GroupData>, PersistenceError> {
    let rows: Vec<GroupRow> = account_groups::table
        .order_by(account_groups::name.asc())
        .select(GroupRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(GroupData::from).collect())
}

/// Lists the usernames of a group's members, ordered by username.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_group_members(
    conn: &mut SqliteConnection,
    group_id: i64,
) -> Result<Vec<String>, PersistenceError> {
    let usernames: Vec<String> = group_members::table
        .inner_join(users::table)
        .filter(group_members::group_id.eq(group_id))
        .order_by(users::username.asc())
        .select(users::username)
        .load(conn)?;

    Ok(usernames)
}

/// Lists the permissions granted to a group, ordered by app and codename.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_group_permissions(
    conn: &mut SqliteConnection,
    group_id: i64,
) -> Result<Vec<Permission>, PersistenceError> {
    let rows: Vec<(String, String)> = group_permissions::table
        .inner_join(permissions::table)
        .filter(group_permissions::group_id.eq(group_id))
        .order_by((permissions::app_label.asc(), permissions::codename.asc()))
        .select((permissions::app_label, permissions::codename))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(app_label, codename)| Permission {
            app_label,
            codename,
        })
        .collect())
}
