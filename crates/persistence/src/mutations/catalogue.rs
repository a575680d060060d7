// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Get-or-create writes for departments, titles and permissions.
//!
//! Each function returns the row id and whether the row was created.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::backend::get_last_insert_rowid;
use crate::diesel_schema::{departments, permissions, titles};
use crate::error::PersistenceError;
use crate::queries::catalogue::{get_department_id, get_permission_id, get_title_id};

/// # Errors
///
/// Returns an error if the database query or insert fails.
pub fn get_or_create_department(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<(i64, bool), PersistenceError> {
    if let Some(id) = get_department_id(conn, name)? {
        return Ok((id, false));
    }

    diesel::insert_into(departments::table)
        .values(departments::name.eq(name))
        .execute(conn)?;
    let id: i64 = get_last_insert_rowid(conn)?;
    info!(department_id = id, name, "Created department");
    Ok((id, true))
}

/// # Errors
///
/// Returns an error if the database query or insert fails.
pub fn get_or_create_title(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<(i64, bool), PersistenceError> {
    if let Some(id) = get_title_id(conn, name)? {
        return Ok((id, false));
    }

    diesel::insert_into(titles::table)
        .values(titles::name.eq(name))
        .execute(conn)?;
    let id: i64 = get_last_insert_rowid(conn)?;
    info!(title_id = id, name, "Created title");
    Ok((id, true))
}

/// # Errors
///
/// Returns an error if the database query or insert fails.
pub fn get_or_create_permission(
    conn: &mut SqliteConnection,
    app_label: &str,
    codename: &str,
) -> Result<(i64, bool), PersistenceError> {
    if let Some(id) = get_permission_id(conn, app_label, codename)? {
        return Ok((id, false));
    }

    diesel::insert_into(permissions::table)
        .values((
            permissions::app_label.eq(app_label),
            permissions::codename.eq(codename),
        ))
        .execute(conn)?;
    Ok((get_last_insert_rowid(conn)?, true))
}
