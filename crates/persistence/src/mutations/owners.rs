// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::backend::get_last_insert_rowid;
use crate::diesel_schema::{owners, projects};
use crate::error::PersistenceError;

/// Creates a project.
///
/// # Errors
///
/// Returns an error if the code is taken or the insert fails.
pub fn create_project(
    conn: &mut SqliteConnection,
    code: &str,
    name: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(projects::table)
        .values((projects::code.eq(code), projects::name.eq(name)))
        .execute(conn)?;

    let project_id: i64 = get_last_insert_rowid(conn)?;
    info!(project_id, code, "Created project");
    Ok(project_id)
}

/// Creates an owner under a project.
///
/// # Errors
///
/// Returns an error if the project does not exist or the insert fails.
pub fn create_owner(
    conn: &mut SqliteConnection,
    project_id: i64,
    first_name: &str,
    last_name: &str,
    email: Option<&str>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(owners::table)
        .values((
            owners::project_id.eq(project_id),
            owners::first_name.eq(first_name),
            owners::last_name.eq(last_name),
            owners::email.eq(email),
        ))
        .execute(conn)?;

    let owner_id: i64 = get_last_insert_rowid(conn)?;
    info!(owner_id, project_id, "Created owner");
    Ok(owner_id)
}
