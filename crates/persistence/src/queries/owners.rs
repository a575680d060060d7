// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::{OwnerData, ProjectData};
use crate::diesel_schema::{owners, projects};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = owners)]
struct OwnerRow {
    owner_id: i64,
    project_id: i64,
    first_name: String,
    last_name: String,
    email: Option<String>,
}

impl From<OwnerRow> for OwnerData {
    fn from(row: OwnerRow) -> Self {
        Self {
            owner_id: row.owner_id,
            project_id: row.project_id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = projects)]
struct ProjectRow {
    project_id: i64,
    code: String,
    name: String,
}

/// Retrieves the owners with the given ids, ordered by id.
///
/// Unknown ids are ignored.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_owners_by_ids(
    conn: &mut SqliteConnection,
    owner_ids: &[i64],
) -> Result<Vec<OwnerData>, PersistenceError> {
    debug!(count = owner_ids.len(), "Loading owners by ID");

    let rows: Vec<OwnerRow> = owners::table
        .filter(owners::owner_id.eq_any(owner_ids))
        .order_by(owners::owner_id.asc())
        .select(OwnerRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(OwnerData::from).collect())
}

/// Lists the owners of a project, ordered by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_project_owners(
    conn: &mut SqliteConnection,
    project_id: i64,
) -> Result<Vec<OwnerData>, PersistenceError> {
    let rows: Vec<OwnerRow> = owners::table
        .filter(owners::project_id.eq(project_id))
        .order_by(owners::owner_id.asc())
        .select(OwnerRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(OwnerData::from).collect())
}

/// Retrieves a project by its code.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_project_by_code(
    conn: &mut SqliteConnection,
    code: &str,
) -> Result<Option<ProjectData>, PersistenceError> {
    let row: Option<ProjectRow> = projects::table
        .filter(projects::code.eq(code))
        .select(ProjectRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(|row| ProjectData {
        project_id: row.project_id,
        code: row.code,
        name: row.name,
    }))
}
