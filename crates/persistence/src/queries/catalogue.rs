// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Departments, titles and the permission table.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::diesel_schema::{departments, permissions, titles};
use crate::error::PersistenceError;

/// Returns the id of a department by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_department_id(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Option<i64>, PersistenceError> {
    Ok(departments::table
        .filter(departments::name.eq(name))
        .select(departments::department_id)
        .first(conn)
        .optional()?)
}

/// Returns the id of a title by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_title_id(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Option<i64>, PersistenceError> {
    Ok(titles::table
        .filter(titles::name.eq(name))
        .select(titles::title_id)
        .first(conn)
        .optional()?)
}

/// Returns the id of a permission.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_permission_id(
    conn: &mut SqliteConnection,
    app_label: &str,
    codename: &str,
) -> Result<Option<i64>, PersistenceError> {
    Ok(permissions::table
        .filter(permissions::app_label.eq(app_label))
        .filter(permissions::codename.eq(codename))
        .select(permissions::permission_id)
        .first(conn)
        .optional()?)
}

/// Lists department names in insertion order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_departments(conn: &mut SqliteConnection) -> Result<Vec<String>, PersistenceError> {
    Ok(departments::table
        .order_by(departments::department_id.asc())
        .select(departments::name)
        .load(conn)?)
}

/// Lists title names in insertion order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_titles(conn: &mut SqliteConnection) -> Result<Vec<String>, PersistenceError> {
    Ok(titles::table
        .order_by(titles::title_id.asc())
        .select(titles::name)
        .load(conn)?)
}
