// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use kentsel::{AccountHandle, GroupHandle};
use kentsel_domain::{GroupName, Owner};

use crate::error::PersistenceError;

/// A user account row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserData {
    pub user_id: i64,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub created_at: String,
}

impl UserData {
    /// Returns whether the account may use the admin routes.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.is_active && (self.is_staff || self.is_superuser)
    }

    /// Converts the row into the engine's account view.
    #[must_use]
    pub fn to_handle(&self) -> AccountHandle {
        AccountHandle {
            account_id: self.user_id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// Fields needed to create an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub password: &'a str,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// A group row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupData {
    pub group_id: i64,
    pub name: String,
}

impl GroupData {
    /// Converts the row into the engine's group view.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored name is blank.
    pub fn to_handle(&self) -> Result<GroupHandle, PersistenceError> {
        let name: GroupName = GroupName::new(&self.name)
            .map_err(|e| PersistenceError::InvalidRecord(e.to_string()))?;
        Ok(GroupHandle {
            group_id: self.group_id,
            name,
        })
    }
}

/// A session row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// A project row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectData {
    pub project_id: i64,
    pub code: String,
    pub name: String,
}

/// An owner row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerData {
    pub owner_id: i64,
    pub project_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
}

impl From<OwnerData> for Owner {
    fn from(data: OwnerData) -> Self {
        Self::new(
            data.owner_id,
            data.project_id,
            data.first_name,
            data.last_name,
            data.email,
        )
    }
}
