// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The identity store seam.
//!
//! Accounts and groups live in the backing datastore. The engine only
//! needs the handful of operations below, which lets tests substitute an
//! in-memory fake for the database.

use kentsel_domain::GroupName;

/// A user account, as seen by the assignment engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountHandle {
    /// The account's database identifier.
    pub account_id: i64,
    /// The login name.
    pub username: String,
    /// The account's email, if any.
    pub email: Option<String>,
}

/// A group, as seen by the assignment engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupHandle {
    /// The group's database identifier.
    pub group_id: i64,
    /// The group name.
    pub name: GroupName,
}

/// Account and group operations required by the resolver and engine.
pub trait IdentityStore {
    /// The store's failure type.
    type Error: std::error::Error;

    /// Finds an account by exact username.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn find_by_username(&mut self, username: &str) -> Result<Option<AccountHandle>, Self::Error>;

    /// Finds an account by email, comparing with [`kentsel_domain::fold_email`].
    ///
    /// When several accounts share the email, the one with the lowest
    /// account id is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn find_by_email(&mut self, email: &str) -> Result<Option<AccountHandle>, Self::Error>;

    /// Finds an existing group by name without creating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn find_group(&mut self, name: &GroupName) -> Result<Option<GroupHandle>, Self::Error>;

    /// Returns the named group, creating it if needed.
    ///
    /// The boolean is `true` when the group was created by this call.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried or written.
    fn get_or_create_group(&mut self, name: &GroupName)
    -> Result<(GroupHandle, bool), Self::Error>;

    /// Adds an account to a group.
    ///
    /// Adding an existing member is a no-op. The boolean is `true` when a
    /// new membership was recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn add_member(
        &mut self,
        group: &GroupHandle,
        account: &AccountHandle,
    ) -> Result<bool, Self::Error>;
}
