// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeSet;

use kentsel_domain::{AssignmentInput, GroupName, Owner, fold_email};

use crate::{AccountHandle, GroupHandle, IdentityStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeStoreError(pub String);

impl std::fmt::Display for FakeStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fake store failure: {}", self.0)
    }
}

impl std::error::Error for FakeStoreError {}

/// In-memory identity store that counts every call.
#[derive(Debug, Default)]
pub struct FakeStore {
    pub accounts: Vec<AccountHandle>,
    pub groups: Vec<GroupHandle>,
    pub memberships: BTreeSet<(i64, i64)>,
    pub username_lookups: usize,
    pub email_lookups: usize,
    pub group_creations: usize,
    pub add_member_calls: usize,
    pub fail_lookups: bool,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, username: &str, email: Option<&str>) -> Self {
        let account_id: i64 = i64::try_from(self.accounts.len()).unwrap() + 1;
        self.accounts.push(AccountHandle {
            account_id,
            username: username.to_string(),
            email: email.map(str::to_string),
        });
        self
    }

    pub fn with_group(mut self, name: &str) -> Self {
        let group_id: i64 = i64::try_from(self.groups.len()).unwrap() + 1;
        self.groups.push(GroupHandle {
            group_id,
            name: GroupName::new(name).unwrap(),
        });
        self
    }

    pub fn lookups(&self) -> usize {
        self.username_lookups + self.email_lookups
    }

    pub fn group(&self, name: &str) -> Option<&GroupHandle> {
        self.groups.iter().find(|g| g.name.as_str() == name)
    }

    pub fn members_of(&self, name: &str) -> Vec<String> {
        let Some(group) = self.group(name) else {
            return Vec::new();
        };
        self.memberships
            .iter()
            .filter(|(group_id, _)| *group_id == group.group_id)
            .filter_map(|(_, account_id)| {
                self.accounts
                    .iter()
                    .find(|a| a.account_id == *account_id)
                    .map(|a| a.username.clone())
            })
            .collect()
    }

    fn check(&self) -> Result<(), FakeStoreError> {
        if self.fail_lookups {
            return Err(FakeStoreError(String::from("database is locked")));
        }
        Ok(())
    }
}

impl IdentityStore for FakeStore {
    type Error = FakeStoreError;

    fn find_by_username(&mut self, username: &str) -> Result<Option<AccountHandle>, Self::Error> {
        self.username_lookups += 1;
        self.check()?;
        Ok(self
            .accounts
            .iter()
            .find(|a| a.username == username)
            .cloned())
    }

    fn find_by_email(&mut self, email: &str) -> Result<Option<AccountHandle>, Self::Error> {
        self.email_lookups += 1;
        self.check()?;
        let wanted: String = fold_email(email);
        Ok(self
            .accounts
            .iter()
            .filter(|a| a.email.as_deref().map(fold_email).as_ref() == Some(&wanted))
            .min_by_key(|a| a.account_id)
            .cloned())
    }

    fn find_group(&mut self, name: &GroupName) -> Result<Option<GroupHandle>, Self::Error> {
        self.check()?;
        Ok(self.groups.iter().find(|g| g.name == *name).cloned())
    }

    fn get_or_create_group(
        &mut self,
        name: &GroupName,
    ) -> Result<(GroupHandle, bool), Self::Error> {
        self.check()?;
        if let Some(existing) = self.groups.iter().find(|g| g.name == *name) {
            return Ok((existing.clone(), false));
        }
        self.group_creations += 1;
        let handle: GroupHandle = GroupHandle {
            group_id: i64::try_from(self.groups.len()).unwrap() + 1,
            name: name.clone(),
        };
        self.groups.push(handle.clone());
        Ok((handle, true))
    }

    fn add_member(
        &mut self,
        group: &GroupHandle,
        account: &AccountHandle,
    ) -> Result<bool, Self::Error> {
        self.add_member_calls += 1;
        Ok(self
            .memberships
            .insert((group.group_id, account.account_id)))
    }
}

pub fn group(name: &str) -> GroupName {
    GroupName::new(name).unwrap()
}

pub fn identifiers(values: &[&str]) -> Vec<AssignmentInput> {
    values
        .iter()
        .map(|v| AssignmentInput::Identifier((*v).to_string()))
        .collect()
}

pub fn owner(owner_id: i64, first: &str, last: &str, email: Option<&str>) -> AssignmentInput {
    AssignmentInput::Owner(Owner::new(
        owner_id,
        1,
        first.to_string(),
        last.to_string(),
        email.map(str::to_string),
    ))
}

pub fn csv_row(identifier: &str, group_name: Option<&str>) -> AssignmentInput {
    AssignmentInput::CsvRow {
        identifier: identifier.to_string(),
        group: GroupName::parse_optional(group_name),
    }
}
