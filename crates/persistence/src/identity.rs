// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use kentsel::{AccountHandle, GroupHandle, IdentityStore};
use kentsel_domain::GroupName;

use crate::Persistence;
use crate::data_models::{GroupData, UserData};
use crate::error::PersistenceError;
use crate::{mutations, queries};

impl IdentityStore for Persistence {
    type Error = PersistenceError;

    fn find_by_username(&mut self, username: &str) -> Result<Option<AccountHandle>, Self::Error> {
        let user: Option<UserData> =
            queries::accounts::get_user_by_username(&mut self.conn, username)?;
        Ok(user.as_ref().map(UserData::to_handle))
    }

    fn find_by_email(&mut self, email: &str) -> Result<Option<AccountHandle>, Self::Error> {
        let user: Option<UserData> = queries::accounts::get_user_by_email(&mut self.conn, email)?;
        Ok(user.as_ref().map(UserData::to_handle))
    }

    fn find_group(&mut self, name: &GroupName) -> Result<Option<GroupHandle>, Self::Error> {
        queries::groups::get_group_by_name(&mut self.conn, name.as_str())?
            .as_ref()
            .map(GroupData::to_handle)
            .transpose()
    }

    fn get_or_create_group(
        &mut self,
        name: &GroupName,
    ) -> Result<(GroupHandle, bool), Self::Error> {
        let (group, created): (GroupData, bool) =
            mutations::groups::get_or_create_group(&mut self.conn, name.as_str())?;
        Ok((group.to_handle()?, created))
    }

    fn add_member(
        &mut self,
        group: &GroupHandle,
        account: &AccountHandle,
    ) -> Result<bool, Self::Error> {
        mutations::groups::add_group_member(&mut self.conn, group.group_id, account.account_id)
    }
}
