// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod group_tests;

use crate::{NewUser, Persistence};

pub fn create_test_user(persistence: &mut Persistence, username: &str, email: Option<&str>) -> i64 {
    persistence
        .create_user(&NewUser {
            username,
            email,
            password: "password",
            is_staff: false,
            is_superuser: false,
        })
        .unwrap()
}
