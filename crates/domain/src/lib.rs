// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod defaults;
mod error;
mod permissions;
mod report;
mod types;

#[cfg(test)]
mod tests;

pub use defaults::{
    DEFAULT_GROUPS, DEFAULT_TITLES, PROJECT_MANAGER_GROUP, SPECIALIST_GROUP, default_departments,
    default_group_rules,
};
pub use error::DomainError;
pub use permissions::{
    PERMISSION_MODELS, Permission, PermissionAction, PermissionRule, permission_catalogue,
};
pub use report::{
    AssignmentStatus, REASON_NO_EMAIL, REASON_NO_GROUP, REASON_USER_NOT_FOUND, ReportFormat,
    ReportRow, sanitize_label,
};
pub use types::{AssignmentInput, GroupName, Owner, fold_email};
