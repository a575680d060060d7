// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Seeds default groups, departments, titles and group permissions.

use kentsel_domain::{
    DEFAULT_GROUPS, DEFAULT_TITLES, Permission, PermissionRule, default_departments,
    default_group_rules, permission_catalogue,
};
use kentsel_persistence::{GroupData, Persistence};
use tracing::{debug, info};

use crate::error::ApiError;

/// Items created by a bootstrap run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapSummary {
    /// `group:<name>`, `department:<name>`, `title:<name>` and
    /// `perms:<group>=<rule>` entries, in creation order.
    pub created: Vec<String>,
}

impl BootstrapSummary {
    /// Returns `Created: <items>`.
    #[must_use]
    pub fn line(&self) -> String {
        format!("Created: {}", self.created.join(", "))
    }
}

/// Creates whatever defaults are missing. Safe to run repeatedly.
///
/// A `perms:` entry is recorded only when the rule granted something new.
///
/// # Errors
///
/// Returns an error if the database cannot be read or written.
pub fn bootstrap_defaults(persistence: &mut Persistence) -> Result<BootstrapSummary, ApiError> {
    let mut created: Vec<String> = Vec::new();

    for name in DEFAULT_GROUPS {
        let (_group, was_created): (GroupData, bool) = persistence.get_or_create_group(name)?;
        if was_created {
            created.push(format!("group:{name}"));
        }
    }

    for name in default_departments() {
        let (_id, was_created): (i64, bool) = persistence.get_or_create_department(name)?;
        if was_created {
            created.push(format!("department:{name}"));
        }
    }

    for name in DEFAULT_TITLES {
        let (_id, was_created): (i64, bool) = persistence.get_or_create_title(name)?;
        if was_created {
            created.push(format!("title:{name}"));
        }
    }

    let catalogue: Vec<Permission> = permission_catalogue();
    for (group_name, rule) in default_group_rules() {
        let (group, was_created): (GroupData, bool) =
            persistence.get_or_create_group(group_name)?;
        if was_created {
            created.push(format!("group:{group_name}"));
        }

        if apply_rule(persistence, &group, &rule, &catalogue)? > 0 {
            created.push(format!("perms:{group_name}={}", rule.describe()));
        }
    }

    info!(created = created.len(), "Defaults bootstrapped");
    Ok(BootstrapSummary { created })
}

/// Grants the rule's permissions to a group; returns how many were new.
fn apply_rule(
    persistence: &mut Persistence,
    group: &GroupData,
    rule: &PermissionRule,
    catalogue: &[Permission],
) -> Result<usize, ApiError> {
    let mut granted: usize = 0;
    for permission in rule.expand(catalogue) {
        let permission_id: i64 = persistence.ensure_permission(&permission)?;
        if persistence.grant_group_permission(group.group_id, permission_id)? {
            granted += 1;
        }
    }
    debug!(group = %group.name, rule = %rule.describe(), granted, "Permission rule applied");
    Ok(granted)
}
