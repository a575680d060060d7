// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bulk group assignment.
//!
//! Every input produces exactly one report row, in input order. Rows that
//! cannot be resolved are data, not errors: only identity store failures
//! abort a run.

use std::collections::HashMap;

use kentsel_domain::{
    AssignmentInput, AssignmentStatus, GroupName, REASON_NO_EMAIL, REASON_NO_GROUP,
    REASON_USER_NOT_FOUND, ReportRow,
};
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::resolver::resolve_identifier;
use crate::store::{AccountHandle, GroupHandle, IdentityStore};

/// Run-wide settings for an assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentOptions {
    /// Group used when an input carries no per-row override.
    pub default_group: Option<GroupName>,
    /// Compute outcomes without touching group membership.
    pub dry_run: bool,
}

impl AssignmentOptions {
    /// Creates options for a run.
    #[must_use]
    pub const fn new(default_group: Option<GroupName>, dry_run: bool) -> Self {
        Self {
            default_group,
            dry_run,
        }
    }
}

/// Result of an assignment run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentOutcome {
    /// One row per input, in input order.
    pub rows: Vec<ReportRow>,
    /// Number of rows with status `assigned`.
    pub assigned: usize,
    /// Groups that did not exist before this run and were created by it.
    pub created_groups: Vec<GroupName>,
}

impl AssignmentOutcome {
    /// Counts the rows with the given status.
    #[must_use]
    pub fn count(&self, status: AssignmentStatus) -> usize {
        self.rows.iter().filter(|row| row.status == status).count()
    }

    /// Returns the rows that did not resolve to an account.
    pub fn failures(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(|row| !row.status.is_success())
    }
}

/// Groups looked up during one run, keyed by name.
///
/// `None` records a group that does not exist (dry-run only).
struct GroupCache {
    groups: HashMap<GroupName, Option<GroupHandle>>,
    created: Vec<GroupName>,
}

impl GroupCache {
    fn new() -> Self {
        Self {
            groups: HashMap::new(),
            created: Vec::new(),
        }
    }

    /// Fetches the group the first time it is needed.
    ///
    /// Live runs create missing groups; dry runs only look them up.
    fn fetch<S: IdentityStore>(
        &mut self,
        store: &mut S,
        name: &GroupName,
        dry_run: bool,
    ) -> Result<Option<GroupHandle>, CoreError> {
        if let Some(cached) = self.groups.get(name) {
            return Ok(cached.clone());
        }

        let handle: Option<GroupHandle> = if dry_run {
            store.find_group(name).map_err(|e| CoreError::store(&e))?
        } else {
            let (handle, created) = store
                .get_or_create_group(name)
                .map_err(|e| CoreError::store(&e))?;
            if created {
                warn!(group = %name, "Group did not exist and was created on demand");
                self.created.push(name.clone());
            }
            Some(handle)
        };

        self.groups.insert(name.clone(), handle.clone());
        Ok(handle)
    }
}

/// Assigns each input's account to its effective group.
///
/// For each input, in order:
/// 1. Owner inputs without an email become `no_email` without a lookup.
/// 2. The effective group is the per-row override, else the run default;
///    with neither the row is `skipped` (`no_group`).
/// 3. The group is fetched (created on first use in live runs), then the
///    identifier is resolved; no match is `not_found`.
/// 4. A match is `would_assign` in dry-run mode, otherwise the account is
///    added to the group and the row is `assigned`.
///
/// # Errors
///
/// Returns an error only if the identity store fails.
pub fn assign<S: IdentityStore>(
    store: &mut S,
    inputs: &[AssignmentInput],
    options: &AssignmentOptions,
) -> Result<AssignmentOutcome, CoreError> {
    info!(
        inputs = inputs.len(),
        dry_run = options.dry_run,
        default_group = options.default_group.as_ref().map(GroupName::as_str),
        "Starting group assignment"
    );

    let mut cache: GroupCache = GroupCache::new();
    let mut rows: Vec<ReportRow> = Vec::with_capacity(inputs.len());
    let mut assigned: usize = 0;

    for input in inputs {
        let row: ReportRow = assign_one(store, input, options, &mut cache)?;
        if row.status == AssignmentStatus::Assigned {
            assigned += 1;
        }
        rows.push(row);
    }

    info!(
        rows = rows.len(),
        assigned,
        dry_run = options.dry_run,
        "Group assignment finished"
    );

    Ok(AssignmentOutcome {
        rows,
        assigned,
        created_groups: cache.created,
    })
}

fn assign_one<S: IdentityStore>(
    store: &mut S,
    input: &AssignmentInput,
    options: &AssignmentOptions,
    cache: &mut GroupCache,
) -> Result<ReportRow, CoreError> {
    let ident: String = input.report_ident();

    let lookup: &str = match input {
        AssignmentInput::Owner(owner) => match owner.usable_email() {
            Some(email) => email,
            None => {
                debug!(owner_id = owner.owner_id, "Owner has no email");
                let group: Option<String> = options
                    .default_group
                    .as_ref()
                    .map(|g| g.as_str().to_string());
                return Ok(ReportRow::unmatched(
                    ident,
                    group,
                    AssignmentStatus::NoEmail,
                    REASON_NO_EMAIL,
                ));
            }
        },
        AssignmentInput::Identifier(identifier) | AssignmentInput::CsvRow { identifier, .. } => {
            identifier
        }
    };

    let Some(group_name) = input
        .group_override()
        .or(options.default_group.as_ref())
        .cloned()
    else {
        return Ok(ReportRow::unmatched(
            ident,
            None,
            AssignmentStatus::Skipped,
            REASON_NO_GROUP,
        ));
    };

    let group: Option<GroupHandle> = cache.fetch(store, &group_name, options.dry_run)?;

    let account: AccountHandle = match resolve_identifier(store, lookup) {
        Ok(Some(account)) => account,
        Ok(None) => {
            return Ok(ReportRow::unmatched(
                ident,
                Some(group_name.as_str().to_string()),
                AssignmentStatus::NotFound,
                REASON_USER_NOT_FOUND,
            ));
        }
        Err(e) => return Err(CoreError::store(&e)),
    };

    if options.dry_run {
        debug!(user = %account.username, group = %group_name, "Would assign");
        return Ok(ReportRow::matched(
            ident,
            account.username,
            group_name.as_str().to_string(),
            AssignmentStatus::WouldAssign,
        ));
    }

    let Some(group) = group else {
        return Err(CoreError::Store(format!(
            "group '{group_name}' unavailable after get-or-create"
        )));
    };

    let added: bool = store
        .add_member(&group, &account)
        .map_err(|e| CoreError::store(&e))?;
    if added {
        info!(user = %account.username, group = %group.name, "Added user to group");
    } else {
        debug!(user = %account.username, group = %group.name, "User already in group");
    }

    Ok(ReportRow::matched(
        ident,
        account.username,
        group.name.as_str().to_string(),
        AssignmentStatus::Assigned,
    ))
}
