// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use kentsel_domain::{AssignmentInput, AssignmentStatus};

use crate::tests::helpers::{FakeStore, csv_row, group, identifiers, owner};
use crate::{AssignmentOptions, AssignmentOutcome, CoreError, assign};

fn statuses(outcome: &AssignmentOutcome) -> Vec<AssignmentStatus> {
    outcome.rows.iter().map(|row| row.status).collect()
}

#[test]
fn test_dry_run_scenario_reports_without_mutation() {
    let mut store: FakeStore = FakeStore::new()
        .with_account("alice", Some("alice@example.com"))
        .with_account("bob", Some("bob@example.com"))
        .with_group("TestGroup");
    let inputs: Vec<AssignmentInput> = identifiers(&["alice", "bob", "missing@example.com"]);
    let options: AssignmentOptions = AssignmentOptions::new(Some(group("TestGroup")), true);

    let outcome: AssignmentOutcome = assign(&mut store, &inputs, &options).unwrap();

    assert_eq!(
        statuses(&outcome),
        vec![
            AssignmentStatus::WouldAssign,
            AssignmentStatus::WouldAssign,
            AssignmentStatus::NotFound,
        ]
    );
    assert_eq!(outcome.assigned, 0);
    assert_eq!(outcome.rows[2].reason.as_deref(), Some("user_not_found"));
    assert_eq!(outcome.rows[2].group.as_deref(), Some("TestGroup"));
    assert!(store.memberships.is_empty());
    assert_eq!(store.add_member_calls, 0);
}

#[test]
fn test_dry_run_never_creates_groups() {
    let mut store: FakeStore = FakeStore::new().with_account("alice", None);
    let inputs: Vec<AssignmentInput> = identifiers(&["alice"]);
    let options: AssignmentOptions = AssignmentOptions::new(Some(group("Brand New")), true);

    let outcome: AssignmentOutcome = assign(&mut store, &inputs, &options).unwrap();

    assert_eq!(statuses(&outcome), vec![AssignmentStatus::WouldAssign]);
    assert_eq!(outcome.rows[0].group.as_deref(), Some("Brand New"));
    assert!(store.groups.is_empty());
    assert!(outcome.created_groups.is_empty());
}

#[test]
fn test_live_run_adds_members() {
    let mut store: FakeStore = FakeStore::new()
        .with_account("alice", Some("alice@example.com"))
        .with_account("bob", Some("bob@example.com"))
        .with_group("TestGroup");
    let inputs: Vec<AssignmentInput> = identifiers(&["alice", "BOB@example.com"]);
    let options: AssignmentOptions = AssignmentOptions::new(Some(group("TestGroup")), false);

    let outcome: AssignmentOutcome = assign(&mut store, &inputs, &options).unwrap();

    assert_eq!(outcome.assigned, 2);
    assert_eq!(outcome.rows[1].ident, "BOB@example.com");
    assert_eq!(outcome.rows[1].user.as_deref(), Some("bob"));
    assert_eq!(store.members_of("TestGroup"), vec!["alice", "bob"]);
}

#[test]
fn test_second_live_run_is_idempotent() {
    let mut store: FakeStore = FakeStore::new()
        .with_account("alice", None)
        .with_group("TestGroup");
    let inputs: Vec<AssignmentInput> = identifiers(&["alice"]);
    let options: AssignmentOptions = AssignmentOptions::new(Some(group("TestGroup")), false);

    let first: AssignmentOutcome = assign(&mut store, &inputs, &options).unwrap();
    let second: AssignmentOutcome = assign(&mut store, &inputs, &options).unwrap();

    assert_eq!(first.assigned, 1);
    assert_eq!(second.assigned, 1);
    assert_eq!(statuses(&second), vec![AssignmentStatus::Assigned]);
    assert_eq!(store.memberships.len(), 1);
}

#[test]
fn test_csv_rows_use_per_row_groups() {
    let mut store: FakeStore = FakeStore::new().with_account("dave", Some("dave@example.com"));
    let inputs: Vec<AssignmentInput> = vec![
        csv_row("dave", Some("GroupA")),
        csv_row("eve@example.com", Some("GroupB")),
    ];
    let options: AssignmentOptions = AssignmentOptions::new(None, false);

    let outcome: AssignmentOutcome = assign(&mut store, &inputs, &options).unwrap();

    assert_eq!(
        statuses(&outcome),
        vec![AssignmentStatus::Assigned, AssignmentStatus::NotFound]
    );
    assert_eq!(outcome.rows[0].group.as_deref(), Some("GroupA"));
    assert_eq!(outcome.rows[1].group.as_deref(), Some("GroupB"));
    assert_eq!(store.members_of("GroupA"), vec!["dave"]);
    assert!(store.group("GroupB").is_some());
    assert!(store.members_of("GroupB").is_empty());
    assert_eq!(
        outcome
            .created_groups
            .iter()
            .map(|g| g.as_str())
            .collect::<Vec<&str>>(),
        vec!["GroupA", "GroupB"]
    );
}

#[test]
fn test_row_group_overrides_default() {
    let mut store: FakeStore = FakeStore::new().with_account("dave", None);
    let inputs: Vec<AssignmentInput> =
        vec![csv_row("dave", Some("Override")), csv_row("dave", None)];
    let options: AssignmentOptions = AssignmentOptions::new(Some(group("Default")), false);

    let outcome: AssignmentOutcome = assign(&mut store, &inputs, &options).unwrap();

    assert_eq!(outcome.rows[0].group.as_deref(), Some("Override"));
    assert_eq!(outcome.rows[1].group.as_deref(), Some("Default"));
    assert_eq!(outcome.assigned, 2);
}

#[test]
fn test_groups_are_created_once_per_run() {
    let mut store: FakeStore = FakeStore::new()
        .with_account("a", None)
        .with_account("b", None);
    let inputs: Vec<AssignmentInput> = vec![csv_row("a", Some("Shared")), csv_row("b", Some("Shared"))];
    let options: AssignmentOptions = AssignmentOptions::new(None, false);

    let outcome: AssignmentOutcome = assign(&mut store, &inputs, &options).unwrap();

    assert_eq!(store.group_creations, 1);
    assert_eq!(outcome.created_groups.len(), 1);
    assert_eq!(store.members_of("Shared"), vec!["a", "b"]);
}

#[test]
fn test_no_group_is_skipped() {
    let mut store: FakeStore = FakeStore::new().with_account("dave", None);
    let inputs: Vec<AssignmentInput> = vec![csv_row("dave", None), csv_row("dave", Some("  "))];
    let options: AssignmentOptions = AssignmentOptions::new(None, false);

    let outcome: AssignmentOutcome = assign(&mut store, &inputs, &options).unwrap();

    assert_eq!(
        statuses(&outcome),
        vec![AssignmentStatus::Skipped, AssignmentStatus::Skipped]
    );
    assert!(outcome.rows.iter().all(|r| r.reason.as_deref() == Some("no_group")));
    assert!(outcome.rows.iter().all(|r| r.group.is_none()));
    assert_eq!(store.lookups(), 0);
}

#[test]
fn test_owner_without_email_is_never_looked_up() {
    let mut store: FakeStore = FakeStore::new()
        .with_account("ayse", Some("ayse@example.com"))
        .with_group("Malikler");
    let inputs: Vec<AssignmentInput> = vec![
        owner(1, "Mehmet", "Yılmaz", None),
        owner(2, "Zeynep", "Kaya", Some("   ")),
    ];
    let options: AssignmentOptions = AssignmentOptions::new(Some(group("Malikler")), false);

    let outcome: AssignmentOutcome = assign(&mut store, &inputs, &options).unwrap();

    assert_eq!(
        statuses(&outcome),
        vec![AssignmentStatus::NoEmail, AssignmentStatus::NoEmail]
    );
    assert_eq!(outcome.rows[0].ident, "Mehmet Yılmaz");
    assert_eq!(outcome.rows[0].reason.as_deref(), Some("no_email"));
    assert_eq!(outcome.rows[0].group.as_deref(), Some("Malikler"));
    assert_eq!(store.lookups(), 0);
    assert_eq!(store.add_member_calls, 0);
}

#[test]
fn test_owner_matched_by_email() {
    let mut store: FakeStore = FakeStore::new()
        .with_account("ayse", Some("ayse@example.com"))
        .with_group("Malikler");
    let inputs: Vec<AssignmentInput> = vec![owner(7, "Ayşe", "Demir", Some(" Ayse@Example.com "))];
    let options: AssignmentOptions = AssignmentOptions::new(Some(group("Malikler")), false);

    let outcome: AssignmentOutcome = assign(&mut store, &inputs, &options).unwrap();

    assert_eq!(outcome.rows[0].ident, "Ayse@Example.com");
    assert_eq!(outcome.rows[0].user.as_deref(), Some("ayse"));
    assert_eq!(outcome.assigned, 1);
    assert_eq!(store.members_of("Malikler"), vec!["ayse"]);
}

#[test]
fn test_every_input_produces_one_row_in_order() {
    let mut store: FakeStore = FakeStore::new()
        .with_account("alice", None)
        .with_group("G");
    let inputs: Vec<AssignmentInput> = vec![
        owner(1, "No", "Mail", None),
        AssignmentInput::Identifier(String::from("alice")),
        csv_row("", Some("G")),
        csv_row("ghost", None),
        AssignmentInput::Identifier(String::from("nobody")),
    ];
    let options: AssignmentOptions = AssignmentOptions::new(Some(group("G")), false);

    let outcome: AssignmentOutcome = assign(&mut store, &inputs, &options).unwrap();

    assert_eq!(outcome.rows.len(), inputs.len());
    assert_eq!(
        statuses(&outcome),
        vec![
            AssignmentStatus::NoEmail,
            AssignmentStatus::Assigned,
            AssignmentStatus::NotFound,
            AssignmentStatus::NotFound,
            AssignmentStatus::NotFound,
        ]
    );
    assert_eq!(outcome.assigned, outcome.count(AssignmentStatus::Assigned));
    assert_eq!(outcome.failures().count(), 4);
}

#[test]
fn test_store_failure_aborts_run() {
    let mut store: FakeStore = FakeStore::new().with_account("alice", None);
    store.fail_lookups = true;
    let inputs: Vec<AssignmentInput> = identifiers(&["alice"]);
    let options: AssignmentOptions = AssignmentOptions::new(Some(group("G")), false);

    let result: Result<AssignmentOutcome, CoreError> = assign(&mut store, &inputs, &options);

    assert!(matches!(result, Err(CoreError::Store(msg)) if msg.contains("database is locked")));
}
