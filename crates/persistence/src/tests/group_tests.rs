// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use kentsel_domain::{Permission, PermissionAction};

use crate::tests::create_test_user;
use crate::{GroupData, Persistence};

#[test]
fn test_get_or_create_group_creates_once() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let (first, created_first): (GroupData, bool) =
        persistence.get_or_create_group("Malikler").unwrap();
    let (second, created_second): (GroupData, bool) =
        persistence.get_or_create_group("Malikler").unwrap();

    assert!(created_first);
    assert!(!created_second);
    assert_eq!(first, second);
    assert_eq!(persistence.list_groups().unwrap().len(), 1);
}

#[test]
fn test_group_names_are_case_sensitive() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    persistence.get_or_create_group("Malikler").unwrap();

    assert!(persistence.get_group_by_name("malikler").unwrap().is_none());
    assert!(persistence.get_group_by_name("Malikler").unwrap().is_some());
}

#[test]
fn test_add_group_member_is_idempotent() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let user_id: i64 = create_test_user(&mut persistence, "alice", None);
    let (group, _): (GroupData, bool) = persistence.get_or_create_group("TestGroup").unwrap();

    assert!(persistence.add_group_member(group.group_id, user_id).unwrap());
    assert!(!persistence.add_group_member(group.group_id, user_id).unwrap());

    assert_eq!(
        persistence.list_group_members(group.group_id).unwrap(),
        vec![String::from("alice")]
    );
}

#[test]
fn test_list_groups_is_ordered_by_name() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    persistence.get_or_create_group("Zeta").unwrap();
    persistence.get_or_create_group("Alpha").unwrap();

    let names: Vec<String> = persistence
        .list_groups()
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();

    assert_eq!(names, vec!["Alpha", "Zeta"]);
}

#[test]
fn test_group_permission_grants_are_idempotent() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let (group, _): (GroupData, bool) = persistence.get_or_create_group("MUHASEBE").unwrap();
    let permission: Permission = Permission::new("proje", "project", PermissionAction::View);

    let permission_id: i64 = persistence.ensure_permission(&permission).unwrap();
    assert_eq!(persistence.ensure_permission(&permission).unwrap(), permission_id);

    assert!(
        persistence
            .grant_group_permission(group.group_id, permission_id)
            .unwrap()
    );
    assert!(
        !persistence
            .grant_group_permission(group.group_id, permission_id)
            .unwrap()
    );
    assert_eq!(
        persistence.list_group_permissions(group.group_id).unwrap(),
        vec![permission]
    );
}
