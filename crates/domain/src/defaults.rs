// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Default groups, departments and titles seeded by `bootstrap-defaults`.

use crate::permissions::{PermissionAction, PermissionRule};

/// Groups created on a fresh installation.
pub const DEFAULT_GROUPS: &[&str] = &[
    "KENTSEL DÖNÜŞÜM UZMANI",
    "PROJE YÖNETİCİSİ",
    "ADMİN",
    "MUHASEBE",
    "İNSAN KAYNAKLARI",
    "SATINALMA",
    "HUKUK",
    "BİLGİ İŞLEM",
    "SEKRETERYA",
    "HİZMETLİ",
    "ŞÖFÖR",
    "YÜKLENİCİ FİRMA",
    "İŞ GÜVENLİĞİ UZMANI",
    "SAĞLIK PERSONELİ",
    "TAŞERON FİRMA",
    "YÖNETİCİ",
];

/// Project-level groups with their own permission profile.
pub const PROJECT_MANAGER_GROUP: &str = "Proje Yöneticisi";
/// Redevelopment specialists: may add and change, never delete.
pub const SPECIALIST_GROUP: &str = "Kentsel Dönüşüm Uzmanı";

/// Departments mirror the default groups.
#[must_use]
pub fn default_departments() -> Vec<&'static str> {
    DEFAULT_GROUPS.to_vec()
}

/// Job titles created on a fresh installation.
pub const DEFAULT_TITLES: &[&str] = &[
    "Uzman",
    "Proje Yöneticisi",
    "Muhasebe Uzmanı",
    "İK Uzmanı",
    "Satınalma Uzmanı",
    "Hukuk Danışmanı",
];

/// Permission rules applied to groups by `bootstrap-defaults`.
#[must_use]
pub fn default_group_rules() -> Vec<(&'static str, PermissionRule)> {
    vec![
        ("YÖNETİCİ", PermissionRule::All),
        (
            PROJECT_MANAGER_GROUP,
            PermissionRule::AppAll(String::from("proje")),
        ),
        (
            SPECIALIST_GROUP,
            PermissionRule::AppActions(
                String::from("proje"),
                vec![PermissionAction::Add, PermissionAction::Change],
            ),
        ),
        ("İNSAN KAYNAKLARI", PermissionRule::UserManage),
        ("MUHASEBE", PermissionRule::ViewOnly(String::from("proje"))),
    ]
}
