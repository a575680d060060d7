// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Permission catalogue and group permission rules.
//!
//! Permissions are `(app_label, codename)` pairs where the codename is
//! `<action>_<model>`. Rules describe which subset of the catalogue a
//! group receives.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// An action that a permission grants on a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    Add,
    Change,
    Delete,
    View,
}

impl PermissionAction {
    /// All actions, in codename order.
    pub const ALL: [Self; 4] = [Self::Add, Self::Change, Self::Delete, Self::View];

    /// Returns the codename prefix for this action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Change => "change",
            Self::Delete => "delete",
            Self::View => "view",
        }
    }
}

impl FromStr for PermissionAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "add" => Ok(Self::Add),
            "change" => Ok(Self::Change),
            "delete" => Ok(Self::Delete),
            "view" => Ok(Self::View),
            _ => Err(DomainError::InvalidPermissionAction(s.to_string())),
        }
    }
}

/// A single permission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Permission {
    /// The application the model belongs to.
    pub app_label: String,
    /// `<action>_<model>`.
    pub codename: String,
}

impl Permission {
    /// Builds the permission for `action` on `app_label.model`.
    #[must_use]
    pub fn new(app_label: &str, model: &str, action: PermissionAction) -> Self {
        Self {
            app_label: app_label.to_string(),
            codename: format!("{}_{model}", action.as_str()),
        }
    }

    fn has_action(&self, action: PermissionAction) -> bool {
        self.codename
            .strip_prefix(action.as_str())
            .is_some_and(|rest| rest.starts_with('_'))
    }
}

/// Models that carry permissions, grouped by application.
pub const PERMISSION_MODELS: &[(&str, &[&str])] = &[
    (
        "proje",
        &["project", "owner", "unit", "ownership", "agreement", "document"],
    ),
    ("accounts", &["profile", "department", "title"]),
    ("auth", &["user", "group"]),
];

/// Returns every permission known to the system.
#[must_use]
pub fn permission_catalogue() -> Vec<Permission> {
    PERMISSION_MODELS
        .iter()
        .flat_map(|(app, models)| {
            models.iter().flat_map(move |model| {
                PermissionAction::ALL
                    .iter()
                    .map(move |action| Permission::new(app, model, *action))
            })
        })
        .collect()
}

/// Which permissions a group receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionRule {
    /// Every permission in the catalogue.
    All,
    /// Every permission of one application.
    AppAll(String),
    /// Selected actions on every model of one application.
    AppActions(String, Vec<PermissionAction>),
    /// Account and group management (`auth` and `accounts`).
    UserManage,
    /// Read-only access to one application.
    ViewOnly(String),
}

impl PermissionRule {
    /// Expands the rule against a permission catalogue.
    ///
    /// The result preserves catalogue order and contains no duplicates.
    #[must_use]
    pub fn expand(&self, catalogue: &[Permission]) -> Vec<Permission> {
        catalogue
            .iter()
            .filter(|perm| self.grants(perm))
            .cloned()
            .collect()
    }

    fn grants(&self, perm: &Permission) -> bool {
        match self {
            Self::All => true,
            Self::AppAll(app) => perm.app_label == *app,
            Self::AppActions(app, actions) => {
                perm.app_label == *app && actions.iter().any(|a| perm.has_action(*a))
            }
            Self::UserManage => perm.app_label == "auth" || perm.app_label == "accounts",
            Self::ViewOnly(app) => {
                perm.app_label == *app && perm.has_action(PermissionAction::View)
            }
        }
    }

    /// Short human-readable description, used in command output.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::All => String::from("all"),
            Self::AppAll(app) => format!("{app}:all"),
            Self::AppActions(app, actions) => {
                let names: Vec<&str> = actions.iter().map(PermissionAction::as_str).collect();
                format!("{app}:{}", names.join("+"))
            }
            Self::UserManage => String::from("user-manage"),
            Self::ViewOnly(app) => format!("{app}:view"),
        }
    }
}
