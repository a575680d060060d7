// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// The name of an identity-store group.
///
/// Group names are compared exactly (case-sensitive) because the identity
/// store treats them as unique keys. Surrounding whitespace is trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupName(String);

impl GroupName {
    /// Creates a group name from user input.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty after trimming.
    pub fn new(name: &str) -> Result<Self, DomainError> {
        let trimmed: &str = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidGroupName(String::from(
                "group name cannot be empty",
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Parses an optional, possibly blank, group value.
    ///
    /// Blank values are treated as "not specified" rather than as an error.
    #[must_use]
    pub fn parse_optional(value: Option<&str>) -> Option<Self> {
        value.and_then(|v| Self::new(v).ok())
    }

    /// Returns the group name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GroupName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Folds an email address for case-insensitive comparison.
///
/// Lowercases with Unicode rules, then treats dotted and dotless `i` as the
/// same letter so `İ`, `I`, `ı` and `i` all fold to `i`.
#[must_use]
pub fn fold_email(email: &str) -> String {
    email
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| *c != '\u{307}')
        .map(|c| if c == 'ı' { 'i' } else { c })
        .collect()
}

/// A property owner associated with a project.
///
/// Owners are domain records, not identity-store accounts. The only link
/// between the two is the owner's email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// The owner's database identifier.
    pub owner_id: i64,
    /// The owning project.
    pub project_id: i64,
    /// First name (`Ad`).
    pub first_name: String,
    /// Last name (`Soyad`).
    pub last_name: String,
    /// Email address (`E-Posta`), possibly blank.
    pub email: Option<String>,
}

impl Owner {
    /// Creates a new owner record.
    #[must_use]
    pub const fn new(
        owner_id: i64,
        project_id: i64,
        first_name: String,
        last_name: String,
        email: Option<String>,
    ) -> Self {
        Self {
            owner_id,
            project_id,
            first_name,
            last_name,
            email,
        }
    }

    /// Returns `"<first> <last>"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Returns the trimmed email, or `None` if it is missing or blank.
    #[must_use]
    pub fn usable_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

/// One input to a bulk group assignment run.
///
/// Inputs are constructed per invocation and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentInput {
    /// An owner record, matched to an account by email.
    Owner(Owner),
    /// A raw username or email.
    Identifier(String),
    /// A CSV row with an identifier and an optional per-row group.
    CsvRow {
        /// Username or email.
        identifier: String,
        /// Per-row group override.
        group: Option<GroupName>,
    },
}

impl AssignmentInput {
    /// Returns the text that identifies this input in the report.
    ///
    /// Owners without an email are identified by their display name so the
    /// report row still names who was skipped.
    #[must_use]
    pub fn report_ident(&self) -> String {
        match self {
            Self::Owner(owner) => owner
                .usable_email()
                .map_or_else(|| owner.display_name(), str::to_string),
            Self::Identifier(identifier) | Self::CsvRow { identifier, .. } => {
                identifier.trim().to_string()
            }
        }
    }

    /// Returns the per-row group override, if any.
    #[must_use]
    pub const fn group_override(&self) -> Option<&GroupName> {
        match self {
            Self::CsvRow { group, .. } => group.as_ref(),
            Self::Owner(_) | Self::Identifier(_) => None,
        }
    }
}
