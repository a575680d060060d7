// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that abort an assignment run.
///
/// Per-row outcomes (no match, no email, no group) are never errors; they
/// are recorded as report rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The identity store failed.
    Store(String),
}

impl CoreError {
    /// Wraps an identity store error.
    pub fn store<E: std::error::Error>(err: &E) -> Self {
        Self::Store(err.to_string())
    }
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(msg) => write!(f, "Identity store error: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}
