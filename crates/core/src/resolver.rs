// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use tracing::debug;

use crate::store::{AccountHandle, IdentityStore};

/// Resolves a free-text identifier to an account.
///
/// The identifier is trimmed and tried as a username first, then as an
/// email (case-insensitive). An empty identifier never reaches the store.
///
/// # Returns
///
/// * `Ok(Some(account))` on the first match
/// * `Ok(None)` when neither lookup matches
///
/// # Errors
///
/// Returns the store's error if a lookup fails.
pub fn resolve_identifier<S: IdentityStore>(
    store: &mut S,
    identifier: &str,
) -> Result<Option<AccountHandle>, S::Error> {
    let identifier: &str = identifier.trim();
    if identifier.is_empty() {
        return Ok(None);
    }

    if let Some(account) = store.find_by_username(identifier)? {
        debug!(identifier, account_id = account.account_id, "Matched by username");
        return Ok(Some(account));
    }

    let by_email: Option<AccountHandle> = store.find_by_email(identifier)?;
    match &by_email {
        Some(account) => {
            debug!(identifier, account_id = account.account_id, "Matched by email");
        }
        None => debug!(identifier, "No account matched"),
    }
    Ok(by_email)
}
