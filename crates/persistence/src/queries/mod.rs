// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! Single-row lookups return `Ok(None)` when nothing matches; only
//! database failures are errors.

pub mod accounts;
pub mod catalogue;
pub mod groups;
pub mod owners;
pub mod sessions;
