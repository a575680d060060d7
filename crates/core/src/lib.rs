// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Identity resolution and bulk group assignment.
//!
//! This crate holds the assignment logic only. It performs no I/O of its
//! own: all account and group access goes through [`IdentityStore`].

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod assign;
mod error;
mod resolver;
mod store;

#[cfg(test)]
mod tests;

pub use assign::{AssignmentOptions, AssignmentOutcome, assign};
pub use error::CoreError;
pub use resolver::resolve_identifier;
pub use store::{AccountHandle, GroupHandle, IdentityStore};
