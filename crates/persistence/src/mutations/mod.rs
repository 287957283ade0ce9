// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation modules for persistence layer.
//!
//! Every insert returns the stored record, built from its input plus the
//! row ID `SQLite` assigned. Every update fails with
//! `PersistenceError::NotFound` when no row matched.

pub mod accounts;
pub mod bookings;
pub mod catalog;

use crate::error::PersistenceError;

/// Maps an update that touched no rows to `NotFound`.
pub(crate) fn require_updated(
    table: &'static str,
    id: i64,
    affected: usize,
) -> Result<(), PersistenceError> {
    if affected == 0 {
        return Err(PersistenceError::NotFound(format!("{table} row {id}")));
    }
    Ok(())
}
