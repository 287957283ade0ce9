// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the slot marketplace.
//!
//! This crate implements the repository traits and the transaction
//! contract of `slot-market` on top of Diesel and `SQLite`.
//!
//! ## Storage Layout
//!
//! - Timestamps are UTC unix milliseconds (`BIGINT`)
//! - Birth dates are `YYYY-MM-DD` text
//! - Flags are `0`/`1` integers
//! - Admin permissions are a JSON object
//!
//! ## Transactions
//!
//! [`Persistence`] tracks whether a transaction is open. The outermost
//! `with_transaction` call issues `BEGIN IMMEDIATE`, so the write lock is
//! taken before any read of the unit of work; nested calls join it.
//! Competing writers on other connections wait up to the busy timeout.
//!
//! ## Testing Philosophy
//!
//! - Unit and integration tests run against unique in-memory databases
//! - Concurrency tests use a temporary file shared by two connections

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
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use diesel::connection::{AnsiTransactionManager, TransactionManager};
use slot_market::{RepositoryError, Store};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error};

mod backend;
mod convert;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod repositories;

#[cfg(test)]
mod tests;

pub use backend::sqlite::BUSY_TIMEOUT_MS;
pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Type alias kept for callers that name the backend explicitly.
pub type SqlitePersistence = Persistence;

/// `SQLite` storage adapter implementing every repository and [`Store`].
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
    in_transaction: bool,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared in-memory database, so tests
    /// never see each other's rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            in_transaction: false,
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// Several adapters may open the same file; their transactions are
    /// serialized by `SQLite`'s write lock.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            in_transaction: false,
        })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    /// Returns true while a `with_transaction` call is running.
    #[must_use]
    pub const fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    fn rollback(&mut self) {
        if let Err(e) =
            <AnsiTransactionManager as TransactionManager<SqliteConnection>>::rollback_transaction(
                &mut self.conn,
            )
        {
            error!(error = %e, "Failed to roll back transaction");
        }
    }
}

/// An open `BEGIN IMMEDIATE` transaction.
///
/// Dropping the guard without calling [`TransactionGuard::commit`] rolls the
/// transaction back, including when the unit of work unwinds.
struct TransactionGuard<'a> {
    persistence: &'a mut Persistence,
    open: bool,
}

impl<'a> TransactionGuard<'a> {
    fn begin(persistence: &'a mut Persistence) -> Result<Self, PersistenceError> {
        AnsiTransactionManager::begin_transaction_sql(&mut persistence.conn, "BEGIN IMMEDIATE")?;
        persistence.in_transaction = true;
        debug!("Transaction started");
        Ok(Self {
            persistence,
            open: true,
        })
    }

    fn commit(mut self) -> Result<(), PersistenceError> {
        self.open = false;
        self.persistence.in_transaction = false;

        if let Err(e) =
            <AnsiTransactionManager as TransactionManager<SqliteConnection>>::commit_transaction(
                &mut self.persistence.conn,
            )
        {
            error!(error = %e, "Failed to commit transaction");
            self.persistence.rollback();
            return Err(PersistenceError::from(e));
        }
        debug!("Transaction committed");
        Ok(())
    }
}

impl Drop for TransactionGuard<'_> {
    fn drop(&mut self) {
        if self.open {
            self.persistence.in_transaction = false;
            self.persistence.rollback();
            debug!("Transaction rolled back");
        }
    }
}

impl Store for Persistence {
    fn with_transaction<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        if self.in_transaction {
            return work(self);
        }

        let mut guard =
            TransactionGuard::begin(self).map_err(|e| E::from(RepositoryError::from(e)))?;
        let value = work(&mut *guard.persistence)?;
        guard
            .commit()
            .map_err(|e| E::from(RepositoryError::from(e)))?;
        Ok(value)
    }
}
