// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use slot_market::{BookingRepository, RepositoryError, UserRepository};
use slot_market_domain::{NewBooking, Pagination, Role};
use time::Duration;

use super::{CLIENT_AUTH, now, seed_user, test_address};
use crate::{Persistence, PersistenceError};

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1 = Persistence::new_in_memory().unwrap();
    let mut db2 = Persistence::new_in_memory().unwrap();

    seed_user(&mut db1, CLIENT_AUTH, Role::Client);

    assert_eq!(db1.list_users(Pagination::default()).unwrap().len(), 1);
    assert!(db2.list_users(Pagination::default()).unwrap().is_empty());
}

#[test]
fn test_foreign_key_enforcement_is_active() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    persistence.verify_foreign_key_enforcement().unwrap();

    let client = seed_user(&mut persistence, CLIENT_AUTH, Role::Client);
    let orphan = NewBooking::pending(
        client.id,
        404,
        405,
        test_address(),
        now(),
        Duration::minutes(15),
    )
    .unwrap();

    let err = persistence.create_booking(&orphan).unwrap_err();
    assert!(matches!(err, RepositoryError::Backend(_)), "{err:?}");
}

#[test]
fn test_file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("market.db");

    {
        let mut persistence = Persistence::new_with_file(&path).unwrap();
        seed_user(&mut persistence, CLIENT_AUTH, Role::Client);
    }

    let mut reopened = Persistence::new_with_file(&path).unwrap();
    let user = reopened.get_user_by_auth_id(CLIENT_AUTH).unwrap();
    assert_eq!(user.role, Role::Client);
    assert!(user.is_verified);
}
