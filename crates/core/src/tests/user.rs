// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{Fixture, ManualClock, admin, base_time, client};
use crate::{Principal, ServiceError, UserService};
use slot_market_domain::{DomainError, Role};
use std::sync::Arc;
use time::macros::date;

fn users(fx: &Fixture) -> UserService<Arc<ManualClock>> {
    UserService::new(Arc::clone(&fx.clock))
}

#[test]
fn test_create_profile_starts_unverified() {
    let mut fx = Fixture::new();
    let newcomer = Principal::new(5005, Role::Model);

    let user = users(&fx)
        .create_profile(
            &mut fx.store,
            &newcomer,
            String::from("Dana"),
            date!(1995 - 01 - 02),
        )
        .unwrap();

    assert_eq!(user.auth_id, 5005);
    assert_eq!(user.role, Role::Model);
    assert!(!user.is_verified);
    assert_eq!(user.created_at, base_time());
}

#[test]
fn test_create_profile_twice_fails() {
    let mut fx = Fixture::new();

    let err = users(&fx)
        .create_profile(
            &mut fx.store,
            &client(),
            String::from("Again"),
            date!(1990 - 01 - 01),
        )
        .unwrap_err();

    assert_eq!(err, ServiceError::ProfileAlreadyExists);
}

#[test]
fn test_create_profile_rejects_blank_name_and_admins() {
    let mut fx = Fixture::new();
    let service = users(&fx);

    assert!(matches!(
        service.create_profile(
            &mut fx.store,
            &Principal::new(6006, Role::Client),
            String::from("   "),
            date!(1990 - 01 - 01),
        ),
        Err(ServiceError::Domain(DomainError::InvalidName(_)))
    ));
    assert!(matches!(
        service.create_profile(
            &mut fx.store,
            &admin(),
            String::from("Root"),
            date!(1980 - 01 - 01),
        ),
        Err(ServiceError::Domain(DomainError::InvalidRole(_)))
    ));
}

#[test]
fn test_profile_lookup_and_rename() {
    let mut fx = Fixture::new();
    let service = users(&fx);

    let own = service.get_own_profile(&mut fx.store, &client()).unwrap();
    assert_eq!(own.id, fx.client.id);

    let renamed = service
        .update_name(&mut fx.store, &client(), String::from("Renamed"))
        .unwrap();
    assert_eq!(renamed.name, "Renamed");
    assert_eq!(
        service.get_user(&mut fx.store, fx.client.id).unwrap().name,
        "Renamed"
    );

    assert_eq!(
        service.get_user(&mut fx.store, 8888).unwrap_err(),
        ServiceError::UserNotFound
    );
    assert_eq!(
        service
            .get_own_profile(&mut fx.store, &Principal::new(7007, Role::Client))
            .unwrap_err(),
        ServiceError::UserNotFound
    );
}
