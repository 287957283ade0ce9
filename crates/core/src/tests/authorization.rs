// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    Fixture, admin, client, model, other_client, unverified_client, unverified_model,
};
use crate::{
    ErrorKind, Principal, ServiceError, require_admin, require_client, require_model,
    require_service_owner,
};
use slot_market_domain::Role;

#[test]
fn test_role_is_checked_before_lookup() {
    let mut fx = Fixture::new();

    assert_eq!(
        require_client(&mut fx.store, &model()).unwrap_err(),
        ServiceError::NotAClient
    );
    assert_eq!(
        require_model(&mut fx.store, &client()).unwrap_err(),
        ServiceError::NotAModel
    );
    assert_eq!(
        require_admin(&mut fx.store, &client()).unwrap_err(),
        ServiceError::NotAnAdmin
    );
}

#[test]
fn test_missing_profile_is_indistinguishable_from_wrong_role() {
    let mut fx = Fixture::new();

    assert_eq!(
        require_client(&mut fx.store, &Principal::new(123_456, Role::Client)).unwrap_err(),
        ServiceError::NotAClient
    );
    assert_eq!(
        require_model(&mut fx.store, &Principal::new(123_456, Role::Model)).unwrap_err(),
        ServiceError::NotAModel
    );
}

#[test]
fn test_profile_role_must_match_principal_role() {
    let mut fx = Fixture::new();
    let impostor = Principal::new(fx.model.auth_id, Role::Client);

    assert_eq!(
        require_client(&mut fx.store, &impostor).unwrap_err(),
        ServiceError::NotAClient
    );
}

#[test]
fn test_unverified_users_are_refused() {
    let mut fx = Fixture::new();

    let err = require_client(&mut fx.store, &unverified_client()).unwrap_err();
    assert_eq!(err, ServiceError::ClientNotVerified);
    assert_eq!(err.kind(), ErrorKind::Authorization);
    assert_eq!(
        require_model(&mut fx.store, &unverified_model()).unwrap_err(),
        ServiceError::ModelNotVerified
    );
}

#[test]
fn test_verified_callers_resolve_to_their_records() {
    let mut fx = Fixture::new();

    assert_eq!(require_client(&mut fx.store, &client()).unwrap(), fx.client);
    assert_eq!(
        require_client(&mut fx.store, &other_client()).unwrap(),
        fx.other_client
    );
    assert_eq!(require_model(&mut fx.store, &model()).unwrap(), fx.model);
    assert_eq!(
        require_admin(&mut fx.store, &admin()).unwrap().auth_id,
        admin().auth_id()
    );
}

#[test]
fn test_service_ownership() {
    let mut fx = Fixture::new();

    assert_eq!(
        require_service_owner(&mut fx.store, fx.model.id, fx.service.id).unwrap(),
        fx.service
    );
    assert_eq!(
        require_service_owner(&mut fx.store, fx.other_model.id, fx.service.id).unwrap_err(),
        ServiceError::NotServiceOwner
    );
    assert_eq!(
        require_service_owner(&mut fx.store, fx.model.id, 424_242).unwrap_err(),
        ServiceError::ServiceNotFound
    );
}
