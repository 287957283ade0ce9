// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::Arc;

use slot_market::{BookingConfig, Clock, NoopMetrics, Principal};
use slot_market_domain::Address;
use slot_market_persistence::SqlitePersistence;
use time::OffsetDateTime;
use time::macros::{date, datetime};

use crate::{CreateProfileRequest, Services, create_profile, resolve_principal, verify_user};

pub const ADMIN_AUTH: i64 = 9001;
pub const CLIENT_AUTH: i64 = 1001;
pub const MODEL_AUTH: i64 = 2001;

pub const fn now() -> OffsetDateTime {
    datetime!(2026-03-01 09:00 UTC)
}

struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        now()
    }
}

pub fn create_test_services() -> Services {
    Services::new(
        BookingConfig::from_seconds(900).unwrap(),
        Arc::new(FixedClock),
        Arc::new(NoopMetrics),
    )
}

pub fn principal(auth_id: i64, role: &str) -> Principal {
    resolve_principal(Some(&auth_id.to_string()), Some(role)).unwrap()
}

pub fn admin() -> Principal {
    principal(ADMIN_AUTH, "ADMIN")
}

pub fn client() -> Principal {
    principal(CLIENT_AUTH, "CLIENT")
}

pub fn model() -> Principal {
    principal(MODEL_AUTH, "MODEL")
}

pub fn test_address() -> Address {
    Address {
        street: String::from("Harbour Road"),
        house: 12,
        apartment: None,
        entrance: None,
        floor: None,
        comment: None,
    }
}

/// Creates a persistence with a bootstrapped admin and a verified client and model.
pub fn setup_marketplace() -> (SqlitePersistence, Services) {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let services = create_test_services();
    services
        .admin
        .bootstrap_admin(&mut persistence, ADMIN_AUTH)
        .unwrap();

    for who in [client(), model()] {
        let profile = create_profile(
            &mut persistence,
            &services,
            &who,
            CreateProfileRequest {
                name: format!("{:?}", who.role()),
                birth_date: date!(1990 - 05 - 17),
            },
        )
        .unwrap();
        verify_user(&mut persistence, &services, &admin(), profile.user_id).unwrap();
    }

    (persistence, services)
}
