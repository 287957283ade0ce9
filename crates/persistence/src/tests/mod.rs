// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod initialization_tests;
mod repository_tests;

use slot_market::{
    BookingConfig, BookingService, Clock, ModelServiceRepository, NoopMetrics, OrderService,
    Principal, SlotRepository, UserRepository,
};
use slot_market_domain::{
    Address, ModelService, NewModelService, NewSlot, NewUser, Role, Slot, User,
};
use time::macros::{date, datetime};
use time::{Duration, OffsetDateTime};

use crate::Persistence;

pub const CLIENT_AUTH: i64 = 1001;
pub const OTHER_CLIENT_AUTH: i64 = 1002;
pub const MODEL_AUTH: i64 = 2001;

pub const fn now() -> OffsetDateTime {
    datetime!(2026-03-01 09:00 UTC)
}

/// A clock frozen at [`now`].
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

pub fn booking_service() -> BookingService<FixedClock> {
    BookingService::new(BookingConfig::from_seconds(900).unwrap(), FixedClock(now()))
}

pub fn order_service() -> OrderService<FixedClock, NoopMetrics> {
    OrderService::new(FixedClock(now()), NoopMetrics)
}

pub fn test_address() -> Address {
    Address {
        street: String::from("Harbour Road"),
        house: 12,
        apartment: Some(4),
        entrance: None,
        floor: Some(2),
        comment: Some(String::from("Ring twice")),
    }
}

pub fn seed_user(persistence: &mut Persistence, auth_id: i64, role: Role) -> User {
    let mut user = persistence
        .create_user(&NewUser {
            auth_id,
            role,
            name: format!("user-{auth_id}"),
            birth_date: date!(1990 - 05 - 17),
            created_at: now(),
        })
        .unwrap();
    user.is_verified = true;
    persistence.update_user(&user).unwrap();
    user
}

pub fn seed_service(persistence: &mut Persistence, model_id: i64) -> ModelService {
    persistence
        .create_service(
            &NewModelService::active(
                model_id,
                String::from("Portrait session"),
                String::from("Two hours in studio"),
                150.0,
                now(),
            )
            .unwrap(),
        )
        .unwrap()
}

pub fn seed_slot(persistence: &mut Persistence, model_id: i64, starts_in: Duration) -> Slot {
    let start = now() + starts_in;
    persistence
        .create_slot(&NewSlot::available(model_id, start, start + Duration::hours(2), now()).unwrap())
        .unwrap()
}

/// A verified client, a verified model with one service and one slot three days out.
pub struct Marketplace {
    pub client: User,
    pub other_client: User,
    pub model: User,
    pub service: ModelService,
    pub slot: Slot,
}

pub fn seed_marketplace(persistence: &mut Persistence) -> Marketplace {
    let client = seed_user(persistence, CLIENT_AUTH, Role::Client);
    let other_client = seed_user(persistence, OTHER_CLIENT_AUTH, Role::Client);
    let model = seed_user(persistence, MODEL_AUTH, Role::Model);
    let service = seed_service(persistence, model.id);
    let slot = seed_slot(persistence, model.id, Duration::days(3));
    Marketplace {
        client,
        other_client,
        model,
        service,
        slot,
    }
}

pub const fn client() -> Principal {
    Principal::new(CLIENT_AUTH, Role::Client)
}

pub const fn other_client() -> Principal {
    Principal::new(OTHER_CLIENT_AUTH, Role::Client)
}

pub const fn model() -> Principal {
    Principal::new(MODEL_AUTH, Role::Model)
}
