// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

//! Marketplace services.
//!
//! Services take the storage adapter and the calling [`Principal`] as
//! explicit arguments. Each mutating operation runs inside one
//! [`Store::with_transaction`] call, so its writes commit together or not
//! at all.

mod admin_service;
mod authorization;
mod booking_service;
mod catalog_service;
mod clock;
mod config;
mod error;
mod metrics;
mod order_service;
mod principal;
mod repository;
mod slot_service;
mod user_service;

#[cfg(test)]
mod tests;

pub use admin_service::AdminService;
pub use authorization::{require_admin, require_client, require_model, require_service_owner};
pub use booking_service::BookingService;
pub use catalog_service::{CatalogService, ServiceChanges};
pub use clock::{Clock, SystemClock};
pub use config::{BOOKING_TTL_ENV, BookingConfig, ConfigError, MAX_BOOKING_TTL_SECONDS};
pub use error::{ErrorKind, RepositoryError, ServiceError};
pub use metrics::{NoopMetrics, OrderMetrics};
pub use order_service::OrderService;
pub use principal::Principal;
pub use repository::{
    AdminRepository, BookingRepository, ModelServiceRepository, OrderRepository, SlotRepository,
    Store, UserRepository,
};
pub use slot_service::SlotService;
pub use user_service::UserService;
