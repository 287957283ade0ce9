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

mod booking;
mod error;
mod model_service;
mod order;
mod pagination;
mod slot;
mod user;
mod validation;

#[cfg(test)]
mod tests;

pub use booking::{Address, Booking, BookingStatus, NewBooking};
pub use error::DomainError;
pub use model_service::{ModelService, NewModelService};
pub use order::{CANCELLATION_LEAD_TIME, NewOrder, Order, OrderStatus};
pub use pagination::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, Pagination};
pub use slot::{NewSlot, Slot, SlotStatus};
pub use user::{AGE_OF_MAJORITY, Admin, NewAdmin, NewUser, Permissions, Role, User};
pub use validation::{
    MAX_DESCRIPTION_LENGTH, validate_name, validate_service_fields, validate_slot_window,
};
