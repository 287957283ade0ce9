// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the slot marketplace.
//!
//! This crate sits between a transport (the HTTP server) and the services.
//! It owns the request/response DTOs, resolves the caller's [`Principal`]
//! from raw header values and translates service errors into a stable
//! error contract. It performs no business logic of its own.

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

mod auth;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use slot_market::{
    AdminService, BookingConfig, BookingService, CatalogService, Clock, OrderMetrics,
    OrderService, SlotService, UserService,
};

pub use auth::{AUTH_ID_HEADER, ROLE_HEADER, resolve_principal};
pub use error::{ApiError, translate_domain_error, translate_service_error};
pub use handlers::{
    admin_get_booking, admin_get_order, admin_list_bookings, admin_list_orders,
    admin_list_users, approve_booking, cancel_booking, cancel_order, complete_order,
    create_admin, create_booking, create_profile, create_service, create_slot,
    deactivate_service, deactivate_slot, get_admin, get_own_profile, get_service, get_user,
    list_model_slots, list_my_bookings, list_my_orders, list_own_services, list_own_slots,
    list_services, override_booking_status, override_order_status, reactivate_slot,
    reject_booking, update_admin_permissions, update_name, update_service, update_slot,
    verify_user,
};
pub use request_response::{
    AdminResponse, ApproveBookingResponse, BookingResponse, CreateAdminRequest,
    CreateBookingRequest, CreateProfileRequest, CreateServiceRequest, CreateSlotRequest,
    OrderResponse, OverrideBookingStatusRequest, OverrideOrderStatusRequest, PageQuery,
    ServiceResponse, SlotResponse, UpdateNameRequest, UpdatePermissionsRequest,
    UpdateServiceRequest, UpdateSlotRequest, UserResponse,
};

/// Clock shared by every service.
pub type SharedClock = Arc<dyn Clock>;

/// Metrics sink shared by the services that record events.
pub type SharedMetrics = Arc<dyn OrderMetrics>;

/// Every service the API dispatches to, wired with one clock.
pub struct Services {
    pub users: UserService<SharedClock>,
    pub admin: AdminService<SharedClock>,
    pub catalog: CatalogService<SharedClock>,
    pub slots: SlotService<SharedClock>,
    pub bookings: BookingService<SharedClock>,
    pub orders: OrderService<SharedClock, SharedMetrics>,
}

impl Services {
    /// Wires the services.
    ///
    /// # Arguments
    ///
    /// * `config` - Booking TTL configuration
    /// * `clock` - The time source for every time-dependent check
    /// * `metrics` - Receives completed-order events
    #[must_use]
    pub fn new(config: BookingConfig, clock: SharedClock, metrics: SharedMetrics) -> Self {
        Self {
            users: UserService::new(Arc::clone(&clock)),
            admin: AdminService::new(Arc::clone(&clock)),
            catalog: CatalogService::new(Arc::clone(&clock)),
            slots: SlotService::new(Arc::clone(&clock)),
            bookings: BookingService::new(config, Arc::clone(&clock)),
            orders: OrderService::new(clock, metrics),
        }
    }
}
