// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Timestamps travel as RFC 3339 strings and calendar dates as
//! `YYYY-MM-DD`. Status and role values use their upper-case wire names.

use serde::{Deserialize, Serialize};
use slot_market_domain::{
    Address, Admin, Booking, BookingStatus, ModelService, Order, OrderStatus, Pagination,
    Permissions, Role, Slot, SlotStatus, User,
};
use time::{Date, OffsetDateTime};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Optional `page`/`limit` query parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    /// Normalizes the raw parameters into a [`Pagination`].
    #[must_use]
    pub fn pagination(self) -> Pagination {
        Pagination::new(self.page, self.limit)
    }
}

// ---------------------------------------------------------------------------
// Users and admins
// ---------------------------------------------------------------------------

/// API request to create the caller's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProfileRequest {
    pub name: String,
    #[serde(with = "iso_date")]
    pub birth_date: Date,
}

/// API request to rename the caller's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateNameRequest {
    pub name: String,
}

/// A user profile as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub user_id: i64,
    pub auth_id: i64,
    pub role: Role,
    pub name: String,
    #[serde(with = "iso_date")]
    pub birth_date: Date,
    pub is_verified: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            auth_id: user.auth_id,
            role: user.role,
            name: user.name,
            birth_date: user.birth_date,
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

/// API request to register another administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAdminRequest {
    pub auth_id: i64,
    #[serde(default)]
    pub permissions: Permissions,
}

/// API request to replace an administrator's permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePermissionsRequest {
    pub permissions: Permissions,
}

/// An administrator as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminResponse {
    pub admin_id: i64,
    pub auth_id: i64,
    pub permissions: Permissions,
}

impl From<Admin> for AdminResponse {
    fn from(admin: Admin) -> Self {
        Self {
            admin_id: admin.id,
            auth_id: admin.auth_id,
            permissions: admin.permissions,
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// API request to publish a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSlotRequest {
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
}

/// API request to move a slot. Omitted bounds are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSlotRequest {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_time: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
}

/// A slot as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotResponse {
    pub slot_id: i64,
    pub model_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub status: SlotStatus,
}

impl From<Slot> for SlotResponse {
    fn from(slot: Slot) -> Self {
        Self {
            slot_id: slot.id,
            model_id: slot.model_id,
            start_time: slot.start_time,
            end_time: slot.end_time,
            status: slot.status,
        }
    }
}

/// API request to publish a service offering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    pub title: String,
    pub description: String,
    pub price: f64,
}

/// API request to edit a service offering. Omitted fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateServiceRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

/// A service offering as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub service_id: i64,
    pub model_id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub is_active: bool,
}

impl From<ModelService> for ServiceResponse {
    fn from(service: ModelService) -> Self {
        Self {
            service_id: service.id,
            model_id: service.model_id,
            title: service.title,
            description: service.description,
            price: service.price,
            is_active: service.is_active,
        }
    }
}

// ---------------------------------------------------------------------------
// Bookings and orders
// ---------------------------------------------------------------------------

/// API request to book a slot for a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub service_id: i64,
    pub slot_id: i64,
    pub address: Address,
}

/// A booking as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingResponse {
    pub booking_id: i64,
    pub client_id: i64,
    pub service_id: i64,
    pub slot_id: i64,
    pub address: Address,
    pub status: BookingStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            booking_id: booking.id,
            client_id: booking.client_id,
            service_id: booking.service_id,
            slot_id: booking.slot_id,
            address: booking.address,
            status: booking.status,
            expires_at: booking.expires_at,
            created_at: booking.created_at,
        }
    }
}

/// An order as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order_id: i64,
    pub booking_id: i64,
    pub status: OrderStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.id,
            booking_id: order.booking_id,
            status: order.status,
            created_at: order.created_at,
        }
    }
}

/// API response for an approved booking and the order it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveBookingResponse {
    pub booking: BookingResponse,
    pub order: OrderResponse,
}

/// API request for an administrative booking status override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideBookingStatusRequest {
    pub status: BookingStatus,
}

/// API request for an administrative order status override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideOrderStatusRequest {
    pub status: OrderStatus,
}
