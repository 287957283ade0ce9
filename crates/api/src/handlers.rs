// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handlers.
//!
//! Each handler takes an already-resolved [`Principal`], calls exactly one
//! service operation and converts the result into response DTOs. Service
//! errors are translated into the stable [`ApiError`] contract.

use slot_market::{Principal, ServiceChanges};
use slot_market_domain::Role;
use slot_market_persistence::SqlitePersistence;
use tracing::info;

use crate::Services;
use crate::error::{ApiError, translate_service_error};
use crate::request_response::{
    AdminResponse, ApproveBookingResponse, BookingResponse, CreateAdminRequest,
    CreateBookingRequest, CreateProfileRequest, CreateServiceRequest, CreateSlotRequest,
    OrderResponse, OverrideBookingStatusRequest, OverrideOrderStatusRequest, PageQuery,
    ServiceResponse, SlotResponse, UpdateNameRequest, UpdatePermissionsRequest,
    UpdateServiceRequest, UpdateSlotRequest, UserResponse,
};

fn collect<T, R: From<T>>(items: Vec<T>) -> Vec<R> {
    items.into_iter().map(R::from).collect()
}

// ============================================================================
// Profiles
// ============================================================================

/// Creates the caller's profile.
///
/// # Errors
///
/// Returns an error if the name is empty, the caller is an admin or a
/// profile already exists.
pub fn create_profile(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    request: CreateProfileRequest,
) -> Result<UserResponse, ApiError> {
    let user = services
        .users
        .create_profile(persistence, principal, request.name, request.birth_date)
        .map_err(translate_service_error)?;
    info!(user_id = user.id, "Profile created via API");
    Ok(user.into())
}

/// Returns the caller's profile.
///
/// # Errors
///
/// Returns an error if the caller has no profile.
pub fn get_own_profile(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
) -> Result<UserResponse, ApiError> {
    services
        .users
        .get_own_profile(persistence, principal)
        .map(UserResponse::from)
        .map_err(translate_service_error)
}

/// Renames the caller's profile.
///
/// # Errors
///
/// Returns an error if the name is empty or the caller has no profile.
pub fn update_name(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    request: UpdateNameRequest,
) -> Result<UserResponse, ApiError> {
    services
        .users
        .update_name(persistence, principal, request.name)
        .map(UserResponse::from)
        .map_err(translate_service_error)
}

/// Returns any user's profile.
///
/// # Errors
///
/// Returns `USER_NOT_FOUND` if the user does not exist.
pub fn get_user(
    persistence: &mut SqlitePersistence,
    services: &Services,
    user_id: i64,
) -> Result<UserResponse, ApiError> {
    services
        .users
        .get_user(persistence, user_id)
        .map(UserResponse::from)
        .map_err(translate_service_error)
}

// ============================================================================
// Slots
// ============================================================================

/// Publishes a slot for the calling model.
///
/// # Errors
///
/// Returns an error if the window is empty, the caller is not a verified
/// model or the window overlaps another slot.
pub fn create_slot(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    request: CreateSlotRequest,
) -> Result<SlotResponse, ApiError> {
    services
        .slots
        .create_slot(persistence, principal, request.start_time, request.end_time)
        .map(SlotResponse::from)
        .map_err(translate_service_error)
}

/// Moves one of the caller's available slots.
///
/// # Errors
///
/// Returns an error if the caller does not own the slot, it is not
/// available or the new window is invalid.
pub fn update_slot(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    slot_id: i64,
    request: UpdateSlotRequest,
) -> Result<SlotResponse, ApiError> {
    services
        .slots
        .update_slot(
            persistence,
            principal,
            slot_id,
            request.start_time,
            request.end_time,
        )
        .map(SlotResponse::from)
        .map_err(translate_service_error)
}

/// Withdraws one of the caller's available slots.
///
/// # Errors
///
/// Returns an error if the caller does not own the slot or it is not available.
pub fn deactivate_slot(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    slot_id: i64,
) -> Result<SlotResponse, ApiError> {
    services
        .slots
        .deactivate_slot(persistence, principal, slot_id)
        .map(SlotResponse::from)
        .map_err(translate_service_error)
}

/// Reopens one of the caller's disabled slots.
///
/// # Errors
///
/// Returns an error if the caller does not own the slot, it is not disabled
/// or it now overlaps another slot.
pub fn reactivate_slot(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    slot_id: i64,
) -> Result<SlotResponse, ApiError> {
    services
        .slots
        .reactivate_slot(persistence, principal, slot_id)
        .map(SlotResponse::from)
        .map_err(translate_service_error)
}

/// Lists every slot of the calling model.
///
/// # Errors
///
/// Returns an error if the caller is not a verified model.
pub fn list_own_slots(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
) -> Result<Vec<SlotResponse>, ApiError> {
    services
        .slots
        .list_own_slots(persistence, principal)
        .map(collect)
        .map_err(translate_service_error)
}

/// Lists the bookable slots of a model for a client.
///
/// # Errors
///
/// Returns an error if the caller is not a verified client or the target is
/// not a verified model.
pub fn list_model_slots(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    model_id: i64,
) -> Result<Vec<SlotResponse>, ApiError> {
    services
        .slots
        .list_model_slots(persistence, principal, model_id)
        .map(collect)
        .map_err(translate_service_error)
}

// ============================================================================
// Services
// ============================================================================

/// Publishes a service offering for the calling model.
///
/// # Errors
///
/// Returns an error if the price or description is invalid or the caller
/// is not a verified model.
pub fn create_service(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    request: CreateServiceRequest,
) -> Result<ServiceResponse, ApiError> {
    services
        .catalog
        .create_service(
            persistence,
            principal,
            request.title,
            request.description,
            request.price,
        )
        .map(ServiceResponse::from)
        .map_err(translate_service_error)
}

/// Returns an active service offering.
///
/// # Errors
///
/// Returns `SERVICE_NOT_FOUND` if the service does not exist or is inactive.
pub fn get_service(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    service_id: i64,
) -> Result<ServiceResponse, ApiError> {
    services
        .catalog
        .get_service(persistence, principal, service_id)
        .map(ServiceResponse::from)
        .map_err(translate_service_error)
}

/// Lists active service offerings.
///
/// # Errors
///
/// Returns an error if the caller is not a verified client.
pub fn list_services(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    query: PageQuery,
) -> Result<Vec<ServiceResponse>, ApiError> {
    services
        .catalog
        .list_services(persistence, principal, query.pagination())
        .map(collect)
        .map_err(translate_service_error)
}

/// Lists the calling model's offerings, inactive ones included.
///
/// # Errors
///
/// Returns an error if the caller is not a verified model.
pub fn list_own_services(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    query: PageQuery,
) -> Result<Vec<ServiceResponse>, ApiError> {
    services
        .catalog
        .list_own_services(persistence, principal, query.pagination())
        .map(collect)
        .map_err(translate_service_error)
}

/// Edits one of the caller's offerings.
///
/// The response is the replacement offering when the original already had
/// bookings.
///
/// # Errors
///
/// Returns an error if the merged values are invalid, the caller does not
/// own the service or it is inactive.
pub fn update_service(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    service_id: i64,
    request: UpdateServiceRequest,
) -> Result<ServiceResponse, ApiError> {
    let changes = ServiceChanges {
        title: request.title,
        description: request.description,
        price: request.price,
    };
    services
        .catalog
        .update_service(persistence, principal, service_id, changes)
        .map(ServiceResponse::from)
        .map_err(translate_service_error)
}

/// Withdraws one of the caller's offerings.
///
/// # Errors
///
/// Returns an error if the caller does not own the service or it is inactive.
pub fn deactivate_service(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    service_id: i64,
) -> Result<ServiceResponse, ApiError> {
    services
        .catalog
        .deactivate_service(persistence, principal, service_id)
        .map(ServiceResponse::from)
        .map_err(translate_service_error)
}

// ============================================================================
// Bookings
// ============================================================================

/// Books a slot for the calling client.
///
/// # Errors
///
/// Returns an error if the slot is not available or the service cannot be
/// booked on it.
pub fn create_booking(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    request: CreateBookingRequest,
) -> Result<BookingResponse, ApiError> {
    services
        .bookings
        .create_booking(
            persistence,
            principal,
            request.service_id,
            request.slot_id,
            request.address,
        )
        .map(BookingResponse::from)
        .map_err(translate_service_error)
}

/// Approves a pending booking and creates its order.
///
/// # Errors
///
/// Returns an error if the caller does not own the booked service, the
/// booking expired or it was already processed.
pub fn approve_booking(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    booking_id: i64,
) -> Result<ApproveBookingResponse, ApiError> {
    let (booking, order) = services
        .bookings
        .approve_booking(persistence, principal, booking_id)
        .map_err(translate_service_error)?;
    Ok(ApproveBookingResponse {
        booking: booking.into(),
        order: order.into(),
    })
}

/// Rejects a pending booking.
///
/// # Errors
///
/// Returns an error if the caller does not own the booked service, the
/// booking expired or it was already processed.
pub fn reject_booking(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    booking_id: i64,
) -> Result<BookingResponse, ApiError> {
    services
        .bookings
        .reject_booking(persistence, principal, booking_id)
        .map(BookingResponse::from)
        .map_err(translate_service_error)
}

/// Withdraws one of the caller's pending bookings.
///
/// # Errors
///
/// Returns an error if the caller did not make the booking or it is no
/// longer pending.
pub fn cancel_booking(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    booking_id: i64,
) -> Result<BookingResponse, ApiError> {
    services
        .bookings
        .cancel_booking_by_client(persistence, principal, booking_id)
        .map(BookingResponse::from)
        .map_err(translate_service_error)
}

/// Lists the caller's bookings: made by a client, or received by a model.
///
/// # Errors
///
/// Returns an error if the caller is neither a verified client nor a
/// verified model.
pub fn list_my_bookings(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    query: PageQuery,
) -> Result<Vec<BookingResponse>, ApiError> {
    let page = query.pagination();
    let bookings = match principal.role() {
        Role::Model => {
            services
                .bookings
                .list_model_bookings(persistence, principal, page)
        }
        _ => services
            .bookings
            .list_client_bookings(persistence, principal, page),
    };
    bookings.map(collect).map_err(translate_service_error)
}

// ============================================================================
// Orders
// ============================================================================

/// Lists the caller's orders: booked by a client, or received by a model.
///
/// # Errors
///
/// Returns an error if the caller is neither a verified client nor a
/// verified model.
pub fn list_my_orders(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    query: PageQuery,
) -> Result<Vec<OrderResponse>, ApiError> {
    let page = query.pagination();
    let orders = match principal.role() {
        Role::Model => {
            services
                .orders
                .get_model_orders(persistence, principal, page)
        }
        _ => services
            .orders
            .get_client_orders(persistence, principal, page),
    };
    orders.map(collect).map_err(translate_service_error)
}

/// Cancels an order on behalf of its client or its model.
///
/// # Errors
///
/// Returns an error if the caller is not a party to the order or the
/// 24-hour cutoff has passed.
pub fn cancel_order(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    order_id: i64,
) -> Result<OrderResponse, ApiError> {
    let cancelled = match principal.role() {
        Role::Model => {
            services
                .orders
                .cancel_order_by_model(persistence, principal, order_id)
        }
        _ => services
            .orders
            .cancel_order_by_client(persistence, principal, order_id),
    };
    cancelled
        .map(OrderResponse::from)
        .map_err(translate_service_error)
}

/// Completes an in-transit order after its slot has ended.
///
/// # Errors
///
/// Returns an error if the caller does not own the order's service or the
/// order cannot be completed yet.
pub fn complete_order(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    order_id: i64,
) -> Result<OrderResponse, ApiError> {
    services
        .orders
        .complete_order(persistence, principal, order_id)
        .map(OrderResponse::from)
        .map_err(translate_service_error)
}

// ============================================================================
// Administration
// ============================================================================

/// Registers another administrator.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the identity already
/// has an admin record.
pub fn create_admin(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    request: CreateAdminRequest,
) -> Result<AdminResponse, ApiError> {
    services
        .admin
        .create_admin(persistence, principal, request.auth_id, request.permissions)
        .map(AdminResponse::from)
        .map_err(translate_service_error)
}

/// Returns an administrator record.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the record does not exist.
pub fn get_admin(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    admin_id: i64,
) -> Result<AdminResponse, ApiError> {
    services
        .admin
        .get_admin(persistence, principal, admin_id)
        .map(AdminResponse::from)
        .map_err(translate_service_error)
}

/// Replaces an administrator's permissions.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the target does not exist.
pub fn update_admin_permissions(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    auth_id: i64,
    request: UpdatePermissionsRequest,
) -> Result<AdminResponse, ApiError> {
    services
        .admin
        .update_admin_permissions(persistence, principal, auth_id, request.permissions)
        .map(AdminResponse::from)
        .map_err(translate_service_error)
}

/// Marks an adult user as verified.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the user does not exist
/// or is under age.
pub fn verify_user(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    user_id: i64,
) -> Result<UserResponse, ApiError> {
    services
        .admin
        .verify_user(persistence, principal, user_id)
        .map(UserResponse::from)
        .map_err(translate_service_error)
}

/// Lists every user.
///
/// # Errors
///
/// Returns an error if the caller is not an admin.
pub fn admin_list_users(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    query: PageQuery,
) -> Result<Vec<UserResponse>, ApiError> {
    services
        .admin
        .list_users(persistence, principal, query.pagination())
        .map(collect)
        .map_err(translate_service_error)
}

/// Returns any booking.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the booking does not exist.
pub fn admin_get_booking(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    booking_id: i64,
) -> Result<BookingResponse, ApiError> {
    services
        .admin
        .get_booking(persistence, principal, booking_id)
        .map(BookingResponse::from)
        .map_err(translate_service_error)
}

/// Lists every booking.
///
/// # Errors
///
/// Returns an error if the caller is not an admin.
pub fn admin_list_bookings(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    query: PageQuery,
) -> Result<Vec<BookingResponse>, ApiError> {
    services
        .admin
        .list_bookings(persistence, principal, query.pagination())
        .map(collect)
        .map_err(translate_service_error)
}

/// Returns any order.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the order does not exist.
pub fn admin_get_order(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    order_id: i64,
) -> Result<OrderResponse, ApiError> {
    services
        .admin
        .get_order(persistence, principal, order_id)
        .map(OrderResponse::from)
        .map_err(translate_service_error)
}

/// Lists every order.
///
/// # Errors
///
/// Returns an error if the caller is not an admin.
pub fn admin_list_orders(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    query: PageQuery,
) -> Result<Vec<OrderResponse>, ApiError> {
    services
        .admin
        .list_orders(persistence, principal, query.pagination())
        .map(collect)
        .map_err(translate_service_error)
}

/// Overwrites a booking's status without lifecycle checks.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the booking does not exist.
pub fn override_booking_status(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    booking_id: i64,
    request: OverrideBookingStatusRequest,
) -> Result<BookingResponse, ApiError> {
    services
        .admin
        .override_booking_status(persistence, principal, booking_id, request.status)
        .map(BookingResponse::from)
        .map_err(translate_service_error)
}

/// Overwrites an order's status without lifecycle checks.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the order does not exist.
pub fn override_order_status(
    persistence: &mut SqlitePersistence,
    services: &Services,
    principal: &Principal,
    order_id: i64,
    request: OverrideOrderStatusRequest,
) -> Result<OrderResponse, ApiError> {
    services
        .admin
        .override_order_status(persistence, principal, order_id, request.status)
        .map(OrderResponse::from)
        .map_err(translate_service_error)
}
