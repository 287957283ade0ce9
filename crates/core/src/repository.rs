// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage contracts consumed by the services.
//!
//! One trait per entity, all implemented by a single storage adapter that
//! also provides the transaction contract in [`Store`]. Lookups report a
//! missing row as [`RepositoryError::NotFound`]; every other failure is
//! opaque.

use crate::error::RepositoryError;
use slot_market_domain::{
    Admin, Booking, ModelService, NewAdmin, NewBooking, NewModelService, NewOrder, NewSlot,
    NewUser, Order, Pagination, Role, Slot, User,
};
use time::OffsetDateTime;

/// Persistence of user profiles.
pub trait UserRepository {
    /// Inserts a user and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn create_user(&mut self, user: &NewUser) -> Result<User, RepositoryError>;

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has this id.
    fn get_user(&mut self, id: i64) -> Result<User, RepositoryError>;

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has this auth id.
    fn get_user_by_auth_id(&mut self, auth_id: i64) -> Result<User, RepositoryError>;

    /// Overwrites the mutable fields of an existing user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    fn update_user(&mut self, user: &User) -> Result<(), RepositoryError>;

    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_users(&mut self, page: Pagination) -> Result<Vec<User>, RepositoryError>;

    /// Counts users holding `role`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn count_users_by_role(&mut self, role: Role) -> Result<u64, RepositoryError>;
}

/// Persistence of admin records.
pub trait AdminRepository {
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn create_admin(&mut self, admin: &NewAdmin) -> Result<Admin, RepositoryError>;

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no admin has this id.
    fn get_admin(&mut self, id: i64) -> Result<Admin, RepositoryError>;

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no admin has this auth id.
    fn get_admin_by_auth_id(&mut self, auth_id: i64) -> Result<Admin, RepositoryError>;

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the admin does not exist.
    fn update_admin(&mut self, admin: &Admin) -> Result<(), RepositoryError>;
}

/// Persistence of service offerings.
pub trait ModelServiceRepository {
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn create_service(&mut self, service: &NewModelService)
    -> Result<ModelService, RepositoryError>;

    /// Loads a service regardless of whether it is active.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no service has this id.
    fn get_service(&mut self, id: i64) -> Result<ModelService, RepositoryError>;

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the service does not exist.
    fn update_service(&mut self, service: &ModelService) -> Result<(), RepositoryError>;

    /// Lists active services across all models.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_active_services(&mut self, page: Pagination)
    -> Result<Vec<ModelService>, RepositoryError>;

    /// Lists every service of one model, active or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_services_by_model(
        &mut self,
        model_id: i64,
        page: Pagination,
    ) -> Result<Vec<ModelService>, RepositoryError>;

    /// Returns true if any booking references the service.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn service_has_bookings(&mut self, service_id: i64) -> Result<bool, RepositoryError>;
}

/// Persistence of slots.
pub trait SlotRepository {
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn create_slot(&mut self, slot: &NewSlot) -> Result<Slot, RepositoryError>;

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no slot has this id.
    fn get_slot(&mut self, id: i64) -> Result<Slot, RepositoryError>;

    /// Writes the slot's window and status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the slot does not exist.
    fn update_slot(&mut self, slot: &Slot) -> Result<(), RepositoryError>;

    /// Lists every slot of one model ordered by start time.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_slots_by_model(&mut self, model_id: i64) -> Result<Vec<Slot>, RepositoryError>;

    /// Returns true if a non-disabled slot of the model intersects `[start, end)`.
    ///
    /// # Arguments
    ///
    /// * `model_id` - The owning model's user id
    /// * `start` - Window start (inclusive)
    /// * `end` - Window end (exclusive)
    /// * `exclude_slot_id` - A slot to ignore, used when moving an existing slot
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn has_overlapping_slot(
        &mut self,
        model_id: i64,
        start: OffsetDateTime,
        end: OffsetDateTime,
        exclude_slot_id: Option<i64>,
    ) -> Result<bool, RepositoryError>;
}

/// Persistence of bookings.
pub trait BookingRepository {
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn create_booking(&mut self, booking: &NewBooking) -> Result<Booking, RepositoryError>;

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no booking has this id.
    fn get_booking(&mut self, id: i64) -> Result<Booking, RepositoryError>;

    /// Writes the booking's status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the booking does not exist.
    fn update_booking(&mut self, booking: &Booking) -> Result<(), RepositoryError>;

    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_bookings_by_client(
        &mut self,
        client_id: i64,
        page: Pagination,
    ) -> Result<Vec<Booking>, RepositoryError>;

    /// Lists bookings made against any service of the model.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_bookings_by_model(
        &mut self,
        model_id: i64,
        page: Pagination,
    ) -> Result<Vec<Booking>, RepositoryError>;

    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_bookings(&mut self, page: Pagination) -> Result<Vec<Booking>, RepositoryError>;
}

/// Persistence of orders.
pub trait OrderRepository {
    /// # Errors
    ///
    /// Returns an error if the insert fails, including a second order for the same booking.
    fn create_order(&mut self, order: &NewOrder) -> Result<Order, RepositoryError>;

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no order has this id.
    fn get_order(&mut self, id: i64) -> Result<Order, RepositoryError>;

    /// Writes the order's status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    fn update_order(&mut self, order: &Order) -> Result<(), RepositoryError>;

    /// Lists orders whose booking targets a service of the model.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_orders_by_model(
        &mut self,
        model_id: i64,
        page: Pagination,
    ) -> Result<Vec<Order>, RepositoryError>;

    /// Lists orders whose booking was made by the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_orders_by_client(
        &mut self,
        client_id: i64,
        page: Pagination,
    ) -> Result<Vec<Order>, RepositoryError>;

    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_orders(&mut self, page: Pagination) -> Result<Vec<Order>, RepositoryError>;
}

/// Every repository plus the transaction contract.
///
/// `with_transaction` is reentrant: the outermost call opens a transaction,
/// nested calls made from inside `work` join it. The outermost call commits
/// when `work` returns `Ok` and rolls back every write made in the call tree
/// when it returns `Err`.
pub trait Store:
    UserRepository
    + AdminRepository
    + ModelServiceRepository
    + SlotRepository
    + BookingRepository
    + OrderRepository
{
    /// Runs `work` inside a transaction.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `work`, or a converted `RepositoryError`
    /// if beginning or ending the transaction fails.
    fn with_transaction<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<RepositoryError>;
}
