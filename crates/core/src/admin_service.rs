// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admin oversight.
//!
//! Admins verify users, inspect every booking and order, and can overwrite
//! a booking or order status directly. Overrides bypass lifecycle checks and
//! touch only the named record.

use crate::authorization::require_admin;
use crate::clock::Clock;
use crate::error::{NotFoundExt, RepositoryError, ServiceError};
use crate::principal::Principal;
use crate::repository::Store;
use slot_market_domain::{
    Admin, Booking, BookingStatus, NewAdmin, Order, OrderStatus, Pagination, Permissions, User,
};
use tracing::{info, warn};

/// Operations reserved to admins.
#[derive(Debug, Clone)]
pub struct AdminService<C: Clock> {
    clock: C,
}

#[allow(clippy::unused_self)]
impl<C: Clock> AdminService<C> {
    #[must_use]
    pub const fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Ensures an admin record exists for `auth_id`.
    ///
    /// Used once at startup to seed the first admin. Returns the existing
    /// record when there already is one.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn bootstrap_admin<S: Store>(
        &self,
        store: &mut S,
        auth_id: i64,
    ) -> Result<Admin, ServiceError> {
        store.with_transaction(|tx| match tx.get_admin_by_auth_id(auth_id) {
            Ok(admin) => {
                info!(auth_id, admin_id = admin.id, "Bootstrap admin already present");
                Ok(admin)
            }
            Err(RepositoryError::NotFound) => {
                let admin = tx.create_admin(&NewAdmin {
                    auth_id,
                    permissions: Permissions::new(),
                })?;
                info!(auth_id, admin_id = admin.id, "Bootstrap admin created");
                Ok(admin)
            }
            Err(e) => Err(e.into()),
        })
    }

    /// Grants admin rights to `auth_id`.
    ///
    /// # Errors
    ///
    /// * `NotAnAdmin` unless the caller is an admin
    /// * `AdminAlreadyExists` if `auth_id` already has an admin record
    pub fn create_admin<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        auth_id: i64,
        permissions: Permissions,
    ) -> Result<Admin, ServiceError> {
        store.with_transaction(|tx| {
            let caller = require_admin(tx, principal)?;
            match tx.get_admin_by_auth_id(auth_id) {
                Ok(_) => {
                    warn!(auth_id, "Admin already exists");
                    return Err(ServiceError::AdminAlreadyExists);
                }
                Err(RepositoryError::NotFound) => {}
                Err(e) => return Err(e.into()),
            }

            let admin = tx.create_admin(&NewAdmin {
                auth_id,
                permissions,
            })?;
            info!(
                admin_id = admin.id,
                auth_id,
                created_by = caller.id,
                "Admin created"
            );
            Ok(admin)
        })
    }

    /// # Errors
    ///
    /// * `NotAnAdmin` unless the caller is an admin
    /// * `AdminNotFound` if no admin has this id
    pub fn get_admin<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        admin_id: i64,
    ) -> Result<Admin, ServiceError> {
        store.with_transaction(|tx| {
            require_admin(tx, principal)?;
            tx.get_admin(admin_id)
                .or_not_found(ServiceError::AdminNotFound)
        })
    }

    /// Replaces the permission map of the admin identified by `auth_id`.
    ///
    /// # Errors
    ///
    /// * `NotAnAdmin` unless the caller is an admin
    /// * `AdminNotFound` if `auth_id` has no admin record
    pub fn update_admin_permissions<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        auth_id: i64,
        permissions: Permissions,
    ) -> Result<Admin, ServiceError> {
        store.with_transaction(|tx| {
            require_admin(tx, principal)?;
            let mut admin = tx
                .get_admin_by_auth_id(auth_id)
                .or_not_found(ServiceError::AdminNotFound)?;
            admin.permissions = permissions;
            tx.update_admin(&admin).or_not_found(ServiceError::AdminNotFound)?;
            info!(admin_id = admin.id, auth_id, "Admin permissions updated");
            Ok(admin)
        })
    }

    /// Marks an adult user as verified.
    ///
    /// # Errors
    ///
    /// * `NotAnAdmin` unless the caller is an admin
    /// * `UserNotFound` if no user has this id
    /// * `UnderageUser` unless the user's 18th birthday is before now
    pub fn verify_user<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        user_id: i64,
    ) -> Result<User, ServiceError> {
        store.with_transaction(|tx| {
            require_admin(tx, principal)?;
            let mut user = tx
                .get_user(user_id)
                .or_not_found(ServiceError::UserNotFound)?;
            if !user.is_adult(self.clock.now()) {
                warn!(
                    user_id,
                    birth_date = %user.birth_date,
                    "Refused to verify an underage user"
                );
                return Err(ServiceError::UnderageUser);
            }

            user.is_verified = true;
            tx.update_user(&user).or_not_found(ServiceError::UserNotFound)?;
            info!(user_id, "User verified");
            Ok(user)
        })
    }

    /// # Errors
    ///
    /// * `NotAnAdmin` unless the caller is an admin
    /// * `BookingNotFound` if no booking has this id
    pub fn get_booking<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        booking_id: i64,
    ) -> Result<Booking, ServiceError> {
        store.with_transaction(|tx| {
            require_admin(tx, principal)?;
            tx.get_booking(booking_id)
                .or_not_found(ServiceError::BookingNotFound)
        })
    }

    /// # Errors
    ///
    /// Returns `NotAnAdmin` unless the caller is an admin.
    pub fn list_bookings<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        page: Pagination,
    ) -> Result<Vec<Booking>, ServiceError> {
        store.with_transaction(|tx| {
            require_admin(tx, principal)?;
            Ok(tx.list_bookings(page)?)
        })
    }

    /// # Errors
    ///
    /// * `NotAnAdmin` unless the caller is an admin
    /// * `OrderNotFound` if no order has this id
    pub fn get_order<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        order_id: i64,
    ) -> Result<Order, ServiceError> {
        store.with_transaction(|tx| {
            require_admin(tx, principal)?;
            tx.get_order(order_id)
                .or_not_found(ServiceError::OrderNotFound)
        })
    }

    /// # Errors
    ///
    /// Returns `NotAnAdmin` unless the caller is an admin.
    pub fn list_orders<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        page: Pagination,
    ) -> Result<Vec<Order>, ServiceError> {
        store.with_transaction(|tx| {
            require_admin(tx, principal)?;
            Ok(tx.list_orders(page)?)
        })
    }

    /// # Errors
    ///
    /// Returns `NotAnAdmin` unless the caller is an admin.
    pub fn list_users<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        page: Pagination,
    ) -> Result<Vec<User>, ServiceError> {
        store.with_transaction(|tx| {
            require_admin(tx, principal)?;
            Ok(tx.list_users(page)?)
        })
    }

    /// Overwrites a booking's status without lifecycle checks.
    ///
    /// The slot and any order are left as they are.
    ///
    /// # Errors
    ///
    /// * `NotAnAdmin` unless the caller is an admin
    /// * `BookingNotFound` if no booking has this id
    pub fn override_booking_status<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        booking_id: i64,
        status: BookingStatus,
    ) -> Result<Booking, ServiceError> {
        store.with_transaction(|tx| {
            let admin = require_admin(tx, principal)?;
            let mut booking = tx
                .get_booking(booking_id)
                .or_not_found(ServiceError::BookingNotFound)?;
            let previous = booking.status;
            booking.status = status;
            tx.update_booking(&booking).or_not_found(ServiceError::BookingNotFound)?;
            warn!(
                booking_id,
                admin_id = admin.id,
                from = previous.as_str(),
                to = status.as_str(),
                "Booking status overridden"
            );
            Ok(booking)
        })
    }

    /// Overwrites an order's status without lifecycle checks.
    ///
    /// This is the only path that moves an order into `InTransit`.
    ///
    /// # Errors
    ///
    /// * `NotAnAdmin` unless the caller is an admin
    /// * `OrderNotFound` if no order has this id
    pub fn override_order_status<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<Order, ServiceError> {
        store.with_transaction(|tx| {
            let admin = require_admin(tx, principal)?;
            let mut order = tx
                .get_order(order_id)
                .or_not_found(ServiceError::OrderNotFound)?;
            let previous = order.status;
            order.status = status;
            tx.update_order(&order).or_not_found(ServiceError::OrderNotFound)?;
            warn!(
                order_id,
                admin_id = admin.id,
                from = previous.as_str(),
                to = status.as_str(),
                "Order status overridden"
            );
            Ok(order)
        })
    }
}
