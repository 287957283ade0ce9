// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking orchestration.
//!
//! Every mutating operation runs its whole read-check-write sequence in one
//! transaction. Checks run in a fixed order and the first failure aborts the
//! operation before anything is written.

use crate::authorization::{require_client, require_model, require_service_owner};
use crate::clock::Clock;
use crate::config::BookingConfig;
use crate::error::{NotFoundExt, ServiceError};
use crate::principal::Principal;
use crate::repository::Store;
use slot_market_domain::{
    Address, Booking, BookingStatus, NewBooking, NewOrder, Order, Pagination, SlotStatus,
};
use tracing::{info, warn};

/// Creates, approves, rejects and cancels bookings.
#[derive(Debug, Clone)]
pub struct BookingService<C: Clock> {
    config: BookingConfig,
    clock: C,
}

impl<C: Clock> BookingService<C> {
    #[must_use]
    pub const fn new(config: BookingConfig, clock: C) -> Self {
        Self { config, clock }
    }

    /// Reserves a slot for the calling client and records a pending booking.
    ///
    /// # Arguments
    ///
    /// * `store` - The storage adapter
    /// * `principal` - The caller, who must be a verified client
    /// * `service_id` - The service being booked
    /// * `slot_id` - The slot to reserve
    /// * `address` - Where the service is delivered
    ///
    /// # Returns
    ///
    /// The persisted booking in `Pending`, expiring one TTL from now.
    ///
    /// # Errors
    ///
    /// * `SlotNotFound` if the slot does not exist
    /// * `SlotNotAvailable` if the slot is not `Available`
    /// * `ServiceNotFound`, `ServiceNotActive` or `SlotServiceMismatch` for an unusable service
    pub fn create_booking<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        service_id: i64,
        slot_id: i64,
        address: Address,
    ) -> Result<Booking, ServiceError> {
        store.with_transaction(|tx| {
            let client = require_client(tx, principal)?;

            let mut slot = tx.get_slot(slot_id).or_not_found(ServiceError::SlotNotFound)?;
            if !slot.is_available() {
                warn!(
                    slot_id,
                    status = slot.status.as_str(),
                    "Slot is not available for booking"
                );
                return Err(ServiceError::SlotNotAvailable);
            }
            slot.status.validate_transition(SlotStatus::Reserved)?;

            let service = tx
                .get_service(service_id)
                .or_not_found(ServiceError::ServiceNotFound)?;
            if !service.is_active {
                warn!(service_id, "Service is not active");
                return Err(ServiceError::ServiceNotActive);
            }
            if service.model_id != slot.model_id {
                warn!(
                    service_id,
                    slot_id,
                    service_model_id = service.model_id,
                    slot_model_id = slot.model_id,
                    "Service and slot belong to different models"
                );
                return Err(ServiceError::SlotServiceMismatch);
            }

            let now = self.clock.now();
            let new_booking = NewBooking::pending(
                client.id,
                service_id,
                slot_id,
                address,
                now,
                self.config.ttl(),
            )?;

            slot.transition_to(SlotStatus::Reserved)?;
            tx.update_slot(&slot).or_not_found(ServiceError::SlotNotFound)?;
            let booking = tx.create_booking(&new_booking)?;

            info!(
                booking_id = booking.id,
                slot_id,
                client_id = client.id,
                "Booking created and slot reserved"
            );
            Ok(booking)
        })
    }

    /// Approves a pending booking, books its slot and creates a confirmed order.
    ///
    /// # Errors
    ///
    /// * `BookingNotFound` if the booking does not exist
    /// * `NotServiceOwner` if the caller does not own the booked service
    /// * `BookingExpired` if the booking is pending past its expiry
    /// * `BookingAlreadyProcessed` if the booking is no longer pending
    pub fn approve_booking<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        booking_id: i64,
    ) -> Result<(Booking, Order), ServiceError> {
        store.with_transaction(|tx| {
            let mut booking = self.load_decidable_booking(tx, principal, booking_id)?;

            let mut slot = tx
                .get_slot(booking.slot_id)
                .or_not_found(ServiceError::SlotNotFound)?;
            slot.transition_to(SlotStatus::Booked)?;

            let now = self.clock.now();
            tx.update_slot(&slot).or_not_found(ServiceError::SlotNotFound)?;
            booking.status = BookingStatus::Approved;
            tx.update_booking(&booking).or_not_found(ServiceError::BookingNotFound)?;
            let order = tx.create_order(&NewOrder::confirmed(booking.id, now))?;

            info!(
                booking_id,
                slot_id = slot.id,
                order_id = order.id,
                "Booking approved and order confirmed"
            );
            Ok((booking, order))
        })
    }

    /// Rejects a pending booking and releases its slot.
    ///
    /// # Errors
    ///
    /// Same as [`BookingService::approve_booking`].
    pub fn reject_booking<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        booking_id: i64,
    ) -> Result<Booking, ServiceError> {
        store.with_transaction(|tx| {
            let mut booking = self.load_decidable_booking(tx, principal, booking_id)?;

            let mut slot = tx
                .get_slot(booking.slot_id)
                .or_not_found(ServiceError::SlotNotFound)?;
            slot.transition_to(SlotStatus::Available)?;

            tx.update_slot(&slot).or_not_found(ServiceError::SlotNotFound)?;
            booking.status = BookingStatus::Rejected;
            tx.update_booking(&booking).or_not_found(ServiceError::BookingNotFound)?;

            info!(booking_id, slot_id = slot.id, "Booking rejected and slot released");
            Ok(booking)
        })
    }

    /// Withdraws the caller's own pending booking and releases its slot.
    ///
    /// # Errors
    ///
    /// * `BookingNotFound` if the booking does not exist
    /// * `NotBookingOwner` if another client made the booking
    /// * `BookingExpired` if the booking is pending past its expiry
    /// * `InvalidBookingState` if the booking is no longer pending
    pub fn cancel_booking_by_client<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        booking_id: i64,
    ) -> Result<Booking, ServiceError> {
        store.with_transaction(|tx| {
            let client = require_client(tx, principal)?;

            let mut booking = tx
                .get_booking(booking_id)
                .or_not_found(ServiceError::BookingNotFound)?;
            if booking.client_id != client.id {
                warn!(
                    booking_id,
                    client_id = client.id,
                    "Client does not own the booking"
                );
                return Err(ServiceError::NotBookingOwner);
            }
            if booking.is_expired(self.clock.now()) {
                warn!(booking_id, "Booking has expired");
                return Err(ServiceError::BookingExpired);
            }
            if !booking.can_be_cancelled_by_client() {
                warn!(
                    booking_id,
                    status = booking.status.as_str(),
                    "Booking cannot be cancelled in its current state"
                );
                return Err(ServiceError::InvalidBookingState);
            }

            let mut slot = tx
                .get_slot(booking.slot_id)
                .or_not_found(ServiceError::SlotNotFound)?;
            slot.transition_to(SlotStatus::Available)?;

            tx.update_slot(&slot).or_not_found(ServiceError::SlotNotFound)?;
            booking.status = BookingStatus::Cancelled;
            tx.update_booking(&booking).or_not_found(ServiceError::BookingNotFound)?;

            info!(booking_id, slot_id = slot.id, "Booking cancelled by client");
            Ok(booking)
        })
    }

    /// Lists the calling client's bookings.
    ///
    /// # Errors
    ///
    /// Returns an authorization error unless the caller is a verified client.
    #[allow(clippy::unused_self)]
    pub fn list_client_bookings<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        page: Pagination,
    ) -> Result<Vec<Booking>, ServiceError> {
        store.with_transaction(|tx| {
            let client = require_client(tx, principal)?;
            Ok(tx.list_bookings_by_client(client.id, page)?)
        })
    }

    /// Lists bookings made against the calling model's services.
    ///
    /// # Errors
    ///
    /// Returns an authorization error unless the caller is a verified model.
    #[allow(clippy::unused_self)]
    pub fn list_model_bookings<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        page: Pagination,
    ) -> Result<Vec<Booking>, ServiceError> {
        store.with_transaction(|tx| {
            let model = require_model(tx, principal)?;
            Ok(tx.list_bookings_by_model(model.id, page)?)
        })
    }

    /// Shared checks of approve and reject: model, owner, not expired, pending.
    fn load_decidable_booking<S: Store>(
        &self,
        tx: &mut S,
        principal: &Principal,
        booking_id: i64,
    ) -> Result<Booking, ServiceError> {
        let model = require_model(tx, principal)?;

        let booking = tx
            .get_booking(booking_id)
            .or_not_found(ServiceError::BookingNotFound)?;
        require_service_owner(tx, model.id, booking.service_id)?;

        if booking.is_expired(self.clock.now()) {
            warn!(
                booking_id,
                expires_at = %booking.expires_at,
                "Booking has expired"
            );
            return Err(ServiceError::BookingExpired);
        }
        if !booking.can_be_approved() {
            warn!(
                booking_id,
                status = booking.status.as_str(),
                "Booking has already been processed"
            );
            return Err(ServiceError::BookingAlreadyProcessed);
        }

        Ok(booking)
    }
}
