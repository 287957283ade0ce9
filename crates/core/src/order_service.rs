// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order orchestration.
//!
//! Every operation walks the order, booking and slot chain and checks
//! ownership at the booking level: a model must own the booked service, a
//! client must have made the booking.

use crate::authorization::{require_client, require_model, require_service_owner};
use crate::clock::Clock;
use crate::error::{NotFoundExt, ServiceError};
use crate::metrics::OrderMetrics;
use crate::principal::Principal;
use crate::repository::Store;
use slot_market_domain::{Booking, BookingStatus, Order, OrderStatus, Pagination, Slot};
use tracing::{info, warn};

/// An order together with the records it was derived from.
struct OrderChain {
    order: Order,
    booking: Booking,
    slot: Slot,
}

/// Lists, cancels and completes orders.
#[derive(Debug, Clone)]
pub struct OrderService<C: Clock, M: OrderMetrics> {
    clock: C,
    metrics: M,
}

impl<C: Clock, M: OrderMetrics> OrderService<C, M> {
    #[must_use]
    pub const fn new(clock: C, metrics: M) -> Self {
        Self { clock, metrics }
    }

    /// Lists orders for the calling model's services.
    ///
    /// # Errors
    ///
    /// Returns an authorization error unless the caller is a verified model.
    #[allow(clippy::unused_self)]
    pub fn get_model_orders<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        page: Pagination,
    ) -> Result<Vec<Order>, ServiceError> {
        store.with_transaction(|tx| {
            let model = require_model(tx, principal)?;
            Ok(tx.list_orders_by_model(model.id, page)?)
        })
    }

    /// Lists orders for the calling client's bookings.
    ///
    /// # Errors
    ///
    /// Returns an authorization error unless the caller is a verified client.
    #[allow(clippy::unused_self)]
    pub fn get_client_orders<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        page: Pagination,
    ) -> Result<Vec<Order>, ServiceError> {
        store.with_transaction(|tx| {
            let client = require_client(tx, principal)?;
            Ok(tx.list_orders_by_client(client.id, page)?)
        })
    }

    /// Cancels an order on behalf of the model that owns the booked service.
    ///
    /// # Errors
    ///
    /// * `OrderNotFound` if the order does not exist
    /// * `NotServiceOwner` if the caller does not own the booked service
    /// * `CannotCancelOrderNow` unless the order is `Confirmed` and the slot
    ///   starts more than 24 hours from now
    pub fn cancel_order_by_model<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        order_id: i64,
    ) -> Result<Order, ServiceError> {
        store.with_transaction(|tx| {
            let model = require_model(tx, principal)?;
            let chain = load_chain(tx, order_id)?;
            require_service_owner(tx, model.id, chain.booking.service_id)?;

            self.ensure_cancellable(&chain)?;
            cancel_order(tx, chain)
        })
    }

    /// Cancels an order on behalf of the client that made the booking.
    ///
    /// # Errors
    ///
    /// * `OrderNotFound` if the order does not exist
    /// * `NotOrderOwner` if another client made the booking
    /// * `CannotCancelOrderNow` unless the order is `Confirmed` and the slot
    ///   starts more than 24 hours from now
    pub fn cancel_order_by_client<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        order_id: i64,
    ) -> Result<Order, ServiceError> {
        store.with_transaction(|tx| {
            let client = require_client(tx, principal)?;
            let chain = load_chain(tx, order_id)?;
            if chain.booking.client_id != client.id {
                warn!(order_id, client_id = client.id, "Client does not own the order");
                return Err(ServiceError::NotOrderOwner);
            }

            self.ensure_cancellable(&chain)?;
            cancel_order(tx, chain)
        })
    }

    /// Completes an in-transit order once its slot has ended.
    ///
    /// The completed-order metric is recorded only after the transaction commits.
    ///
    /// # Errors
    ///
    /// * `OrderNotFound` if the order does not exist
    /// * `NotServiceOwner` if the caller does not own the booked service
    /// * `CannotCompleteOrder` unless the order is `InTransit` and the slot has ended
    pub fn complete_order<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        order_id: i64,
    ) -> Result<Order, ServiceError> {
        let order = store.with_transaction::<_, ServiceError, _>(|tx| {
            let model = require_model(tx, principal)?;
            let mut chain = load_chain(tx, order_id)?;
            require_service_owner(tx, model.id, chain.booking.service_id)?;

            if !chain.order.can_be_completed(self.clock.now(), chain.slot.end_time) {
                warn!(
                    order_id,
                    status = chain.order.status.as_str(),
                    slot_end = %chain.slot.end_time,
                    "Order cannot be completed"
                );
                return Err(ServiceError::CannotCompleteOrder);
            }

            chain.order.status = OrderStatus::Completed;
            tx.update_order(&chain.order).or_not_found(ServiceError::OrderNotFound)?;
            Ok(chain.order)
        })?;

        self.metrics.completed_order();
        info!(order_id, "Order completed");
        Ok(order)
    }

    fn ensure_cancellable(&self, chain: &OrderChain) -> Result<(), ServiceError> {
        if chain
            .order
            .can_be_cancelled(self.clock.now(), chain.slot.start_time)
        {
            return Ok(());
        }

        warn!(
            order_id = chain.order.id,
            status = chain.order.status.as_str(),
            slot_start = %chain.slot.start_time,
            "Order cannot be cancelled now"
        );
        Err(ServiceError::CannotCancelOrderNow)
    }
}

fn load_chain<S: Store>(tx: &mut S, order_id: i64) -> Result<OrderChain, ServiceError> {
    let order = tx
        .get_order(order_id)
        .or_not_found(ServiceError::OrderNotFound)?;
    let booking = tx
        .get_booking(order.booking_id)
        .or_not_found(ServiceError::BookingNotFound)?;
    let slot = tx
        .get_slot(booking.slot_id)
        .or_not_found(ServiceError::SlotNotFound)?;
    Ok(OrderChain {
        order,
        booking,
        slot,
    })
}

/// Cancels the order and its booking and frees the slot.
///
/// Joins the caller's transaction when there is one, so the three writes
/// commit or roll back together.
fn cancel_order<S: Store>(store: &mut S, chain: OrderChain) -> Result<Order, ServiceError> {
    let OrderChain {
        mut order,
        mut booking,
        mut slot,
    } = chain;

    store.with_transaction(|tx| {
        slot.release_for_cancelled_order()?;

        order.status = OrderStatus::Cancelled;
        tx.update_order(&order).or_not_found(ServiceError::OrderNotFound)?;
        booking.status = BookingStatus::Cancelled;
        tx.update_booking(&booking).or_not_found(ServiceError::BookingNotFound)?;
        tx.update_slot(&slot).or_not_found(ServiceError::SlotNotFound)?;

        info!(
            order_id = order.id,
            booking_id = booking.id,
            slot_id = slot.id,
            "Order cancelled and slot released"
        );
        Ok(order)
    })
}
