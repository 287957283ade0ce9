// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use slot_market_domain::{Booking, NewBooking, NewOrder, Order};
use tracing::{debug, info};

use super::require_updated;
use crate::backend::sqlite::get_last_insert_rowid;
use crate::convert::to_millis;
use crate::diesel_schema::{bookings, orders};
use crate::error::PersistenceError;

/// Inserts a booking.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_booking(
    conn: &mut SqliteConnection,
    booking: &NewBooking,
) -> Result<Booking, PersistenceError> {
    let address = &booking.address;

    diesel::insert_into(bookings::table)
        .values((
            bookings::client_id.eq(booking.client_id),
            bookings::service_id.eq(booking.service_id),
            bookings::slot_id.eq(booking.slot_id),
            bookings::street.eq(&address.street),
            bookings::house.eq(address.house),
            bookings::apartment.eq(address.apartment),
            bookings::entrance.eq(address.entrance),
            bookings::floor.eq(address.floor),
            bookings::comment.eq(address.comment.as_deref()),
            bookings::status.eq(booking.status.as_str()),
            bookings::expires_at.eq(to_millis(booking.expires_at)),
            bookings::created_at.eq(to_millis(booking.created_at)),
        ))
        .execute(conn)?;

    let booking_id: i64 = get_last_insert_rowid(conn)?;
    info!(
        booking_id,
        client_id = booking.client_id,
        slot_id = booking.slot_id,
        "Created booking"
    );

    Ok(Booking {
        id: booking_id,
        client_id: booking.client_id,
        service_id: booking.service_id,
        slot_id: booking.slot_id,
        address: booking.address.clone(),
        status: booking.status,
        expires_at: booking.expires_at,
        created_at: booking.created_at,
    })
}

/// Writes a booking's status.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the booking does not exist.
pub fn update_booking(conn: &mut SqliteConnection, booking: &Booking) -> Result<(), PersistenceError> {
    debug!(
        booking_id = booking.id,
        status = booking.status.as_str(),
        "Updating booking"
    );

    let affected: usize = diesel::update(bookings::table)
        .filter(bookings::booking_id.eq(booking.id))
        .set(bookings::status.eq(booking.status.as_str()))
        .execute(conn)?;

    require_updated("bookings", booking.id, affected)
}

/// Inserts an order.
///
/// # Errors
///
/// Returns an error if the insert fails, including a second order for the
/// same booking.
pub fn insert_order(conn: &mut SqliteConnection, order: &NewOrder) -> Result<Order, PersistenceError> {
    diesel::insert_into(orders::table)
        .values((
            orders::booking_id.eq(order.booking_id),
            orders::status.eq(order.status.as_str()),
            orders::created_at.eq(to_millis(order.created_at)),
        ))
        .execute(conn)?;

    let order_id: i64 = get_last_insert_rowid(conn)?;
    info!(order_id, booking_id = order.booking_id, "Created order");

    Ok(Order {
        id: order_id,
        booking_id: order.booking_id,
        status: order.status,
        created_at: order.created_at,
    })
}

/// Writes an order's status.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the order does not exist.
pub fn update_order(conn: &mut SqliteConnection, order: &Order) -> Result<(), PersistenceError> {
    debug!(order_id = order.id, status = order.status.as_str(), "Updating order");

    let affected: usize = diesel::update(orders::table)
        .filter(orders::order_id.eq(order.id))
        .set(orders::status.eq(order.status.as_str()))
        .execute(conn)?;

    require_updated("orders", order.id, affected)
}
