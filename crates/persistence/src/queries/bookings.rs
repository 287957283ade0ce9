// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use slot_market_domain::{Booking, Order, Pagination};

use crate::data_models::{BookingRow, OrderRow, convert_rows};
use crate::diesel_schema::{bookings, model_services, orders};
use crate::error::PersistenceError;

/// Loads a booking by id.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no booking has this id.
pub fn find_booking(
    conn: &mut SqliteConnection,
    booking_id: i64,
) -> Result<Booking, PersistenceError> {
    let row: BookingRow = bookings::table
        .filter(bookings::booking_id.eq(booking_id))
        .select(BookingRow::as_select())
        .first(conn)?;
    Booking::try_from(row)
}

/// Lists the bookings made by one client.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_bookings_by_client(
    conn: &mut SqliteConnection,
    client_id: i64,
    page: Pagination,
) -> Result<Vec<Booking>, PersistenceError> {
    let rows: Vec<BookingRow> = bookings::table
        .filter(bookings::client_id.eq(client_id))
        .order(bookings::booking_id.asc())
        .limit(page.limit())
        .offset(page.offset())
        .select(BookingRow::as_select())
        .load(conn)?;
    convert_rows(rows)
}

/// Lists bookings made against any service of one model.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_bookings_by_model(
    conn: &mut SqliteConnection,
    model_id: i64,
    page: Pagination,
) -> Result<Vec<Booking>, PersistenceError> {
    let rows: Vec<BookingRow> = bookings::table
        .inner_join(
            model_services::table.on(model_services::service_id.eq(bookings::service_id)),
        )
        .filter(model_services::model_id.eq(model_id))
        .order(bookings::booking_id.asc())
        .limit(page.limit())
        .offset(page.offset())
        .select(BookingRow::as_select())
        .load(conn)?;
    convert_rows(rows)
}

/// Lists every booking.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_bookings(
    conn: &mut SqliteConnection,
    page: Pagination,
) -> Result<Vec<Booking>, PersistenceError> {
    let rows: Vec<BookingRow> = bookings::table
        .order(bookings::booking_id.asc())
        .limit(page.limit())
        .offset(page.offset())
        .select(BookingRow::as_select())
        .load(conn)?;
    convert_rows(rows)
}

/// Loads an order by id.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no order has this id.
pub fn find_order(conn: &mut SqliteConnection, order_id: i64) -> Result<Order, PersistenceError> {
    let row: OrderRow = orders::table
        .filter(orders::order_id.eq(order_id))
        .select(OrderRow::as_select())
        .first(conn)?;
    Order::try_from(row)
}

/// Lists orders whose booking targets a service of the model.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_orders_by_model(
    conn: &mut SqliteConnection,
    model_id: i64,
    page: Pagination,
) -> Result<Vec<Order>, PersistenceError> {
    let rows: Vec<OrderRow> = orders::table
        .inner_join(bookings::table.on(bookings::booking_id.eq(orders::booking_id)))
        .inner_join(
            model_services::table.on(model_services::service_id.eq(bookings::service_id)),
        )
        .filter(model_services::model_id.eq(model_id))
        .order(orders::order_id.asc())
        .limit(page.limit())
        .offset(page.offset())
        .select(OrderRow::as_select())
        .load(conn)?;
    convert_rows(rows)
}

/// Lists orders whose booking was made by the client.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_orders_by_client(
    conn: &mut SqliteConnection,
    client_id: i64,
    page: Pagination,
) -> Result<Vec<Order>, PersistenceError> {
    let rows: Vec<OrderRow> = orders::table
        .inner_join(bookings::table.on(bookings::booking_id.eq(orders::booking_id)))
        .filter(bookings::client_id.eq(client_id))
        .order(orders::order_id.asc())
        .limit(page.limit())
        .offset(page.offset())
        .select(OrderRow::as_select())
        .load(conn)?;
    convert_rows(rows)
}

/// Lists every order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_orders(
    conn: &mut SqliteConnection,
    page: Pagination,
) -> Result<Vec<Order>, PersistenceError> {
    let rows: Vec<OrderRow> = orders::table
        .order(orders::order_id.asc())
        .limit(page.limit())
        .offset(page.offset())
        .select(OrderRow::as_select())
        .load(conn)?;
    convert_rows(rows)
}
