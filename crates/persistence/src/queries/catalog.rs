// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use slot_market_domain::{ModelService, Pagination, Slot, SlotStatus};
use time::OffsetDateTime;

use crate::convert::{flag, to_millis};
use crate::data_models::{ServiceRow, SlotRow, convert_rows};
use crate::diesel_schema::{bookings, model_services, slots};
use crate::error::PersistenceError;

/// Loads a service by id, active or not.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no service has this id.
pub fn find_service(
    conn: &mut SqliteConnection,
    service_id: i64,
) -> Result<ModelService, PersistenceError> {
    let row: ServiceRow = model_services::table
        .filter(model_services::service_id.eq(service_id))
        .select(ServiceRow::as_select())
        .first(conn)?;
    ModelService::try_from(row)
}

/// Lists active services of every model in id order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_active_services(
    conn: &mut SqliteConnection,
    page: Pagination,
) -> Result<Vec<ModelService>, PersistenceError> {
    let rows: Vec<ServiceRow> = model_services::table
        .filter(model_services::is_active.eq(flag(true)))
        .order(model_services::service_id.asc())
        .limit(page.limit())
        .offset(page.offset())
        .select(ServiceRow::as_select())
        .load(conn)?;
    convert_rows(rows)
}

/// Lists every service of one model in id order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_services_by_model(
    conn: &mut SqliteConnection,
    model_id: i64,
    page: Pagination,
) -> Result<Vec<ModelService>, PersistenceError> {
    let rows: Vec<ServiceRow> = model_services::table
        .filter(model_services::model_id.eq(model_id))
        .order(model_services::service_id.asc())
        .limit(page.limit())
        .offset(page.offset())
        .select(ServiceRow::as_select())
        .load(conn)?;
    convert_rows(rows)
}

/// Returns true if any booking references the service.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn service_has_bookings(
    conn: &mut SqliteConnection,
    service_id: i64,
) -> Result<bool, PersistenceError> {
    let referenced: bool = diesel::select(diesel::dsl::exists(
        bookings::table.filter(bookings::service_id.eq(service_id)),
    ))
    .get_result(conn)?;
    Ok(referenced)
}

/// Loads a slot by id.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no slot has this id.
pub fn find_slot(conn: &mut SqliteConnection, slot_id: i64) -> Result<Slot, PersistenceError> {
    let row: SlotRow = slots::table
        .filter(slots::slot_id.eq(slot_id))
        .select(SlotRow::as_select())
        .first(conn)?;
    Slot::try_from(row)
}

/// Lists every slot of one model ordered by start time.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_slots_by_model(
    conn: &mut SqliteConnection,
    model_id: i64,
) -> Result<Vec<Slot>, PersistenceError> {
    let rows: Vec<SlotRow> = slots::table
        .filter(slots::model_id.eq(model_id))
        .order((slots::start_time.asc(), slots::slot_id.asc()))
        .select(SlotRow::as_select())
        .load(conn)?;
    convert_rows(rows)
}

/// Returns true if a non-disabled slot of the model intersects `[start, end)`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn has_overlapping_slot(
    conn: &mut SqliteConnection,
    model_id: i64,
    start: OffsetDateTime,
    end: OffsetDateTime,
    exclude_slot_id: Option<i64>,
) -> Result<bool, PersistenceError> {
    let mut query = slots::table
        .filter(slots::model_id.eq(model_id))
        .filter(slots::status.ne(SlotStatus::Disabled.as_str()))
        .filter(slots::start_time.lt(to_millis(end)))
        .filter(slots::end_time.gt(to_millis(start)))
        .into_boxed();

    if let Some(excluded) = exclude_slot_id {
        query = query.filter(slots::slot_id.ne(excluded));
    }

    let overlapping: i64 = query.count().get_result(conn)?;
    Ok(overlapping > 0)
}
