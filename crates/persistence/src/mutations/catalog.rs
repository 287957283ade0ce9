// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use slot_market_domain::{ModelService, NewModelService, NewSlot, Slot};
use tracing::{debug, info};

use super::require_updated;
use crate::backend::sqlite::get_last_insert_rowid;
use crate::convert::{flag, to_millis};
use crate::diesel_schema::{model_services, slots};
use crate::error::PersistenceError;

/// Inserts a service offering.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_service(
    conn: &mut SqliteConnection,
    service: &NewModelService,
) -> Result<ModelService, PersistenceError> {
    diesel::insert_into(model_services::table)
        .values((
            model_services::model_id.eq(service.model_id),
            model_services::title.eq(&service.title),
            model_services::description.eq(&service.description),
            model_services::price.eq(service.price),
            model_services::is_active.eq(flag(service.is_active)),
            model_services::created_at.eq(to_millis(service.created_at)),
        ))
        .execute(conn)?;

    let service_id: i64 = get_last_insert_rowid(conn)?;
    info!(service_id, model_id = service.model_id, "Created service");

    Ok(ModelService {
        id: service_id,
        model_id: service.model_id,
        title: service.title.clone(),
        description: service.description.clone(),
        price: service.price,
        is_active: service.is_active,
        created_at: service.created_at,
    })
}

/// Writes a service's descriptive fields and active flag.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the service does not exist.
pub fn update_service(
    conn: &mut SqliteConnection,
    service: &ModelService,
) -> Result<(), PersistenceError> {
    debug!(service_id = service.id, "Updating service");

    let affected: usize = diesel::update(model_services::table)
        .filter(model_services::service_id.eq(service.id))
        .set((
            model_services::title.eq(&service.title),
            model_services::description.eq(&service.description),
            model_services::price.eq(service.price),
            model_services::is_active.eq(flag(service.is_active)),
        ))
        .execute(conn)?;

    require_updated("model_services", service.id, affected)
}

/// Inserts a slot.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_slot(conn: &mut SqliteConnection, slot: &NewSlot) -> Result<Slot, PersistenceError> {
    diesel::insert_into(slots::table)
        .values((
            slots::model_id.eq(slot.model_id),
            slots::start_time.eq(to_millis(slot.start_time)),
            slots::end_time.eq(to_millis(slot.end_time)),
            slots::status.eq(slot.status.as_str()),
            slots::created_at.eq(to_millis(slot.created_at)),
        ))
        .execute(conn)?;

    let slot_id: i64 = get_last_insert_rowid(conn)?;
    info!(slot_id, model_id = slot.model_id, "Created slot");

    Ok(Slot {
        id: slot_id,
        model_id: slot.model_id,
        start_time: slot.start_time,
        end_time: slot.end_time,
        status: slot.status,
        created_at: slot.created_at,
    })
}

/// Writes a slot's window and status.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the slot does not exist.
pub fn update_slot(conn: &mut SqliteConnection, slot: &Slot) -> Result<(), PersistenceError> {
    debug!(slot_id = slot.id, status = slot.status.as_str(), "Updating slot");

    let affected: usize = diesel::update(slots::table)
        .filter(slots::slot_id.eq(slot.id))
        .set((
            slots::start_time.eq(to_millis(slot.start_time)),
            slots::end_time.eq(to_millis(slot.end_time)),
            slots::status.eq(slot.status.as_str()),
        ))
        .execute(conn)?;

    require_updated("slots", slot.id, affected)
}
