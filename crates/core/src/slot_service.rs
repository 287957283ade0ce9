// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Slot publishing for models and slot browsing for clients.

use crate::authorization::{require_client, require_model};
use crate::clock::Clock;
use crate::error::{NotFoundExt, RepositoryError, ServiceError};
use crate::principal::Principal;
use crate::repository::Store;
use slot_market_domain::{NewSlot, Role, Slot, SlotStatus, User, validate_slot_window};
use time::OffsetDateTime;
use tracing::{info, warn};

/// Manages a model's slots.
#[derive(Debug, Clone)]
pub struct SlotService<C: Clock> {
    clock: C,
}

impl<C: Clock> SlotService<C> {
    #[must_use]
    pub const fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Publishes an `Available` slot for the calling model.
    ///
    /// The window is validated before the caller is resolved.
    ///
    /// # Errors
    ///
    /// * `Domain(IncorrectSlotTime)` unless `start < end`
    /// * `SlotOverlap` if the window intersects another non-disabled slot of the model
    pub fn create_slot<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Slot, ServiceError> {
        validate_slot_window(start, end)?;

        store.with_transaction(|tx| {
            let model = require_model(tx, principal)?;
            ensure_no_overlap(tx, model.id, start, end, None)?;

            let new_slot = NewSlot::available(model.id, start, end, self.clock.now())?;
            let slot = tx.create_slot(&new_slot)?;
            info!(slot_id = slot.id, model_id = model.id, "Slot created");
            Ok(slot)
        })
    }

    /// Moves an `Available` slot to a new window.
    ///
    /// Missing bounds keep their current value.
    ///
    /// # Errors
    ///
    /// * `SlotNotFound` / `NotSlotOwner` for a slot the caller cannot edit
    /// * `SlotNotAvailable` if the slot is not `Available`
    /// * `Domain(IncorrectSlotTime)` unless the resulting `start < end`
    /// * `SlotOverlap` if the new window intersects another slot of the model
    pub fn update_slot<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        slot_id: i64,
        start: Option<OffsetDateTime>,
        end: Option<OffsetDateTime>,
    ) -> Result<Slot, ServiceError> {
        store.with_transaction(|tx| {
            let model = require_model(tx, principal)?;
            let mut slot = load_owned_slot(tx, &model, slot_id)?;
            if !slot.is_available() {
                warn!(
                    slot_id,
                    status = slot.status.as_str(),
                    "Only available slots can be edited"
                );
                return Err(ServiceError::SlotNotAvailable);
            }

            let start = start.unwrap_or(slot.start_time);
            let end = end.unwrap_or(slot.end_time);
            validate_slot_window(start, end)?;
            ensure_no_overlap(tx, model.id, start, end, Some(slot_id))?;

            slot.start_time = start;
            slot.end_time = end;
            tx.update_slot(&slot).or_not_found(ServiceError::SlotNotFound)?;
            info!(slot_id, "Slot updated");
            Ok(slot)
        })
    }

    /// Withdraws an `Available` slot from booking.
    ///
    /// # Errors
    ///
    /// * `SlotNotFound` / `NotSlotOwner` for a slot the caller cannot edit
    /// * `SlotNotAvailable` if the slot is not `Available`
    pub fn deactivate_slot<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        slot_id: i64,
    ) -> Result<Slot, ServiceError> {
        store.with_transaction(|tx| {
            let model = require_model(tx, principal)?;
            let mut slot = load_owned_slot(tx, &model, slot_id)?;
            if !slot.is_available() {
                warn!(
                    slot_id,
                    status = slot.status.as_str(),
                    "Only available slots can be deactivated"
                );
                return Err(ServiceError::SlotNotAvailable);
            }

            slot.transition_to(SlotStatus::Disabled)?;
            tx.update_slot(&slot).or_not_found(ServiceError::SlotNotFound)?;
            info!(slot_id, "Slot deactivated");
            Ok(slot)
        })
    }

    /// Returns a `Disabled` slot to `Available`.
    ///
    /// # Errors
    ///
    /// * `SlotNotFound` / `NotSlotOwner` for a slot the caller cannot edit
    /// * `Domain(InvalidSlotTransition)` if the slot is not `Disabled`
    /// * `SlotOverlap` if a slot published meanwhile intersects it
    pub fn reactivate_slot<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        slot_id: i64,
    ) -> Result<Slot, ServiceError> {
        store.with_transaction(|tx| {
            let model = require_model(tx, principal)?;
            let mut slot = load_owned_slot(tx, &model, slot_id)?;

            slot.transition_to(SlotStatus::Available)?;
            ensure_no_overlap(tx, model.id, slot.start_time, slot.end_time, Some(slot_id))?;
            tx.update_slot(&slot).or_not_found(ServiceError::SlotNotFound)?;
            info!(slot_id, "Slot reactivated");
            Ok(slot)
        })
    }

    /// Lists every slot of the calling model.
    ///
    /// # Errors
    ///
    /// Returns an authorization error unless the caller is a verified model.
    #[allow(clippy::unused_self)]
    pub fn list_own_slots<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
    ) -> Result<Vec<Slot>, ServiceError> {
        store.with_transaction(|tx| {
            let model = require_model(tx, principal)?;
            Ok(tx.list_slots_by_model(model.id)?)
        })
    }

    /// Lists a model's slots for a client, hiding disabled ones.
    ///
    /// # Errors
    ///
    /// * authorization errors unless the caller is a verified client
    /// * `NotAModel` if `model_id` is not a verified model
    #[allow(clippy::unused_self)]
    pub fn list_model_slots<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        model_id: i64,
    ) -> Result<Vec<Slot>, ServiceError> {
        store.with_transaction(|tx| {
            require_client(tx, principal)?;

            let model = match tx.get_user(model_id) {
                Ok(user) => user,
                Err(RepositoryError::NotFound) => return Err(ServiceError::NotAModel),
                Err(e) => return Err(e.into()),
            };
            if model.role != Role::Model || !model.is_verified {
                warn!(model_id, "Requested slots of a user that is not a verified model");
                return Err(ServiceError::NotAModel);
            }

            let slots = tx.list_slots_by_model(model_id)?;
            Ok(slots
                .into_iter()
                .filter(|slot| slot.status != SlotStatus::Disabled)
                .collect())
        })
    }
}

fn load_owned_slot<S: Store>(
    tx: &mut S,
    model: &User,
    slot_id: i64,
) -> Result<Slot, ServiceError> {
    let slot = tx.get_slot(slot_id).or_not_found(ServiceError::SlotNotFound)?;
    if slot.model_id != model.id {
        warn!(slot_id, model_id = model.id, "Model does not own the slot");
        return Err(ServiceError::NotSlotOwner);
    }
    Ok(slot)
}

fn ensure_no_overlap<S: Store>(
    tx: &mut S,
    model_id: i64,
    start: OffsetDateTime,
    end: OffsetDateTime,
    exclude_slot_id: Option<i64>,
) -> Result<(), ServiceError> {
    if tx.has_overlapping_slot(model_id, start, end, exclude_slot_id)? {
        warn!(model_id, %start, %end, "Slot overlaps an existing slot");
        return Err(ServiceError::SlotOverlap);
    }
    Ok(())
}
