// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The catalogue of model services.
//!
//! A service that already has bookings is never edited in place. Updating it
//! retires the old offer and publishes a new one, so existing bookings keep
//! pointing at the terms they were made under.

use crate::authorization::{require_client, require_model, require_service_owner};
use crate::clock::Clock;
use crate::error::{NotFoundExt, ServiceError};
use crate::principal::Principal;
use crate::repository::Store;
use slot_market_domain::{ModelService, NewModelService, Pagination, validate_service_fields};
use tracing::{info, warn};

/// Partial update of a model service. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

/// Publishes and browses model services.
#[derive(Debug, Clone)]
pub struct CatalogService<C: Clock> {
    clock: C,
}

impl<C: Clock> CatalogService<C> {
    #[must_use]
    pub const fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Publishes an active service for the calling model.
    ///
    /// # Errors
    ///
    /// * `Domain(InvalidPrice)` if `price` is not strictly positive
    /// * `Domain(DescriptionTooLong)` if the description exceeds the limit
    /// * authorization errors unless the caller is a verified model
    pub fn create_service<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        title: String,
        description: String,
        price: f64,
    ) -> Result<ModelService, ServiceError> {
        validate_service_fields(price, &description)?;

        store.with_transaction(|tx| {
            let model = require_model(tx, principal)?;
            let new_service =
                NewModelService::active(model.id, title, description, price, self.clock.now())?;
            let service = tx.create_service(&new_service)?;
            info!(service_id = service.id, model_id = model.id, "Service created");
            Ok(service)
        })
    }

    /// Loads an active service for a client.
    ///
    /// # Errors
    ///
    /// Returns `ServiceNotFound` if the service does not exist or is inactive.
    #[allow(clippy::unused_self)]
    pub fn get_service<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        service_id: i64,
    ) -> Result<ModelService, ServiceError> {
        store.with_transaction(|tx| {
            require_client(tx, principal)?;
            let service = tx
                .get_service(service_id)
                .or_not_found(ServiceError::ServiceNotFound)?;
            if !service.is_active {
                return Err(ServiceError::ServiceNotFound);
            }
            Ok(service)
        })
    }

    /// Lists active services of every model.
    ///
    /// # Errors
    ///
    /// Returns an authorization error unless the caller is a verified client.
    #[allow(clippy::unused_self)]
    pub fn list_services<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        page: Pagination,
    ) -> Result<Vec<ModelService>, ServiceError> {
        store.with_transaction(|tx| {
            require_client(tx, principal)?;
            Ok(tx.list_active_services(page)?)
        })
    }

    /// Lists the calling model's services, inactive ones included.
    ///
    /// # Errors
    ///
    /// Returns an authorization error unless the caller is a verified model.
    #[allow(clippy::unused_self)]
    pub fn list_own_services<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        page: Pagination,
    ) -> Result<Vec<ModelService>, ServiceError> {
        store.with_transaction(|tx| {
            let model = require_model(tx, principal)?;
            Ok(tx.list_services_by_model(model.id, page)?)
        })
    }

    /// Applies `changes` to an active service owned by the caller.
    ///
    /// # Returns
    ///
    /// The service as it now stands. When the original had bookings this is
    /// a newly created service and the original is deactivated.
    ///
    /// # Errors
    ///
    /// * `Domain(InvalidPrice)` / `Domain(DescriptionTooLong)` for invalid merged values
    /// * `ServiceNotFound` / `NotServiceOwner` for a service the caller cannot edit
    /// * `ServiceNotActive` if the service was deactivated
    pub fn update_service<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        service_id: i64,
        changes: ServiceChanges,
    ) -> Result<ModelService, ServiceError> {
        store.with_transaction(|tx| {
            let model = require_model(tx, principal)?;
            let mut service = require_service_owner(tx, model.id, service_id)?;

            let title = changes.title.unwrap_or_else(|| service.title.clone());
            let description = changes
                .description
                .unwrap_or_else(|| service.description.clone());
            let price = changes.price.unwrap_or(service.price);
            validate_service_fields(price, &description)?;

            if !service.is_active {
                warn!(service_id, "Inactive services cannot be updated");
                return Err(ServiceError::ServiceNotActive);
            }

            if tx.service_has_bookings(service_id)? {
                service.is_active = false;
                tx.update_service(&service).or_not_found(ServiceError::ServiceNotFound)?;
                let replacement = NewModelService::active(
                    model.id,
                    title,
                    description,
                    price,
                    self.clock.now(),
                )?;
                let replacement = tx.create_service(&replacement)?;
                info!(
                    service_id,
                    replacement_id = replacement.id,
                    "Booked service replaced by a new offer"
                );
                return Ok(replacement);
            }

            service.title = title;
            service.description = description;
            service.price = price;
            tx.update_service(&service).or_not_found(ServiceError::ServiceNotFound)?;
            info!(service_id, "Service updated");
            Ok(service)
        })
    }

    /// Retires an active service owned by the caller.
    ///
    /// # Errors
    ///
    /// * `ServiceNotFound` / `NotServiceOwner` for a service the caller cannot edit
    /// * `ServiceNotActive` if it is already inactive
    #[allow(clippy::unused_self)]
    pub fn deactivate_service<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        service_id: i64,
    ) -> Result<ModelService, ServiceError> {
        store.with_transaction(|tx| {
            let model = require_model(tx, principal)?;
            let mut service = require_service_owner(tx, model.id, service_id)?;
            if !service.is_active {
                warn!(service_id, "Service is already inactive");
                return Err(ServiceError::ServiceNotActive);
            }

            service.is_active = false;
            tx.update_service(&service).or_not_found(ServiceError::ServiceNotFound)?;
            info!(service_id, "Service deactivated");
            Ok(service)
        })
    }
}
