// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::validation::validate_service_fields;
use time::OffsetDateTime;

/// A provider's sellable offering.
///
/// Bookings keep pointing at the offering they were made for, so an offering
/// that has bookings is never edited in place; it is deactivated and replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelService {
    pub id: i64,
    /// The `User` id of the owning provider.
    pub model_id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
}

impl ModelService {
    /// Returns true if `model_id` owns this offering.
    #[must_use]
    pub const fn is_owned_by(&self, model_id: i64) -> bool {
        self.model_id == model_id
    }
}

/// A model service that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewModelService {
    pub model_id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
}

impl NewModelService {
    /// Creates an active offering after validating price and description.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPrice` or `DomainError::DescriptionTooLong`.
    pub fn active(
        model_id: i64,
        title: String,
        description: String,
        price: f64,
        now: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        validate_service_fields(price, &description)?;
        Ok(Self {
            model_id,
            title,
            description,
            price,
            is_active: true,
            created_at: now,
        })
    }
}
