// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use time::OffsetDateTime;

/// Maximum length of a model service description, in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// Validates that a slot window is non-empty.
///
/// # Errors
///
/// Returns `DomainError::IncorrectSlotTime` unless `start < end`.
pub fn validate_slot_window(
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<(), DomainError> {
    if start < end {
        Ok(())
    } else {
        Err(DomainError::IncorrectSlotTime)
    }
}

/// Validates the payload of a model service.
///
/// # Arguments
///
/// * `price` - Must be strictly positive
/// * `description` - At most [`MAX_DESCRIPTION_LENGTH`] characters
///
/// # Errors
///
/// Returns `DomainError::InvalidPrice` or `DomainError::DescriptionTooLong`.
/// Price is checked first.
pub fn validate_service_fields(price: f64, description: &str) -> Result<(), DomainError> {
    if price.is_nan() || price <= 0.0 {
        return Err(DomainError::InvalidPrice);
    }

    let length = description.chars().count();
    if length > MAX_DESCRIPTION_LENGTH {
        return Err(DomainError::DescriptionTooLong {
            length,
            max: MAX_DESCRIPTION_LENGTH,
        });
    }

    Ok(())
}

/// Validates a display name.
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the name is blank.
pub fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }
    Ok(())
}
