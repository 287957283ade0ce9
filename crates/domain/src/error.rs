// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::slot::SlotStatus;
use thiserror::Error;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The slot lifecycle does not permit moving between these statuses.
    #[error("Slot cannot transition from {} to {}", from.as_str(), to.as_str())]
    InvalidSlotTransition {
        /// The current status.
        from: SlotStatus,
        /// The requested status.
        to: SlotStatus,
    },
    /// A slot must start strictly before it ends.
    #[error("Slot start time must be before its end time")]
    IncorrectSlotTime,
    /// A service price must be strictly positive.
    #[error("Price must be greater than zero")]
    InvalidPrice,
    /// A service description exceeds the allowed length.
    #[error("Description is {length} characters long, the maximum is {max}")]
    DescriptionTooLong {
        /// The actual length in characters.
        length: usize,
        /// The maximum permitted length.
        max: usize,
    },
    /// A user or service name is empty or invalid.
    #[error("Invalid name: {0}")]
    InvalidName(String),
    /// A status string could not be parsed.
    #[error("Invalid {entity} status: '{value}'")]
    InvalidStatus {
        /// The entity the status belongs to.
        entity: &'static str,
        /// The rejected value.
        value: String,
    },
    /// A role string could not be parsed.
    #[error("Invalid role: '{0}'")]
    InvalidRole(String),
    /// Date arithmetic overflow.
    #[error("Date arithmetic overflow while {operation}")]
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
}
