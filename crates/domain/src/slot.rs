// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Slot status tracking and transition logic.
//!
//! A slot is a provider's bookable time window. Its status moves through a
//! small lifecycle that is checked immediately before every slot write:
//!
//! | From        | Allowed targets           |
//! |-------------|---------------------------|
//! | `Available` | `Disabled`, `Reserved`    |
//! | `Reserved`  | `Booked`, `Available`     |
//! | `Booked`    | none                      |
//! | `Disabled`  | `Available`               |

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Lifecycle states of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SlotStatus {
    /// Open for booking
    Available,
    /// Held by a pending booking
    Reserved,
    /// Consumed by an approved booking
    Booked,
    /// Withdrawn by the provider
    Disabled,
}

impl SlotStatus {
    /// All slot statuses, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Available, Self::Reserved, Self::Booked, Self::Disabled];

    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Reserved => "RESERVED",
            Self::Booked => "BOOKED",
            Self::Disabled => "DISABLED",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatus` if the string is not a valid status.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "AVAILABLE" => Ok(Self::Available),
            "RESERVED" => Ok(Self::Reserved),
            "BOOKED" => Ok(Self::Booked),
            "DISABLED" => Ok(Self::Disabled),
            _ => Err(DomainError::InvalidStatus {
                entity: "slot",
                value: s.to_string(),
            }),
        }
    }

    /// Returns true if no transition out of this status exists.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Booked)
    }

    /// Returns true if the lifecycle permits moving from this status to `next`.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (*self, next),
            (Self::Available, Self::Disabled | Self::Reserved)
                | (Self::Reserved, Self::Booked | Self::Available)
                | (Self::Disabled, Self::Available)
        )
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSlotTransition` if the transition is not allowed.
    pub const fn validate_transition(&self, next: Self) -> Result<(), DomainError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(DomainError::InvalidSlotTransition {
                from: *self,
                to: next,
            })
        }
    }
}

impl FromStr for SlotStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// A persisted slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub id: i64,
    /// The `User` id of the owning provider.
    pub model_id: i64,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub status: SlotStatus,
    pub created_at: OffsetDateTime,
}

impl Slot {
    /// Returns true if the slot can currently be reserved.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self.status, SlotStatus::Available)
    }

    /// Moves the slot to `next` after checking the lifecycle table.
    ///
    /// The slot is left untouched when the transition is rejected.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSlotTransition` if the transition is not allowed.
    pub fn transition_to(&mut self, next: SlotStatus) -> Result<(), DomainError> {
        self.status.validate_transition(next)?;
        self.status = next;
        Ok(())
    }

    /// Frees a `Booked` slot whose order was cancelled.
    ///
    /// This is the single sanctioned exit from `Booked`. It is only used by
    /// order cancellation; the lifecycle table itself keeps `Booked` terminal.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSlotTransition` if the slot is not `Booked`.
    pub const fn release_for_cancelled_order(&mut self) -> Result<(), DomainError> {
        if !matches!(self.status, SlotStatus::Booked) {
            return Err(DomainError::InvalidSlotTransition {
                from: self.status,
                to: SlotStatus::Available,
            });
        }
        self.status = SlotStatus::Available;
        Ok(())
    }

    /// Returns true if this slot's window intersects `[start, end)`.
    #[must_use]
    pub fn overlaps(&self, start: OffsetDateTime, end: OffsetDateTime) -> bool {
        self.start_time < end && start < self.end_time
    }
}

/// A slot that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSlot {
    pub model_id: i64,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub status: SlotStatus,
    pub created_at: OffsetDateTime,
}

impl NewSlot {
    /// Creates an `Available` slot for a provider.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::IncorrectSlotTime` unless `start < end`.
    pub fn available(
        model_id: i64,
        start_time: OffsetDateTime,
        end_time: OffsetDateTime,
        now: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        crate::validation::validate_slot_window(start_time, end_time)?;
        Ok(Self {
            model_id,
            start_time,
            end_time,
            status: SlotStatus::Available,
            created_at: now,
        })
    }
}
