// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order lifecycle.
//!
//! An order is derived from exactly one approved booking. Eligibility for
//! cancellation and completion is a pure function of the order status, the
//! slot window and the supplied `now`.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Duration, OffsetDateTime};

/// Minimum lead time before the slot start for an order to be cancellable.
pub const CANCELLATION_LEAD_TIME: Duration = Duration::hours(24);

/// Lifecycle states of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Created from an approved booking
    Confirmed,
    /// Service delivery is under way
    InTransit,
    /// Service delivered
    Completed,
    /// Cancelled before delivery
    Cancelled,
}

impl OrderStatus {
    /// All order statuses.
    pub const ALL: [Self; 4] = [
        Self::Confirmed,
        Self::InTransit,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "CONFIRMED",
            Self::InTransit => "INTRANSIT",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Returns true if this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONFIRMED" => Ok(Self::Confirmed),
            "INTRANSIT" => Ok(Self::InTransit),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidStatus {
                entity: "order",
                value: s.to_string(),
            }),
        }
    }
}

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: i64,
    pub booking_id: i64,
    pub status: OrderStatus,
    pub created_at: OffsetDateTime,
}

impl Order {
    /// Returns true if the order may be cancelled at `now` for a slot starting at `slot_start`.
    ///
    /// Requires `Confirmed` and strictly more than [`CANCELLATION_LEAD_TIME`]
    /// before the slot starts. Exactly at the cutoff the order is no longer
    /// cancellable.
    #[must_use]
    pub fn can_be_cancelled(&self, now: OffsetDateTime, slot_start: OffsetDateTime) -> bool {
        matches!(self.status, OrderStatus::Confirmed)
            && slot_start
                .checked_sub(CANCELLATION_LEAD_TIME)
                .is_some_and(|cutoff| now < cutoff)
    }

    /// Returns true if the order may be completed at `now` for a slot ending at `slot_end`.
    #[must_use]
    pub fn can_be_completed(&self, now: OffsetDateTime, slot_end: OffsetDateTime) -> bool {
        matches!(self.status, OrderStatus::InTransit) && now > slot_end
    }
}

/// An order that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub booking_id: i64,
    pub status: OrderStatus,
    pub created_at: OffsetDateTime,
}

impl NewOrder {
    /// Creates a `Confirmed` order for an approved booking.
    #[must_use]
    pub const fn confirmed(booking_id: i64, now: OffsetDateTime) -> Self {
        Self {
            booking_id,
            status: OrderStatus::Confirmed,
            created_at: now,
        }
    }
}
