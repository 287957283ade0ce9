// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking lifecycle.
//!
//! A booking is created `Pending` together with the reservation of its slot
//! and is resolved exactly once: approved or rejected by the provider, or
//! cancelled by the client. A pending booking past its expiry timestamp is
//! treated as expired even though no sweep rewrites its stored status.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Duration, OffsetDateTime};

/// Lifecycle states of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    /// Awaiting the provider's decision
    Pending,
    /// Accepted by the provider; an order exists
    Approved,
    /// Declined by the provider
    Rejected,
    /// Withdrawn by the client, or cancelled through its order
    Cancelled,
    /// Left pending past its expiry
    Expired,
}

impl BookingStatus {
    /// All booking statuses.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Approved,
        Self::Rejected,
        Self::Cancelled,
        Self::Expired,
    ];

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Cancelled => "CANCELLED",
            Self::Expired => "EXPIRED",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            "CANCELLED" => Ok(Self::Cancelled),
            "EXPIRED" => Ok(Self::Expired),
            _ => Err(DomainError::InvalidStatus {
                entity: "booking",
                value: s.to_string(),
            }),
        }
    }
}

/// Delivery address attached to a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub house: i32,
    #[serde(default)]
    pub apartment: Option<i32>,
    #[serde(default)]
    pub entrance: Option<i32>,
    #[serde(default)]
    pub floor: Option<i32>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// A persisted booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: i64,
    /// The `User` id of the client that made the booking.
    pub client_id: i64,
    pub service_id: i64,
    pub slot_id: i64,
    pub address: Address,
    pub status: BookingStatus,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

impl Booking {
    /// Returns true while the booking awaits a decision.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.status, BookingStatus::Pending)
    }

    /// Returns true if the booking is still pending and `now` is past its expiry.
    ///
    /// Resolved bookings never expire.
    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.is_pending() && now > self.expires_at
    }

    /// Returns true if the provider may still approve this booking.
    #[must_use]
    pub const fn can_be_approved(&self) -> bool {
        self.is_pending()
    }

    /// Returns true if the provider may still reject this booking.
    #[must_use]
    pub const fn can_be_rejected(&self) -> bool {
        self.is_pending()
    }

    /// Returns true if the client may still cancel this booking directly.
    ///
    /// Approved bookings are cancelled through their order instead.
    #[must_use]
    pub const fn can_be_cancelled_by_client(&self) -> bool {
        self.is_pending()
    }
}

/// A booking that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub client_id: i64,
    pub service_id: i64,
    pub slot_id: i64,
    pub address: Address,
    pub status: BookingStatus,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

impl NewBooking {
    /// Creates a `Pending` booking expiring `ttl` after `now`.
    ///
    /// # Arguments
    ///
    /// * `client_id` - The client's `User` id
    /// * `service_id` - The booked model service
    /// * `slot_id` - The reserved slot
    /// * `address` - Where the service is delivered
    /// * `now` - The creation time
    /// * `ttl` - How long the booking may stay pending
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DateArithmeticOverflow` if the expiry cannot be represented.
    pub fn pending(
        client_id: i64,
        service_id: i64,
        slot_id: i64,
        address: Address,
        now: OffsetDateTime,
        ttl: Duration,
    ) -> Result<Self, DomainError> {
        let expires_at = now
            .checked_add(ttl)
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: String::from("computing booking expiry"),
            })?;

        Ok(Self {
            client_id,
            service_id,
            slot_id,
            address,
            status: BookingStatus::Pending,
            expires_at,
            created_at: now,
        })
    }
}
