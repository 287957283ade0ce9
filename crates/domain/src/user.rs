// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Marketplace participants and administrators.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use time::{Date, Month, OffsetDateTime};

/// Age from which a user may be verified.
pub const AGE_OF_MAJORITY: i32 = 18;

/// Roles supplied by the authentication layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Books slots
    Client,
    /// Offers services and publishes slots
    Model,
    /// Oversees the marketplace
    Admin,
}

impl Role {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "CLIENT",
            Self::Model => "MODEL",
            Self::Admin => "ADMIN",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CLIENT" => Ok(Self::Client),
            "MODEL" => Ok(Self::Model),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

/// A client or provider profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    /// Identity issued by the authentication layer.
    pub auth_id: i64,
    pub role: Role,
    pub name: String,
    pub birth_date: Date,
    pub is_verified: bool,
    pub created_at: OffsetDateTime,
}

impl User {
    /// Returns true if the user's 18th birthday is strictly before `now`.
    ///
    /// A 29 February birthday rolls over to 1 March in non-leap years.
    #[must_use]
    pub fn is_adult(&self, now: OffsetDateTime) -> bool {
        let year = self.birth_date.year() + AGE_OF_MAJORITY;
        let adulthood = self.birth_date.replace_year(year).ok().or_else(|| {
            Date::from_calendar_date(year, Month::March, 1).ok()
        });

        adulthood.is_some_and(|date| date.midnight().assume_utc() < now)
    }
}

/// A user profile that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub auth_id: i64,
    pub role: Role,
    pub name: String,
    pub birth_date: Date,
    pub created_at: OffsetDateTime,
}

/// Named permission flags held by an administrator.
pub type Permissions = BTreeMap<String, bool>;

/// An administrator record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admin {
    pub id: i64,
    pub auth_id: i64,
    pub permissions: Permissions,
}

/// An administrator that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAdmin {
    pub auth_id: i64,
    pub permissions: Permissions,
}
