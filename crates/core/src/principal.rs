// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::ServiceError;
use slot_market_domain::Role;
use std::str::FromStr;

/// The authenticated caller of a service operation.
///
/// Produced by the authentication layer and passed explicitly to every
/// operation. `auth_id` is the identity issued by that layer, not a `User` id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    auth_id: i64,
    role: Role,
}

impl Principal {
    #[must_use]
    pub const fn new(auth_id: i64, role: Role) -> Self {
        Self { auth_id, role }
    }

    /// Builds a principal from the raw values supplied by the authentication layer.
    ///
    /// # Arguments
    ///
    /// * `auth_id` - The caller's identity, if any
    /// * `role` - The caller's role string, if any
    ///
    /// # Errors
    ///
    /// * `ServiceError::Unauthorized` if the identity is absent
    /// * `ServiceError::NoRole` if the role is absent or not a known role
    pub fn from_parts(auth_id: Option<i64>, role: Option<&str>) -> Result<Self, ServiceError> {
        let auth_id = auth_id.ok_or(ServiceError::Unauthorized)?;
        let role = role
            .and_then(|r| Role::from_str(r).ok())
            .ok_or(ServiceError::NoRole)?;
        Ok(Self { auth_id, role })
    }

    #[must_use]
    pub const fn auth_id(&self) -> i64 {
        self.auth_id
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}
