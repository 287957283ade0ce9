// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::clock::Clock;
use crate::error::{NotFoundExt, RepositoryError, ServiceError};
use crate::principal::Principal;
use crate::repository::Store;
use slot_market_domain::{DomainError, NewUser, Role, User, validate_name};
use time::Date;
use tracing::{info, warn};

/// Profiles of clients and models.
#[derive(Debug, Clone)]
pub struct UserService<C: Clock> {
    clock: C,
}

impl<C: Clock> UserService<C> {
    #[must_use]
    pub const fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Creates the caller's profile with the caller's role.
    ///
    /// New profiles start unverified; an admin verifies them later.
    ///
    /// # Errors
    ///
    /// * `Domain(InvalidName)` for a blank name
    /// * `Domain(InvalidRole)` for admin callers, who have no profile
    /// * `ProfileAlreadyExists` if the caller already has one
    pub fn create_profile<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        name: String,
        birth_date: Date,
    ) -> Result<User, ServiceError> {
        validate_name(&name)?;
        if principal.role() == Role::Admin {
            return Err(DomainError::InvalidRole(principal.role().as_str().to_string()).into());
        }

        store.with_transaction(|tx| {
            match tx.get_user_by_auth_id(principal.auth_id()) {
                Ok(existing) => {
                    warn!(
                        auth_id = principal.auth_id(),
                        user_id = existing.id,
                        "Profile already exists"
                    );
                    return Err(ServiceError::ProfileAlreadyExists);
                }
                Err(RepositoryError::NotFound) => {}
                Err(e) => return Err(e.into()),
            }

            let user = tx.create_user(&NewUser {
                auth_id: principal.auth_id(),
                role: principal.role(),
                name,
                birth_date,
                created_at: self.clock.now(),
            })?;
            info!(
                user_id = user.id,
                auth_id = user.auth_id,
                role = user.role.as_str(),
                "Profile created"
            );
            Ok(user)
        })
    }

    /// # Errors
    ///
    /// Returns `UserNotFound` if no user has this id.
    #[allow(clippy::unused_self)]
    pub fn get_user<S: Store>(&self, store: &mut S, user_id: i64) -> Result<User, ServiceError> {
        store.with_transaction(|tx| tx.get_user(user_id).or_not_found(ServiceError::UserNotFound))
    }

    /// # Errors
    ///
    /// Returns `UserNotFound` if the caller has no profile yet.
    #[allow(clippy::unused_self)]
    pub fn get_own_profile<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
    ) -> Result<User, ServiceError> {
        store.with_transaction(|tx| {
            tx.get_user_by_auth_id(principal.auth_id())
                .or_not_found(ServiceError::UserNotFound)
        })
    }

    /// Renames the caller.
    ///
    /// # Errors
    ///
    /// * `Domain(InvalidName)` for a blank name
    /// * `UserNotFound` if the caller has no profile yet
    #[allow(clippy::unused_self)]
    pub fn update_name<S: Store>(
        &self,
        store: &mut S,
        principal: &Principal,
        name: String,
    ) -> Result<User, ServiceError> {
        validate_name(&name)?;

        store.with_transaction(|tx| {
            let mut user = tx
                .get_user_by_auth_id(principal.auth_id())
                .or_not_found(ServiceError::UserNotFound)?;
            user.name = name;
            tx.update_user(&user).or_not_found(ServiceError::UserNotFound)?;
            info!(user_id = user.id, "Profile renamed");
            Ok(user)
        })
    }
}
