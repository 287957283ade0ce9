// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller resolution shared by every service.
//!
//! Each helper checks the principal's role first, then loads the caller's
//! record, then checks verification. The first failing step decides the
//! error.

use crate::error::{NotFoundExt, RepositoryError, ServiceError};
use crate::principal::Principal;
use crate::repository::{AdminRepository, ModelServiceRepository, UserRepository};
use slot_market_domain::{Admin, ModelService, Role, User};
use tracing::warn;

/// Resolves the caller as a verified client.
///
/// # Errors
///
/// * `ServiceError::NotAClient` if the role is not `Client` or no client profile exists
/// * `ServiceError::ClientNotVerified` if the profile is not verified
pub fn require_client<R: UserRepository + ?Sized>(
    repo: &mut R,
    principal: &Principal,
) -> Result<User, ServiceError> {
    require_verified_user(
        repo,
        principal,
        Role::Client,
        ServiceError::NotAClient,
        ServiceError::ClientNotVerified,
    )
}

/// Resolves the caller as a verified model.
///
/// # Errors
///
/// * `ServiceError::NotAModel` if the role is not `Model` or no model profile exists
/// * `ServiceError::ModelNotVerified` if the profile is not verified
pub fn require_model<R: UserRepository + ?Sized>(
    repo: &mut R,
    principal: &Principal,
) -> Result<User, ServiceError> {
    require_verified_user(
        repo,
        principal,
        Role::Model,
        ServiceError::NotAModel,
        ServiceError::ModelNotVerified,
    )
}

fn require_verified_user<R: UserRepository + ?Sized>(
    repo: &mut R,
    principal: &Principal,
    role: Role,
    wrong_role: ServiceError,
    not_verified: ServiceError,
) -> Result<User, ServiceError> {
    if principal.role() != role {
        warn!(
            auth_id = principal.auth_id(),
            role = principal.role().as_str(),
            required = role.as_str(),
            "Rejected caller with wrong role"
        );
        return Err(wrong_role);
    }

    let user = match repo.get_user_by_auth_id(principal.auth_id()) {
        Ok(user) if user.role == role => user,
        Ok(_) | Err(RepositoryError::NotFound) => {
            warn!(
                auth_id = principal.auth_id(),
                required = role.as_str(),
                "No matching profile for caller"
            );
            return Err(wrong_role);
        }
        Err(e) => return Err(e.into()),
    };

    if !user.is_verified {
        warn!(
            auth_id = principal.auth_id(),
            user_id = user.id,
            "Rejected unverified caller"
        );
        return Err(not_verified);
    }

    Ok(user)
}

/// Resolves the caller as an admin.
///
/// # Errors
///
/// Returns `ServiceError::NotAnAdmin` if the role is not `Admin` or no admin record exists.
pub fn require_admin<R: AdminRepository + ?Sized>(
    repo: &mut R,
    principal: &Principal,
) -> Result<Admin, ServiceError> {
    if principal.role() != Role::Admin {
        warn!(
            auth_id = principal.auth_id(),
            role = principal.role().as_str(),
            "Rejected non-admin caller"
        );
        return Err(ServiceError::NotAnAdmin);
    }

    match repo.get_admin_by_auth_id(principal.auth_id()) {
        Ok(admin) => Ok(admin),
        Err(RepositoryError::NotFound) => {
            warn!(auth_id = principal.auth_id(), "No admin record for caller");
            Err(ServiceError::NotAnAdmin)
        }
        Err(e) => Err(e.into()),
    }
}

/// Loads a service and checks that `model_id` owns it.
///
/// Inactive services are included.
///
/// # Errors
///
/// * `ServiceError::ServiceNotFound` if the service does not exist
/// * `ServiceError::NotServiceOwner` if another model owns it
pub fn require_service_owner<R: ModelServiceRepository + ?Sized>(
    repo: &mut R,
    model_id: i64,
    service_id: i64,
) -> Result<ModelService, ServiceError> {
    let service = repo
        .get_service(service_id)
        .or_not_found(ServiceError::ServiceNotFound)?;

    if !service.is_owned_by(model_id) {
        warn!(
            model_id,
            service_id,
            owner_id = service.model_id,
            "Rejected caller that does not own the service"
        );
        return Err(ServiceError::NotServiceOwner);
    }

    Ok(service)
}
