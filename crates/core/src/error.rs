// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use slot_market_domain::DomainError;
use thiserror::Error;

/// Failure reported by a repository.
///
/// `NotFound` is distinguished from every other failure so services can
/// translate it into the matching entity-level error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The requested row does not exist.
    #[error("record not found")]
    NotFound,
    /// Any other storage failure, passed through opaquely.
    #[error("storage failure: {0}")]
    Backend(String),
}

/// Coarse classification of a [`ServiceError`].
///
/// Outer layers map on this rather than on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller's identity or role is missing.
    Unauthenticated,
    /// Wrong role, unverified account, or not the resource owner.
    Authorization,
    /// The referenced entity does not exist.
    NotFound,
    /// The current state does not allow the operation.
    StateConflict,
    /// The input is malformed.
    Validation,
    /// Storage or transaction failure.
    Infrastructure,
}

/// Errors returned by service operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("caller identity is missing")]
    Unauthorized,
    #[error("caller role is missing or unrecognised")]
    NoRole,

    #[error("caller is not a client")]
    NotAClient,
    #[error("caller is not a model")]
    NotAModel,
    #[error("caller is not an admin")]
    NotAnAdmin,
    #[error("client is not verified")]
    ClientNotVerified,
    #[error("model is not verified")]
    ModelNotVerified,
    #[error("model does not own this service")]
    NotServiceOwner,
    #[error("model does not own this slot")]
    NotSlotOwner,
    #[error("client does not own this booking")]
    NotBookingOwner,
    #[error("client does not own this order")]
    NotOrderOwner,

    #[error("user not found")]
    UserNotFound,
    #[error("admin not found")]
    AdminNotFound,
    #[error("service not found")]
    ServiceNotFound,
    #[error("slot not found")]
    SlotNotFound,
    #[error("booking not found")]
    BookingNotFound,
    #[error("order not found")]
    OrderNotFound,

    #[error("slot is not available")]
    SlotNotAvailable,
    #[error("slot overlaps another slot of the same model")]
    SlotOverlap,
    #[error("service does not belong to the slot's model")]
    SlotServiceMismatch,
    #[error("service is not active")]
    ServiceNotActive,
    #[error("booking has already been processed")]
    BookingAlreadyProcessed,
    #[error("booking cannot be cancelled in its current state")]
    InvalidBookingState,
    #[error("booking has expired")]
    BookingExpired,
    #[error("order cannot be cancelled now")]
    CannotCancelOrderNow,
    #[error("order cannot be completed")]
    CannotCompleteOrder,
    #[error("a profile already exists for this identity")]
    ProfileAlreadyExists,
    #[error("an admin already exists for this identity")]
    AdminAlreadyExists,

    #[error("user is not an adult")]
    UnderageUser,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    /// Returns the stable classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized | Self::NoRole => ErrorKind::Unauthenticated,
            Self::NotAClient
            | Self::NotAModel
            | Self::NotAnAdmin
            | Self::ClientNotVerified
            | Self::ModelNotVerified
            | Self::NotServiceOwner
            | Self::NotSlotOwner
            | Self::NotBookingOwner
            | Self::NotOrderOwner => ErrorKind::Authorization,
            Self::UserNotFound
            | Self::AdminNotFound
            | Self::ServiceNotFound
            | Self::SlotNotFound
            | Self::BookingNotFound
            | Self::OrderNotFound => ErrorKind::NotFound,
            Self::SlotNotAvailable
            | Self::SlotOverlap
            | Self::ServiceNotActive
            | Self::BookingAlreadyProcessed
            | Self::InvalidBookingState
            | Self::BookingExpired
            | Self::CannotCancelOrderNow
            | Self::CannotCompleteOrder
            | Self::ProfileAlreadyExists
            | Self::AdminAlreadyExists
            | Self::Domain(DomainError::InvalidSlotTransition { .. }) => ErrorKind::StateConflict,
            Self::SlotServiceMismatch | Self::UnderageUser | Self::Domain(_) => {
                ErrorKind::Validation
            }
            Self::Repository(_) => ErrorKind::Infrastructure,
        }
    }
}

/// Translates a repository `NotFound` into an entity-specific service error.
pub(crate) trait NotFoundExt<T> {
    /// Maps `RepositoryError::NotFound` to `not_found`; other failures pass through.
    fn or_not_found(self, not_found: ServiceError) -> Result<T, ServiceError>;
}

impl<T> NotFoundExt<T> for Result<T, RepositoryError> {
    fn or_not_found(self, not_found: ServiceError) -> Result<T, ServiceError> {
        self.map_err(|err| match err {
            RepositoryError::NotFound => not_found,
            other @ RepositoryError::Backend(_) => ServiceError::Repository(other),
        })
    }
}
