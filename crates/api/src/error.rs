// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.
//!
//! Every [`ApiError`] carries a stable machine-readable code. Codes are part
//! of the API contract; message text is not.

use slot_market::ServiceError;
use slot_market_domain::DomainError;
use thiserror::Error;
use tracing::error;

/// API-level errors.
///
/// These are distinct from service and domain errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The caller's identity or role is missing or malformed.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// Stable error code.
        code: &'static str,
        /// The reason authentication failed.
        reason: String,
    },
    /// The caller is authenticated but not allowed to perform the action.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Stable error code.
        code: &'static str,
        /// A human-readable description of the refusal.
        message: String,
    },
    /// A requested resource was not found.
    #[error("{resource_type} not found")]
    ResourceNotFound {
        /// Stable error code.
        code: &'static str,
        /// The type of resource that was not found.
        resource_type: &'static str,
    },
    /// The current state of a resource does not allow the operation.
    #[error("Domain rule violation ({code}): {message}")]
    DomainRuleViolation {
        /// Stable error code.
        code: &'static str,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// Stable error code.
        code: &'static str,
        /// The field that was invalid.
        field: &'static str,
        /// A human-readable description of the error.
        message: String,
    },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Returns the stable machine-readable code of this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed { code, .. }
            | Self::Unauthorized { code, .. }
            | Self::ResourceNotFound { code, .. }
            | Self::DomainRuleViolation { code, .. }
            | Self::InvalidInput { code, .. } => code,
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

const fn unauthorized(code: &'static str, message: String) -> ApiError {
    ApiError::Unauthorized { code, message }
}

const fn not_found(code: &'static str, resource_type: &'static str) -> ApiError {
    ApiError::ResourceNotFound {
        code,
        resource_type,
    }
}

const fn conflict(code: &'static str, message: String) -> ApiError {
    ApiError::DomainRuleViolation { code, message }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: &DomainError) -> ApiError {
    let message = err.to_string();
    match err {
        DomainError::InvalidSlotTransition { .. } => ApiError::DomainRuleViolation {
            code: "INVALID_SLOT_TRANSITION",
            message,
        },
        DomainError::IncorrectSlotTime => ApiError::InvalidInput {
            code: "INCORRECT_SLOT_TIME",
            field: "end_time",
            message,
        },
        DomainError::InvalidPrice => ApiError::InvalidInput {
            code: "INVALID_PRICE",
            field: "price",
            message,
        },
        DomainError::DescriptionTooLong { .. } => ApiError::InvalidInput {
            code: "DESCRIPTION_TOO_LONG",
            field: "description",
            message,
        },
        DomainError::InvalidName(_) => ApiError::InvalidInput {
            code: "INVALID_NAME",
            field: "name",
            message,
        },
        DomainError::InvalidStatus { .. } => ApiError::InvalidInput {
            code: "INVALID_STATUS",
            field: "status",
            message,
        },
        DomainError::InvalidRole(_) => ApiError::InvalidInput {
            code: "INVALID_ROLE",
            field: "role",
            message,
        },
        DomainError::DateArithmeticOverflow { .. } => ApiError::InvalidInput {
            code: "DATE_OUT_OF_RANGE",
            field: "date",
            message,
        },
    }
}

/// Translates a service error into an API error.
///
/// Storage failures become [`ApiError::Internal`]; the underlying message
/// is logged, never returned.
#[must_use]
pub fn translate_service_error(err: ServiceError) -> ApiError {
    let message = err.to_string();
    match err {
        ServiceError::Unauthorized => ApiError::AuthenticationFailed {
            code: "UNAUTHORIZED",
            reason: message,
        },
        ServiceError::NoRole => ApiError::AuthenticationFailed {
            code: "NO_ROLE",
            reason: message,
        },
        ServiceError::NotAClient => unauthorized("NOT_A_CLIENT", message),
        ServiceError::NotAModel => unauthorized("NOT_A_MODEL", message),
        ServiceError::NotAnAdmin => unauthorized("NOT_AN_ADMIN", message),
        ServiceError::ClientNotVerified => unauthorized("CLIENT_NOT_VERIFIED", message),
        ServiceError::ModelNotVerified => unauthorized("MODEL_NOT_VERIFIED", message),
        ServiceError::NotServiceOwner => unauthorized("NOT_SERVICE_OWNER", message),
        ServiceError::NotSlotOwner => unauthorized("NOT_SLOT_OWNER", message),
        ServiceError::NotBookingOwner => unauthorized("NOT_BOOKING_OWNER", message),
        ServiceError::NotOrderOwner => unauthorized("NOT_ORDER_OWNER", message),
        ServiceError::UserNotFound => not_found("USER_NOT_FOUND", "User"),
        ServiceError::AdminNotFound => not_found("ADMIN_NOT_FOUND", "Admin"),
        ServiceError::ServiceNotFound => not_found("SERVICE_NOT_FOUND", "Service"),
        ServiceError::SlotNotFound => not_found("SLOT_NOT_FOUND", "Slot"),
        ServiceError::BookingNotFound => not_found("BOOKING_NOT_FOUND", "Booking"),
        ServiceError::OrderNotFound => not_found("ORDER_NOT_FOUND", "Order"),
        ServiceError::SlotNotAvailable => conflict("SLOT_NOT_AVAILABLE", message),
        ServiceError::SlotOverlap => conflict("SLOT_OVERLAP", message),
        ServiceError::ServiceNotActive => conflict("SERVICE_NOT_ACTIVE", message),
        ServiceError::BookingAlreadyProcessed => conflict("BOOKING_ALREADY_PROCESSED", message),
        ServiceError::InvalidBookingState => conflict("INVALID_BOOKING_STATE", message),
        ServiceError::BookingExpired => conflict("BOOKING_EXPIRED", message),
        ServiceError::CannotCancelOrderNow => conflict("CANNOT_CANCEL_ORDER_NOW", message),
        ServiceError::CannotCompleteOrder => conflict("CANNOT_COMPLETE_ORDER", message),
        ServiceError::ProfileAlreadyExists => conflict("PROFILE_ALREADY_EXISTS", message),
        ServiceError::AdminAlreadyExists => conflict("ADMIN_ALREADY_EXISTS", message),
        ServiceError::SlotServiceMismatch => ApiError::InvalidInput {
            code: "SLOT_SERVICE_MISMATCH",
            field: "service_id",
            message,
        },
        ServiceError::UnderageUser => ApiError::InvalidInput {
            code: "UNDERAGE_USER",
            field: "birth_date",
            message,
        },
        ServiceError::Domain(domain_err) => translate_domain_error(&domain_err),
        ServiceError::Repository(repo_err) => {
            error!(error = %repo_err, "Storage failure");
            ApiError::Internal {
                message: String::from("storage failure"),
            }
        }
    }
}
