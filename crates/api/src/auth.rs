// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller identity resolution.
//!
//! Authentication happens upstream. The authentication layer forwards the
//! caller's identity and role as two header values, which are turned into a
//! [`Principal`] here.

use slot_market::Principal;
use tracing::debug;

use crate::error::{ApiError, translate_service_error};

/// Header carrying the caller's numeric identity.
pub const AUTH_ID_HEADER: &str = "x-auth-id";

/// Header carrying the caller's role (`CLIENT`, `MODEL` or `ADMIN`).
pub const ROLE_HEADER: &str = "x-role";

/// Builds a principal from the raw identity and role header values.
///
/// # Arguments
///
/// * `auth_id` - The raw identity header value, if present
/// * `role` - The raw role header value, if present
///
/// # Errors
///
/// * `UNAUTHORIZED` if the identity is absent or not an integer
/// * `NO_ROLE` if the role is absent or unrecognised
pub fn resolve_principal(auth_id: Option<&str>, role: Option<&str>) -> Result<Principal, ApiError> {
    let parsed_id: Option<i64> = match auth_id.map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse().map_err(|_| {
            debug!(raw, "Rejected malformed identity header");
            ApiError::AuthenticationFailed {
                code: "UNAUTHORIZED",
                reason: format!("'{raw}' is not a valid identity"),
            }
        })?),
    };

    Principal::from_parts(parsed_id, role.map(str::trim)).map_err(translate_service_error)
}
