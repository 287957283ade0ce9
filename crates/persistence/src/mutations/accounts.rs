// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use slot_market_domain::{Admin, NewAdmin, NewUser, User};
use tracing::{debug, info};

use super::require_updated;
use crate::backend::sqlite::get_last_insert_rowid;
use crate::convert::{date_to_text, flag, to_millis};
use crate::diesel_schema::{admins, users};
use crate::error::PersistenceError;

/// Inserts an unverified user profile.
///
/// # Errors
///
/// Returns an error if the insert fails, including a duplicate auth id.
pub fn insert_user(conn: &mut SqliteConnection, user: &NewUser) -> Result<User, PersistenceError> {
    let birth_date: String = date_to_text(user.birth_date)?;

    diesel::insert_into(users::table)
        .values((
            users::auth_id.eq(user.auth_id),
            users::role.eq(user.role.as_str()),
            users::name.eq(&user.name),
            users::birth_date.eq(&birth_date),
            users::is_verified.eq(flag(false)),
            users::created_at.eq(to_millis(user.created_at)),
        ))
        .execute(conn)?;

    let user_id: i64 = get_last_insert_rowid(conn)?;
    info!(user_id, auth_id = user.auth_id, role = user.role.as_str(), "Created user");

    Ok(User {
        id: user_id,
        auth_id: user.auth_id,
        role: user.role,
        name: user.name.clone(),
        birth_date: user.birth_date,
        is_verified: false,
        created_at: user.created_at,
    })
}

/// Writes the mutable profile fields of a user.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the user does not exist.
pub fn update_user(conn: &mut SqliteConnection, user: &User) -> Result<(), PersistenceError> {
    debug!(user_id = user.id, "Updating user");
    let birth_date: String = date_to_text(user.birth_date)?;

    let affected: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user.id))
        .set((
            users::name.eq(&user.name),
            users::birth_date.eq(&birth_date),
            users::is_verified.eq(flag(user.is_verified)),
        ))
        .execute(conn)?;

    require_updated("users", user.id, affected)
}

/// Inserts an admin.
///
/// # Errors
///
/// Returns an error if the insert fails, including a duplicate auth id.
pub fn insert_admin(
    conn: &mut SqliteConnection,
    admin: &NewAdmin,
) -> Result<Admin, PersistenceError> {
    let permissions_json: String = serde_json::to_string(&admin.permissions)?;

    diesel::insert_into(admins::table)
        .values((
            admins::auth_id.eq(admin.auth_id),
            admins::permissions_json.eq(&permissions_json),
        ))
        .execute(conn)?;

    let admin_id: i64 = get_last_insert_rowid(conn)?;
    info!(admin_id, auth_id = admin.auth_id, "Created admin");

    Ok(Admin {
        id: admin_id,
        auth_id: admin.auth_id,
        permissions: admin.permissions.clone(),
    })
}

/// Replaces an admin's permission set.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the admin does not exist.
pub fn update_admin(conn: &mut SqliteConnection, admin: &Admin) -> Result<(), PersistenceError> {
    let permissions_json: String = serde_json::to_string(&admin.permissions)?;

    let affected: usize = diesel::update(admins::table)
        .filter(admins::admin_id.eq(admin.id))
        .set(admins::permissions_json.eq(&permissions_json))
        .execute(conn)?;

    require_updated("admins", admin.id, affected)
}
