// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use num_traits::ToPrimitive;
use slot_market_domain::{Admin, Pagination, Role, User};

use crate::data_models::{AdminRow, UserRow, convert_rows};
use crate::diesel_schema::{admins, users};
use crate::error::PersistenceError;

/// Loads a user by id.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no user has this id.
pub fn find_user(conn: &mut SqliteConnection, user_id: i64) -> Result<User, PersistenceError> {
    let row: UserRow = users::table
        .filter(users::user_id.eq(user_id))
        .select(UserRow::as_select())
        .first(conn)?;
    User::try_from(row)
}

/// Loads a user by the identity assigned by the authentication layer.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no user has this auth id.
pub fn find_user_by_auth_id(
    conn: &mut SqliteConnection,
    auth_id: i64,
) -> Result<User, PersistenceError> {
    let row: UserRow = users::table
        .filter(users::auth_id.eq(auth_id))
        .select(UserRow::as_select())
        .first(conn)?;
    User::try_from(row)
}

/// Lists users in id order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_users(
    conn: &mut SqliteConnection,
    page: Pagination,
) -> Result<Vec<User>, PersistenceError> {
    let rows: Vec<UserRow> = users::table
        .order(users::user_id.asc())
        .limit(page.limit())
        .offset(page.offset())
        .select(UserRow::as_select())
        .load(conn)?;
    convert_rows(rows)
}

/// Counts users holding `role`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_users_by_role(
    conn: &mut SqliteConnection,
    role: Role,
) -> Result<u64, PersistenceError> {
    let count: i64 = users::table
        .filter(users::role.eq(role.as_str()))
        .count()
        .get_result(conn)?;
    count
        .to_u64()
        .ok_or_else(|| PersistenceError::QueryFailed(format!("negative user count: {count}")))
}

/// Loads an admin by id.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no admin has this id.
pub fn find_admin(conn: &mut SqliteConnection, admin_id: i64) -> Result<Admin, PersistenceError> {
    let row: AdminRow = admins::table
        .filter(admins::admin_id.eq(admin_id))
        .select(AdminRow::as_select())
        .first(conn)?;
    Admin::try_from(row)
}

/// Loads an admin by auth id.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no admin has this auth id.
pub fn find_admin_by_auth_id(
    conn: &mut SqliteConnection,
    auth_id: i64,
) -> Result<Admin, PersistenceError> {
    let row: AdminRow = admins::table
        .filter(admins::auth_id.eq(auth_id))
        .select(AdminRow::as_select())
        .first(conn)?;
    Admin::try_from(row)
}
