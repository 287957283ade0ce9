// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types read from the database and their mapping to domain records.

use diesel::prelude::*;
use slot_market_domain::{
    Address, Admin, Booking, BookingStatus, ModelService, Order, OrderStatus, Permissions, Role,
    Slot, SlotStatus, User,
};

use crate::convert::{date_from_text, from_millis, parse_column};
use crate::diesel_schema::{admins, bookings, model_services, orders, slots, users};
use crate::error::PersistenceError;

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRow {
    pub user_id: i64,
    pub auth_id: i64,
    pub role: String,
    pub name: String,
    pub birth_date: String,
    pub is_verified: i32,
    pub created_at: i64,
}

impl TryFrom<UserRow> for User {
    type Error = PersistenceError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.user_id,
            auth_id: row.auth_id,
            role: parse_column::<Role>("users", &row.role)?,
            name: row.name,
            birth_date: date_from_text("users", &row.birth_date)?,
            is_verified: row.is_verified != 0,
            created_at: from_millis("users", row.created_at)?,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = admins)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AdminRow {
    pub admin_id: i64,
    pub auth_id: i64,
    pub permissions_json: String,
}

impl TryFrom<AdminRow> for Admin {
    type Error = PersistenceError;

    fn try_from(row: AdminRow) -> Result<Self, Self::Error> {
        let permissions: Permissions = serde_json::from_str(&row.permissions_json)?;
        Ok(Self {
            id: row.admin_id,
            auth_id: row.auth_id,
            permissions,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = model_services)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ServiceRow {
    pub service_id: i64,
    pub model_id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub is_active: i32,
    pub created_at: i64,
}

impl TryFrom<ServiceRow> for ModelService {
    type Error = PersistenceError;

    fn try_from(row: ServiceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.service_id,
            model_id: row.model_id,
            title: row.title,
            description: row.description,
            price: row.price,
            is_active: row.is_active != 0,
            created_at: from_millis("model_services", row.created_at)?,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = slots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SlotRow {
    pub slot_id: i64,
    pub model_id: i64,
    pub start_time: i64,
    pub end_time: i64,
    pub status: String,
    pub created_at: i64,
}

impl TryFrom<SlotRow> for Slot {
    type Error = PersistenceError;

    fn try_from(row: SlotRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.slot_id,
            model_id: row.model_id,
            start_time: from_millis("slots", row.start_time)?,
            end_time: from_millis("slots", row.end_time)?,
            status: parse_column::<SlotStatus>("slots", &row.status)?,
            created_at: from_millis("slots", row.created_at)?,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BookingRow {
    pub booking_id: i64,
    pub client_id: i64,
    pub service_id: i64,
    pub slot_id: i64,
    pub street: String,
    pub house: i32,
    pub apartment: Option<i32>,
    pub entrance: Option<i32>,
    pub floor: Option<i32>,
    pub comment: Option<String>,
    pub status: String,
    pub expires_at: i64,
    pub created_at: i64,
}

impl TryFrom<BookingRow> for Booking {
    type Error = PersistenceError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.booking_id,
            client_id: row.client_id,
            service_id: row.service_id,
            slot_id: row.slot_id,
            address: Address {
                street: row.street,
                house: row.house,
                apartment: row.apartment,
                entrance: row.entrance,
                floor: row.floor,
                comment: row.comment,
            },
            status: parse_column::<BookingStatus>("bookings", &row.status)?,
            expires_at: from_millis("bookings", row.expires_at)?,
            created_at: from_millis("bookings", row.created_at)?,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderRow {
    pub order_id: i64,
    pub booking_id: i64,
    pub status: String,
    pub created_at: i64,
}

impl TryFrom<OrderRow> for Order {
    type Error = PersistenceError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.order_id,
            booking_id: row.booking_id,
            status: parse_column::<OrderStatus>("orders", &row.status)?,
            created_at: from_millis("orders", row.created_at)?,
        })
    }
}

/// Converts a batch of rows, failing on the first invalid one.
pub fn convert_rows<R, T>(rows: Vec<R>) -> Result<Vec<T>, PersistenceError>
where
    T: TryFrom<R, Error = PersistenceError>,
{
    rows.into_iter().map(T::try_from).collect()
}
