// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Column encodings shared by queries and mutations.
//!
//! Timestamps are stored as UTC unix milliseconds, calendar dates as
//! `YYYY-MM-DD` text and flags as `0`/`1` integers.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::error::PersistenceError;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Encodes a timestamp as unix milliseconds.
pub fn to_millis(at: OffsetDateTime) -> i64 {
    let millis = at.unix_timestamp_nanos() / 1_000_000;
    i64::try_from(millis).unwrap_or(i64::MAX)
}

/// Decodes unix milliseconds stored in `table`.
///
/// # Errors
///
/// Returns `PersistenceError::InvalidRow` if the value is out of range.
pub fn from_millis(table: &'static str, millis: i64) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).map_err(|e| {
        PersistenceError::InvalidRow {
            table,
            message: format!("timestamp {millis}: {e}"),
        }
    })
}

/// Encodes a calendar date as `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns `PersistenceError::SerializationError` if formatting fails.
pub fn date_to_text(date: Date) -> Result<String, PersistenceError> {
    date.format(DATE_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Decodes a `YYYY-MM-DD` date stored in `table`.
///
/// # Errors
///
/// Returns `PersistenceError::InvalidRow` if the text is not a valid date.
pub fn date_from_text(table: &'static str, text: &str) -> Result<Date, PersistenceError> {
    Date::parse(text, DATE_FORMAT).map_err(|e| PersistenceError::InvalidRow {
        table,
        message: format!("date '{text}': {e}"),
    })
}

/// Encodes a flag as an integer column value.
pub fn flag(value: bool) -> i32 {
    i32::from(value)
}

/// Parses a stored status or role string into its domain type.
///
/// # Errors
///
/// Returns `PersistenceError::InvalidRow` if the value is not recognised.
pub fn parse_column<T>(table: &'static str, value: &str) -> Result<T, PersistenceError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| PersistenceError::InvalidRow {
        table,
        message: e.to_string(),
    })
}
