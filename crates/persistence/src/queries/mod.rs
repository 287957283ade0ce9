// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `accounts`: Users and admins
//! - `catalog`: Model services and slots
//! - `bookings`: Bookings and orders

pub mod accounts;
pub mod bookings;
pub mod catalog;
