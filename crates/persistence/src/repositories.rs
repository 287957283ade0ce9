// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Repository contracts implemented on top of the Diesel queries and mutations.

use slot_market::{
    AdminRepository, BookingRepository, ModelServiceRepository, OrderRepository, RepositoryError,
    SlotRepository, UserRepository,
};
use slot_market_domain::{
    Admin, Booking, ModelService, NewAdmin, NewBooking, NewModelService, NewOrder, NewSlot,
    NewUser, Order, Pagination, Role, Slot, User,
};
use time::OffsetDateTime;

use crate::{Persistence, mutations, queries};

impl UserRepository for Persistence {
    fn create_user(&mut self, user: &NewUser) -> Result<User, RepositoryError> {
        Ok(mutations::accounts::insert_user(&mut self.conn, user)?)
    }

    fn get_user(&mut self, id: i64) -> Result<User, RepositoryError> {
        Ok(queries::accounts::find_user(&mut self.conn, id)?)
    }

    fn get_user_by_auth_id(&mut self, auth_id: i64) -> Result<User, RepositoryError> {
        Ok(queries::accounts::find_user_by_auth_id(
            &mut self.conn,
            auth_id,
        )?)
    }

    fn update_user(&mut self, user: &User) -> Result<(), RepositoryError> {
        Ok(mutations::accounts::update_user(&mut self.conn, user)?)
    }

    fn list_users(&mut self, page: Pagination) -> Result<Vec<User>, RepositoryError> {
        Ok(queries::accounts::list_users(&mut self.conn, page)?)
    }

    fn count_users_by_role(&mut self, role: Role) -> Result<u64, RepositoryError> {
        Ok(queries::accounts::count_users_by_role(&mut self.conn, role)?)
    }
}

impl AdminRepository for Persistence {
    fn create_admin(&mut self, admin: &NewAdmin) -> Result<Admin, RepositoryError> {
        Ok(mutations::accounts::insert_admin(&mut self.conn, admin)?)
    }

    fn get_admin(&mut self, id: i64) -> Result<Admin, RepositoryError> {
        Ok(queries::accounts::find_admin(&mut self.conn, id)?)
    }

    fn get_admin_by_auth_id(&mut self, auth_id: i64) -> Result<Admin, RepositoryError> {
        Ok(queries::accounts::find_admin_by_auth_id(
            &mut self.conn,
            auth_id,
        )?)
    }

    fn update_admin(&mut self, admin: &Admin) -> Result<(), RepositoryError> {
        Ok(mutations::accounts::update_admin(&mut self.conn, admin)?)
    }
}

impl ModelServiceRepository for Persistence {
    fn create_service(
        &mut self,
        service: &NewModelService,
    ) -> Result<ModelService, RepositoryError> {
        Ok(mutations::catalog::insert_service(&mut self.conn, service)?)
    }

    fn get_service(&mut self, id: i64) -> Result<ModelService, RepositoryError> {
        Ok(queries::catalog::find_service(&mut self.conn, id)?)
    }

    fn update_service(&mut self, service: &ModelService) -> Result<(), RepositoryError> {
        Ok(mutations::catalog::update_service(&mut self.conn, service)?)
    }

    fn list_active_services(
        &mut self,
        page: Pagination,
    ) -> Result<Vec<ModelService>, RepositoryError> {
        Ok(queries::catalog::list_active_services(&mut self.conn, page)?)
    }

    fn list_services_by_model(
        &mut self,
        model_id: i64,
        page: Pagination,
    ) -> Result<Vec<ModelService>, RepositoryError> {
        Ok(queries::catalog::list_services_by_model(
            &mut self.conn,
            model_id,
            page,
        )?)
    }

    fn service_has_bookings(&mut self, service_id: i64) -> Result<bool, RepositoryError> {
        Ok(queries::catalog::service_has_bookings(
            &mut self.conn,
            service_id,
        )?)
    }
}

impl SlotRepository for Persistence {
    fn create_slot(&mut self, slot: &NewSlot) -> Result<Slot, RepositoryError> {
        Ok(mutations::catalog::insert_slot(&mut self.conn, slot)?)
    }

    fn get_slot(&mut self, id: i64) -> Result<Slot, RepositoryError> {
        Ok(queries::catalog::find_slot(&mut self.conn, id)?)
    }

    fn update_slot(&mut self, slot: &Slot) -> Result<(), RepositoryError> {
        Ok(mutations::catalog::update_slot(&mut self.conn, slot)?)
    }

    fn list_slots_by_model(&mut self, model_id: i64) -> Result<Vec<Slot>, RepositoryError> {
        Ok(queries::catalog::list_slots_by_model(
            &mut self.conn,
            model_id,
        )?)
    }

    fn has_overlapping_slot(
        &mut self,
        model_id: i64,
        start: OffsetDateTime,
        end: OffsetDateTime,
        exclude_slot_id: Option<i64>,
    ) -> Result<bool, RepositoryError> {
        Ok(queries::catalog::has_overlapping_slot(
            &mut self.conn,
            model_id,
            start,
            end,
            exclude_slot_id,
        )?)
    }
}

impl BookingRepository for Persistence {
    fn create_booking(&mut self, booking: &NewBooking) -> Result<Booking, RepositoryError> {
        Ok(mutations::bookings::insert_booking(&mut self.conn, booking)?)
    }

    fn get_booking(&mut self, id: i64) -> Result<Booking, RepositoryError> {
        Ok(queries::bookings::find_booking(&mut self.conn, id)?)
    }

    fn update_booking(&mut self, booking: &Booking) -> Result<(), RepositoryError> {
        Ok(mutations::bookings::update_booking(&mut self.conn, booking)?)
    }

    fn list_bookings_by_client(
        &mut self,
        client_id: i64,
        page: Pagination,
    ) -> Result<Vec<Booking>, RepositoryError> {
        Ok(queries::bookings::list_bookings_by_client(
            &mut self.conn,
            client_id,
            page,
        )?)
    }

    fn list_bookings_by_model(
        &mut self,
        model_id: i64,
        page: Pagination,
    ) -> Result<Vec<Booking>, RepositoryError> {
        Ok(queries::bookings::list_bookings_by_model(
            &mut self.conn,
            model_id,
            page,
        )?)
    }

    fn list_bookings(&mut self, page: Pagination) -> Result<Vec<Booking>, RepositoryError> {
        Ok(queries::bookings::list_bookings(&mut self.conn, page)?)
    }
}

impl OrderRepository for Persistence {
    fn create_order(&mut self, order: &NewOrder) -> Result<Order, RepositoryError> {
        Ok(mutations::bookings::insert_order(&mut self.conn, order)?)
    }

    fn get_order(&mut self, id: i64) -> Result<Order, RepositoryError> {
        Ok(queries::bookings::find_order(&mut self.conn, id)?)
    }

    fn update_order(&mut self, order: &Order) -> Result<(), RepositoryError> {
        Ok(mutations::bookings::update_order(&mut self.conn, order)?)
    }

    fn list_orders_by_model(
        &mut self,
        model_id: i64,
        page: Pagination,
    ) -> Result<Vec<Order>, RepositoryError> {
        Ok(queries::bookings::list_orders_by_model(
            &mut self.conn,
            model_id,
            page,
        )?)
    }

    fn list_orders_by_client(
        &mut self,
        client_id: i64,
        page: Pagination,
    ) -> Result<Vec<Order>, RepositoryError> {
        Ok(queries::bookings::list_orders_by_client(
            &mut self.conn,
            client_id,
            page,
        )?)
    }

    fn list_orders(&mut self, page: Pagination) -> Result<Vec<Order>, RepositoryError> {
        Ok(queries::bookings::list_orders(&mut self.conn, page)?)
    }
}
