// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use slot_market::{
    AdminRepository, BookingRepository, ModelServiceRepository, OrderRepository, RepositoryError,
    SlotRepository, UserRepository,
};
use slot_market_domain::{
    BookingStatus, NewAdmin, NewBooking, NewOrder, NewUser, OrderStatus, Pagination, Permissions,
    Role, SlotStatus,
};
use time::Duration;
use time::macros::date;

use super::{MODEL_AUTH, now, seed_marketplace, seed_service, seed_slot, seed_user, test_address};
use crate::Persistence;

fn page(page: i64, limit: i64) -> Pagination {
    Pagination::new(Some(page), Some(limit))
}

#[test]
fn test_user_round_trip_keeps_birth_date_and_flag() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let created = persistence
        .create_user(&NewUser {
            auth_id: 77,
            role: Role::Model,
            name: String::from("Ada"),
            birth_date: date!(2008 - 02 - 29),
            created_at: now(),
        })
        .unwrap();
    assert!(!created.is_verified);

    let loaded = persistence.get_user(created.id).unwrap();
    assert_eq!(loaded, created);

    let mut verified = loaded;
    verified.is_verified = true;
    verified.name = String::from("Ada L.");
    persistence.update_user(&verified).unwrap();
    assert_eq!(persistence.get_user_by_auth_id(77).unwrap(), verified);
}

#[test]
fn test_missing_rows_report_not_found() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    assert_eq!(persistence.get_user(1), Err(RepositoryError::NotFound));
    assert_eq!(persistence.get_slot(1), Err(RepositoryError::NotFound));
    assert_eq!(persistence.get_booking(1), Err(RepositoryError::NotFound));
    assert_eq!(persistence.get_order(1), Err(RepositoryError::NotFound));
    assert_eq!(
        persistence.get_admin_by_auth_id(9),
        Err(RepositoryError::NotFound)
    );
}

#[test]
fn test_update_of_missing_row_reports_not_found() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let market = seed_marketplace(&mut persistence);

    let mut ghost = market.slot;
    ghost.id += 1_000;
    assert_eq!(persistence.update_slot(&ghost), Err(RepositoryError::NotFound));
}

#[test]
fn test_duplicate_auth_id_is_a_backend_error() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    seed_user(&mut persistence, 5, Role::Client);

    let err = persistence
        .create_user(&NewUser {
            auth_id: 5,
            role: Role::Model,
            name: String::from("twin"),
            birth_date: date!(1990 - 01 - 01),
            created_at: now(),
        })
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Backend(_)));
}

#[test]
fn test_admin_permissions_round_trip() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let mut permissions = Permissions::new();
    permissions.insert(String::from("verify_users"), true);

    let mut admin = persistence
        .create_admin(&NewAdmin {
            auth_id: 9001,
            permissions,
        })
        .unwrap();
    assert_eq!(persistence.get_admin(admin.id).unwrap(), admin);

    admin
        .permissions
        .insert(String::from("override_orders"), false);
    persistence.update_admin(&admin).unwrap();
    assert_eq!(persistence.get_admin_by_auth_id(9001).unwrap(), admin);
}

#[test]
fn test_active_service_listing_skips_inactive_and_paginates() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let model = seed_user(&mut persistence, MODEL_AUTH, Role::Model);
    let first = seed_service(&mut persistence, model.id);
    let mut retired = seed_service(&mut persistence, model.id);
    let third = seed_service(&mut persistence, model.id);

    retired.is_active = false;
    persistence.update_service(&retired).unwrap();

    let active = persistence.list_active_services(page(1, 10)).unwrap();
    assert_eq!(
        active.iter().map(|s| s.id).collect::<Vec<_>>(),
        vec![first.id, third.id]
    );

    let second_page = persistence.list_active_services(page(2, 1)).unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].id, third.id);

    let owned = persistence
        .list_services_by_model(model.id, Pagination::default())
        .unwrap();
    assert_eq!(owned.len(), 3);
}

#[test]
fn test_service_has_bookings() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let market = seed_marketplace(&mut persistence);
    assert!(!persistence.service_has_bookings(market.service.id).unwrap());

    persistence
        .create_booking(
            &NewBooking::pending(
                market.client.id,
                market.service.id,
                market.slot.id,
                test_address(),
                now(),
                Duration::minutes(15),
            )
            .unwrap(),
        )
        .unwrap();
    assert!(persistence.service_has_bookings(market.service.id).unwrap());
}

#[test]
fn test_slots_listed_by_start_time() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let model = seed_user(&mut persistence, MODEL_AUTH, Role::Model);
    let late = seed_slot(&mut persistence, model.id, Duration::days(5));
    let early = seed_slot(&mut persistence, model.id, Duration::days(1));

    let slots = persistence.list_slots_by_model(model.id).unwrap();
    assert_eq!(
        slots.iter().map(|s| s.id).collect::<Vec<_>>(),
        vec![early.id, late.id]
    );
}

#[test]
fn test_overlap_is_half_open_and_ignores_disabled_slots() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let model = seed_user(&mut persistence, MODEL_AUTH, Role::Model);
    let mut slot = seed_slot(&mut persistence, model.id, Duration::days(1));
    let (start, end) = (slot.start_time, slot.end_time);

    assert!(persistence
        .has_overlapping_slot(model.id, start + Duration::hours(1), end + Duration::hours(1), None)
        .unwrap());
    assert!(!persistence
        .has_overlapping_slot(model.id, end, end + Duration::hours(1), None)
        .unwrap());
    assert!(!persistence
        .has_overlapping_slot(model.id, start - Duration::hours(1), start, None)
        .unwrap());
    assert!(!persistence
        .has_overlapping_slot(model.id, start, end, Some(slot.id))
        .unwrap());

    slot.status = SlotStatus::Disabled;
    persistence.update_slot(&slot).unwrap();
    assert!(!persistence
        .has_overlapping_slot(model.id, start, end, None)
        .unwrap());
}

#[test]
fn test_booking_and_order_listings_follow_ownership() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let market = seed_marketplace(&mut persistence);
    let second_slot = seed_slot(&mut persistence, market.model.id, Duration::days(4));

    let mine = persistence
        .create_booking(
            &NewBooking::pending(
                market.client.id,
                market.service.id,
                market.slot.id,
                test_address(),
                now(),
                Duration::minutes(15),
            )
            .unwrap(),
        )
        .unwrap();
    let theirs = persistence
        .create_booking(
            &NewBooking::pending(
                market.other_client.id,
                market.service.id,
                second_slot.id,
                test_address(),
                now(),
                Duration::minutes(15),
            )
            .unwrap(),
        )
        .unwrap();
    assert_eq!(persistence.get_booking(mine.id).unwrap(), mine);

    let client_bookings = persistence
        .list_bookings_by_client(market.client.id, Pagination::default())
        .unwrap();
    assert_eq!(client_bookings, vec![mine.clone()]);

    let model_bookings = persistence
        .list_bookings_by_model(market.model.id, Pagination::default())
        .unwrap();
    assert_eq!(model_bookings.len(), 2);
    assert_eq!(persistence.list_bookings(page(2, 1)).unwrap(), vec![theirs]);

    let order = persistence
        .create_order(&NewOrder::confirmed(mine.id, now()))
        .unwrap();
    assert_eq!(
        persistence
            .list_orders_by_client(market.client.id, Pagination::default())
            .unwrap(),
        vec![order.clone()]
    );
    assert!(persistence
        .list_orders_by_client(market.other_client.id, Pagination::default())
        .unwrap()
        .is_empty());
    assert_eq!(
        persistence
            .list_orders_by_model(market.model.id, Pagination::default())
            .unwrap(),
        vec![order.clone()]
    );

    let mut in_transit = order;
    in_transit.status = OrderStatus::InTransit;
    persistence.update_order(&in_transit).unwrap();
    assert_eq!(
        persistence.list_orders(Pagination::default()).unwrap(),
        vec![in_transit]
    );

    let mut cancelled = mine;
    cancelled.status = BookingStatus::Cancelled;
    persistence.update_booking(&cancelled).unwrap();
    assert_eq!(
        persistence.get_booking(cancelled.id).unwrap().status,
        BookingStatus::Cancelled
    );
}

#[test]
fn test_second_order_for_booking_is_rejected() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let market = seed_marketplace(&mut persistence);
    let booking = persistence
        .create_booking(
            &NewBooking::pending(
                market.client.id,
                market.service.id,
                market.slot.id,
                test_address(),
                now(),
                Duration::minutes(15),
            )
            .unwrap(),
        )
        .unwrap();

    persistence
        .create_order(&NewOrder::confirmed(booking.id, now()))
        .unwrap();
    let err = persistence
        .create_order(&NewOrder::confirmed(booking.id, now()))
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Backend(_)));
}

#[test]
fn test_count_users_by_role() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    seed_marketplace(&mut persistence);
    assert_eq!(persistence.count_users_by_role(Role::Client).unwrap(), 2);
    assert_eq!(persistence.count_users_by_role(Role::Model).unwrap(), 1);
    assert_eq!(persistence.count_users_by_role(Role::Admin).unwrap(), 0);
}
