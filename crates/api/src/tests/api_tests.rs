// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use slot_market_domain::{BookingStatus, OrderStatus, SlotStatus};
use time::Duration;

use super::helpers::{
    CLIENT_AUTH, admin, client, model, now, principal, setup_marketplace, test_address,
};
use crate::{
    ApiError, CreateBookingRequest, CreateServiceRequest, CreateSlotRequest,
    OverrideOrderStatusRequest, PageQuery, UpdateServiceRequest, approve_booking, cancel_booking,
    cancel_order, complete_order, create_booking, create_service, create_slot, get_own_profile,
    list_model_slots, list_my_bookings, list_my_orders, list_services, override_order_status,
    update_service,
};

fn publish(
    persistence: &mut slot_market_persistence::SqlitePersistence,
    services: &crate::Services,
    starts_in: Duration,
) -> (i64, i64) {
    let service = create_service(
        persistence,
        services,
        &model(),
        CreateServiceRequest {
            title: String::from("Portrait session"),
            description: String::from("Studio, two hours"),
            price: 150.0,
        },
    )
    .unwrap();
    let slot = create_slot(
        persistence,
        services,
        &model(),
        CreateSlotRequest {
            start_time: now() + starts_in,
            end_time: now() + starts_in + Duration::hours(2),
        },
    )
    .unwrap();
    (service.service_id, slot.slot_id)
}

#[test]
fn test_own_profile_is_visible_after_setup() {
    let (mut persistence, services) = setup_marketplace();
    let profile = get_own_profile(&mut persistence, &services, &client()).unwrap();
    assert_eq!(profile.auth_id, CLIENT_AUTH);
    assert!(profile.is_verified);
}

#[test]
fn test_booking_flow_through_the_api() {
    let (mut persistence, services) = setup_marketplace();
    let (service_id, slot_id) = publish(&mut persistence, &services, Duration::days(3));

    let visible = list_services(&mut persistence, &services, &client(), PageQuery::default())
        .unwrap();
    assert_eq!(visible.len(), 1);

    let booking = create_booking(
        &mut persistence,
        &services,
        &client(),
        CreateBookingRequest {
            service_id,
            slot_id,
            address: test_address(),
        },
    )
    .unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.expires_at, now() + Duration::minutes(15));

    let model_id = get_own_profile(&mut persistence, &services, &model())
        .unwrap()
        .user_id;
    let model_slots = list_model_slots(&mut persistence, &services, &client(), model_id).unwrap();
    assert!(
        model_slots
            .iter()
            .any(|s| s.slot_id == slot_id && s.status == SlotStatus::Reserved)
    );

    let approved = approve_booking(&mut persistence, &services, &model(), booking.booking_id)
        .unwrap();
    assert_eq!(approved.booking.status, BookingStatus::Approved);
    assert_eq!(approved.order.status, OrderStatus::Confirmed);

    let received =
        list_my_bookings(&mut persistence, &services, &model(), PageQuery::default()).unwrap();
    assert_eq!(received.len(), 1);
    let placed = list_my_orders(&mut persistence, &services, &client(), PageQuery::default())
        .unwrap();
    assert_eq!(placed.len(), 1);

    let cancelled = cancel_order(
        &mut persistence,
        &services,
        &client(),
        approved.order.order_id,
    )
    .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
}

#[test]
fn test_double_booking_reports_slot_not_available() {
    let (mut persistence, services) = setup_marketplace();
    let (service_id, slot_id) = publish(&mut persistence, &services, Duration::days(3));
    let request = CreateBookingRequest {
        service_id,
        slot_id,
        address: test_address(),
    };

    create_booking(&mut persistence, &services, &client(), request.clone()).unwrap();
    let err = create_booking(&mut persistence, &services, &client(), request).unwrap_err();
    assert_eq!(err.code(), "SLOT_NOT_AVAILABLE");
}

#[test]
fn test_cancelled_booking_cannot_be_cancelled_twice() {
    let (mut persistence, services) = setup_marketplace();
    let (service_id, slot_id) = publish(&mut persistence, &services, Duration::days(3));
    let booking = create_booking(
        &mut persistence,
        &services,
        &client(),
        CreateBookingRequest {
            service_id,
            slot_id,
            address: test_address(),
        },
    )
    .unwrap();

    cancel_booking(&mut persistence, &services, &client(), booking.booking_id).unwrap();
    let err =
        cancel_booking(&mut persistence, &services, &client(), booking.booking_id).unwrap_err();
    assert_eq!(err.code(), "INVALID_BOOKING_STATE");
}

#[test]
fn test_unknown_caller_is_rejected_by_role() {
    let (mut persistence, services) = setup_marketplace();
    let stranger = principal(4242, "CLIENT");
    let err = list_services(&mut persistence, &services, &stranger, PageQuery::default())
        .unwrap_err();
    assert_eq!(err.code(), "NOT_A_CLIENT");

    let err = list_services(&mut persistence, &services, &model(), PageQuery::default())
        .unwrap_err();
    assert_eq!(err.code(), "NOT_A_CLIENT");
}

#[test]
fn test_completion_requires_in_transit_override() {
    let (mut persistence, services) = setup_marketplace();
    let (service_id, slot_id) = publish(&mut persistence, &services, -Duration::days(1));
    let booking = create_booking(
        &mut persistence,
        &services,
        &client(),
        CreateBookingRequest {
            service_id,
            slot_id,
            address: test_address(),
        },
    )
    .unwrap();
    let approved = approve_booking(&mut persistence, &services, &model(), booking.booking_id)
        .unwrap();
    let order_id = approved.order.order_id;

    let err = complete_order(&mut persistence, &services, &model(), order_id).unwrap_err();
    assert_eq!(err.code(), "CANNOT_COMPLETE_ORDER");

    override_order_status(
        &mut persistence,
        &services,
        &admin(),
        order_id,
        OverrideOrderStatusRequest {
            status: OrderStatus::InTransit,
        },
    )
    .unwrap();
    let completed = complete_order(&mut persistence, &services, &model(), order_id).unwrap();
    assert_eq!(completed.status, OrderStatus::Completed);
}

#[test]
fn test_invalid_update_reports_field() {
    let (mut persistence, services) = setup_marketplace();
    let (service_id, _) = publish(&mut persistence, &services, Duration::days(3));

    let err = update_service(
        &mut persistence,
        &services,
        &model(),
        service_id,
        UpdateServiceRequest {
            price: Some(0.0),
            ..UpdateServiceRequest::default()
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ApiError::InvalidInput {
            code: "INVALID_PRICE",
            field: "price",
            ..
        }
    ));
}
