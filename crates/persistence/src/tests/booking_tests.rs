// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for booking creation and booking queries.

use crate::{MAX_BOOKING_ID_ATTEMPTS, Persistence, PersistenceError};
use pestcare_domain::{BookingStatus, Money, PaymentStatus};
use time::macros::date;

#[test]
fn test_create_booking_stores_booking_and_line_items() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let customer = super::create_customer(&mut persistence, "asha@example.com");
    let new_booking = super::create_test_new_booking(customer);

    let booking = persistence
        .create_booking(&new_booking, super::today(), super::suffixes(&[42]))
        .unwrap();

    assert_eq!(booking.booking_id, "PC-20260501-000042");
    assert_eq!(booking.booking_status, BookingStatus::Pending);
    assert_eq!(booking.payment_status, PaymentStatus::Pending);
    assert_eq!(booking.total_amount, Money::from_minor(100_000));
    assert_eq!(booking.assigned_technician_id, None);

    let state = persistence
        .get_booking_state(&booking.booking_id)
        .unwrap()
        .unwrap();
    assert_eq!(state.booking, booking);
    assert_eq!(state.line_items.len(), 2);
    assert_eq!(state.line_items[0].service_type_name, "Cockroach Control");
    assert_eq!(state.line_items[1].quantity, 2);
    assert_eq!(state.line_items[1].line_total, Money::from_minor(40_000));
    assert!(state.status_log.is_empty());
}

#[test]
fn test_create_booking_retries_colliding_ids() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let customer = super::create_customer(&mut persistence, "asha@example.com");
    let new_booking = super::create_test_new_booking(customer);

    let first = persistence
        .create_booking(&new_booking, super::today(), super::suffixes(&[7]))
        .unwrap();
    let second = persistence
        .create_booking(&new_booking, super::today(), super::suffixes(&[7, 7, 8]))
        .unwrap();

    assert_eq!(first.booking_id, "PC-20260501-000007");
    assert_eq!(second.booking_id, "PC-20260501-000008");
}

#[test]
fn test_create_booking_gives_up_after_bounded_attempts() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let customer = super::create_customer(&mut persistence, "asha@example.com");
    let new_booking = super::create_test_new_booking(customer);

    persistence
        .create_booking(&new_booking, super::today(), super::suffixes(&[1]))
        .unwrap();
    let result = persistence.create_booking(&new_booking, super::today(), super::suffixes(&[1]));

    assert_eq!(
        result,
        Err(PersistenceError::BookingIdExhausted {
            attempts: MAX_BOOKING_ID_ATTEMPTS
        })
    );
    assert_eq!(
        persistence
            .list_bookings_for_customer(customer)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_create_booking_for_unknown_customer_stores_nothing() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let new_booking = super::create_test_new_booking(404);

    let result = persistence.create_booking(&new_booking, super::today(), super::suffixes(&[3]));

    assert!(result.is_err());
    assert!(
        persistence
            .get_booking("PC-20260501-000003")
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_list_bookings_for_customer_is_newest_first_and_scoped() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let asha = super::create_customer(&mut persistence, "asha@example.com");
    let bina = super::create_customer(&mut persistence, "bina@example.com");

    let mut older = super::create_test_new_booking(asha);
    older.created_at -= time::Duration::hours(1);
    persistence
        .create_booking(&older, super::today(), super::suffixes(&[1]))
        .unwrap();
    persistence
        .create_booking(&super::create_test_new_booking(asha), super::today(), super::suffixes(&[2]))
        .unwrap();
    persistence
        .create_booking(&super::create_test_new_booking(bina), super::today(), super::suffixes(&[3]))
        .unwrap();

    let ids: Vec<String> = persistence
        .list_bookings_for_customer(asha)
        .unwrap()
        .into_iter()
        .map(|b| b.booking_id)
        .collect();
    assert_eq!(ids, vec!["PC-20260501-000002", "PC-20260501-000001"]);
}

#[test]
fn test_list_bookings_by_status_filters() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let asha = super::create_customer(&mut persistence, "asha@example.com");
    persistence
        .create_booking(&super::create_test_new_booking(asha), date!(2026 - 05 - 01), super::suffixes(&[1]))
        .unwrap();

    assert_eq!(
        persistence
            .list_bookings_by_status(Some(BookingStatus::Pending))
            .unwrap()
            .len(),
        1
    );
    assert!(
        persistence
            .list_bookings_by_status(Some(BookingStatus::Confirmed))
            .unwrap()
            .is_empty()
    );
    assert_eq!(persistence.list_bookings_by_status(None).unwrap().len(), 1);
}

#[test]
fn test_get_unknown_booking_returns_none() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.get_booking("PC-20260501-999999").unwrap().is_none());
    assert!(
        persistence
            .get_booking_state("PC-20260501-999999")
            .unwrap()
            .is_none()
    );
}
