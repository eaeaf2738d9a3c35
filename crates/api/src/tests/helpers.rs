// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use pestcare_domain::{Coupon, Money, Percentage, PrincipalKind};
use pestcare_persistence::{CatalogEntry, Persistence};
use time::OffsetDateTime;
use time::macros::{date, datetime};

use crate::auth::AuthenticatedPrincipal;
use crate::config::ServiceSettings;
use crate::handlers::create_booking;
use crate::request_response::{CartItemRequest, CreateBookingRequest, CreateBookingResponse};

pub const PASSWORD: &str = "Secret-Passw0rd";
pub const SERVICE_NAME: &str = "General Pest Control";

/// 2026-05-01 09:00 UTC, a Friday.
pub fn now() -> OffsetDateTime {
    datetime!(2026-05-01 09:00 UTC)
}

pub fn settings() -> ServiceSettings {
    ServiceSettings::default()
}

fn create_principal(
    persistence: &mut Persistence,
    kind: PrincipalKind,
    login_name: &str,
    display_name: &str,
    phone: Option<&str>,
) -> AuthenticatedPrincipal {
    let id: i64 = persistence
        .create_principal(kind, login_name, display_name, phone, PASSWORD, now())
        .unwrap();
    AuthenticatedPrincipal::from(persistence.get_principal_by_id(id).unwrap().unwrap())
}

pub fn create_test_customer(persistence: &mut Persistence, login_name: &str) -> AuthenticatedPrincipal {
    create_principal(
        persistence,
        PrincipalKind::Customer,
        login_name,
        "Asha Customer",
        Some("+91 98450 00000"),
    )
}

pub fn create_test_technician(
    persistence: &mut Persistence,
    login_name: &str,
) -> AuthenticatedPrincipal {
    create_principal(
        persistence,
        PrincipalKind::Technician,
        login_name,
        "Ravi Technician",
        Some("+91 98450 11111"),
    )
}

pub fn create_test_admin(persistence: &mut Persistence) -> AuthenticatedPrincipal {
    create_principal(
        persistence,
        PrincipalKind::Admin,
        "admin@pestcare.test",
        "Back Office",
        None,
    )
}

/// Seeds two catalog entries and the `SAVE10` coupon (10%, all of May 2026).
pub fn seed_catalog(persistence: &mut Persistence) {
    for (service_type_name, price) in [("Cockroach Control", 60_000), ("Termite Control", 20_000)] {
        persistence
            .upsert_catalog_entry(&CatalogEntry {
                service_name: String::from(SERVICE_NAME),
                service_type_name: String::from(service_type_name),
                room_size: String::from("2BHK"),
                unit_price: Money::from_minor(price),
                active: true,
            })
            .unwrap();
    }
    persistence
        .upsert_coupon(&Coupon {
            code: String::from("SAVE10"),
            title: String::from("Ten percent off"),
            start_date: date!(2026 - 05 - 01),
            end_date: date!(2026 - 05 - 31),
            percentage: Percentage::from_percent(10.0).unwrap(),
        })
        .unwrap();
}

pub fn cart_item(service_type_name: &str, price: f64, quantity: i64) -> CartItemRequest {
    CartItemRequest {
        service_type_name: Some(String::from(service_type_name)),
        room_size: Some(String::from("2BHK")),
        price: Some(price),
        quantity: Some(quantity),
    }
}

/// A request totalling 1000.00 for service on 2026-05-04 from 10:00.
pub fn booking_request(coupon_code: Option<&str>) -> CreateBookingRequest {
    CreateBookingRequest {
        service_name: Some(String::from(SERVICE_NAME)),
        service_date: Some(String::from("2026-05-04")),
        time_slot: Some(String::from("10:00 AM - 12:00 PM")),
        service_address: Some(String::from("12 Park Street")),
        special_notes: Some(String::from("Dog in the garden")),
        cart_items: vec![
            cart_item("Cockroach Control", 600.0, 1),
            cart_item("Termite Control", 200.0, 2),
        ],
        coupon_code: coupon_code.map(String::from),
        subtotal: Some(1000.0),
        discount_amount: Some(0.0),
        total_amount: None,
        payment_method: Some(String::from("cash")),
        payment_reference: None,
    }
}

/// Returns a suffix source that yields `values` in order, then repeats the
/// last one.
pub fn suffixes(values: &[u32]) -> impl FnMut() -> u32 + use<> {
    let values: Vec<u32> = values.to_vec();
    let mut index: usize = 0;
    move || {
        let value = values[index.min(values.len() - 1)];
        index += 1;
        value
    }
}

/// Creates the standard 1000.00 booking for `customer`.
pub fn create_test_booking(
    persistence: &mut Persistence,
    customer: &AuthenticatedPrincipal,
    coupon_code: Option<&str>,
    suffix: u32,
) -> CreateBookingResponse {
    create_booking(
        persistence,
        customer,
        &booking_request(coupon_code),
        &settings(),
        now(),
        suffixes(&[suffix]),
    )
    .unwrap()
}
