// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod booking_tests;
mod catalog_tests;
mod notification_tests;

use crate::{CatalogEntry, Persistence};
use pestcare::{BookingDraft, NewBooking, price_booking};
use pestcare_domain::{CartItem, Money, PrincipalKind, TimeSlot};
use time::macros::{date, datetime};
use time::{Date, OffsetDateTime};

pub const SERVICE_NAME: &str = "General Pest Control";

pub fn created_at() -> OffsetDateTime {
    datetime!(2026-05-01 09:00 UTC)
}

pub fn today() -> Date {
    date!(2026 - 05 - 01)
}

pub fn create_customer(persistence: &mut Persistence, login: &str) -> i64 {
    persistence
        .create_principal(
            PrincipalKind::Customer,
            login,
            "Asha Customer",
            Some("+91 98450 00000"),
            "Secret-Passw0rd",
            created_at(),
        )
        .unwrap()
}

pub fn create_technician(persistence: &mut Persistence, login: &str) -> i64 {
    persistence
        .create_principal(
            PrincipalKind::Technician,
            login,
            "Ravi Technician",
            None,
            "Secret-Passw0rd",
            created_at(),
        )
        .unwrap()
}

pub fn create_test_catalog_entry(price: i64) -> CatalogEntry {
    CatalogEntry {
        service_name: String::from(SERVICE_NAME),
        service_type_name: String::from("Cockroach Control"),
        room_size: String::from("2BHK"),
        unit_price: Money::from_minor(price),
        active: true,
    }
}

/// A priced booking for service on 2026-05-04 at 10:00 with two line items.
pub fn create_test_new_booking(customer_id: i64) -> NewBooking {
    let items: Vec<CartItem> = vec![
        CartItem {
            service_type_name: String::from("Cockroach Control"),
            room_size: String::from("2BHK"),
            unit_price: Money::from_minor(60_000),
            quantity: 1,
        },
        CartItem {
            service_type_name: String::from("Termite Control"),
            room_size: String::from("2BHK"),
            unit_price: Money::from_minor(20_000),
            quantity: 2,
        },
    ];
    let draft = BookingDraft {
        customer_id,
        service_name: String::from(SERVICE_NAME),
        service_date: date!(2026 - 05 - 04),
        time_slot: TimeSlot::parse("10:00 AM - 12:00 PM").unwrap(),
        service_address: String::from("12 Park Street"),
        special_notes: Some(String::from("Dog in the garden")),
        items,
        coupon_code: None,
        declared_subtotal: Money::from_minor(100_000),
        discount_amount: Money::ZERO,
        declared_total: None,
        payment_method: String::from("cash"),
        payment_reference: None,
    };
    let prices = vec![
        Some(Money::from_minor(60_000)),
        Some(Money::from_minor(20_000)),
    ];
    price_booking(draft, &prices, None, today(), created_at())
        .unwrap()
        .booking
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
