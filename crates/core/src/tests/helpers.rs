// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{BookingDraft, BookingState, PricedBooking, price_booking};
use pestcare_domain::{
    Booking, CartItem, Coupon, Money, Percentage, TimeSlot, Tz,
};
use time::macros::{date, datetime};
use time::{Date, OffsetDateTime};

pub const CUSTOMER_ID: i64 = 11;
pub const TECHNICIAN_ID: i64 = 7;

pub fn created_at() -> OffsetDateTime {
    datetime!(2026-05-01 09:00 UTC)
}

pub fn today() -> Date {
    date!(2026 - 05 - 01)
}

pub const fn service_timezone() -> Tz {
    Tz::UTC
}

pub fn create_test_cart_item(price: i64, quantity: u32) -> CartItem {
    CartItem {
        service_type_name: String::from("Cockroach Control"),
        room_size: String::from("2BHK"),
        unit_price: Money::from_minor(price),
        quantity,
    }
}

/// A draft for service on 2026-05-04 at 10:00.
pub fn create_test_draft(items: Vec<CartItem>, subtotal: i64) -> BookingDraft {
    BookingDraft {
        customer_id: CUSTOMER_ID,
        service_name: String::from("General Pest Control"),
        service_date: date!(2026 - 05 - 04),
        time_slot: TimeSlot::parse("10:00 AM - 12:00 PM").unwrap(),
        service_address: String::from("12 Park Street"),
        special_notes: None,
        items,
        coupon_code: None,
        declared_subtotal: Money::from_minor(subtotal),
        discount_amount: Money::ZERO,
        declared_total: None,
        payment_method: String::from("cash"),
        payment_reference: None,
    }
}

pub fn create_test_coupon(percent: f64) -> Coupon {
    Coupon {
        code: String::from("WELCOME10"),
        title: String::from("Welcome offer"),
        start_date: date!(2026 - 04 - 01),
        end_date: date!(2026 - 05 - 31),
        percentage: Percentage::from_percent(percent).unwrap(),
    }
}

pub fn create_test_booking() -> Booking {
    let draft: BookingDraft = create_test_draft(vec![create_test_cart_item(100_000, 1)], 100_000);
    let prices = vec![Some(Money::from_minor(100_000))];
    let priced: PricedBooking = price_booking(draft, &prices, None, today(), created_at()).unwrap();
    priced.booking.to_booking("PC-20260501-000001")
}

pub fn create_test_state() -> BookingState {
    BookingState::new(create_test_booking(), Vec::new(), Vec::new())
}
