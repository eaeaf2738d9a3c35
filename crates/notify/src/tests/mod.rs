// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod content;
mod dispatch;

use pestcare_domain::{Booking, BookingStatus, Money, PaymentStatus};
use time::OffsetDateTime;
use time::macros::{date, datetime};

pub fn sample_booking() -> Booking {
    let created: OffsetDateTime = datetime!(2026-05-01 09:00 UTC);
    Booking {
        booking_id: String::from("PC-20260501-123456"),
        customer_id: 11,
        service_name: String::from("General Pest Control"),
        service_date: date!(2026 - 05 - 04),
        time_slot: String::from("10:00 AM - 12:00 PM"),
        service_address: String::from("12 Park Street"),
        special_notes: None,
        subtotal: Money::from_minor(100_000),
        discount_amount: Money::ZERO,
        coupon_code: None,
        coupon_discount: Money::ZERO,
        total_amount: Money::from_minor(100_000),
        payment_method: String::from("cash"),
        payment_status: PaymentStatus::Pending,
        payment_reference: None,
        booking_status: BookingStatus::Confirmed,
        assigned_technician_id: Some(7),
        created_at: created,
        updated_at: created,
    }
}
