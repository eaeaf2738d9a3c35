// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod booking;
mod calendar;
mod cancellation;
mod coupon;
mod error;
mod fulfillment;
mod money;
mod pricing;
mod time_slot;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use booking::{Booking, StatusLogEntry};
pub use calendar::{format_date, local_date, local_instant, parse_date, parse_timezone};
pub use cancellation::{CANCELLATION_NOTICE, CancellationWindow, check_cancellation_window};
pub use coupon::{Coupon, CouponEvaluation, evaluate_coupon, normalize_coupon_code};
pub use fulfillment::{TechnicianStatus, derive_booking_status, derive_technician_status};
pub use pricing::{
    BookingLineItem, CartItem, PricingBreakdown, PricingOutcome, compute_pricing,
    line_items_subtotal, price_cart,
};
pub use time_slot::TimeSlot;

// Re-export public types
pub use chrono_tz::Tz;
pub use error::DomainError;
pub use money::{Money, Percentage};
pub use types::{BookingId, BookingStatus, GeoPoint, PaymentStatus, PrincipalKind};
pub use validation::{MAX_TEXT_LEN, optional_text, require_text, validate_quantity};
