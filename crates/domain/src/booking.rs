// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::fulfillment::TechnicianStatus;
use crate::money::Money;
use crate::types::{BookingStatus, GeoPoint, PaymentStatus};
use time::{Date, OffsetDateTime};

/// A booking record.
///
/// `total_amount` always equals
/// `subtotal - discount_amount - coupon_discount`.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub booking_id: String,
    pub customer_id: i64,
    pub service_name: String,
    pub service_date: Date,
    /// The slot label as submitted.
    pub time_slot: String,
    pub service_address: String,
    pub special_notes: Option<String>,
    pub subtotal: Money,
    pub discount_amount: Money,
    pub coupon_code: Option<String>,
    pub coupon_discount: Money,
    pub total_amount: Money,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    /// External payment-order reference, if the caller supplied one.
    pub payment_reference: Option<String>,
    pub booking_status: BookingStatus,
    /// Set once by assignment and never changed afterwards.
    pub assigned_technician_id: Option<i64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Booking {
    /// Returns true if `customer_id` placed this booking.
    #[must_use]
    pub const fn is_owned_by(&self, customer_id: i64) -> bool {
        self.customer_id == customer_id
    }

    /// Returns true if `technician_id` is the assigned technician.
    #[must_use]
    pub fn is_assigned_to(&self, technician_id: i64) -> bool {
        self.assigned_technician_id == Some(technician_id)
    }
}

/// One entry of the append-only fulfillment log.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLogEntry {
    pub booking_id: String,
    pub technician_id: i64,
    pub status: TechnicianStatus,
    pub recorded_at: OffsetDateTime,
    pub notes: Option<String>,
    pub location: Option<GeoPoint>,
}
