// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::money::Money;
use crate::types::{BookingStatus, PaymentStatus};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A required field is absent or blank.
    MissingField(&'static str),
    /// A field is present but malformed.
    InvalidField {
        /// The offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
    /// A monetary amount is negative, not finite or out of range.
    InvalidAmount {
        /// The offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
    /// A booking must contain at least one line item.
    EmptyCart,
    /// A line item quantity must be at least one.
    InvalidQuantity {
        /// The service type of the line item.
        service_type_name: String,
        /// The rejected quantity.
        quantity: i64,
    },
    /// The declared subtotal does not match the sum of the line totals.
    SubtotalMismatch {
        /// The subtotal submitted by the caller.
        declared: Money,
        /// The subtotal computed from the line items.
        computed: Money,
    },
    /// A line item's submitted price differs from the catalog price.
    PriceMismatch {
        /// The service type of the line item.
        service_type_name: String,
        /// The room size of the line item.
        room_size: String,
        /// The price submitted by the caller.
        submitted: Money,
        /// The current catalog price.
        catalog: Money,
    },
    /// No active catalog entry matches a line item.
    CatalogEntryNotFound {
        /// The service the booking is for.
        service_name: String,
        /// The service type of the line item.
        service_type_name: String,
        /// The room size of the line item.
        room_size: String,
    },
    /// The declared discount exceeds the subtotal.
    DiscountExceedsSubtotal {
        /// The declared discount.
        discount: Money,
        /// The subtotal.
        subtotal: Money,
    },
    /// Time slot label could not be understood.
    InvalidTimeSlot(String),
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// The configured service timezone is not a known IANA zone.
    InvalidTimezone(String),
    /// A wall-clock time does not exist in the service timezone.
    UnresolvableLocalTime {
        /// Description of the wall-clock time.
        local: String,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// Unknown booking status string.
    InvalidBookingStatus(String),
    /// Unknown payment status string.
    InvalidPaymentStatus(String),
    /// Unknown technician status string.
    InvalidTechnicianStatus(String),
    /// Unknown principal kind string.
    InvalidPrincipalKind(String),
    /// Coupon code does not exist.
    CouponNotFound(String),
    /// Coupon exists but is not active on the given day.
    CouponOutsideWindow {
        /// The coupon code.
        code: String,
        /// First valid day.
        start_date: time::Date,
        /// Last valid day.
        end_date: time::Date,
        /// The day the coupon was evaluated for.
        today: time::Date,
    },
    /// Operation requires a pending booking.
    BookingNotPending {
        /// The booking id.
        booking_id: String,
        /// The booking's current status.
        status: BookingStatus,
    },
    /// The technician is not assigned to the booking.
    NotAssignedTechnician {
        /// The booking id.
        booking_id: String,
        /// The reporting technician.
        technician_id: i64,
    },
    /// The customer does not own the booking.
    NotBookingOwner {
        /// The booking id.
        booking_id: String,
        /// The requesting customer.
        customer_id: i64,
    },
    /// A fulfillment status transition is not permitted.
    InvalidStatusTransition {
        /// Current status.
        from: String,
        /// Requested status.
        to: String,
        /// Why the transition was refused.
        reason: String,
    },
    /// The booking is already completed or cancelled.
    BookingNotCancellable {
        /// The booking id.
        booking_id: String,
        /// The booking's current status.
        status: BookingStatus,
    },
    /// Less than the required notice remains before the service starts.
    CancellationWindowClosed {
        /// The booking id.
        booking_id: String,
        /// Hours left until the service starts (may be negative).
        hours_remaining: f64,
    },
    /// A payment status transition is not permitted.
    InvalidPaymentTransition {
        /// Current payment status.
        from: PaymentStatus,
        /// Requested payment status.
        to: PaymentStatus,
    },
}

impl std::fmt::Display for DomainError {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "Missing required field '{field}'"),
            Self::InvalidField { field, reason } => {
                write!(f, "Invalid value for '{field}': {reason}")
            }
            Self::InvalidAmount { field, reason } => {
                write!(f, "Invalid amount for '{field}': {reason}")
            }
            Self::EmptyCart => write!(f, "A booking must contain at least one line item"),
            Self::InvalidQuantity {
                service_type_name,
                quantity,
            } => write!(
                f,
                "Invalid quantity {quantity} for '{service_type_name}'. Must be at least 1"
            ),
            Self::SubtotalMismatch { declared, computed } => write!(
                f,
                "Declared subtotal {declared} does not match line item total {computed}"
            ),
            Self::PriceMismatch {
                service_type_name,
                room_size,
                submitted,
                catalog,
            } => write!(
                f,
                "Price {submitted} for '{service_type_name}' ({room_size}) does not match current price {catalog}"
            ),
            Self::CatalogEntryNotFound {
                service_name,
                service_type_name,
                room_size,
            } => write!(
                f,
                "No active catalog entry for '{service_name}' / '{service_type_name}' ({room_size})"
            ),
            Self::DiscountExceedsSubtotal { discount, subtotal } => {
                write!(f, "Discount {discount} exceeds subtotal {subtotal}")
            }
            Self::InvalidTimeSlot(slot) => write!(f, "Invalid time slot '{slot}'"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::InvalidTimezone(tz) => write!(f, "Unknown timezone '{tz}'"),
            Self::UnresolvableLocalTime { local } => {
                write!(f, "Local time {local} does not exist in the service timezone")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::InvalidBookingStatus(s) => write!(f, "Invalid booking status '{s}'"),
            Self::InvalidPaymentStatus(s) => write!(f, "Invalid payment status '{s}'"),
            Self::InvalidTechnicianStatus(s) => write!(f, "Invalid technician status '{s}'"),
            Self::InvalidPrincipalKind(s) => write!(f, "Invalid principal kind '{s}'"),
            Self::CouponNotFound(code) => write!(f, "Coupon '{code}' does not exist"),
            Self::CouponOutsideWindow {
                code,
                start_date,
                end_date,
                today,
            } => write!(
                f,
                "Coupon '{code}' is valid from {start_date} to {end_date}, not on {today}"
            ),
            Self::BookingNotPending { booking_id, status } => {
                write!(f, "Booking '{booking_id}' is {status}, not pending")
            }
            Self::NotAssignedTechnician {
                booking_id,
                technician_id,
            } => write!(
                f,
                "Booking '{booking_id}' is not assigned to technician {technician_id}"
            ),
            Self::NotBookingOwner {
                booking_id,
                customer_id,
            } => write!(
                f,
                "Booking '{booking_id}' does not belong to customer {customer_id}"
            ),
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Cannot move from '{from}' to '{to}': {reason}")
            }
            Self::BookingNotCancellable { booking_id, status } => {
                write!(f, "Booking '{booking_id}' is {status} and cannot be cancelled")
            }
            Self::CancellationWindowClosed {
                booking_id,
                hours_remaining,
            } => write!(
                f,
                "Booking '{booking_id}' can no longer be cancelled: {hours_remaining:.2} hours remain before service, at least 24 are required"
            ),
            Self::InvalidPaymentTransition { from, to } => {
                write!(f, "Payment status cannot change from '{from}' to '{to}'")
            }
        }
    }
}

impl std::error::Error for DomainError {}
