// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{BookingStatus, DomainError, Money, PaymentStatus};

#[test]
fn test_cancellation_window_message_reports_hours() {
    let err: DomainError = DomainError::CancellationWindowClosed {
        booking_id: String::from("PC-20260501-000001"),
        hours_remaining: 19.996,
    };
    let message: String = err.to_string();
    assert!(message.contains("PC-20260501-000001"));
    assert!(message.contains("20.00 hours"));
}

#[test]
fn test_subtotal_mismatch_message_uses_major_units() {
    let err: DomainError = DomainError::SubtotalMismatch {
        declared: Money::from_minor(100_000),
        computed: Money::from_minor(99_950),
    };
    assert_eq!(
        err.to_string(),
        "Declared subtotal 1000.00 does not match line item total 999.50"
    );
}

#[test]
fn test_status_messages_use_wire_names() {
    let err: DomainError = DomainError::BookingNotPending {
        booking_id: String::from("PC-1"),
        status: BookingStatus::InProgress,
    };
    assert_eq!(err.to_string(), "Booking 'PC-1' is in_progress, not pending");

    let err: DomainError = DomainError::InvalidPaymentTransition {
        from: PaymentStatus::Refunded,
        to: PaymentStatus::Paid,
    };
    assert_eq!(
        err.to_string(),
        "Payment status cannot change from 'refunded' to 'paid'"
    );
}

#[test]
fn test_error_is_std_error() {
    fn takes_error(_: &dyn std::error::Error) {}
    takes_error(&DomainError::EmptyCart);
}
