// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pestcare_domain::{
    Booking, BookingLineItem, BookingStatus, DomainError, StatusLogEntry, TechnicianStatus,
    derive_technician_status,
};
use pestcare_notify::Notification;

/// A booking aggregate as loaded from the store.
///
/// The status log is ordered oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingState {
    pub booking: Booking,
    pub line_items: Vec<BookingLineItem>,
    pub status_log: Vec<StatusLogEntry>,
}

impl BookingState {
    #[must_use]
    pub const fn new(
        booking: Booking,
        line_items: Vec<BookingLineItem>,
        status_log: Vec<StatusLogEntry>,
    ) -> Self {
        Self {
            booking,
            line_items,
            status_log,
        }
    }

    /// The technician-visible status, `None` until assignment.
    #[must_use]
    pub fn technician_status(&self) -> Option<TechnicianStatus> {
        derive_technician_status(&self.status_log)
    }

    /// Fails unless the booking is still awaiting assignment.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::BookingNotPending` otherwise.
    pub fn require_pending(&self) -> Result<(), DomainError> {
        if self.booking.booking_status == BookingStatus::Pending {
            Ok(())
        } else {
            Err(DomainError::BookingNotPending {
                booking_id: self.booking.booking_id.clone(),
                status: self.booking.booking_status,
            })
        }
    }
}

/// The result of applying a command to a booking.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    /// The booking after the transition.
    pub booking: Booking,
    /// The log entry to append, for fulfillment commands.
    pub status_entry: Option<StatusLogEntry>,
    /// Notifications to store alongside the change.
    pub notifications: Vec<Notification>,
    /// False when the command was accepted as a no-op.
    pub changed: bool,
}

impl TransitionResult {
    /// An accepted command that changes nothing.
    #[must_use]
    pub const fn unchanged(booking: Booking) -> Self {
        Self {
            booking,
            status_entry: None,
            notifications: Vec::new(),
            changed: false,
        }
    }
}
