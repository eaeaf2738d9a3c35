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

//! Notifications produced by booking state changes.
//!
//! This crate owns two things: the content of every notification the
//! booking lifecycle emits, and the push-side dispatch seam. Persisting
//! notification rows is the store's job; dispatch happens only after the
//! rows have been committed and never influences the outcome of the
//! operation that produced them.

mod dispatch;

#[cfg(test)]
mod tests;

pub use dispatch::{
    DispatchError, MemoryDispatcher, NotificationDispatcher, TracingDispatcher, dispatch_all,
};

use pestcare_domain::{Booking, PrincipalKind, TechnicianStatus, format_date};
use serde::Serialize;
use time::OffsetDateTime;

/// Who a notification is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Recipient {
    pub kind: PrincipalKind,
    pub id: i64,
}

impl Recipient {
    #[must_use]
    pub const fn customer(id: i64) -> Self {
        Self {
            kind: PrincipalKind::Customer,
            id,
        }
    }

    #[must_use]
    pub const fn technician(id: i64) -> Self {
        Self {
            kind: PrincipalKind::Technician,
            id,
        }
    }
}

impl std::fmt::Display for Recipient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// A notification record.
///
/// Notifications never change booking state; the only mutation after
/// creation is marking them read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Assigned by the store on insert.
    pub notification_id: Option<i64>,
    pub recipient: Recipient,
    pub title: String,
    pub message: String,
    pub related_booking_id: Option<String>,
    pub created_at: OffsetDateTime,
    pub read: bool,
}

impl Notification {
    /// Creates a new unread notification.
    #[must_use]
    pub const fn new(
        recipient: Recipient,
        title: String,
        message: String,
        related_booking_id: Option<String>,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            notification_id: None,
            recipient,
            title,
            message,
            related_booking_id,
            created_at,
            read: false,
        }
    }
}

fn schedule(booking: &Booking) -> String {
    format!("{} ({})", format_date(booking.service_date), booking.time_slot)
}

/// Tells a technician they have a new job.
#[must_use]
pub fn job_assigned(booking: &Booking, technician_id: i64, now: OffsetDateTime) -> Notification {
    Notification::new(
        Recipient::technician(technician_id),
        String::from("New job assigned"),
        format!(
            "You have been assigned booking {}: {} on {} at {}.",
            booking.booking_id,
            booking.service_name,
            schedule(booking),
            booking.service_address
        ),
        Some(booking.booking_id.clone()),
        now,
    )
}

/// Tells the customer which technician will perform the service.
#[must_use]
pub fn technician_assigned(
    booking: &Booking,
    technician_name: &str,
    now: OffsetDateTime,
) -> Notification {
    Notification::new(
        Recipient::customer(booking.customer_id),
        String::from("Technician assigned"),
        format!(
            "{technician_name} has been assigned to your booking {} on {}.",
            booking.booking_id,
            schedule(booking)
        ),
        Some(booking.booking_id.clone()),
        now,
    )
}

/// Tells the customer about reported progress.
#[must_use]
pub fn status_update(
    booking: &Booking,
    status: TechnicianStatus,
    now: OffsetDateTime,
) -> Notification {
    let (title, message): (&str, String) = match status {
        TechnicianStatus::Assigned => (
            "Technician assigned",
            format!("A technician has been assigned to booking {}.", booking.booking_id),
        ),
        TechnicianStatus::Reached => (
            "Technician arrived",
            format!(
                "Your technician has arrived at {} for booking {}.",
                booking.service_address, booking.booking_id
            ),
        ),
        TechnicianStatus::Started => (
            "Service started",
            format!(
                "Your {} service for booking {} has started.",
                booking.service_name, booking.booking_id
            ),
        ),
        TechnicianStatus::Completed => (
            "Service completed",
            format!(
                "Your {} service for booking {} has been completed.",
                booking.service_name, booking.booking_id
            ),
        ),
    };

    Notification::new(
        Recipient::customer(booking.customer_id),
        title.to_string(),
        message,
        Some(booking.booking_id.clone()),
        now,
    )
}

/// Tells the assigned technician a job was cancelled by the customer.
#[must_use]
pub fn job_cancelled(booking: &Booking, technician_id: i64, now: OffsetDateTime) -> Notification {
    Notification::new(
        Recipient::technician(technician_id),
        String::from("Job cancelled"),
        format!(
            "Booking {} on {} has been cancelled by the customer.",
            booking.booking_id,
            schedule(booking)
        ),
        Some(booking.booking_id.clone()),
        now,
    )
}
