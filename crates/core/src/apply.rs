// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{Command, PaymentRequester};
use crate::error::CoreError;
use crate::state::{BookingState, TransitionResult};
use pestcare_domain::{
    Booking, DomainError, GeoPoint, PaymentStatus, StatusLogEntry, TechnicianStatus, TimeSlot, Tz,
    check_cancellation_window,
};
use pestcare_notify::{
    Notification, job_assigned, job_cancelled, status_update, technician_assigned,
};
use time::OffsetDateTime;

/// Applies a command to a booking, producing the new booking, the log entry
/// to append and the notifications to emit.
///
/// This function is pure: the caller is responsible for loading `state`
/// and for committing every part of the result in one transaction.
///
/// # Arguments
///
/// * `state` - The current booking aggregate (immutable)
/// * `command` - The command to apply
/// * `now` - The instant the command is applied at
///
/// # Errors
///
/// Returns an error if the command violates a booking rule.
pub fn apply(
    state: &BookingState,
    command: Command,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::AssignTechnician {
            technician_id,
            technician_name,
        } => assign_technician(state, technician_id, &technician_name, now),
        Command::ReportStatus {
            technician_id,
            status,
            notes,
            location,
        } => report_status(state, technician_id, status, notes, location, now),
        Command::Cancel {
            customer_id,
            timezone,
        } => cancel(state, customer_id, timezone, now),
        Command::RecordPayment {
            requested_by,
            status,
            reference,
        } => record_payment(state, requested_by, status, reference, now),
    }
}

fn assign_technician(
    state: &BookingState,
    technician_id: i64,
    technician_name: &str,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    state.require_pending()?;

    let status: TechnicianStatus = TechnicianStatus::Assigned;
    let mut booking: Booking = state.booking.clone();
    booking.assigned_technician_id = Some(technician_id);
    booking.booking_status = status.booking_status();
    booking.updated_at = now;

    let entry: StatusLogEntry = StatusLogEntry {
        booking_id: booking.booking_id.clone(),
        technician_id,
        status,
        recorded_at: now,
        notes: None,
        location: None,
    };

    let notifications: Vec<Notification> = vec![
        job_assigned(&booking, technician_id, now),
        technician_assigned(&booking, technician_name, now),
    ];

    Ok(TransitionResult {
        booking,
        status_entry: Some(entry),
        notifications,
        changed: true,
    })
}

fn report_status(
    state: &BookingState,
    technician_id: i64,
    reported: TechnicianStatus,
    notes: Option<String>,
    location: Option<GeoPoint>,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    if !state.booking.is_assigned_to(technician_id) {
        return Err(DomainError::NotAssignedTechnician {
            booking_id: state.booking.booking_id.clone(),
            technician_id,
        }
        .into());
    }

    // An assigned booking always has at least the assignment entry
    let current: TechnicianStatus = state
        .technician_status()
        .unwrap_or(TechnicianStatus::Assigned);
    TechnicianStatus::validate_report(current, state.booking.booking_status, reported)?;

    let mut booking: Booking = state.booking.clone();
    let mapped = reported.booking_status();
    if mapped != booking.booking_status {
        booking.booking_status = mapped;
        booking.updated_at = now;
    }

    let entry: StatusLogEntry = StatusLogEntry {
        booking_id: booking.booking_id.clone(),
        technician_id,
        status: reported,
        recorded_at: now,
        notes,
        location,
    };

    let notification: Notification = status_update(&booking, reported, now);

    Ok(TransitionResult {
        booking,
        status_entry: Some(entry),
        notifications: vec![notification],
        changed: true,
    })
}

fn cancel(
    state: &BookingState,
    customer_id: i64,
    timezone: Tz,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    let current: &Booking = &state.booking;
    if !current.is_owned_by(customer_id) {
        return Err(DomainError::NotBookingOwner {
            booking_id: current.booking_id.clone(),
            customer_id,
        }
        .into());
    }
    if current.booking_status.is_terminal() {
        return Err(DomainError::BookingNotCancellable {
            booking_id: current.booking_id.clone(),
            status: current.booking_status,
        }
        .into());
    }

    let slot: TimeSlot = TimeSlot::parse(&current.time_slot)?;
    check_cancellation_window(
        &current.booking_id,
        current.service_date,
        &slot,
        timezone,
        now,
    )?;

    let mut booking: Booking = current.clone();
    booking.booking_status = pestcare_domain::BookingStatus::Cancelled;
    booking.updated_at = now;

    let notifications: Vec<Notification> = booking
        .assigned_technician_id
        .map(|tech| job_cancelled(&booking, tech, now))
        .into_iter()
        .collect();

    Ok(TransitionResult {
        booking,
        status_entry: None,
        notifications,
        changed: true,
    })
}

fn record_payment(
    state: &BookingState,
    requested_by: PaymentRequester,
    status: PaymentStatus,
    reference: Option<String>,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    let current: &Booking = &state.booking;
    if let PaymentRequester::Customer(customer_id) = requested_by
        && !current.is_owned_by(customer_id)
    {
        return Err(DomainError::NotBookingOwner {
            booking_id: current.booking_id.clone(),
            customer_id,
        }
        .into());
    }

    current.payment_status.validate_transition(status)?;
    let new_reference: bool = reference
        .as_deref()
        .is_some_and(|value| current.payment_reference.as_deref() != Some(value));
    if current.payment_status == status && !new_reference {
        return Ok(TransitionResult::unchanged(current.clone()));
    }

    let mut booking: Booking = current.clone();
    booking.payment_status = status;
    if reference.is_some() {
        booking.payment_reference = reference;
    }
    booking.updated_at = now;

    Ok(TransitionResult {
        booking,
        status_entry: None,
        notifications: Vec::new(),
        changed: true,
    })
}
