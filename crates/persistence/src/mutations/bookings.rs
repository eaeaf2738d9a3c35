// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking creation and lifecycle transitions.

use diesel::SqliteConnection;
use diesel::prelude::*;
use pestcare::{BookingState, NewBooking, TransitionResult};
use pestcare_domain::{Booking, BookingId, StatusLogEntry};
use time::Date;
use tracing::{debug, info, warn};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{BookingChanges, BookingRecord, encode_count, encode_timestamp};
use crate::diesel_schema::{booking_line_items, bookings, status_log};
use crate::error::PersistenceError;
use crate::mutations::notifications::insert_notification;
use crate::queries::bookings::{booking_exists, load_booking_state};

/// How many random booking ids are tried before giving up.
pub const MAX_BOOKING_ID_ATTEMPTS: u32 = 16;

/// Why a lifecycle transition did not commit.
#[derive(Debug)]
pub enum TransitionError<E> {
    /// No booking with this id exists.
    BookingNotFound(String),
    /// The decision function refused the transition.
    Rejected(E),
    /// The store failed, or the booking changed underneath the decision.
    Persistence(PersistenceError),
}

impl<E> From<PersistenceError> for TransitionError<E> {
    fn from(err: PersistenceError) -> Self {
        Self::Persistence(err)
    }
}

impl<E> From<diesel::result::Error> for TransitionError<E> {
    fn from(err: diesel::result::Error) -> Self {
        Self::Persistence(PersistenceError::from(err))
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BookingNotFound(id) => write!(f, "Booking '{id}' not found"),
            Self::Rejected(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl<E: std::fmt::Debug + std::fmt::Display> std::error::Error for TransitionError<E> {}

/// Inserts a booking together with its line items.
///
/// A booking id is drawn from `next_suffix` and retried while it collides
/// with an existing booking. The whole write is one IMMEDIATE transaction:
/// either the booking and every line item are stored, or nothing is.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `new_booking` - The priced booking
/// * `id_date` - The day embedded in the booking id
/// * `next_suffix` - Source of random id suffixes
///
/// # Errors
///
/// Returns `PersistenceError::BookingIdExhausted` if every attempted id
/// collided, or another error if any insert fails.
pub fn insert_booking<F>(
    conn: &mut SqliteConnection,
    new_booking: &NewBooking,
    id_date: Date,
    mut next_suffix: F,
) -> Result<Booking, PersistenceError>
where
    F: FnMut() -> u32,
{
    conn.immediate_transaction(|conn| {
        let mut booking_id: Option<BookingId> = None;
        for attempt in 1..=MAX_BOOKING_ID_ATTEMPTS {
            let candidate: BookingId = BookingId::generate(id_date, next_suffix());
            if booking_exists(conn, candidate.as_str())? {
                debug!(attempt, booking_id = %candidate, "Booking id collision");
                continue;
            }
            booking_id = Some(candidate);
            break;
        }
        let Some(booking_id) = booking_id else {
            warn!(attempts = MAX_BOOKING_ID_ATTEMPTS, "No free booking id");
            return Err(PersistenceError::BookingIdExhausted {
                attempts: MAX_BOOKING_ID_ATTEMPTS,
            });
        };

        let booking: Booking = new_booking.to_booking(booking_id.as_str());
        let record: BookingRecord = BookingRecord::from_booking(&booking)?;

        diesel::insert_into(bookings::table)
            .values(&record)
            .execute(conn)?;

        for (position, item) in new_booking.line_items.iter().enumerate() {
            let position: i32 = i32::try_from(position)
                .map_err(|_| PersistenceError::Other("Too many line items".to_string()))?;
            diesel::insert_into(booking_line_items::table)
                .values((
                    booking_line_items::booking_id.eq(booking_id.as_str()),
                    booking_line_items::position.eq(position),
                    booking_line_items::service_type_name.eq(&item.service_type_name),
                    booking_line_items::room_size.eq(&item.room_size),
                    booking_line_items::unit_price.eq(item.unit_price.minor()),
                    booking_line_items::quantity.eq(encode_count(item.quantity)?),
                    booking_line_items::line_total.eq(item.line_total.minor()),
                ))
                .execute(conn)?;
        }

        info!(
            booking_id = %booking.booking_id,
            customer_id = booking.customer_id,
            total = %booking.total_amount,
            line_items = new_booking.line_items.len(),
            "Booking created"
        );

        Ok(booking)
    })
}

/// Appends one entry to a booking's status log.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_status_entry(
    conn: &mut SqliteConnection,
    entry: &StatusLogEntry,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(status_log::table)
        .values((
            status_log::booking_id.eq(&entry.booking_id),
            status_log::technician_id.eq(entry.technician_id),
            status_log::status.eq(entry.status.as_str()),
            status_log::recorded_at.eq(encode_timestamp(entry.recorded_at)?),
            status_log::notes.eq(entry.notes.as_deref()),
            status_log::location_lat.eq(entry.location.map(|p| p.lat)),
            status_log::location_lng.eq(entry.location.map(|p| p.lng)),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Loads a booking, lets `decide` compute its next state, and stores the
/// result.
///
/// Runs in one IMMEDIATE transaction. The booking row is only updated if
/// its status still equals the status `decide` saw; otherwise the write is
/// reported as `PersistenceError::StaleWrite` and nothing is stored. Any
/// status log entry and notifications in the result are stored in the same
/// transaction, and the returned notifications carry their new ids.
///
/// An unchanged result is returned without writing.
///
/// # Errors
///
/// Returns `TransitionError::BookingNotFound` for an unknown id,
/// `TransitionError::Rejected` if `decide` fails, or
/// `TransitionError::Persistence` if the store fails.
pub fn apply_booking_transition<F, E>(
    conn: &mut SqliteConnection,
    booking_id: &str,
    decide: F,
) -> Result<TransitionResult, TransitionError<E>>
where
    F: FnOnce(&BookingState) -> Result<TransitionResult, E>,
{
    conn.immediate_transaction(|conn| {
        let state: BookingState = load_booking_state(conn, booking_id)?
            .ok_or_else(|| TransitionError::BookingNotFound(booking_id.to_string()))?;

        let mut result: TransitionResult = decide(&state).map_err(TransitionError::Rejected)?;

        if !result.changed {
            debug!(booking_id, "Transition left booking unchanged");
            return Ok(result);
        }

        let changes: BookingChanges = BookingChanges::from_booking(&result.booking)?;
        let updated: usize = diesel::update(bookings::table)
            .filter(bookings::booking_id.eq(booking_id))
            .filter(bookings::booking_status.eq(state.booking.booking_status.as_str()))
            .set(&changes)
            .execute(conn)?;

        if updated != 1 {
            warn!(booking_id, "Booking changed during transition");
            return Err(TransitionError::Persistence(PersistenceError::StaleWrite {
                booking_id: booking_id.to_string(),
            }));
        }

        if let Some(entry) = &result.status_entry {
            insert_status_entry(conn, entry)?;
        }

        for notification in &mut result.notifications {
            notification.notification_id = Some(insert_notification(conn, notification)?);
        }

        info!(
            booking_id,
            from = %state.booking.booking_status,
            to = %result.booking.booking_status,
            payment_status = %result.booking.payment_status,
            notifications = result.notifications.len(),
            "Booking transition stored"
        );

        Ok(result)
    })
}
