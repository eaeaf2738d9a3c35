// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking aggregate queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use pestcare::BookingState;
use pestcare_domain::{Booking, BookingLineItem, BookingStatus, StatusLogEntry};
use tracing::debug;

use crate::data_models::{BookingRow, LineItemRow, StatusLogRow};
use crate::diesel_schema::{booking_line_items, bookings, status_log};
use crate::error::PersistenceError;

fn decode_bookings(rows: Vec<BookingRow>) -> Result<Vec<Booking>, PersistenceError> {
    rows.into_iter().map(Booking::try_from).collect()
}

/// Returns true if a booking with this id exists.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn booking_exists(
    conn: &mut SqliteConnection,
    booking_id: &str,
) -> Result<bool, PersistenceError> {
    Ok(diesel::select(diesel::dsl::exists(
        bookings::table.filter(bookings::booking_id.eq(booking_id)),
    ))
    .get_result(conn)?)
}

/// Retrieves a booking row.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the booking is not found.
pub fn get_booking(
    conn: &mut SqliteConnection,
    booking_id: &str,
) -> Result<Option<Booking>, PersistenceError> {
    debug!(booking_id, "Looking up booking");

    bookings::table
        .filter(bookings::booking_id.eq(booking_id))
        .select(BookingRow::as_select())
        .first(conn)
        .optional()?
        .map(Booking::try_from)
        .transpose()
}

/// Retrieves a booking's line items in cart order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_line_items(
    conn: &mut SqliteConnection,
    booking_id: &str,
) -> Result<Vec<BookingLineItem>, PersistenceError> {
    booking_line_items::table
        .filter(booking_line_items::booking_id.eq(booking_id))
        .order(booking_line_items::position.asc())
        .select(LineItemRow::as_select())
        .load(conn)?
        .into_iter()
        .map(BookingLineItem::try_from)
        .collect()
}

/// Retrieves a booking's status log, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_status_log(
    conn: &mut SqliteConnection,
    booking_id: &str,
) -> Result<Vec<StatusLogEntry>, PersistenceError> {
    status_log::table
        .filter(status_log::booking_id.eq(booking_id))
        .order(status_log::status_log_id.asc())
        .select(StatusLogRow::as_select())
        .load(conn)?
        .into_iter()
        .map(StatusLogEntry::try_from)
        .collect()
}

/// Loads the full booking aggregate.
///
/// # Errors
///
/// Returns an error if any query fails.
/// Returns `Ok(None)` if the booking is not found.
pub fn load_booking_state(
    conn: &mut SqliteConnection,
    booking_id: &str,
) -> Result<Option<BookingState>, PersistenceError> {
    let Some(booking) = get_booking(conn, booking_id)? else {
        return Ok(None);
    };
    let line_items: Vec<BookingLineItem> = get_line_items(conn, booking_id)?;
    let status_log: Vec<StatusLogEntry> = get_status_log(conn, booking_id)?;
    Ok(Some(BookingState::new(booking, line_items, status_log)))
}

/// Lists a customer's bookings, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_bookings_for_customer(
    conn: &mut SqliteConnection,
    customer_id: i64,
) -> Result<Vec<Booking>, PersistenceError> {
    let rows: Vec<BookingRow> = bookings::table
        .filter(bookings::customer_id.eq(customer_id))
        .order((bookings::created_at.desc(), bookings::booking_id.desc()))
        .select(BookingRow::as_select())
        .load(conn)?;
    decode_bookings(rows)
}

/// Lists bookings, optionally filtered by status, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_bookings_by_status(
    conn: &mut SqliteConnection,
    status: Option<BookingStatus>,
) -> Result<Vec<Booking>, PersistenceError> {
    let mut query = bookings::table
        .order((bookings::created_at.desc(), bookings::booking_id.desc()))
        .select(BookingRow::as_select())
        .into_boxed();
    if let Some(status) = status {
        query = query.filter(bookings::booking_status.eq(status.as_str()));
    }
    decode_bookings(query.load(conn)?)
}

/// Lists the bookings assigned to a technician, by service date.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_bookings_for_technician(
    conn: &mut SqliteConnection,
    technician_id: i64,
) -> Result<Vec<Booking>, PersistenceError> {
    let rows: Vec<BookingRow> = bookings::table
        .filter(bookings::assigned_technician_id.eq(technician_id))
        .order((bookings::service_date.asc(), bookings::time_slot.asc()))
        .select(BookingRow::as_select())
        .load(conn)?;
    decode_bookings(rows)
}
