// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the `PestCare` booking service.
//!
//! Built on Diesel with the `SQLite` backend. Schema migrations are embedded
//! in the binary and applied when a connection is opened.
//!
//! ## Storage conventions
//!
//! - Money is stored as integer minor units.
//! - Dates are `YYYY-MM-DD` text; instants are fixed-width UTC text, so
//!   ordering by the column orders by time.
//! - Foreign key enforcement is verified at startup.
//!
//! ## Transactions
//!
//! Booking creation and every later booking change run inside one
//! IMMEDIATE transaction. See [`Persistence::apply_booking_transition`].
//!
//! ## Testing
//!
//! [`Persistence::new_in_memory`] opens a fresh shared-cache in-memory
//! database per call, so tests never see each other's rows.

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
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use pestcare::{BookingState, NewBooking, TransitionResult};
use pestcare_domain::{
    Booking, BookingStatus, Coupon, Money, PrincipalKind, StatusLogEntry, TechnicianStatus,
    derive_technician_status,
};
use pestcare_notify::{Notification, Recipient};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::{Date, OffsetDateTime};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{CatalogEntry, PrincipalData, SessionData};
pub use error::PersistenceError;
pub use mutations::TransitionError;
pub use mutations::bookings::MAX_BOOKING_ID_ATTEMPTS;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A booking assigned to a technician with its derived fulfillment status.
#[derive(Debug, Clone, PartialEq)]
pub struct TechnicianJob {
    pub booking: Booking,
    pub technician_status: Option<TechnicianStatus>,
}

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared-cache database via an atomic
    /// counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Principals & Sessions
    // ========================================================================

    /// Creates a principal with a bcrypt-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::AlreadyExists` if the login is already
    /// taken for this kind.
    pub fn create_principal(
        &mut self,
        kind: PrincipalKind,
        login_name: &str,
        display_name: &str,
        phone: Option<&str>,
        password: &str,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::principals::create_principal(
            &mut self.conn,
            kind,
            login_name,
            display_name,
            phone,
            password,
            now,
        )
    }

    /// Retrieves a principal by kind and login name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_principal_by_login(
        &mut self,
        kind: PrincipalKind,
        login_name: &str,
    ) -> Result<Option<PrincipalData>, PersistenceError> {
        queries::principals::get_principal_by_login(&mut self.conn, kind, login_name)
    }

    /// Retrieves a principal by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_principal_by_id(
        &mut self,
        principal_id: i64,
    ) -> Result<Option<PrincipalData>, PersistenceError> {
        queries::principals::get_principal_by_id(&mut self.conn, principal_id)
    }

    /// Counts principals of one kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_principals(&mut self, kind: PrincipalKind) -> Result<i64, PersistenceError> {
        queries::principals::count_principals(&mut self.conn, kind)
    }

    /// Verifies a password against a stored bcrypt hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the hash is malformed.
    pub fn verify_password(
        password: &str,
        password_hash: &str,
    ) -> Result<bool, PersistenceError> {
        queries::principals::verify_password(password, password_hash)
    }

    /// Replaces a principal's password.
    ///
    /// # Errors
    ///
    /// Returns an error if the principal does not exist or the update fails.
    pub fn update_password(
        &mut self,
        principal_id: i64,
        new_password: &str,
    ) -> Result<(), PersistenceError> {
        mutations::principals::update_password(&mut self.conn, principal_id, new_password)
    }

    /// Creates a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &mut self,
        session_token: &str,
        principal_id: i64,
        created_at: OffsetDateTime,
        expires_at: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::principals::create_session(
            &mut self.conn,
            session_token,
            principal_id,
            created_at,
            expires_at,
        )
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::principals::get_session_by_token(&mut self.conn, session_token)
    }

    /// Deletes a session, returning how many rows were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<usize, PersistenceError> {
        mutations::principals::delete_session(&mut self.conn, session_token)
    }

    /// Deletes all sessions expired at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_expired_sessions(
        &mut self,
        now: OffsetDateTime,
    ) -> Result<usize, PersistenceError> {
        mutations::principals::delete_expired_sessions(&mut self.conn, now)
    }

    // ========================================================================
    // Catalog & Coupons
    // ========================================================================

    /// Inserts or updates a catalog entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert_catalog_entry(&mut self, entry: &CatalogEntry) -> Result<(), PersistenceError> {
        mutations::catalog::upsert_catalog_entry(&mut self.conn, entry)
    }

    /// Looks up the price of an active catalog entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_catalog_price(
        &mut self,
        service_name: &str,
        service_type_name: &str,
        room_size: &str,
    ) -> Result<Option<Money>, PersistenceError> {
        queries::catalog::get_catalog_price(
            &mut self.conn,
            service_name,
            service_type_name,
            room_size,
        )
    }

    /// Lists every catalog entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_catalog_entries(&mut self) -> Result<Vec<CatalogEntry>, PersistenceError> {
        queries::catalog::list_catalog_entries(&mut self.conn)
    }

    /// Inserts or replaces a coupon.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert_coupon(&mut self, coupon: &Coupon) -> Result<(), PersistenceError> {
        mutations::catalog::upsert_coupon(&mut self.conn, coupon)
    }

    /// Retrieves a coupon by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_coupon(&mut self, code: &str) -> Result<Option<Coupon>, PersistenceError> {
        queries::catalog::get_coupon(&mut self.conn, code)
    }

    // ========================================================================
    // Bookings
    // ========================================================================

    /// Stores a new booking and its line items atomically.
    ///
    /// # Arguments
    ///
    /// * `new_booking` - The priced booking
    /// * `id_date` - The day embedded in the generated id
    /// * `next_suffix` - Source of random id suffixes
    ///
    /// # Errors
    ///
    /// Returns an error if no id could be allocated or an insert fails.
    pub fn create_booking<F>(
        &mut self,
        new_booking: &NewBooking,
        id_date: Date,
        next_suffix: F,
    ) -> Result<Booking, PersistenceError>
    where
        F: FnMut() -> u32,
    {
        mutations::bookings::insert_booking(&mut self.conn, new_booking, id_date, next_suffix)
    }

    /// Retrieves a booking row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_booking(&mut self, booking_id: &str) -> Result<Option<Booking>, PersistenceError> {
        queries::bookings::get_booking(&mut self.conn, booking_id)
    }

    /// Loads a booking with its line items and status log.
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub fn get_booking_state(
        &mut self,
        booking_id: &str,
    ) -> Result<Option<BookingState>, PersistenceError> {
        queries::bookings::load_booking_state(&mut self.conn, booking_id)
    }

    /// Retrieves a booking's status log, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_status_log(
        &mut self,
        booking_id: &str,
    ) -> Result<Vec<StatusLogEntry>, PersistenceError> {
        queries::bookings::get_status_log(&mut self.conn, booking_id)
    }

    /// Lists a customer's bookings, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_bookings_for_customer(
        &mut self,
        customer_id: i64,
    ) -> Result<Vec<Booking>, PersistenceError> {
        queries::bookings::list_bookings_for_customer(&mut self.conn, customer_id)
    }

    /// Lists all bookings, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_bookings_by_status(
        &mut self,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, PersistenceError> {
        queries::bookings::list_bookings_by_status(&mut self.conn, status)
    }

    /// Lists a technician's jobs with the latest reported status of each.
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub fn list_technician_jobs(
        &mut self,
        technician_id: i64,
    ) -> Result<Vec<TechnicianJob>, PersistenceError> {
        let bookings: Vec<Booking> =
            queries::bookings::list_bookings_for_technician(&mut self.conn, technician_id)?;
        bookings
            .into_iter()
            .map(|booking| {
                let log: Vec<StatusLogEntry> =
                    queries::bookings::get_status_log(&mut self.conn, &booking.booking_id)?;
                Ok(TechnicianJob {
                    technician_status: derive_technician_status(&log),
                    booking,
                })
            })
            .collect()
    }

    /// Applies a lifecycle change to one booking atomically.
    ///
    /// `decide` receives the current aggregate and returns the next state.
    /// The booking row, status log entry and notifications it produces are
    /// committed together or not at all.
    ///
    /// # Errors
    ///
    /// See [`TransitionError`].
    pub fn apply_booking_transition<F, E>(
        &mut self,
        booking_id: &str,
        decide: F,
    ) -> Result<TransitionResult, TransitionError<E>>
    where
        F: FnOnce(&BookingState) -> Result<TransitionResult, E>,
    {
        mutations::bookings::apply_booking_transition(&mut self.conn, booking_id, decide)
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Lists a recipient's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_notifications(
        &mut self,
        recipient: Recipient,
    ) -> Result<Vec<Notification>, PersistenceError> {
        queries::notifications::list_notifications(&mut self.conn, recipient)
    }

    /// Marks one of the recipient's notifications read.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the notification does not
    /// belong to `recipient`.
    pub fn mark_notification_read(
        &mut self,
        notification_id: i64,
        recipient: Recipient,
    ) -> Result<(), PersistenceError> {
        mutations::notifications::mark_notification_read(
            &mut self.conn,
            notification_id,
            recipient,
        )
    }
}
