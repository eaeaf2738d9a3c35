// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Principal and session mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use pestcare_domain::PrincipalKind;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::encode_timestamp;
use crate::diesel_schema::{principals, sessions};
use crate::error::PersistenceError;
use crate::queries::principals::normalize_login;

fn hash_password(password: &str) -> Result<String, PersistenceError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))
}

/// Creates a new principal.
///
/// The `login_name` is normalized to lowercase so that logins are unique
/// per kind regardless of case.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `kind` - Customer, technician or admin
/// * `login_name` - Email or phone number (will be normalized)
/// * `display_name` - The display name
/// * `phone` - Optional contact number
/// * `password` - The plain-text password (will be hashed)
/// * `now` - Creation time
///
/// # Errors
///
/// Returns `PersistenceError::AlreadyExists` if the login is taken for this
/// kind, or another error if the insert fails.
pub fn create_principal(
    conn: &mut SqliteConnection,
    kind: PrincipalKind,
    login_name: &str,
    display_name: &str,
    phone: Option<&str>,
    password: &str,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let normalized_login: String = normalize_login(login_name);

    info!(%kind, login_name = %normalized_login, display_name, "Creating principal");

    let password_hash: String = hash_password(password)?;

    diesel::insert_into(principals::table)
        .values((
            principals::kind.eq(kind.as_str()),
            principals::login_name.eq(&normalized_login),
            principals::display_name.eq(display_name),
            principals::phone.eq(phone),
            principals::password_hash.eq(&password_hash),
            principals::created_at.eq(encode_timestamp(now)?),
        ))
        .execute(conn)?;

    let principal_id: i64 = get_last_insert_rowid(conn)?;

    info!(principal_id, %kind, "Principal created");

    Ok(principal_id)
}

/// Replaces a principal's password.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the principal does not exist.
pub fn update_password(
    conn: &mut SqliteConnection,
    principal_id: i64,
    new_password: &str,
) -> Result<(), PersistenceError> {
    info!(principal_id, "Updating principal password");

    let password_hash: String = hash_password(new_password)?;

    let updated: usize = diesel::update(principals::table)
        .filter(principals::principal_id.eq(principal_id))
        .set(principals::password_hash.eq(&password_hash))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Principal {principal_id} not found"
        )));
    }
    Ok(())
}

/// Creates a new session.
///
/// # Errors
///
/// Returns an error if the session cannot be created.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    principal_id: i64,
    created_at: OffsetDateTime,
    expires_at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    debug!(principal_id, "Creating session");

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::principal_id.eq(principal_id),
            sessions::created_at.eq(encode_timestamp(created_at)?),
            sessions::expires_at.eq(encode_timestamp(expires_at)?),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Deletes a session by token.
///
/// Returns the number of sessions removed (zero or one).
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<usize, PersistenceError> {
    Ok(
        diesel::delete(sessions::table.filter(sessions::session_token.eq(session_token)))
            .execute(conn)?,
    )
}

/// Deletes every session that expired at or before `now`.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_sessions(
    conn: &mut SqliteConnection,
    now: OffsetDateTime,
) -> Result<usize, PersistenceError> {
    let cutoff: String = encode_timestamp(now)?;
    let deleted: usize =
        diesel::delete(sessions::table.filter(sessions::expires_at.le(&cutoff))).execute(conn)?;
    if deleted > 0 {
        info!(deleted, "Deleted expired sessions");
    }
    Ok(deleted)
}
