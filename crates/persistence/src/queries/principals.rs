// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Principal and session queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use pestcare_domain::PrincipalKind;
use tracing::debug;

use crate::data_models::{PrincipalData, PrincipalRow, SessionData, SessionRow};
use crate::diesel_schema::{principals, sessions};
use crate::error::PersistenceError;

/// Normalises a login name for storage and lookup.
#[must_use]
pub fn normalize_login(login_name: &str) -> String {
    login_name.trim().to_lowercase()
}

/// Retrieves a principal of the given kind by login name.
///
/// The lookup is case-insensitive.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no such principal exists.
pub fn get_principal_by_login(
    conn: &mut SqliteConnection,
    kind: PrincipalKind,
    login_name: &str,
) -> Result<Option<PrincipalData>, PersistenceError> {
    let normalized_login: String = normalize_login(login_name);

    debug!(%kind, login_name = %normalized_login, "Looking up principal by login");

    principals::table
        .filter(principals::kind.eq(kind.as_str()))
        .filter(principals::login_name.eq(&normalized_login))
        .select(PrincipalRow::as_select())
        .first(conn)
        .optional()?
        .map(PrincipalData::try_from)
        .transpose()
}

/// Retrieves a principal by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the principal is not found.
pub fn get_principal_by_id(
    conn: &mut SqliteConnection,
    principal_id: i64,
) -> Result<Option<PrincipalData>, PersistenceError> {
    debug!(principal_id, "Looking up principal by ID");

    principals::table
        .filter(principals::principal_id.eq(principal_id))
        .select(PrincipalRow::as_select())
        .first(conn)
        .optional()?
        .map(PrincipalData::try_from)
        .transpose()
}

/// Counts principals of one kind.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_principals(
    conn: &mut SqliteConnection,
    kind: PrincipalKind,
) -> Result<i64, PersistenceError> {
    Ok(principals::table
        .filter(principals::kind.eq(kind.as_str()))
        .count()
        .get_result(conn)?)
}

/// Retrieves a session by token.
///
/// Expiry is not checked here.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the session is not found.
pub fn get_session_by_token(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    sessions::table
        .filter(sessions::session_token.eq(session_token))
        .select(SessionRow::as_select())
        .first(conn)
        .optional()?
        .map(SessionData::try_from)
        .transpose()
}

/// Verifies a password against a bcrypt hash.
///
/// # Errors
///
/// Returns an error if the stored hash is malformed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| PersistenceError::Other(format!("Failed to verify password: {e}")))
}
