// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Catalog and coupon lookups.

use diesel::SqliteConnection;
use diesel::prelude::*;
use pestcare_domain::{Coupon, Money, normalize_coupon_code};
use tracing::debug;

use crate::data_models::{CatalogEntry, CatalogEntryRow, CouponRow};
use crate::diesel_schema::{catalog_entries, coupons};
use crate::error::PersistenceError;

/// Returns the current price of an active catalog entry.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no active entry matches.
pub fn get_catalog_price(
    conn: &mut SqliteConnection,
    service_name: &str,
    service_type_name: &str,
    room_size: &str,
) -> Result<Option<Money>, PersistenceError> {
    debug!(service_name, service_type_name, room_size, "Looking up catalog price");

    let price: Option<i64> = catalog_entries::table
        .filter(catalog_entries::service_name.eq(service_name))
        .filter(catalog_entries::service_type_name.eq(service_type_name))
        .filter(catalog_entries::room_size.eq(room_size))
        .filter(catalog_entries::is_active.ne(0))
        .select(catalog_entries::unit_price)
        .first(conn)
        .optional()?;

    Ok(price.map(Money::from_minor))
}

/// Lists every catalog entry, active or not.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_catalog_entries(
    conn: &mut SqliteConnection,
) -> Result<Vec<CatalogEntry>, PersistenceError> {
    let rows: Vec<CatalogEntryRow> = catalog_entries::table
        .order((
            catalog_entries::service_name.asc(),
            catalog_entries::service_type_name.asc(),
            catalog_entries::room_size.asc(),
        ))
        .select(CatalogEntryRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(CatalogEntry::from).collect())
}

/// Retrieves a coupon by code (case-insensitive).
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
/// Returns `Ok(None)` if the code does not exist.
pub fn get_coupon(
    conn: &mut SqliteConnection,
    code: &str,
) -> Result<Option<Coupon>, PersistenceError> {
    let normalized: String = normalize_coupon_code(code);
    debug!(code = %normalized, "Looking up coupon");

    coupons::table
        .filter(coupons::code.eq(&normalized))
        .select(CouponRow::as_select())
        .first(conn)
        .optional()?
        .map(Coupon::try_from)
        .transpose()
}
