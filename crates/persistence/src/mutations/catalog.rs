// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Catalog and coupon writes.

use diesel::SqliteConnection;
use diesel::prelude::*;
use pestcare_domain::Coupon;
use tracing::info;

use crate::data_models::{CatalogEntry, CouponRecord};
use crate::diesel_schema::{catalog_entries, coupons};
use crate::error::PersistenceError;

/// Inserts a catalog entry or updates the price and active flag of the
/// existing entry with the same service, type and room size.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn upsert_catalog_entry(
    conn: &mut SqliteConnection,
    entry: &CatalogEntry,
) -> Result<(), PersistenceError> {
    info!(
        service_name = %entry.service_name,
        service_type_name = %entry.service_type_name,
        room_size = %entry.room_size,
        unit_price = %entry.unit_price,
        active = entry.active,
        "Upserting catalog entry"
    );

    let is_active: i32 = i32::from(entry.active);

    diesel::insert_into(catalog_entries::table)
        .values((
            catalog_entries::service_name.eq(&entry.service_name),
            catalog_entries::service_type_name.eq(&entry.service_type_name),
            catalog_entries::room_size.eq(&entry.room_size),
            catalog_entries::unit_price.eq(entry.unit_price.minor()),
            catalog_entries::is_active.eq(is_active),
        ))
        .on_conflict((
            catalog_entries::service_name,
            catalog_entries::service_type_name,
            catalog_entries::room_size,
        ))
        .do_update()
        .set((
            catalog_entries::unit_price.eq(entry.unit_price.minor()),
            catalog_entries::is_active.eq(is_active),
        ))
        .execute(conn)?;

    Ok(())
}

/// Inserts or replaces a coupon keyed by its code.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn upsert_coupon(conn: &mut SqliteConnection, coupon: &Coupon) -> Result<(), PersistenceError> {
    info!(code = %coupon.code, percentage = %coupon.percentage, "Upserting coupon");

    let record: CouponRecord = CouponRecord::from_coupon(coupon)?;

    diesel::insert_into(coupons::table)
        .values(&record)
        .on_conflict(coupons::code)
        .do_update()
        .set(&record)
        .execute(conn)?;

    Ok(())
}
