// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversion to domain values.
//!
//! Money is stored in minor units, dates as `YYYY-MM-DD` and instants as
//! fixed-width UTC RFC 3339 text so that lexical order matches
//! chronological order.

use diesel::prelude::*;
use pestcare_domain::{
    Booking, BookingLineItem, BookingStatus, Coupon, GeoPoint, Money, PaymentStatus, Percentage,
    PrincipalKind, StatusLogEntry, TechnicianStatus, format_date, normalize_coupon_code, parse_date,
};
use pestcare_notify::{Notification, Recipient};
use std::str::FromStr;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::diesel_schema::{
    booking_line_items, bookings, catalog_entries, coupons, notifications, principals, sessions,
    status_log,
};
use crate::error::PersistenceError;

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z"
);

/// Encodes an instant for storage.
pub(crate) fn encode_timestamp(at: OffsetDateTime) -> Result<String, PersistenceError> {
    at.to_offset(UtcOffset::UTC)
        .format(TIMESTAMP_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

pub(crate) fn decode_timestamp(
    table: &'static str,
    value: &str,
) -> Result<OffsetDateTime, PersistenceError> {
    time::PrimitiveDateTime::parse(value, TIMESTAMP_FORMAT)
        .map(time::PrimitiveDateTime::assume_utc)
        .map_err(|e| PersistenceError::CorruptRow {
            table,
            detail: format!("timestamp '{value}': {e}"),
        })
}

fn decode_date(table: &'static str, value: &str) -> Result<Date, PersistenceError> {
    parse_date("date", value).map_err(|e| PersistenceError::CorruptRow {
        table,
        detail: e.to_string(),
    })
}

fn decode_enum<T>(table: &'static str, value: &str) -> Result<T, PersistenceError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| PersistenceError::CorruptRow {
        table,
        detail: e.to_string(),
    })
}

fn decode_count(table: &'static str, value: i32) -> Result<u32, PersistenceError> {
    u32::try_from(value).map_err(|_| PersistenceError::CorruptRow {
        table,
        detail: format!("negative count {value}"),
    })
}

pub(crate) fn encode_count(value: u32) -> Result<i32, PersistenceError> {
    i32::try_from(value)
        .map_err(|_| PersistenceError::SerializationError(format!("{value} does not fit")))
}

// ----------------------------------------------------------------------------
// Principals and sessions
// ----------------------------------------------------------------------------

/// A principal as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalData {
    pub principal_id: i64,
    pub kind: PrincipalKind,
    pub login_name: String,
    pub display_name: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = principals)]
pub(crate) struct PrincipalRow {
    principal_id: i64,
    kind: String,
    login_name: String,
    display_name: String,
    phone: Option<String>,
    password_hash: String,
    created_at: String,
}

impl TryFrom<PrincipalRow> for PrincipalData {
    type Error = PersistenceError;

    fn try_from(row: PrincipalRow) -> Result<Self, Self::Error> {
        Ok(Self {
            principal_id: row.principal_id,
            kind: decode_enum("principals", &row.kind)?,
            login_name: row.login_name,
            display_name: row.display_name,
            phone: row.phone,
            password_hash: row.password_hash,
            created_at: decode_timestamp("principals", &row.created_at)?,
        })
    }
}

/// A session as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub principal_id: i64,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
pub(crate) struct SessionRow {
    session_id: i64,
    session_token: String,
    principal_id: i64,
    created_at: String,
    expires_at: String,
}

impl TryFrom<SessionRow> for SessionData {
    type Error = PersistenceError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            session_id: row.session_id,
            session_token: row.session_token,
            principal_id: row.principal_id,
            created_at: decode_timestamp("sessions", &row.created_at)?,
            expires_at: decode_timestamp("sessions", &row.expires_at)?,
        })
    }
}

// ----------------------------------------------------------------------------
// Catalog and coupons
// ----------------------------------------------------------------------------

/// One priced catalog line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub service_name: String,
    pub service_type_name: String,
    pub room_size: String,
    pub unit_price: Money,
    pub active: bool,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = catalog_entries)]
pub(crate) struct CatalogEntryRow {
    service_name: String,
    service_type_name: String,
    room_size: String,
    unit_price: i64,
    is_active: i32,
}

impl From<CatalogEntryRow> for CatalogEntry {
    fn from(row: CatalogEntryRow) -> Self {
        Self {
            service_name: row.service_name,
            service_type_name: row.service_type_name,
            room_size: row.room_size,
            unit_price: Money::from_minor(row.unit_price),
            active: row.is_active != 0,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = coupons)]
pub(crate) struct CouponRow {
    code: String,
    title: String,
    start_date: String,
    end_date: String,
    percentage_bp: i32,
}

impl TryFrom<CouponRow> for Coupon {
    type Error = PersistenceError;

    fn try_from(row: CouponRow) -> Result<Self, Self::Error> {
        let percentage: Percentage = u32::try_from(row.percentage_bp)
            .ok()
            .and_then(|bp| Percentage::from_basis_points(bp).ok())
            .ok_or_else(|| PersistenceError::CorruptRow {
                table: "coupons",
                detail: format!("percentage {} basis points", row.percentage_bp),
            })?;
        Ok(Self {
            code: row.code,
            title: row.title,
            start_date: decode_date("coupons", &row.start_date)?,
            end_date: decode_date("coupons", &row.end_date)?,
            percentage,
        })
    }
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = coupons)]
pub(crate) struct CouponRecord {
    pub code: String,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub percentage_bp: i32,
}

impl CouponRecord {
    pub fn from_coupon(coupon: &Coupon) -> Result<Self, PersistenceError> {
        Ok(Self {
            code: normalize_coupon_code(&coupon.code),
            title: coupon.title.clone(),
            start_date: format_date(coupon.start_date),
            end_date: format_date(coupon.end_date),
            percentage_bp: encode_count(coupon.percentage.basis_points())?,
        })
    }
}

// ----------------------------------------------------------------------------
// Bookings
// ----------------------------------------------------------------------------

#[derive(Queryable, Selectable)]
#[diesel(table_name = bookings)]
pub(crate) struct BookingRow {
    booking_id: String,
    customer_id: i64,
    service_name: String,
    service_date: String,
    time_slot: String,
    service_address: String,
    special_notes: Option<String>,
    subtotal: i64,
    discount_amount: i64,
    coupon_code: Option<String>,
    coupon_discount: i64,
    total_amount: i64,
    payment_method: String,
    payment_status: String,
    payment_reference: Option<String>,
    booking_status: String,
    assigned_technician_id: Option<i64>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<BookingRow> for Booking {
    type Error = PersistenceError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            booking_id: row.booking_id,
            customer_id: row.customer_id,
            service_name: row.service_name,
            service_date: decode_date("bookings", &row.service_date)?,
            time_slot: row.time_slot,
            service_address: row.service_address,
            special_notes: row.special_notes,
            subtotal: Money::from_minor(row.subtotal),
            discount_amount: Money::from_minor(row.discount_amount),
            coupon_code: row.coupon_code,
            coupon_discount: Money::from_minor(row.coupon_discount),
            total_amount: Money::from_minor(row.total_amount),
            payment_method: row.payment_method,
            payment_status: decode_enum::<PaymentStatus>("bookings", &row.payment_status)?,
            payment_reference: row.payment_reference,
            booking_status: decode_enum::<BookingStatus>("bookings", &row.booking_status)?,
            assigned_technician_id: row.assigned_technician_id,
            created_at: decode_timestamp("bookings", &row.created_at)?,
            updated_at: decode_timestamp("bookings", &row.updated_at)?,
        })
    }
}

/// Full booking row for insert.
#[derive(Insertable)]
#[diesel(table_name = bookings)]
pub(crate) struct BookingRecord {
    pub booking_id: String,
    pub customer_id: i64,
    pub service_name: String,
    pub service_date: String,
    pub time_slot: String,
    pub service_address: String,
    pub special_notes: Option<String>,
    pub subtotal: i64,
    pub discount_amount: i64,
    pub coupon_code: Option<String>,
    pub coupon_discount: i64,
    pub total_amount: i64,
    pub payment_method: String,
    pub payment_status: String,
    pub payment_reference: Option<String>,
    pub booking_status: String,
    pub assigned_technician_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl BookingRecord {
    pub fn from_booking(booking: &Booking) -> Result<Self, PersistenceError> {
        Ok(Self {
            booking_id: booking.booking_id.clone(),
            customer_id: booking.customer_id,
            service_name: booking.service_name.clone(),
            service_date: format_date(booking.service_date),
            time_slot: booking.time_slot.clone(),
            service_address: booking.service_address.clone(),
            special_notes: booking.special_notes.clone(),
            subtotal: booking.subtotal.minor(),
            discount_amount: booking.discount_amount.minor(),
            coupon_code: booking.coupon_code.clone(),
            coupon_discount: booking.coupon_discount.minor(),
            total_amount: booking.total_amount.minor(),
            payment_method: booking.payment_method.clone(),
            payment_status: booking.payment_status.as_str().to_string(),
            payment_reference: booking.payment_reference.clone(),
            booking_status: booking.booking_status.as_str().to_string(),
            assigned_technician_id: booking.assigned_technician_id,
            created_at: encode_timestamp(booking.created_at)?,
            updated_at: encode_timestamp(booking.updated_at)?,
        })
    }
}

/// The columns a lifecycle transition may change.
#[derive(AsChangeset)]
#[diesel(table_name = bookings, treat_none_as_null = true)]
pub(crate) struct BookingChanges {
    pub payment_status: String,
    pub payment_reference: Option<String>,
    pub booking_status: String,
    pub assigned_technician_id: Option<i64>,
    pub updated_at: String,
}

impl BookingChanges {
    pub fn from_booking(booking: &Booking) -> Result<Self, PersistenceError> {
        Ok(Self {
            payment_status: booking.payment_status.as_str().to_string(),
            payment_reference: booking.payment_reference.clone(),
            booking_status: booking.booking_status.as_str().to_string(),
            assigned_technician_id: booking.assigned_technician_id,
            updated_at: encode_timestamp(booking.updated_at)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = booking_line_items)]
pub(crate) struct LineItemRow {
    service_type_name: String,
    room_size: String,
    unit_price: i64,
    quantity: i32,
    line_total: i64,
}

impl TryFrom<LineItemRow> for BookingLineItem {
    type Error = PersistenceError;

    fn try_from(row: LineItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            service_type_name: row.service_type_name,
            room_size: row.room_size,
            unit_price: Money::from_minor(row.unit_price),
            quantity: decode_count("booking_line_items", row.quantity)?,
            line_total: Money::from_minor(row.line_total),
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = status_log)]
pub(crate) struct StatusLogRow {
    booking_id: String,
    technician_id: i64,
    status: String,
    recorded_at: String,
    notes: Option<String>,
    location_lat: Option<f64>,
    location_lng: Option<f64>,
}

impl TryFrom<StatusLogRow> for StatusLogEntry {
    type Error = PersistenceError;

    fn try_from(row: StatusLogRow) -> Result<Self, Self::Error> {
        let location: Option<GeoPoint> = GeoPoint::from_optional(row.location_lat, row.location_lng)
            .map_err(|e| PersistenceError::CorruptRow {
                table: "status_log",
                detail: e.to_string(),
            })?;
        Ok(Self {
            booking_id: row.booking_id,
            technician_id: row.technician_id,
            status: decode_enum::<TechnicianStatus>("status_log", &row.status)?,
            recorded_at: decode_timestamp("status_log", &row.recorded_at)?,
            notes: row.notes,
            location,
        })
    }
}

// ----------------------------------------------------------------------------
// Notifications
// ----------------------------------------------------------------------------

#[derive(Queryable, Selectable)]
#[diesel(table_name = notifications)]
pub(crate) struct NotificationRow {
    notification_id: i64,
    recipient_kind: String,
    recipient_id: i64,
    title: String,
    message: String,
    related_booking_id: Option<String>,
    created_at: String,
    is_read: i32,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = PersistenceError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            notification_id: Some(row.notification_id),
            recipient: Recipient {
                kind: decode_enum("notifications", &row.recipient_kind)?,
                id: row.recipient_id,
            },
            title: row.title,
            message: row.message,
            related_booking_id: row.related_booking_id,
            created_at: decode_timestamp("notifications", &row.created_at)?,
            read: row.is_read != 0,
        })
    }
}
