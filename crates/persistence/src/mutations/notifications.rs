// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use pestcare_notify::{Notification, Recipient};
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::encode_timestamp;
use crate::diesel_schema::notifications;
use crate::error::PersistenceError;

/// Stores a notification and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_notification(
    conn: &mut SqliteConnection,
    notification: &Notification,
) -> Result<i64, PersistenceError> {
    debug!(
        recipient = %notification.recipient,
        title = %notification.title,
        "Storing notification"
    );

    diesel::insert_into(notifications::table)
        .values((
            notifications::recipient_kind.eq(notification.recipient.kind.as_str()),
            notifications::recipient_id.eq(notification.recipient.id),
            notifications::title.eq(&notification.title),
            notifications::message.eq(&notification.message),
            notifications::related_booking_id.eq(notification.related_booking_id.as_deref()),
            notifications::created_at.eq(encode_timestamp(notification.created_at)?),
            notifications::is_read.eq(i32::from(notification.read)),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Marks a notification read.
///
/// Only the recipient may do so; a notification belonging to anyone else
/// is reported as not found.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no notification with this id
/// belongs to `recipient`.
pub fn mark_notification_read(
    conn: &mut SqliteConnection,
    notification_id: i64,
    recipient: Recipient,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(notifications::table)
        .filter(notifications::notification_id.eq(notification_id))
        .filter(notifications::recipient_kind.eq(recipient.kind.as_str()))
        .filter(notifications::recipient_id.eq(recipient.id))
        .set(notifications::is_read.eq(1))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Notification {notification_id} not found"
        )));
    }
    Ok(())
}
