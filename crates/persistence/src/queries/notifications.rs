// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use pestcare_notify::{Notification, Recipient};

use crate::data_models::NotificationRow;
use crate::diesel_schema::notifications;
use crate::error::PersistenceError;

/// Lists a recipient's notifications, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_notifications(
    conn: &mut SqliteConnection,
    recipient: Recipient,
) -> Result<Vec<Notification>, PersistenceError> {
    notifications::table
        .filter(notifications::recipient_kind.eq(recipient.kind.as_str()))
        .filter(notifications::recipient_id.eq(recipient.id))
        .order(notifications::notification_id.desc())
        .select(NotificationRow::as_select())
        .load(conn)?
        .into_iter()
        .map(Notification::try_from)
        .collect()
}
