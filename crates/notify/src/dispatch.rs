// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Notification;
use std::sync::Mutex;
use thiserror::Error;
use tracing::{error, info};

/// Errors raised by a push-side dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Push side of notification delivery.
///
/// Implementations are called after the notification rows have been
/// committed. A failure is logged by the caller and otherwise ignored.
pub trait NotificationDispatcher: Send + Sync {
    /// Delivers one committed notification.
    ///
    /// # Errors
    ///
    /// Returns a `DispatchError` if delivery fails.
    fn dispatch(&self, notification: &Notification) -> Result<(), DispatchError>;
}

/// Dispatcher that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDispatcher;

impl NotificationDispatcher for TracingDispatcher {
    fn dispatch(&self, notification: &Notification) -> Result<(), DispatchError> {
        info!(
            recipient = %notification.recipient,
            booking_id = ?notification.related_booking_id,
            title = %notification.title,
            "Dispatching notification"
        );
        Ok(())
    }
}

/// Dispatcher that keeps everything it was given.
#[derive(Debug, Default)]
pub struct MemoryDispatcher {
    delivered: Mutex<Vec<Notification>>,
}

impl MemoryDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything dispatched so far.
    #[must_use]
    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl NotificationDispatcher for MemoryDispatcher {
    fn dispatch(&self, notification: &Notification) -> Result<(), DispatchError> {
        let mut guard = self
            .delivered
            .lock()
            .map_err(|e| DispatchError::Delivery(e.to_string()))?;
        guard.push(notification.clone());
        Ok(())
    }
}

/// Hands every notification to `dispatcher`, logging failures.
///
/// Returns the number delivered successfully.
pub fn dispatch_all(dispatcher: &dyn NotificationDispatcher, notifications: &[Notification]) -> usize {
    notifications
        .iter()
        .filter(|n| match dispatcher.dispatch(n) {
            Ok(()) => true,
            Err(e) => {
                error!(
                    recipient = %n.recipient,
                    booking_id = ?n.related_booking_id,
                    error = %e,
                    "Notification dispatch failed"
                );
                false
            }
        })
        .count()
}
