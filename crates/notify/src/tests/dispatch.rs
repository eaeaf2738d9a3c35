// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::sample_booking;
use crate::{
    DispatchError, MemoryDispatcher, Notification, NotificationDispatcher, TracingDispatcher,
    dispatch_all, job_assigned, status_update,
};
use pestcare_domain::TechnicianStatus;
use time::macros::datetime;

struct FailingForTechnicians;

impl NotificationDispatcher for FailingForTechnicians {
    fn dispatch(&self, notification: &Notification) -> Result<(), DispatchError> {
        if notification.recipient.kind == pestcare_domain::PrincipalKind::Technician {
            return Err(DispatchError::Delivery(notification.recipient.to_string()));
        }
        Ok(())
    }
}

fn batch() -> Vec<Notification> {
    let booking = sample_booking();
    let now = datetime!(2026-05-01 10:00 UTC);
    vec![
        job_assigned(&booking, 7, now),
        status_update(&booking, TechnicianStatus::Reached, now),
    ]
}

#[test]
fn test_memory_dispatcher_records_everything() {
    let dispatcher = MemoryDispatcher::new();
    assert_eq!(dispatch_all(&dispatcher, &batch()), 2);
    assert_eq!(dispatcher.delivered(), batch());
}

#[test]
fn test_failures_are_counted_not_propagated() {
    assert_eq!(dispatch_all(&FailingForTechnicians, &batch()), 1);
}

#[test]
fn test_tracing_dispatcher_always_succeeds() {
    assert_eq!(dispatch_all(&TracingDispatcher, &batch()), 2);
}
