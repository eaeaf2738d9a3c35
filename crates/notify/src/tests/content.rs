// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::sample_booking;
use crate::{
    Notification, Recipient, job_assigned, job_cancelled, status_update, technician_assigned,
};
use pestcare_domain::{PrincipalKind, TechnicianStatus};
use time::macros::datetime;

#[test]
fn test_assignment_notifies_technician_and_customer() {
    let booking = sample_booking();
    let now = datetime!(2026-05-01 10:00 UTC);

    let tech: Notification = job_assigned(&booking, 7, now);
    assert_eq!(tech.recipient, Recipient::technician(7));
    assert_eq!(tech.title, "New job assigned");
    assert!(tech.message.contains("2026-05-04 (10:00 AM - 12:00 PM)"));
    assert_eq!(tech.related_booking_id.as_deref(), Some("PC-20260501-123456"));
    assert!(!tech.read);

    let customer: Notification = technician_assigned(&booking, "Ravi Kumar", now);
    assert_eq!(customer.recipient.kind, PrincipalKind::Customer);
    assert_eq!(customer.recipient.id, 11);
    assert!(customer.message.starts_with("Ravi Kumar has been assigned"));
}

#[test]
fn test_status_updates_go_to_customer() {
    let booking = sample_booking();
    let now = datetime!(2026-05-04 10:05 UTC);

    let titles: Vec<String> = [
        TechnicianStatus::Reached,
        TechnicianStatus::Started,
        TechnicianStatus::Completed,
    ]
    .into_iter()
    .map(|s| {
        let n: Notification = status_update(&booking, s, now);
        assert_eq!(n.recipient, Recipient::customer(11));
        n.title
    })
    .collect();

    assert_eq!(
        titles,
        vec!["Technician arrived", "Service started", "Service completed"]
    );
}

#[test]
fn test_cancellation_notifies_technician() {
    let booking = sample_booking();
    let n: Notification = job_cancelled(&booking, 7, datetime!(2026-05-01 11:00 UTC));
    assert_eq!(n.recipient, Recipient::technician(7));
    assert!(n.message.contains("cancelled by the customer"));
}

#[test]
fn test_recipient_display() {
    assert_eq!(Recipient::technician(7).to_string(), "technician:7");
}
