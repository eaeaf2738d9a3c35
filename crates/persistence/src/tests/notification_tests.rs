// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Persistence, PersistenceError};
use pestcare::{Command, apply};
use pestcare_notify::Recipient;

fn assigned_booking() -> (Persistence, i64, i64) {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let customer = super::create_customer(&mut persistence, "asha@example.com");
    let technician = super::create_technician(&mut persistence, "ravi@example.com");
    let booking = persistence
        .create_booking(
            &super::create_test_new_booking(customer),
            super::today(),
            super::suffixes(&[1]),
        )
        .unwrap();
    persistence
        .apply_booking_transition(&booking.booking_id, |state| {
            apply(
                state,
                Command::AssignTechnician {
                    technician_id: technician,
                    technician_name: String::from("Ravi Technician"),
                },
                super::created_at(),
            )
        })
        .unwrap();
    (persistence, customer, technician)
}

#[test]
fn test_recipient_marks_own_notification_read() {
    let (mut persistence, customer, _) = assigned_booking();
    let recipient = Recipient::customer(customer);

    let inbox = persistence.list_notifications(recipient).unwrap();
    assert!(!inbox[0].read);
    let id = inbox[0].notification_id.unwrap();

    persistence.mark_notification_read(id, recipient).unwrap();

    assert!(persistence.list_notifications(recipient).unwrap()[0].read);
}

#[test]
fn test_other_principal_cannot_mark_notification_read() {
    let (mut persistence, customer, technician) = assigned_booking();
    let id = persistence
        .list_notifications(Recipient::customer(customer))
        .unwrap()[0]
        .notification_id
        .unwrap();

    let result = persistence.mark_notification_read(id, Recipient::technician(technician));

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
    assert!(
        !persistence
            .list_notifications(Recipient::customer(customer))
            .unwrap()[0]
            .read
    );
}

#[test]
fn test_technician_jobs_carry_derived_status() {
    let (mut persistence, _, technician) = assigned_booking();

    let jobs = persistence.list_technician_jobs(technician).unwrap();

    assert_eq!(jobs.len(), 1);
    assert_eq!(
        jobs[0].technician_status,
        Some(pestcare_domain::TechnicianStatus::Assigned)
    );
    assert!(persistence.list_technician_jobs(technician + 100).unwrap().is_empty());
}
