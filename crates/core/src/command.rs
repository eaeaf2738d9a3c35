// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pestcare_domain::{GeoPoint, PaymentStatus, TechnicianStatus, Tz};

/// Who is asking to change a booking's payment fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentRequester {
    /// A customer; must own the booking.
    Customer(i64),
    Admin,
}

/// A command represents user intent as data only.
///
/// Commands are the only way to request a change to an existing booking.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Bind a pending booking to a technician.
    AssignTechnician {
        /// The technician being assigned.
        technician_id: i64,
        /// Display name used in the customer notification.
        technician_name: String,
    },
    /// A technician reports progress on their job.
    ReportStatus {
        /// The reporting technician.
        technician_id: i64,
        /// The reported status.
        status: TechnicianStatus,
        /// Free-text notes.
        notes: Option<String>,
        /// Where the technician was when reporting.
        location: Option<GeoPoint>,
    },
    /// The customer cancels their booking.
    Cancel {
        /// The requesting customer.
        customer_id: i64,
        /// Timezone in which the service date and slot are wall-clock times.
        timezone: Tz,
    },
    /// Record a payment outcome reported by the caller.
    RecordPayment {
        requested_by: PaymentRequester,
        status: PaymentStatus,
        reference: Option<String>,
    },
}

impl Command {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AssignTechnician { .. } => "assign_technician",
            Self::ReportStatus { .. } => "report_status",
            Self::Cancel { .. } => "cancel",
            Self::RecordPayment { .. } => "record_payment",
        }
    }
}
