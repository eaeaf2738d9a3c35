// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Technician-reported fulfillment progress.
//!
//! Progress moves through `assigned → reached → started → completed`. The
//! status log is the single source of truth: both the technician-visible
//! status and the booking-level status are derived from it by the pure
//! functions in this module. Reports may repeat the current status but may
//! never move backwards.

use crate::booking::StatusLogEntry;
use crate::error::DomainError;
use crate::types::BookingStatus;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fine-grained progress of the assigned technician.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechnicianStatus {
    /// Recorded by the assignment itself, never reported by a technician
    Assigned,
    /// Technician is at the service address
    Reached,
    /// Work has begun
    Started,
    /// Work is finished
    Completed,
}

impl TechnicianStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::Reached => "reached",
            Self::Started => "started",
            Self::Completed => "completed",
        }
    }

    /// Position in the progression, starting at zero.
    #[must_use]
    pub const fn index(&self) -> u8 {
        match self {
            Self::Assigned => 0,
            Self::Reached => 1,
            Self::Started => 2,
            Self::Completed => 3,
        }
    }

    /// The booking-level status this progress maps to.
    #[must_use]
    pub const fn booking_status(&self) -> BookingStatus {
        match self {
            Self::Assigned => BookingStatus::Confirmed,
            Self::Reached | Self::Started => BookingStatus::InProgress,
            Self::Completed => BookingStatus::Completed,
        }
    }

    /// Validates a technician report against the current progress.
    ///
    /// Re-reporting the current status is accepted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the report is
    /// `assigned`, moves backwards, or targets a cancelled booking.
    pub fn validate_report(
        current: Self,
        booking_status: BookingStatus,
        reported: Self,
    ) -> Result<(), DomainError> {
        let reason: Option<&str> = if booking_status == BookingStatus::Cancelled {
            Some("booking has been cancelled")
        } else if reported == Self::Assigned {
            Some("'assigned' is recorded by assignment and cannot be reported")
        } else if reported.index() < current.index() {
            Some("status cannot move backwards")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(DomainError::InvalidStatusTransition {
                from: current.as_str().to_string(),
                to: reported.as_str().to_string(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl FromStr for TechnicianStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "assigned" => Ok(Self::Assigned),
            "reached" => Ok(Self::Reached),
            "started" => Ok(Self::Started),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidTechnicianStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for TechnicianStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Latest technician status recorded in an ordered log.
///
/// Returns `None` for an unassigned booking.
#[must_use]
pub fn derive_technician_status(log: &[StatusLogEntry]) -> Option<TechnicianStatus> {
    log.last().map(|entry| entry.status)
}

/// Booking-level status implied by an ordered log.
///
/// Cancellation is not a technician event, so it is passed in separately.
#[must_use]
pub fn derive_booking_status(log: &[StatusLogEntry], cancelled: bool) -> BookingStatus {
    if cancelled {
        return BookingStatus::Cancelled;
    }
    derive_technician_status(log).map_or(BookingStatus::Pending, |s| s.booking_status())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn entry(status: TechnicianStatus) -> StatusLogEntry {
        StatusLogEntry {
            booking_id: String::from("PC-20260501-000001"),
            technician_id: 7,
            status,
            recorded_at: datetime!(2026-05-01 10:00 UTC),
            notes: None,
            location: None,
        }
    }

    #[test]
    fn test_forward_and_repeat_reports() {
        use TechnicianStatus::{Assigned, Completed, Reached, Started};
        let confirmed: BookingStatus = BookingStatus::Confirmed;
        assert!(TechnicianStatus::validate_report(Assigned, confirmed, Reached).is_ok());
        assert!(TechnicianStatus::validate_report(Assigned, confirmed, Completed).is_ok());
        assert!(TechnicianStatus::validate_report(Started, BookingStatus::InProgress, Started).is_ok());
    }

    #[test]
    fn test_backwards_report_rejected() {
        let result = TechnicianStatus::validate_report(
            TechnicianStatus::Completed,
            BookingStatus::Completed,
            TechnicianStatus::Reached,
        );
        assert!(matches!(
            result,
            Err(DomainError::InvalidStatusTransition { ref from, ref to, .. })
                if from == "completed" && to == "reached"
        ));
    }

    #[test]
    fn test_assigned_cannot_be_reported() {
        assert!(
            TechnicianStatus::validate_report(
                TechnicianStatus::Assigned,
                BookingStatus::Confirmed,
                TechnicianStatus::Assigned
            )
            .is_err()
        );
    }

    #[test]
    fn test_cancelled_booking_rejects_reports() {
        assert!(
            TechnicianStatus::validate_report(
                TechnicianStatus::Assigned,
                BookingStatus::Cancelled,
                TechnicianStatus::Reached
            )
            .is_err()
        );
    }

    #[test]
    fn test_booking_status_mapping() {
        assert_eq!(TechnicianStatus::Assigned.booking_status(), BookingStatus::Confirmed);
        assert_eq!(TechnicianStatus::Reached.booking_status(), BookingStatus::InProgress);
        assert_eq!(TechnicianStatus::Started.booking_status(), BookingStatus::InProgress);
        assert_eq!(TechnicianStatus::Completed.booking_status(), BookingStatus::Completed);
    }

    #[test]
    fn test_derivation_from_log() {
        assert_eq!(derive_booking_status(&[], false), BookingStatus::Pending);
        assert_eq!(derive_technician_status(&[]), None);

        let log = vec![
            entry(TechnicianStatus::Assigned),
            entry(TechnicianStatus::Reached),
            entry(TechnicianStatus::Started),
        ];
        assert_eq!(derive_technician_status(&log), Some(TechnicianStatus::Started));
        assert_eq!(derive_booking_status(&log, false), BookingStatus::InProgress);
        assert_eq!(derive_booking_status(&log, true), BookingStatus::Cancelled);
    }

    #[test]
    fn test_parse_round_trip_names() {
        assert_eq!("Reached".parse::<TechnicianStatus>(), Ok(TechnicianStatus::Reached));
        assert!("arrived".parse::<TechnicianStatus>().is_err());
    }
}
