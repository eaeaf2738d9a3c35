// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Customer cancellation window.

use crate::calendar::local_instant;
use crate::error::DomainError;
use crate::time_slot::TimeSlot;
use chrono_tz::Tz;
use time::{Date, Duration, OffsetDateTime};

/// Minimum notice a customer must give to cancel.
pub const CANCELLATION_NOTICE: Duration = Duration::hours(24);

/// Outcome of an accepted cancellation check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CancellationWindow {
    /// When the booked service begins.
    pub service_instant: OffsetDateTime,
    /// Hours between `now` and the service start.
    pub hours_remaining: f64,
}

/// Checks that at least [`CANCELLATION_NOTICE`] remains before the service.
///
/// The boundary is inclusive: exactly 24 hours of notice is accepted.
///
/// # Errors
///
/// Returns `DomainError::CancellationWindowClosed` with the remaining hours
/// when too little notice remains, or a conversion error if the service
/// time cannot be placed in `tz`.
pub fn check_cancellation_window(
    booking_id: &str,
    service_date: Date,
    slot: &TimeSlot,
    tz: Tz,
    now: OffsetDateTime,
) -> Result<CancellationWindow, DomainError> {
    let service_instant: OffsetDateTime = local_instant(service_date, slot.start(), tz)?;
    let remaining: Duration = service_instant - now;
    let hours_remaining: f64 = remaining.as_seconds_f64() / 3600.0;

    if remaining < CANCELLATION_NOTICE {
        return Err(DomainError::CancellationWindowClosed {
            booking_id: booking_id.to_string(),
            hours_remaining,
        });
    }

    Ok(CancellationWindow {
        service_instant,
        hours_remaining,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn slot() -> TimeSlot {
        TimeSlot::parse("10:00 AM - 12:00 PM").unwrap()
    }

    #[test]
    fn test_exactly_twenty_four_hours_is_allowed() {
        let now: OffsetDateTime = datetime!(2026-05-01 10:00 UTC);
        let window =
            check_cancellation_window("PC-1", date!(2026 - 05 - 02), &slot(), Tz::UTC, now).unwrap();
        assert!((window.hours_remaining - 24.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_one_second_short_is_rejected() {
        let now: OffsetDateTime = datetime!(2026-05-01 10:00:01 UTC);
        let err =
            check_cancellation_window("PC-1", date!(2026 - 05 - 02), &slot(), Tz::UTC, now)
                .unwrap_err();
        assert!(matches!(err, DomainError::CancellationWindowClosed { .. }));
    }

    #[test]
    fn test_reports_hours_remaining() {
        let now: OffsetDateTime = datetime!(2026-05-01 14:00 UTC);
        let err =
            check_cancellation_window("PC-1", date!(2026 - 05 - 02), &slot(), Tz::UTC, now)
                .unwrap_err();
        match err {
            DomainError::CancellationWindowClosed {
                booking_id,
                hours_remaining,
            } => {
                assert_eq!(booking_id, "PC-1");
                assert!((hours_remaining - 20.0).abs() < 1e-9);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_past_service_has_negative_hours() {
        let now: OffsetDateTime = datetime!(2026-05-03 10:00 UTC);
        let err =
            check_cancellation_window("PC-1", date!(2026 - 05 - 02), &slot(), Tz::UTC, now)
                .unwrap_err();
        assert!(matches!(
            err,
            DomainError::CancellationWindowClosed { hours_remaining, .. } if hours_remaining < 0.0
        ));
    }

    #[test]
    fn test_uses_service_timezone() {
        // 10:00 in Kolkata is 04:30 UTC
        let tz: Tz = chrono_tz::Asia::Kolkata;
        let now: OffsetDateTime = datetime!(2026-05-01 04:30 UTC);
        assert!(check_cancellation_window("PC-1", date!(2026 - 05 - 02), &slot(), tz, now).is_ok());
        let late: OffsetDateTime = datetime!(2026-05-01 04:31 UTC);
        assert!(check_cancellation_window("PC-1", date!(2026 - 05 - 02), &slot(), tz, late).is_err());
    }
}
