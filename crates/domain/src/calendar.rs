// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Wall-clock conversions in the declared service timezone.
//!
//! Service dates and slot times are local to where technicians work. Every
//! rule that compares them against "now" goes through this module so that
//! the conversion happens in exactly one place.

use crate::error::DomainError;
use chrono::{NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parses an IANA timezone name.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimezone` if the name is unknown.
pub fn parse_timezone(name: &str) -> Result<Tz, DomainError> {
    name.parse()
        .map_err(|_| DomainError::InvalidTimezone(name.to_string()))
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` on malformed input.
pub fn parse_date(field: &'static str, value: &str) -> Result<Date, DomainError> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::MissingField(field));
    }
    Date::parse(trimmed, DATE_FORMAT).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Returns the calendar date of `now` in the service timezone.
///
/// # Errors
///
/// Returns an error if the instant cannot be represented.
pub fn local_date(now: OffsetDateTime, tz: Tz) -> Result<Date, DomainError> {
    let utc = chrono::DateTime::from_timestamp(now.unix_timestamp(), 0).ok_or_else(|| {
        DomainError::DateArithmeticOverflow {
            operation: format!("converting {now} to the service timezone"),
        }
    })?;
    let local: NaiveDate = utc.with_timezone(&tz).date_naive();

    let month: time::Month = u8::try_from(chrono::Datelike::month(&local))
        .ok()
        .and_then(|m| time::Month::try_from(m).ok())
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("converting month of {local}"),
        })?;
    let day: u8 = u8::try_from(chrono::Datelike::day(&local)).map_err(|_| {
        DomainError::DateArithmeticOverflow {
            operation: format!("converting day of {local}"),
        }
    })?;

    Date::from_calendar_date(chrono::Datelike::year(&local), month, day).map_err(|e| {
        DomainError::DateArithmeticOverflow {
            operation: format!("building local date: {e}"),
        }
    })
}

/// Resolves a local date and wall-clock time in the service timezone to an
/// absolute instant.
///
/// When a wall-clock time occurs twice (DST fall-back) the earlier instant
/// is used.
///
/// # Errors
///
/// Returns an error if the time falls in a DST gap or cannot be converted.
pub fn local_instant(date: Date, at: Time, tz: Tz) -> Result<OffsetDateTime, DomainError> {
    // Convert time::Date to chrono::NaiveDate
    let naive_date: NaiveDate = NaiveDate::from_ymd_opt(
        date.year(),
        u32::from(u8::from(date.month())),
        u32::from(date.day()),
    )
    .ok_or_else(|| DomainError::DateArithmeticOverflow {
        operation: format!("converting service date {date}"),
    })?;

    // Convert time::Time to chrono::NaiveTime
    let naive_time: NaiveTime = NaiveTime::from_hms_opt(
        u32::from(at.hour()),
        u32::from(at.minute()),
        u32::from(at.second()),
    )
    .ok_or_else(|| DomainError::DateArithmeticOverflow {
        operation: format!("converting slot time {at}"),
    })?;

    let local = tz
        .from_local_datetime(&naive_date.and_time(naive_time))
        .earliest()
        .ok_or_else(|| DomainError::UnresolvableLocalTime {
            local: format!("{date} {at} {tz}"),
        })?;

    OffsetDateTime::from_unix_timestamp(local.timestamp()).map_err(|e| {
        DomainError::DateArithmeticOverflow {
            operation: format!("building service instant: {e}"),
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, time};

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("service_date", "2026-03-05").unwrap(), date!(2026 - 03 - 05));
        assert!(parse_date("service_date", "05/03/2026").is_err());
        assert_eq!(
            parse_date("service_date", "  "),
            Err(DomainError::MissingField("service_date"))
        );
    }

    #[test]
    fn test_local_instant_applies_offset() {
        let tz: Tz = parse_timezone("Asia/Kolkata").unwrap();
        let instant: OffsetDateTime = local_instant(date!(2026 - 03 - 05), time!(9:00), tz).unwrap();
        assert_eq!(instant, datetime!(2026-03-05 03:30 UTC));
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        let tz: Tz = parse_timezone("Asia/Kolkata").unwrap();
        let today: Date = local_date(datetime!(2026-03-05 20:00 UTC), tz).unwrap();
        assert_eq!(today, date!(2026 - 03 - 06));
    }

    #[test]
    fn test_dst_gap_is_rejected() {
        let tz: Tz = parse_timezone("America/New_York").unwrap();
        let result = local_instant(date!(2026 - 03 - 08), time!(2:30), tz);
        assert!(matches!(result, Err(DomainError::UnresolvableLocalTime { .. })));
    }

    #[test]
    fn test_unknown_timezone() {
        assert!(parse_timezone("Mars/Olympus").is_err());
    }
}
