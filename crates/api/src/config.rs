// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Service-wide settings shared by every handler.

use pestcare_domain::{Tz, local_date, parse_timezone};
use time::{Date, Duration, OffsetDateTime};

use crate::error::{ApiError, translate_domain_error};

/// Settings fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSettings {
    /// Zone in which service dates and time slots are wall-clock values.
    pub timezone: Tz,
    /// Lifetime of newly issued sessions.
    pub session_ttl: Duration,
}

impl ServiceSettings {
    /// Default session lifetime in days.
    pub const DEFAULT_SESSION_TTL_DAYS: u32 = 30;
    /// Longest accepted session lifetime in days.
    pub const MAX_SESSION_TTL_DAYS: u32 = 3650;

    /// Builds settings from an IANA zone name and a session lifetime.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ValidationError` if the zone is unknown or the
    /// lifetime is zero or longer than `MAX_SESSION_TTL_DAYS`.
    pub fn new(timezone_name: &str, session_ttl_days: u32) -> Result<Self, ApiError> {
        let timezone: Tz = parse_timezone(timezone_name).map_err(translate_domain_error)?;
        if session_ttl_days == 0 || session_ttl_days > Self::MAX_SESSION_TTL_DAYS {
            return Err(ApiError::ValidationError {
                field: String::from("session_ttl_days"),
                message: format!(
                    "Session lifetime must be between 1 and {} days",
                    Self::MAX_SESSION_TTL_DAYS
                ),
            });
        }
        Ok(Self {
            timezone,
            session_ttl: Duration::days(i64::from(session_ttl_days)),
        })
    }

    /// The current calendar day in the service timezone.
    ///
    /// # Errors
    ///
    /// Returns an error if `now` cannot be placed in the zone.
    pub fn today(&self, now: OffsetDateTime) -> Result<Date, ApiError> {
        local_date(now, self.timezone).map_err(translate_domain_error)
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            session_ttl: Duration::days(i64::from(Self::DEFAULT_SESSION_TTL_DAYS)),
        }
    }
}
