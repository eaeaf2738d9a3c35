// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Service time slots.
//!
//! Slots arrive as free-form labels such as `"09:00 AM - 11:00 AM"`,
//! `"14:30-16:30"` or `"9 AM to 11 AM"`. Only the start of the slot carries
//! meaning for the business rules, so the label is kept verbatim for display
//! and the start time is parsed once.

use crate::error::DomainError;
use time::Time;

/// A booked time slot: the original label plus its parsed start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    label: String,
    start: Time,
}

impl TimeSlot {
    /// Parses a slot label.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimeSlot` if the start of the slot is not
    /// a recognisable 12- or 24-hour clock time.
    pub fn parse(label: &str) -> Result<Self, DomainError> {
        let trimmed: &str = label.trim();
        if trimmed.is_empty() {
            return Err(DomainError::MissingField("time_slot"));
        }

        let head: &str = trimmed.split(['-', '\u{2013}']).next().unwrap_or_default();
        let head: &str = head.split(" to ").next().unwrap_or_default();

        let start: Time =
            parse_clock(head).ok_or_else(|| DomainError::InvalidTimeSlot(label.to_string()))?;

        Ok(Self {
            label: trimmed.to_string(),
            start,
        })
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The wall-clock time at which the slot begins.
    #[must_use]
    pub const fn start(&self) -> Time {
        self.start
    }
}

fn parse_clock(raw: &str) -> Option<Time> {
    let upper: String = raw.trim().to_ascii_uppercase();

    let (body, meridiem): (&str, Option<bool>) = if let Some(b) = upper.strip_suffix("AM") {
        (b.trim_end(), Some(false))
    } else if let Some(b) = upper.strip_suffix("PM") {
        (b.trim_end(), Some(true))
    } else {
        (upper.as_str(), None)
    };

    let (hour, minute): (u8, u8) = match body.split_once(':') {
        Some((h, m)) => (h.trim().parse().ok()?, m.trim().parse().ok()?),
        None => (body.trim().parse().ok()?, 0),
    };

    let hour: u8 = match meridiem {
        Some(is_pm) => {
            if hour == 0 || hour > 12 {
                return None;
            }
            match (hour, is_pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, false) => h,
                (h, true) => h + 12,
            }
        }
        None => hour,
    };

    Time::from_hms(hour, minute, 0).ok()
}
