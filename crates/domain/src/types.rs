// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The three independent kinds of authenticated actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    /// Books and pays for services.
    Customer,
    /// Field technician who performs the service.
    Technician,
    /// Back-office operator who assigns technicians.
    Admin,
}

impl PrincipalKind {
    /// Returns the string representation used for persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Technician => "technician",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for PrincipalKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "technician" => Ok(Self::Technician),
            "admin" => Ok(Self::Admin),
            _ => Err(DomainError::InvalidPrincipalKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Externally visible booking identifier.
///
/// Generated ids have the form `PC-YYYYMMDD-NNNNNN`. Uniqueness is not
/// implied by the format; the store enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookingId(String);

impl BookingId {
    /// Fixed prefix of generated ids.
    pub const PREFIX: &'static str = "PC";

    /// Number of random digits in a generated id.
    pub const SUFFIX_MODULUS: u32 = 1_000_000;

    /// Wraps an existing id.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_uppercase())
    }

    /// Builds an id from the booking date and a random suffix.
    #[must_use]
    pub fn generate(date: time::Date, random: u32) -> Self {
        Self(format!(
            "{}-{:04}{:02}{:02}-{:06}",
            Self::PREFIX,
            date.year(),
            u8::from(date.month()),
            date.day(),
            random % Self::SUFFIX_MODULUS
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Customer-visible lifecycle of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Created, awaiting technician assignment.
    Pending,
    /// Technician assigned.
    Confirmed,
    /// Technician has arrived or started work.
    InProgress,
    /// Work finished.
    Completed,
    /// Cancelled by the customer.
    Cancelled,
}

impl BookingStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true if no further lifecycle change is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidBookingStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment state as reported by the caller.
///
/// Payment is recorded, not verified; the rules here only keep the
/// recorded history plausible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// Requesting the current status is accepted (callers treat it as a
    /// no-op). `Refunded` is reachable only from `Paid` and is final.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPaymentTransition` otherwise.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if *self == new_status {
            return Ok(());
        }

        let valid: bool = match (self, new_status) {
            (Self::Refunded, _) => false,
            (from, Self::Refunded) => *from == Self::Paid,
            _ => true,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidPaymentTransition {
                from: *self,
                to: new_status,
            })
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            _ => Err(DomainError::InvalidPaymentStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A reported technician position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Builds a point from an optional latitude/longitude pair.
    ///
    /// Both or neither must be present.
    ///
    /// # Errors
    ///
    /// Returns an error if only one coordinate is present or either is out
    /// of range.
    pub fn from_optional(lat: Option<f64>, lng: Option<f64>) -> Result<Option<Self>, DomainError> {
        match (lat, lng) {
            (None, None) => Ok(None),
            (Some(lat), Some(lng)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    return Err(DomainError::InvalidField {
                        field: "location_lat",
                        reason: format!("latitude {lat} is outside -90..=90"),
                    });
                }
                if !(-180.0..=180.0).contains(&lng) {
                    return Err(DomainError::InvalidField {
                        field: "location_lng",
                        reason: format!("longitude {lng} is outside -180..=180"),
                    });
                }
                Ok(Some(Self { lat, lng }))
            }
            (Some(_), None) => Err(DomainError::MissingField("location_lng")),
            (None, Some(_)) => Err(DomainError::MissingField("location_lat")),
        }
    }
}
