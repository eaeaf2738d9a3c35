// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.
//!
//! Lower-layer errors are translated explicitly; none of them reach a
//! client unchanged.

use pestcare::CoreError;
use pestcare_domain::{DomainError, PrincipalKind};
use pestcare_persistence::{PersistenceError, TransitionError};

use crate::password_policy::PasswordPolicyError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No session token was presented.
    MissingToken,
    /// The token does not belong to a session of the expected kind.
    InvalidSession,
    /// The session exists but has expired.
    SessionExpired,
    /// Login credentials were rejected.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The principal may not perform the action.
    Forbidden {
        /// The action that was attempted.
        action: String,
        /// The principal kind required for this action.
        required_kind: PrincipalKind,
    },
    /// The session store failed.
    Storage(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingToken => write!(f, "Missing Session-ID header"),
            Self::InvalidSession => write!(f, "Invalid session"),
            Self::SessionExpired => write!(f, "Session expired"),
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Forbidden {
                action,
                required_kind,
            } => write!(f, "Forbidden: '{action}' requires a {required_kind} session"),
            Self::Storage(msg) => write!(f, "Session store failure: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These represent the API contract and are independent of the layers
/// below.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// No session token was presented.
    Unauthorized {
        /// Why the request was rejected.
        reason: String,
    },
    /// The session token is unknown or belongs to another principal kind.
    InvalidSession,
    /// The session token has expired.
    SessionExpired,
    /// Login credentials were rejected.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The principal is authenticated but may not do this.
    Forbidden {
        /// The action that was attempted.
        action: String,
        /// A human-readable description.
        message: String,
    },
    /// Missing or malformed input.
    ValidationError {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A referenced resource is absent or in the wrong state.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// A lifecycle rule forbids the requested change.
    InvalidTransition {
        /// A human-readable description.
        message: String,
    },
    /// Too little notice remains to cancel.
    CancellationWindowClosed {
        /// A human-readable description.
        message: String,
        /// Hours left before the service starts.
        hours_remaining: f64,
    },
    /// The coupon does not exist or is not active today.
    CouponInvalid {
        /// A human-readable description.
        message: String,
    },
    /// The write conflicts with existing or concurrently changed data.
    Conflict {
        /// A human-readable description.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
    /// An internal error occurred.
    ///
    /// The message is for logs only.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Stable error code carried in the response envelope.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "Unauthorized",
            Self::InvalidSession => "InvalidSession",
            Self::SessionExpired => "SessionExpired",
            Self::AuthenticationFailed { .. } => "AuthenticationFailed",
            Self::Forbidden { .. } => "Forbidden",
            Self::ValidationError { .. } | Self::PasswordPolicyViolation { .. } => {
                "ValidationError"
            }
            Self::ResourceNotFound { .. } => "NotFound",
            Self::InvalidTransition { .. } => "InvalidTransition",
            Self::CancellationWindowClosed { .. } => "CancellationWindowClosed",
            Self::CouponInvalid { .. } => "CouponInvalid",
            Self::Conflict { .. } => "Conflict",
            Self::Internal { .. } => "PersistenceError",
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized { reason } => write!(f, "Unauthorized: {reason}"),
            Self::InvalidSession => write!(f, "Invalid session"),
            Self::SessionExpired => write!(f, "Session expired"),
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Forbidden { message, .. }
            | Self::InvalidTransition { message }
            | Self::CancellationWindowClosed { message, .. }
            | Self::CouponInvalid { message }
            | Self::Conflict { message } => write!(f, "{message}"),
            Self::ValidationError { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => write!(f, "{resource_type} not found: {message}"),
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => Self::Unauthorized {
                reason: err.to_string(),
            },
            AuthError::InvalidSession => Self::InvalidSession,
            AuthError::SessionExpired => Self::SessionExpired,
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Forbidden { ref action, .. } => Self::Forbidden {
                action: action.clone(),
                message: err.to_string(),
            },
            AuthError::Storage(message) => Self::Internal { message },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

fn invalid(field: &str, message: String) -> ApiError {
    ApiError::ValidationError {
        field: field.to_string(),
        message,
    }
}

fn booking_not_found(message: String) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Booking"),
        message,
    }
}

/// Translates a domain error into an API error.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::MissingField(field)
        | DomainError::InvalidField { field, .. }
        | DomainError::InvalidAmount { field, .. } => invalid(field, message),
        DomainError::EmptyCart | DomainError::PriceMismatch { .. } => {
            invalid("cart_items", message)
        }
        DomainError::InvalidQuantity { .. } => invalid("quantity", message),
        DomainError::SubtotalMismatch { .. } => invalid("subtotal", message),
        DomainError::DiscountExceedsSubtotal { .. } => invalid("discount_amount", message),
        DomainError::InvalidTimeSlot(_) | DomainError::UnresolvableLocalTime { .. } => {
            invalid("time_slot", message)
        }
        DomainError::DateParseError { .. } | DomainError::DateArithmeticOverflow { .. } => {
            invalid("date", message)
        }
        DomainError::InvalidTimezone(_) => invalid("service_timezone", message),
        DomainError::InvalidBookingStatus(_) => invalid("booking_status", message),
        DomainError::InvalidPaymentStatus(_) => invalid("payment_status", message),
        DomainError::InvalidTechnicianStatus(_) => invalid("status", message),
        DomainError::InvalidPrincipalKind(_) => invalid("kind", message),
        DomainError::CatalogEntryNotFound { .. } => ApiError::ResourceNotFound {
            resource_type: String::from("Catalog entry"),
            message,
        },
        DomainError::CouponNotFound(_) | DomainError::CouponOutsideWindow { .. } => {
            ApiError::CouponInvalid { message }
        }
        DomainError::BookingNotPending { .. } | DomainError::NotBookingOwner { .. } => {
            booking_not_found(message)
        }
        DomainError::NotAssignedTechnician { .. } => ApiError::Forbidden {
            action: String::from("report_status"),
            message,
        },
        DomainError::InvalidStatusTransition { .. }
        | DomainError::BookingNotCancellable { .. }
        | DomainError::InvalidPaymentTransition { .. } => ApiError::InvalidTransition { message },
        DomainError::CancellationWindowClosed {
            hours_remaining, ..
        } => ApiError::CancellationWindowClosed {
            message,
            hours_remaining,
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Translates a persistence error into an API error.
///
/// Storage detail is kept in `ApiError::Internal` for logging only.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::AlreadyExists(_) => ApiError::Conflict {
            message: String::from("A record with these details already exists"),
        },
        PersistenceError::StaleWrite { .. } | PersistenceError::BookingIdExhausted { .. } => {
            ApiError::Conflict {
                message: err.to_string(),
            }
        }
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        _ => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates the outcome of a failed booking transition.
#[must_use]
pub fn translate_transition_error(err: TransitionError<CoreError>) -> ApiError {
    match err {
        TransitionError::BookingNotFound(id) => {
            booking_not_found(format!("Booking '{id}' not found"))
        }
        TransitionError::Rejected(core_err) => translate_core_error(core_err),
        TransitionError::Persistence(persistence_err) => {
            translate_persistence_error(persistence_err)
        }
    }
}
