// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

//! API boundary for the booking service.
//!
//! Handlers take a `Persistence` handle, an already-validated principal
//! and a request DTO, and return a response DTO or an [`ApiError`]. The
//! HTTP layer owns transport concerns only: extracting the `Session-ID`
//! header, choosing status codes and wrapping results in the response
//! envelope.

mod auth;
mod config;
mod error;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{
    AuthenticatedPrincipal, AuthenticationService, AuthorizationService, LoginOutcome,
};
pub use config::ServiceSettings;
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error, translate_transition_error,
};
pub use handlers::{
    BOOTSTRAP_ADMIN_DISPLAY_NAME, assign_technician, bootstrap_admin, cancel_booking,
    change_password, create_booking, create_technician, evaluate_coupon, get_booking,
    get_status_log, list_admin_bookings, list_customer_bookings, list_notifications,
    list_technician_jobs, login, logout, mark_notification_read, record_payment, report_status,
    signup_customer, upsert_catalog_entry, upsert_coupon,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError, PasswordSubject};
pub use request_response::{
    AssignTechnicianRequest, AssignTechnicianResponse, BookingDetailResponse, BookingInfo,
    BookingListResponse, CancelBookingResponse, CartItemRequest, CatalogEntryInfo,
    CatalogEntryRequest, ChangePasswordRequest, CouponEvaluationResponse, CouponRequest,
    CreateBookingRequest, CreateBookingResponse, CreateTechnicianRequest, LineItemInfo,
    LoginRequest, LoginResponse, MessageResponse, NotificationInfo, NotificationListResponse,
    OfferInfo, PaymentRequest, PaymentResponse, PrincipalCreatedResponse, PrincipalInfo,
    SignupRequest, StatusLogEntryInfo, StatusLogResponse, StatusReportRequest,
    StatusReportResponse, TechnicianContact, TechnicianJobInfo, TechnicianJobsResponse,
};
