// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Amounts travel as decimal numbers in major currency units. Required
//! request fields are still `Option` so that an absent field is reported
//! as a validation error naming the field.

use serde::{Deserialize, Serialize};

// ============================================================================
// Principals & sessions
// ============================================================================

/// Public customer signup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub login_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub password_confirmation: Option<String>,
}

/// Response after creating a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalCreatedResponse {
    pub principal_id: i64,
    pub kind: String,
    pub login_name: String,
}

/// Login for one principal kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub login_name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Public view of a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalInfo {
    pub principal_id: i64,
    pub kind: String,
    pub login_name: String,
    pub display_name: String,
    pub phone: Option<String>,
}

/// A newly issued session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Token to send in the `Session-ID` header.
    pub session_id: String,
    pub expires_at: String,
    pub principal: PrincipalInfo,
}

/// Change the caller's own password.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
    #[serde(default)]
    pub new_password_confirmation: Option<String>,
}

/// Admin creates a technician account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateTechnicianRequest {
    #[serde(default)]
    pub login_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub password_confirmation: Option<String>,
}

/// Plain acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Bookings
// ============================================================================

/// One cart entry as submitted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CartItemRequest {
    #[serde(default)]
    pub service_type_name: Option<String>,
    #[serde(default)]
    pub room_size: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub quantity: Option<i64>,
}

/// Create a booking.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreateBookingRequest {
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub service_date: Option<String>,
    #[serde(default)]
    pub time_slot: Option<String>,
    #[serde(default)]
    pub service_address: Option<String>,
    #[serde(default)]
    pub special_notes: Option<String>,
    #[serde(default)]
    pub cart_items: Vec<CartItemRequest>,
    #[serde(default)]
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub subtotal: Option<f64>,
    #[serde(default)]
    pub discount_amount: Option<f64>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub payment_method: Option<String>,
    /// External payment-order reference, if the client already has one.
    #[serde(default)]
    pub payment_reference: Option<String>,
}

/// The stored amounts of a new booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBookingResponse {
    pub booking_id: String,
    pub subtotal: f64,
    pub discount_amount: f64,
    pub coupon_code: Option<String>,
    pub coupon_discount: f64,
    pub total_amount: f64,
    pub booking_status: String,
    pub payment_status: String,
    /// Why a submitted coupon was not applied.
    pub coupon_message: Option<String>,
}

/// Record a payment outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PaymentRequest {
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub payment_reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub booking_id: String,
    pub payment_status: String,
    pub payment_reference: Option<String>,
    /// False when the booking was already in the requested state.
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelBookingResponse {
    pub booking_id: String,
    pub booking_status: String,
    pub hours_remaining: f64,
}

/// A booking as shown to its customer, technician or an admin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingInfo {
    pub booking_id: String,
    pub customer_id: i64,
    pub service_name: String,
    pub service_date: String,
    pub time_slot: String,
    pub service_address: String,
    pub special_notes: Option<String>,
    pub subtotal: f64,
    pub discount_amount: f64,
    pub coupon_code: Option<String>,
    pub coupon_discount: f64,
    pub total_amount: f64,
    pub payment_method: String,
    pub payment_status: String,
    pub payment_reference: Option<String>,
    pub booking_status: String,
    pub assigned_technician_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemInfo {
    pub service_type_name: String,
    pub room_size: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub line_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDetailResponse {
    pub booking: BookingInfo,
    pub line_items: Vec<LineItemInfo>,
    /// Latest technician-reported status, if a technician is assigned.
    pub technician_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingListResponse {
    pub bookings: Vec<BookingInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusLogEntryInfo {
    pub technician_id: i64,
    pub status: String,
    pub recorded_at: String,
    pub notes: Option<String>,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusLogResponse {
    pub booking_id: String,
    pub entries: Vec<StatusLogEntryInfo>,
}

// ============================================================================
// Coupons & catalog
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferInfo {
    pub code: String,
    pub title: String,
    pub percentage: f64,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponEvaluationResponse {
    pub offer: OfferInfo,
    pub discount_amount: f64,
}

/// Admin upserts a catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CatalogEntryRequest {
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub service_type_name: Option<String>,
    #[serde(default)]
    pub room_size: Option<String>,
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntryInfo {
    pub service_name: String,
    pub service_type_name: String,
    pub room_size: String,
    pub unit_price: f64,
    pub active: bool,
}

/// Admin upserts a coupon; the code comes from the path.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CouponRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub percentage: Option<f64>,
}

// ============================================================================
// Fulfillment
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AssignTechnicianRequest {
    #[serde(default)]
    pub booking_id: Option<String>,
    #[serde(default)]
    pub technician_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicianContact {
    pub technician_id: i64,
    pub display_name: String,
    pub login_name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignTechnicianResponse {
    pub booking_id: String,
    pub booking_status: String,
    pub technician: TechnicianContact,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StatusReportRequest {
    #[serde(default)]
    pub booking_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub location_lat: Option<f64>,
    #[serde(default)]
    pub location_lng: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReportResponse {
    pub booking_id: String,
    pub technician_status: String,
    pub booking_status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicianJobInfo {
    pub booking: BookingInfo,
    pub technician_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicianJobsResponse {
    pub jobs: Vec<TechnicianJobInfo>,
}

// ============================================================================
// Notifications
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationInfo {
    pub notification_id: Option<i64>,
    pub title: String,
    pub message: String,
    pub related_booking_id: Option<String>,
    pub created_at: String,
    pub read: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationInfo>,
}
