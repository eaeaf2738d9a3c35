// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Handlers are synchronous and take the current instant explicitly. Every
//! handler that changes a booking runs the change through
//! [`Persistence::apply_booking_transition`] and only hands the committed
//! notifications to the dispatcher once that call has returned.

use pestcare::{
    BookingDraft, BookingState, Command, PaymentRequester, PricedBooking,
    TransitionResult, apply, price_booking,
};
use pestcare_domain::{
    Booking, BookingId, BookingLineItem, BookingStatus, CartItem, Coupon, CouponEvaluation,
    DomainError, GeoPoint, Money, PaymentStatus, Percentage, PrincipalKind, StatusLogEntry,
    TechnicianStatus, TimeSlot, evaluate_coupon as evaluate_coupon_rule, format_date,
    local_instant, normalize_coupon_code, optional_text, parse_date, require_text,
    validate_quantity,
};
use pestcare_notify::{Notification, NotificationDispatcher, dispatch_all};
use pestcare_persistence::{
    CatalogEntry, Persistence, PersistenceError, PrincipalData, TechnicianJob,
};
use std::str::FromStr;
use time::{Date, OffsetDateTime};
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info, warn};

use crate::auth::{
    AuthenticatedPrincipal, AuthenticationService, AuthorizationService, LoginOutcome,
};
use crate::config::ServiceSettings;
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
    translate_transition_error,
};
use crate::password_policy::{PasswordPolicy, PasswordSubject};
use crate::request_response::{
    AssignTechnicianRequest, AssignTechnicianResponse, BookingDetailResponse, BookingInfo,
    BookingListResponse, CancelBookingResponse, CartItemRequest, CatalogEntryInfo,
    CatalogEntryRequest, ChangePasswordRequest, CouponEvaluationResponse, CouponRequest,
    CreateBookingRequest, CreateBookingResponse, CreateTechnicianRequest, LineItemInfo,
    LoginRequest, LoginResponse, MessageResponse, NotificationInfo, NotificationListResponse,
    OfferInfo, PaymentRequest, PaymentResponse, PrincipalCreatedResponse, PrincipalInfo,
    SignupRequest, StatusLogEntryInfo, StatusLogResponse, StatusReportRequest,
    StatusReportResponse, TechnicianContact, TechnicianJobInfo, TechnicianJobsResponse,
};

/// Display name given to the administrator created at startup.
pub const BOOTSTRAP_ADMIN_DISPLAY_NAME: &str = "Administrator";

// ============================================================================
// Helpers
// ============================================================================

fn format_timestamp(value: OffsetDateTime) -> Result<String, ApiError> {
    value.format(&Rfc3339).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })
}

fn required<T>(field: &'static str, value: Option<T>) -> Result<T, ApiError> {
    value.ok_or_else(|| translate_domain_error(DomainError::MissingField(field)))
}

fn text(field: &'static str, value: Option<&str>) -> Result<String, ApiError> {
    require_text(field, value).map_err(translate_domain_error)
}

fn optional(field: &'static str, value: Option<&str>) -> Result<Option<String>, ApiError> {
    optional_text(field, value).map_err(translate_domain_error)
}

fn amount(field: &'static str, value: f64) -> Result<Money, ApiError> {
    Money::from_major(field, value).map_err(translate_domain_error)
}

fn booking_not_found(booking_id: &str) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Booking"),
        message: format!("Booking '{booking_id}' not found"),
    }
}

/// Returns true if the principal may read the booking.
///
/// Bookings the principal may not see are reported as absent.
const fn can_view(principal: &AuthenticatedPrincipal, booking: &Booking) -> bool {
    match principal.kind {
        PrincipalKind::Customer => booking.customer_id == principal.principal_id,
        PrincipalKind::Technician => matches!(
            booking.assigned_technician_id,
            Some(id) if id == principal.principal_id
        ),
        PrincipalKind::Admin => true,
    }
}

fn principal_info(principal: &AuthenticatedPrincipal) -> PrincipalInfo {
    PrincipalInfo {
        principal_id: principal.principal_id,
        kind: principal.kind.as_str().to_string(),
        login_name: principal.login_name.clone(),
        display_name: principal.display_name.clone(),
        phone: principal.phone.clone(),
    }
}

fn booking_info(booking: &Booking) -> Result<BookingInfo, ApiError> {
    Ok(BookingInfo {
        booking_id: booking.booking_id.clone(),
        customer_id: booking.customer_id,
        service_name: booking.service_name.clone(),
        service_date: format_date(booking.service_date),
        time_slot: booking.time_slot.clone(),
        service_address: booking.service_address.clone(),
        special_notes: booking.special_notes.clone(),
        subtotal: booking.subtotal.as_major(),
        discount_amount: booking.discount_amount.as_major(),
        coupon_code: booking.coupon_code.clone(),
        coupon_discount: booking.coupon_discount.as_major(),
        total_amount: booking.total_amount.as_major(),
        payment_method: booking.payment_method.clone(),
        payment_status: booking.payment_status.as_str().to_string(),
        payment_reference: booking.payment_reference.clone(),
        booking_status: booking.booking_status.as_str().to_string(),
        assigned_technician_id: booking.assigned_technician_id,
        created_at: format_timestamp(booking.created_at)?,
        updated_at: format_timestamp(booking.updated_at)?,
    })
}

fn booking_infos(bookings: &[Booking]) -> Result<Vec<BookingInfo>, ApiError> {
    bookings.iter().map(booking_info).collect()
}

fn line_item_info(item: &BookingLineItem) -> LineItemInfo {
    LineItemInfo {
        service_type_name: item.service_type_name.clone(),
        room_size: item.room_size.clone(),
        unit_price: item.unit_price.as_major(),
        quantity: item.quantity,
        line_total: item.line_total.as_major(),
    }
}

fn status_entry_info(entry: &StatusLogEntry) -> Result<StatusLogEntryInfo, ApiError> {
    Ok(StatusLogEntryInfo {
        technician_id: entry.technician_id,
        status: entry.status.as_str().to_string(),
        recorded_at: format_timestamp(entry.recorded_at)?,
        notes: entry.notes.clone(),
        location_lat: entry.location.map(|p| p.lat),
        location_lng: entry.location.map(|p| p.lng),
    })
}

fn offer_info(coupon: &Coupon) -> OfferInfo {
    OfferInfo {
        code: coupon.code.clone(),
        title: coupon.title.clone(),
        percentage: coupon.percentage.as_percent(),
        start_date: format_date(coupon.start_date),
        end_date: format_date(coupon.end_date),
    }
}

fn notification_info(notification: &Notification) -> Result<NotificationInfo, ApiError> {
    Ok(NotificationInfo {
        notification_id: notification.notification_id,
        title: notification.title.clone(),
        message: notification.message.clone(),
        related_booking_id: notification.related_booking_id.clone(),
        created_at: format_timestamp(notification.created_at)?,
        read: notification.read,
    })
}

/// Runs a command against one booking inside a single transaction.
fn run_transition(
    persistence: &mut Persistence,
    booking_id: &str,
    command: Command,
    now: OffsetDateTime,
) -> Result<TransitionResult, ApiError> {
    let command_name: &'static str = command.name();
    persistence
        .apply_booking_transition(booking_id, |state: &BookingState| {
            apply(state, command, now)
        })
        .map_err(|err| {
            warn!(booking_id, command = command_name, error = %err, "Booking transition refused");
            translate_transition_error(err)
        })
}

/// Hands committed notifications to the push side.
///
/// Delivery failures are logged by the dispatcher helper and never
/// reach the caller.
fn dispatch_committed(dispatcher: &dyn NotificationDispatcher, notifications: &[Notification]) {
    if notifications.is_empty() {
        return;
    }
    let delivered: usize = dispatch_all(dispatcher, notifications);
    debug!(
        delivered,
        total = notifications.len(),
        "Dispatched committed notifications"
    );
}

fn create_principal_checked(
    persistence: &mut Persistence,
    kind: PrincipalKind,
    subject: &PasswordSubject<'_>,
    password: &str,
    confirmation: &str,
    now: OffsetDateTime,
) -> Result<i64, ApiError> {
    let policy: PasswordPolicy = PasswordPolicy::default();
    policy.validate(password, confirmation, subject)?;

    persistence
        .create_principal(
            kind,
            subject.login_name,
            subject.display_name,
            subject.phone,
            password,
            now,
        )
        .map_err(|err| match err {
            PersistenceError::AlreadyExists(_) => ApiError::Conflict {
                message: format!(
                    "A {kind} with login '{}' already exists",
                    subject.login_name
                ),
            },
            other => translate_persistence_error(other),
        })
}

// ============================================================================
// Principals & sessions
// ============================================================================

/// Registers a new customer account.
///
/// # Errors
///
/// Returns an error if a field is missing, the password breaks the policy
/// or the login is already taken.
pub fn signup_customer(
    persistence: &mut Persistence,
    request: &SignupRequest,
    now: OffsetDateTime,
) -> Result<PrincipalCreatedResponse, ApiError> {
    let login_name: String = text("login_name", request.login_name.as_deref())?;
    let display_name: String = text("display_name", request.display_name.as_deref())?;
    let phone: Option<String> = optional("phone", request.phone.as_deref())?;
    let password: &str = required("password", request.password.as_deref())?;
    let confirmation: &str = required(
        "password_confirmation",
        request.password_confirmation.as_deref(),
    )?;

    let principal_id: i64 = create_principal_checked(
        persistence,
        PrincipalKind::Customer,
        &PasswordSubject {
            login_name: &login_name,
            display_name: &display_name,
            phone: phone.as_deref(),
        },
        password,
        confirmation,
        now,
    )?;

    info!(principal_id, "Customer signed up");

    Ok(PrincipalCreatedResponse {
        principal_id,
        kind: PrincipalKind::Customer.as_str().to_string(),
        login_name: login_name.to_lowercase(),
    })
}

/// Creates a technician account.
///
/// Only admins may create technicians.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, a field is missing, the
/// password breaks the policy or the login is already taken.
pub fn create_technician(
    persistence: &mut Persistence,
    principal: &AuthenticatedPrincipal,
    request: &CreateTechnicianRequest,
    now: OffsetDateTime,
) -> Result<PrincipalCreatedResponse, ApiError> {
    AuthorizationService::require_kind(principal, PrincipalKind::Admin, "create_technician")?;

    let login_name: String = text("login_name", request.login_name.as_deref())?;
    let display_name: String = text("display_name", request.display_name.as_deref())?;
    let phone: Option<String> = optional("phone", request.phone.as_deref())?;
    let password: &str = required("password", request.password.as_deref())?;
    let confirmation: &str = required(
        "password_confirmation",
        request.password_confirmation.as_deref(),
    )?;

    let principal_id: i64 = create_principal_checked(
        persistence,
        PrincipalKind::Technician,
        &PasswordSubject {
            login_name: &login_name,
            display_name: &display_name,
            phone: phone.as_deref(),
        },
        password,
        confirmation,
        now,
    )?;

    info!(
        principal_id,
        created_by = principal.principal_id,
        "Technician account created"
    );

    Ok(PrincipalCreatedResponse {
        principal_id,
        kind: PrincipalKind::Technician.as_str().to_string(),
        login_name: login_name.to_lowercase(),
    })
}

/// Creates the first administrator if none exists yet.
///
/// Returns the new admin's id, or `None` if an admin already exists.
///
/// # Errors
///
/// Returns an error if the password breaks the policy or the store fails.
pub fn bootstrap_admin(
    persistence: &mut Persistence,
    login_name: &str,
    password: &str,
    now: OffsetDateTime,
) -> Result<Option<i64>, ApiError> {
    let existing: i64 = persistence
        .count_principals(PrincipalKind::Admin)
        .map_err(translate_persistence_error)?;
    if existing > 0 {
        debug!(existing, "Admin already present, skipping bootstrap");
        return Ok(None);
    }

    let login_name: String = text("login_name", Some(login_name))?;
    let admin_id: i64 = create_principal_checked(
        persistence,
        PrincipalKind::Admin,
        &PasswordSubject {
            login_name: &login_name,
            display_name: BOOTSTRAP_ADMIN_DISPLAY_NAME,
            phone: None,
        },
        password,
        password,
        now,
    )?;

    info!(admin_id, login_name = %login_name, "Bootstrap admin created");
    Ok(Some(admin_id))
}

/// Authenticates a principal of the requested kind and issues a session.
///
/// # Errors
///
/// Returns an error if a field is missing or the credentials are rejected.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
    settings: &ServiceSettings,
    now: OffsetDateTime,
) -> Result<LoginResponse, ApiError> {
    let kind: PrincipalKind = PrincipalKind::from_str(&text("kind", request.kind.as_deref())?)
        .map_err(translate_domain_error)?;
    let login_name: String = text("login_name", request.login_name.as_deref())?;
    let password: &str = required("password", request.password.as_deref())?;

    let outcome: LoginOutcome = AuthenticationService::login(
        persistence,
        kind,
        &login_name,
        password,
        settings,
        now,
    )?;

    Ok(LoginResponse {
        session_id: outcome.session_token,
        expires_at: format_timestamp(outcome.expires_at)?,
        principal: principal_info(&outcome.principal),
    })
}

/// Logs out by deleting the session.
///
/// # Errors
///
/// Returns an error if the logout fails.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Changes the caller's own password.
///
/// Only the credential hash changes; existing sessions stay valid.
///
/// # Errors
///
/// Returns an error if the current password is wrong or the new password
/// breaks the policy.
pub fn change_password(
    persistence: &mut Persistence,
    principal: &AuthenticatedPrincipal,
    request: &ChangePasswordRequest,
) -> Result<MessageResponse, ApiError> {
    let current_password: &str =
        required("current_password", request.current_password.as_deref())?;
    let new_password: &str = required("new_password", request.new_password.as_deref())?;
    let confirmation: &str = required(
        "new_password_confirmation",
        request.new_password_confirmation.as_deref(),
    )?;

    let stored: PrincipalData = persistence
        .get_principal_by_id(principal.principal_id)
        .map_err(translate_persistence_error)?
        .ok_or(ApiError::InvalidSession)?;

    let valid: bool = Persistence::verify_password(current_password, &stored.password_hash)
        .map_err(translate_persistence_error)?;
    if !valid {
        warn!(
            principal_id = principal.principal_id,
            "Password change with wrong current password"
        );
        return Err(ApiError::AuthenticationFailed {
            reason: String::from("Current password is incorrect"),
        });
    }

    let policy: PasswordPolicy = PasswordPolicy::default();
    policy.validate(
        new_password,
        confirmation,
        &PasswordSubject {
            login_name: &stored.login_name,
            display_name: &stored.display_name,
            phone: stored.phone.as_deref(),
        },
    )?;

    persistence
        .update_password(principal.principal_id, new_password)
        .map_err(translate_persistence_error)?;

    info!(principal_id = principal.principal_id, "Password changed");

    Ok(MessageResponse {
        message: String::from("Password changed"),
    })
}

// ============================================================================
// Bookings
// ============================================================================

fn cart_item(item: &CartItemRequest) -> Result<CartItem, ApiError> {
    let service_type_name: String =
        text("service_type_name", item.service_type_name.as_deref())?;
    let room_size: String = text("room_size", item.room_size.as_deref())?;
    let unit_price: Money = amount("price", required("price", item.price)?)?;
    let quantity: u32 = validate_quantity(&service_type_name, required("quantity", item.quantity)?)
        .map_err(translate_domain_error)?;

    Ok(CartItem {
        service_type_name,
        room_size,
        unit_price,
        quantity,
    })
}

fn booking_draft(
    customer_id: i64,
    request: &CreateBookingRequest,
) -> Result<BookingDraft, ApiError> {
    let service_name: String = text("service_name", request.service_name.as_deref())?;
    let service_date: Date = parse_date(
        "service_date",
        &text("service_date", request.service_date.as_deref())?,
    )
    .map_err(translate_domain_error)?;
    let time_slot: TimeSlot = TimeSlot::parse(&text("time_slot", request.time_slot.as_deref())?)
        .map_err(translate_domain_error)?;
    let service_address: String = text("service_address", request.service_address.as_deref())?;
    let special_notes: Option<String> =
        optional("special_notes", request.special_notes.as_deref())?;
    let items: Vec<CartItem> = request
        .cart_items
        .iter()
        .map(cart_item)
        .collect::<Result<_, _>>()?;
    let coupon_code: Option<String> = optional("coupon_code", request.coupon_code.as_deref())?;
    let declared_subtotal: Money = amount("subtotal", required("subtotal", request.subtotal)?)?;
    let discount_amount: Money = request
        .discount_amount
        .map(|value| amount("discount_amount", value))
        .transpose()?
        .unwrap_or(Money::ZERO);
    let declared_total: Option<Money> = request
        .total_amount
        .map(|value| amount("total_amount", value))
        .transpose()?;
    let payment_method: String = text("payment_method", request.payment_method.as_deref())?;
    let payment_reference: Option<String> =
        optional("payment_reference", request.payment_reference.as_deref())?;

    Ok(BookingDraft {
        customer_id,
        service_name,
        service_date,
        time_slot,
        service_address,
        special_notes,
        items,
        coupon_code,
        declared_subtotal,
        discount_amount,
        declared_total,
        payment_method,
        payment_reference,
    })
}

/// Creates a booking for the calling customer.
///
/// Line-item prices are checked against the current catalog. A coupon that
/// does not exist or is not active today is dropped and the booking goes
/// ahead without it. The booking row and its line items are written in one
/// transaction.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `principal` - The authenticated customer
/// * `request` - The booking request
/// * `settings` - Service settings (timezone)
/// * `now` - The creation instant
/// * `next_suffix` - Source of random booking-id suffixes
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not a customer
/// - A required field is missing or malformed
/// - A line item has no active catalog entry or a stale price
/// - The declared amounts are inconsistent
/// - The booking could not be stored
pub fn create_booking<F>(
    persistence: &mut Persistence,
    principal: &AuthenticatedPrincipal,
    request: &CreateBookingRequest,
    settings: &ServiceSettings,
    now: OffsetDateTime,
    next_suffix: F,
) -> Result<CreateBookingResponse, ApiError>
where
    F: FnMut() -> u32,
{
    AuthorizationService::require_kind(principal, PrincipalKind::Customer, "create_booking")?;

    let draft: BookingDraft = booking_draft(principal.principal_id, request)?;
    local_instant(draft.service_date, draft.time_slot.start(), settings.timezone)
        .map_err(translate_domain_error)?;

    let catalog_prices: Vec<Option<Money>> = draft
        .items
        .iter()
        .map(|item| {
            persistence.get_catalog_price(
                &draft.service_name,
                &item.service_type_name,
                &item.room_size,
            )
        })
        .collect::<Result<_, _>>()
        .map_err(translate_persistence_error)?;

    let coupon: Option<Coupon> = match draft.coupon_code.as_deref() {
        Some(code) => persistence
            .get_coupon(code)
            .map_err(translate_persistence_error)?,
        None => None,
    };

    let today: Date = settings.today(now)?;
    let priced: PricedBooking =
        price_booking(draft, &catalog_prices, coupon.as_ref(), today, now)
            .map_err(translate_core_error)?;

    let coupon_message: Option<String> = priced.coupon_rejection.as_ref().map(|rejection| {
        warn!(
            customer_id = principal.principal_id,
            reason = %rejection,
            "Coupon not applied"
        );
        rejection.to_string()
    });

    if let Some(declared) = priced.ignored_declared_total {
        warn!(
            customer_id = principal.principal_id,
            declared = %declared,
            computed = %priced.booking.total_amount,
            "Declared total ignored"
        );
    }

    let booking: Booking = persistence
        .create_booking(&priced.booking, today, next_suffix)
        .map_err(translate_persistence_error)?;

    info!(
        booking_id = %booking.booking_id,
        customer_id = booking.customer_id,
        total = %booking.total_amount,
        "Booking created"
    );

    Ok(CreateBookingResponse {
        booking_id: booking.booking_id,
        subtotal: booking.subtotal.as_major(),
        discount_amount: booking.discount_amount.as_major(),
        coupon_code: booking.coupon_code,
        coupon_discount: booking.coupon_discount.as_major(),
        total_amount: booking.total_amount.as_major(),
        booking_status: booking.booking_status.as_str().to_string(),
        payment_status: booking.payment_status.as_str().to_string(),
        coupon_message,
    })
}

/// Evaluates a coupon against an order amount for today.
///
/// # Errors
///
/// Returns `ApiError::CouponInvalid` if the coupon does not exist or is not
/// active today, or a validation error for a bad amount.
pub fn evaluate_coupon(
    persistence: &mut Persistence,
    code: &str,
    order_amount: Option<f64>,
    settings: &ServiceSettings,
    now: OffsetDateTime,
) -> Result<CouponEvaluationResponse, ApiError> {
    let code: String = text("code", Some(code))?;
    let order_amount: Money = amount("order_amount", required("order_amount", order_amount)?)?;
    let today: Date = settings.today(now)?;

    let coupon: Option<Coupon> = persistence
        .get_coupon(&code)
        .map_err(translate_persistence_error)?;
    let evaluation: CouponEvaluation =
        evaluate_coupon_rule(coupon.as_ref(), &code, order_amount, today)
            .map_err(translate_domain_error)?;

    let offer: OfferInfo =
        coupon
            .as_ref()
            .map(offer_info)
            .ok_or_else(|| ApiError::Internal {
                message: format!("Coupon '{}' evaluated without a record", evaluation.code),
            })?;

    Ok(CouponEvaluationResponse {
        offer,
        discount_amount: evaluation.discount.as_major(),
    })
}

/// Records a payment outcome for a booking.
///
/// Customers may update their own bookings; admins any booking.
/// Requesting the current payment status is acknowledged without change.
///
/// # Errors
///
/// Returns an error if the caller is a technician, the booking is not
/// visible to the caller or the payment transition is not permitted.
pub fn record_payment(
    persistence: &mut Persistence,
    principal: &AuthenticatedPrincipal,
    booking_id: &str,
    request: &PaymentRequest,
    now: OffsetDateTime,
) -> Result<PaymentResponse, ApiError> {
    let requested_by: PaymentRequester = match principal.kind {
        PrincipalKind::Customer => PaymentRequester::Customer(principal.principal_id),
        PrincipalKind::Admin => PaymentRequester::Admin,
        PrincipalKind::Technician => {
            warn!(
                principal_id = principal.principal_id,
                "Technician attempted to record a payment"
            );
            return Err(ApiError::Forbidden {
                action: String::from("record_payment"),
                message: String::from("Technicians cannot record payments"),
            });
        }
    };

    let status: PaymentStatus =
        PaymentStatus::from_str(&text("payment_status", request.payment_status.as_deref())?)
            .map_err(translate_domain_error)?;
    let reference: Option<String> =
        optional("payment_reference", request.payment_reference.as_deref())?;

    let booking_id: BookingId = BookingId::new(booking_id);
    let result: TransitionResult = run_transition(
        persistence,
        booking_id.as_str(),
        Command::RecordPayment {
            requested_by,
            status,
            reference,
        },
        now,
    )?;

    if result.changed {
        info!(
            booking_id = %result.booking.booking_id,
            payment_status = %result.booking.payment_status,
            "Payment recorded"
        );
    }

    Ok(PaymentResponse {
        booking_id: result.booking.booking_id,
        payment_status: result.booking.payment_status.as_str().to_string(),
        payment_reference: result.booking.payment_reference,
        changed: result.changed,
    })
}

/// Cancels one of the calling customer's bookings.
///
/// # Errors
///
/// Returns an error if the booking is not the caller's, is already
/// completed or cancelled, or less than 24 hours remain before service.
pub fn cancel_booking(
    persistence: &mut Persistence,
    dispatcher: &dyn NotificationDispatcher,
    principal: &AuthenticatedPrincipal,
    booking_id: &str,
    settings: &ServiceSettings,
    now: OffsetDateTime,
) -> Result<CancelBookingResponse, ApiError> {
    AuthorizationService::require_kind(principal, PrincipalKind::Customer, "cancel_booking")?;

    let booking_id: BookingId = BookingId::new(booking_id);
    let result: TransitionResult = run_transition(
        persistence,
        booking_id.as_str(),
        Command::Cancel {
            customer_id: principal.principal_id,
            timezone: settings.timezone,
        },
        now,
    )?;

    dispatch_committed(dispatcher, &result.notifications);

    let slot: TimeSlot =
        TimeSlot::parse(&result.booking.time_slot).map_err(translate_domain_error)?;
    let service_instant: OffsetDateTime =
        local_instant(result.booking.service_date, slot.start(), settings.timezone)
            .map_err(translate_domain_error)?;
    let hours_remaining: f64 = (service_instant - now).as_seconds_f64() / 3600.0;

    info!(
        booking_id = %result.booking.booking_id,
        customer_id = principal.principal_id,
        hours_remaining,
        "Booking cancelled"
    );

    Ok(CancelBookingResponse {
        booking_id: result.booking.booking_id,
        booking_status: result.booking.booking_status.as_str().to_string(),
        hours_remaining,
    })
}

/// Returns a booking with its line items and latest technician status.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the booking does not exist or is
/// not visible to the caller.
pub fn get_booking(
    persistence: &mut Persistence,
    principal: &AuthenticatedPrincipal,
    booking_id: &str,
) -> Result<BookingDetailResponse, ApiError> {
    let booking_id: BookingId = BookingId::new(booking_id);
    let state: BookingState = persistence
        .get_booking_state(booking_id.as_str())
        .map_err(translate_persistence_error)?
        .filter(|state| can_view(principal, &state.booking))
        .ok_or_else(|| booking_not_found(booking_id.as_str()))?;

    Ok(BookingDetailResponse {
        booking: booking_info(&state.booking)?,
        line_items: state.line_items.iter().map(line_item_info).collect(),
        technician_status: state
            .technician_status()
            .map(|status| status.as_str().to_string()),
    })
}

/// Returns a booking's status log, oldest first.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the booking does not exist or is
/// not visible to the caller.
pub fn get_status_log(
    persistence: &mut Persistence,
    principal: &AuthenticatedPrincipal,
    booking_id: &str,
) -> Result<StatusLogResponse, ApiError> {
    let booking_id: BookingId = BookingId::new(booking_id);
    let booking: Booking = persistence
        .get_booking(booking_id.as_str())
        .map_err(translate_persistence_error)?
        .filter(|booking| can_view(principal, booking))
        .ok_or_else(|| booking_not_found(booking_id.as_str()))?;

    let entries: Vec<StatusLogEntry> = persistence
        .get_status_log(&booking.booking_id)
        .map_err(translate_persistence_error)?;

    Ok(StatusLogResponse {
        booking_id: booking.booking_id,
        entries: entries
            .iter()
            .map(status_entry_info)
            .collect::<Result<_, _>>()?,
    })
}

/// Lists the calling customer's bookings, newest first.
///
/// # Errors
///
/// Returns an error if the caller is not a customer or the query fails.
pub fn list_customer_bookings(
    persistence: &mut Persistence,
    principal: &AuthenticatedPrincipal,
) -> Result<BookingListResponse, ApiError> {
    AuthorizationService::require_kind(principal, PrincipalKind::Customer, "list_bookings")?;

    let bookings: Vec<Booking> = persistence
        .list_bookings_for_customer(principal.principal_id)
        .map_err(translate_persistence_error)?;

    Ok(BookingListResponse {
        bookings: booking_infos(&bookings)?,
    })
}

/// Lists all bookings, optionally filtered by booking status.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the status filter is
/// not a known booking status.
pub fn list_admin_bookings(
    persistence: &mut Persistence,
    principal: &AuthenticatedPrincipal,
    status: Option<&str>,
) -> Result<BookingListResponse, ApiError> {
    AuthorizationService::require_kind(principal, PrincipalKind::Admin, "list_all_bookings")?;

    let filter: Option<BookingStatus> = optional("status", status)?
        .map(|s| BookingStatus::from_str(&s))
        .transpose()
        .map_err(translate_domain_error)?;

    let bookings: Vec<Booking> = persistence
        .list_bookings_by_status(filter)
        .map_err(translate_persistence_error)?;

    Ok(BookingListResponse {
        bookings: booking_infos(&bookings)?,
    })
}

// ============================================================================
// Fulfillment
// ============================================================================

/// Assigns a technician to a pending booking.
///
/// The booking moves to `confirmed`, an `assigned` entry is logged and both
/// the technician and the customer are notified, all in one transaction.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not an admin
/// - The technician does not exist
/// - The booking does not exist or is no longer pending
pub fn assign_technician(
    persistence: &mut Persistence,
    dispatcher: &dyn NotificationDispatcher,
    principal: &AuthenticatedPrincipal,
    request: &AssignTechnicianRequest,
    now: OffsetDateTime,
) -> Result<AssignTechnicianResponse, ApiError> {
    AuthorizationService::require_kind(principal, PrincipalKind::Admin, "assign_technician")?;

    let booking_id: BookingId = BookingId::new(&text("booking_id", request.booking_id.as_deref())?);
    let technician_id: i64 = required("technician_id", request.technician_id)?;

    let technician: PrincipalData = persistence
        .get_principal_by_id(technician_id)
        .map_err(translate_persistence_error)?
        .filter(|p| p.kind == PrincipalKind::Technician)
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Technician"),
            message: format!("Technician {technician_id} not found"),
        })?;

    let result: TransitionResult = run_transition(
        persistence,
        booking_id.as_str(),
        Command::AssignTechnician {
            technician_id,
            technician_name: technician.display_name.clone(),
        },
        now,
    )?;

    dispatch_committed(dispatcher, &result.notifications);

    info!(
        booking_id = %result.booking.booking_id,
        technician_id,
        assigned_by = principal.principal_id,
        "Technician assigned"
    );

    Ok(AssignTechnicianResponse {
        booking_id: result.booking.booking_id,
        booking_status: result.booking.booking_status.as_str().to_string(),
        technician: TechnicianContact {
            technician_id,
            display_name: technician.display_name,
            login_name: technician.login_name,
            phone: technician.phone,
        },
    })
}

/// Records a technician's progress report on one of their jobs.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not a technician
/// - The booking does not exist or is assigned to someone else
/// - The status would move backwards or the booking is cancelled
pub fn report_status(
    persistence: &mut Persistence,
    dispatcher: &dyn NotificationDispatcher,
    principal: &AuthenticatedPrincipal,
    request: &StatusReportRequest,
    now: OffsetDateTime,
) -> Result<StatusReportResponse, ApiError> {
    AuthorizationService::require_kind(principal, PrincipalKind::Technician, "report_status")?;

    let booking_id: BookingId = BookingId::new(&text("booking_id", request.booking_id.as_deref())?);
    let status: TechnicianStatus =
        TechnicianStatus::from_str(&text("status", request.status.as_deref())?)
            .map_err(translate_domain_error)?;
    let notes: Option<String> = optional("notes", request.notes.as_deref())?;
    let location: Option<GeoPoint> =
        GeoPoint::from_optional(request.location_lat, request.location_lng)
            .map_err(translate_domain_error)?;

    let result: TransitionResult = run_transition(
        persistence,
        booking_id.as_str(),
        Command::ReportStatus {
            technician_id: principal.principal_id,
            status,
            notes,
            location,
        },
        now,
    )?;

    dispatch_committed(dispatcher, &result.notifications);

    info!(
        booking_id = %result.booking.booking_id,
        technician_id = principal.principal_id,
        %status,
        booking_status = %result.booking.booking_status,
        "Technician status reported"
    );

    Ok(StatusReportResponse {
        booking_id: result.booking.booking_id,
        technician_status: status.as_str().to_string(),
        booking_status: result.booking.booking_status.as_str().to_string(),
    })
}

/// Lists the calling technician's jobs with their latest reported status.
///
/// # Errors
///
/// Returns an error if the caller is not a technician or the query fails.
pub fn list_technician_jobs(
    persistence: &mut Persistence,
    principal: &AuthenticatedPrincipal,
) -> Result<TechnicianJobsResponse, ApiError> {
    AuthorizationService::require_kind(principal, PrincipalKind::Technician, "list_jobs")?;

    let jobs: Vec<TechnicianJob> = persistence
        .list_technician_jobs(principal.principal_id)
        .map_err(translate_persistence_error)?;

    let jobs: Vec<TechnicianJobInfo> = jobs
        .iter()
        .map(|job| {
            Ok(TechnicianJobInfo {
                booking: booking_info(&job.booking)?,
                technician_status: job
                    .technician_status
                    .map(|status| status.as_str().to_string()),
            })
        })
        .collect::<Result<_, ApiError>>()?;

    Ok(TechnicianJobsResponse { jobs })
}

// ============================================================================
// Catalog & coupons (admin)
// ============================================================================

/// Inserts or updates a catalog entry.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or a field is invalid.
pub fn upsert_catalog_entry(
    persistence: &mut Persistence,
    principal: &AuthenticatedPrincipal,
    request: &CatalogEntryRequest,
) -> Result<CatalogEntryInfo, ApiError> {
    AuthorizationService::require_kind(principal, PrincipalKind::Admin, "upsert_catalog_entry")?;

    let entry: CatalogEntry = CatalogEntry {
        service_name: text("service_name", request.service_name.as_deref())?,
        service_type_name: text("service_type_name", request.service_type_name.as_deref())?,
        room_size: text("room_size", request.room_size.as_deref())?,
        unit_price: amount("unit_price", required("unit_price", request.unit_price)?)?,
        active: request.active.unwrap_or(true),
    };

    persistence
        .upsert_catalog_entry(&entry)
        .map_err(translate_persistence_error)?;

    info!(
        service_name = %entry.service_name,
        service_type_name = %entry.service_type_name,
        room_size = %entry.room_size,
        unit_price = %entry.unit_price,
        active = entry.active,
        "Catalog entry saved"
    );

    Ok(CatalogEntryInfo {
        service_name: entry.service_name,
        service_type_name: entry.service_type_name,
        room_size: entry.room_size,
        unit_price: entry.unit_price.as_major(),
        active: entry.active,
    })
}

/// Inserts or replaces a coupon.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, a field is invalid or
/// the validity window ends before it starts.
pub fn upsert_coupon(
    persistence: &mut Persistence,
    principal: &AuthenticatedPrincipal,
    code: &str,
    request: &CouponRequest,
) -> Result<OfferInfo, ApiError> {
    AuthorizationService::require_kind(principal, PrincipalKind::Admin, "upsert_coupon")?;

    let code: String = normalize_coupon_code(&text("code", Some(code))?);
    let title: String = text("title", request.title.as_deref())?;
    let start_date: Date = parse_date(
        "start_date",
        &text("start_date", request.start_date.as_deref())?,
    )
    .map_err(translate_domain_error)?;
    let end_date: Date = parse_date("end_date", &text("end_date", request.end_date.as_deref())?)
        .map_err(translate_domain_error)?;
    if end_date < start_date {
        return Err(translate_domain_error(DomainError::InvalidField {
            field: "end_date",
            reason: String::from("must not be before start_date"),
        }));
    }
    let percentage: Percentage =
        Percentage::from_percent(required("percentage", request.percentage)?)
            .map_err(translate_domain_error)?;

    let coupon: Coupon = Coupon {
        code,
        title,
        start_date,
        end_date,
        percentage,
    };

    persistence
        .upsert_coupon(&coupon)
        .map_err(translate_persistence_error)?;

    info!(code = %coupon.code, %percentage, "Coupon saved");

    Ok(offer_info(&coupon))
}

// ============================================================================
// Notifications
// ============================================================================

/// Lists the caller's notifications, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_notifications(
    persistence: &mut Persistence,
    principal: &AuthenticatedPrincipal,
) -> Result<NotificationListResponse, ApiError> {
    let notifications: Vec<Notification> = persistence
        .list_notifications(principal.recipient())
        .map_err(translate_persistence_error)?;

    Ok(NotificationListResponse {
        notifications: notifications
            .iter()
            .map(notification_info)
            .collect::<Result<_, _>>()?,
    })
}

/// Marks one of the caller's notifications read.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the notification does not exist
/// or belongs to someone else.
pub fn mark_notification_read(
    persistence: &mut Persistence,
    principal: &AuthenticatedPrincipal,
    notification_id: i64,
) -> Result<MessageResponse, ApiError> {
    persistence
        .mark_notification_read(notification_id, principal.recipient())
        .map_err(|err| match err {
            PersistenceError::NotFound(_) => ApiError::ResourceNotFound {
                resource_type: String::from("Notification"),
                message: format!("Notification {notification_id} not found"),
            },
            other => translate_persistence_error(other),
        })?;

    Ok(MessageResponse {
        message: String::from("Notification marked as read"),
    })
}
