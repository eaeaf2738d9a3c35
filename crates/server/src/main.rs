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

mod response;
mod session;

use axum::{
    Router,
    extract::{
        Path, Query, State as AxumState,
        rejection::{PathRejection, QueryRejection},
    },
    routing::{get, post, put},
};
use clap::Parser;
use pestcare_api::{
    ApiError, AssignTechnicianRequest, AssignTechnicianResponse, BookingDetailResponse,
    BookingListResponse, CancelBookingResponse, CatalogEntryInfo, CatalogEntryRequest,
    ChangePasswordRequest, CouponEvaluationResponse, CouponRequest, CreateBookingRequest,
    CreateBookingResponse, CreateTechnicianRequest, LoginRequest, LoginResponse, MessageResponse,
    NotificationListResponse, OfferInfo, PaymentRequest, PaymentResponse,
    PrincipalCreatedResponse, ServiceSettings, SignupRequest, StatusLogResponse,
    StatusReportRequest, StatusReportResponse, TechnicianJobsResponse,
};
use pestcare_notify::{NotificationDispatcher, TracingDispatcher};
use pestcare_persistence::Persistence;
use serde::Deserialize;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{info, warn};

use response::{HttpError, HttpResult, JsonBody, success};
use session::{AdminSession, AnySession, CustomerSession, TechnicianSession};

/// `PestCare` Server - HTTP server for the pest-control booking service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// IANA zone in which service dates and time slots are interpreted
    #[arg(long, default_value = "UTC")]
    service_timezone: String,

    /// Lifetime of a login session in days
    #[arg(long, default_value_t = ServiceSettings::DEFAULT_SESSION_TTL_DAYS)]
    session_ttl_days: u32,

    /// Login name of the admin created at startup when no admin exists
    #[arg(long, requires = "bootstrap_admin_password")]
    bootstrap_admin_login: Option<String>,

    /// Password of the bootstrap admin
    #[arg(long, requires = "bootstrap_admin_login")]
    bootstrap_admin_password: Option<String>,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The booking store.
    persistence: Arc<Mutex<Persistence>>,
    /// Push side of notifications, invoked after commit.
    dispatcher: Arc<dyn NotificationDispatcher>,
    /// Settings fixed at startup.
    settings: ServiceSettings,
}

#[derive(Debug, Deserialize)]
struct CouponQuery {
    order_amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct BookingFilterQuery {
    status: Option<String>,
}

fn path_value<T>(path: Result<Path<T>, PathRejection>) -> Result<T, HttpError> {
    path.map(|Path(value)| value).map_err(|rejection| {
        warn!(reason = %rejection.body_text(), "Rejected path parameter");
        HttpError::bad_request(rejection.body_text())
    })
}

fn query_value<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, HttpError> {
    query.map(|Query(value)| value).map_err(|rejection| {
        warn!(reason = %rejection.body_text(), "Rejected query string");
        HttpError::bad_request(rejection.body_text())
    })
}

// ============================================================================
// Accounts and sessions
// ============================================================================

async fn handle_signup_customer(
    AxumState(app_state): AxumState<AppState>,
    JsonBody(req): JsonBody<SignupRequest>,
) -> HttpResult<PrincipalCreatedResponse> {
    info!("Handling customer signup");
    let mut persistence = app_state.persistence.lock().await;
    let response =
        pestcare_api::signup_customer(&mut persistence, &req, OffsetDateTime::now_utc())?;
    Ok(success(response))
}

async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> HttpResult<LoginResponse> {
    info!(kind = ?req.kind, "Handling login");
    let mut persistence = app_state.persistence.lock().await;
    let response = pestcare_api::login(
        &mut persistence,
        &req,
        &app_state.settings,
        OffsetDateTime::now_utc(),
    )?;
    Ok(success(response))
}

async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    AnySession(principal, token): AnySession,
) -> HttpResult<MessageResponse> {
    info!(principal_id = principal.principal_id, "Handling logout");
    let mut persistence = app_state.persistence.lock().await;
    pestcare_api::logout(&mut persistence, &token)?;
    Ok(success(MessageResponse {
        message: String::from("Logged out"),
    }))
}

async fn handle_change_password(
    AxumState(app_state): AxumState<AppState>,
    AnySession(principal, _): AnySession,
    JsonBody(req): JsonBody<ChangePasswordRequest>,
) -> HttpResult<MessageResponse> {
    info!(principal_id = principal.principal_id, "Handling password change");
    let mut persistence = app_state.persistence.lock().await;
    let response = pestcare_api::change_password(&mut persistence, &principal, &req)?;
    Ok(success(response))
}

async fn handle_create_technician(
    AxumState(app_state): AxumState<AppState>,
    AdminSession(principal): AdminSession,
    JsonBody(req): JsonBody<CreateTechnicianRequest>,
) -> HttpResult<PrincipalCreatedResponse> {
    info!(admin_id = principal.principal_id, "Handling technician creation");
    let mut persistence = app_state.persistence.lock().await;
    let response = pestcare_api::create_technician(
        &mut persistence,
        &principal,
        &req,
        OffsetDateTime::now_utc(),
    )?;
    Ok(success(response))
}

// ============================================================================
// Catalog and coupons
// ============================================================================

async fn handle_upsert_catalog_entry(
    AxumState(app_state): AxumState<AppState>,
    AdminSession(principal): AdminSession,
    JsonBody(req): JsonBody<CatalogEntryRequest>,
) -> HttpResult<CatalogEntryInfo> {
    info!(admin_id = principal.principal_id, "Handling catalog upsert");
    let mut persistence = app_state.persistence.lock().await;
    let response = pestcare_api::upsert_catalog_entry(&mut persistence, &principal, &req)?;
    Ok(success(response))
}

async fn handle_upsert_coupon(
    AxumState(app_state): AxumState<AppState>,
    AdminSession(principal): AdminSession,
    code: Result<Path<String>, PathRejection>,
    JsonBody(req): JsonBody<CouponRequest>,
) -> HttpResult<OfferInfo> {
    let code: String = path_value(code)?;
    info!(admin_id = principal.principal_id, code = %code, "Handling coupon upsert");
    let mut persistence = app_state.persistence.lock().await;
    let response = pestcare_api::upsert_coupon(&mut persistence, &principal, &code, &req)?;
    Ok(success(response))
}

async fn handle_evaluate_coupon(
    AxumState(app_state): AxumState<AppState>,
    AnySession(principal, _): AnySession,
    code: Result<Path<String>, PathRejection>,
    query: Result<Query<CouponQuery>, QueryRejection>,
) -> HttpResult<CouponEvaluationResponse> {
    let code: String = path_value(code)?;
    let query: CouponQuery = query_value(query)?;
    info!(principal_id = principal.principal_id, code = %code, "Handling coupon evaluation");
    let mut persistence = app_state.persistence.lock().await;
    let response = pestcare_api::evaluate_coupon(
        &mut persistence,
        &code,
        query.order_amount,
        &app_state.settings,
        OffsetDateTime::now_utc(),
    )?;
    Ok(success(response))
}

// ============================================================================
// Bookings
// ============================================================================

async fn handle_create_booking(
    AxumState(app_state): AxumState<AppState>,
    CustomerSession(principal): CustomerSession,
    JsonBody(req): JsonBody<CreateBookingRequest>,
) -> HttpResult<CreateBookingResponse> {
    info!(customer_id = principal.principal_id, "Handling booking creation");
    let mut persistence = app_state.persistence.lock().await;
    let response = pestcare_api::create_booking(
        &mut persistence,
        &principal,
        &req,
        &app_state.settings,
        OffsetDateTime::now_utc(),
        rand::random::<u32>,
    )?;
    Ok(success(response))
}

async fn handle_list_customer_bookings(
    AxumState(app_state): AxumState<AppState>,
    CustomerSession(principal): CustomerSession,
) -> HttpResult<BookingListResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response = pestcare_api::list_customer_bookings(&mut persistence, &principal)?;
    Ok(success(response))
}

async fn handle_get_booking(
    AxumState(app_state): AxumState<AppState>,
    AnySession(principal, _): AnySession,
    booking_id: Result<Path<String>, PathRejection>,
) -> HttpResult<BookingDetailResponse> {
    let booking_id: String = path_value(booking_id)?;
    let mut persistence = app_state.persistence.lock().await;
    let response = pestcare_api::get_booking(&mut persistence, &principal, &booking_id)?;
    Ok(success(response))
}

async fn handle_get_status_log(
    AxumState(app_state): AxumState<AppState>,
    AnySession(principal, _): AnySession,
    booking_id: Result<Path<String>, PathRejection>,
) -> HttpResult<StatusLogResponse> {
    let booking_id: String = path_value(booking_id)?;
    let mut persistence = app_state.persistence.lock().await;
    let response = pestcare_api::get_status_log(&mut persistence, &principal, &booking_id)?;
    Ok(success(response))
}

async fn handle_record_payment(
    AxumState(app_state): AxumState<AppState>,
    AnySession(principal, _): AnySession,
    booking_id: Result<Path<String>, PathRejection>,
    JsonBody(req): JsonBody<PaymentRequest>,
) -> HttpResult<PaymentResponse> {
    let booking_id: String = path_value(booking_id)?;
    info!(
        principal_id = principal.principal_id,
        booking_id = %booking_id,
        "Handling payment update"
    );
    let mut persistence = app_state.persistence.lock().await;
    let response = pestcare_api::record_payment(
        &mut persistence,
        &principal,
        &booking_id,
        &req,
        OffsetDateTime::now_utc(),
    )?;
    Ok(success(response))
}

async fn handle_cancel_booking(
    AxumState(app_state): AxumState<AppState>,
    CustomerSession(principal): CustomerSession,
    booking_id: Result<Path<String>, PathRejection>,
) -> HttpResult<CancelBookingResponse> {
    let booking_id: String = path_value(booking_id)?;
    info!(
        customer_id = principal.principal_id,
        booking_id = %booking_id,
        "Handling booking cancellation"
    );
    let mut persistence = app_state.persistence.lock().await;
    let response = pestcare_api::cancel_booking(
        &mut persistence,
        app_state.dispatcher.as_ref(),
        &principal,
        &booking_id,
        &app_state.settings,
        OffsetDateTime::now_utc(),
    )?;
    Ok(success(response))
}

async fn handle_list_admin_bookings(
    AxumState(app_state): AxumState<AppState>,
    AdminSession(principal): AdminSession,
    query: Result<Query<BookingFilterQuery>, QueryRejection>,
) -> HttpResult<BookingListResponse> {
    let query: BookingFilterQuery = query_value(query)?;
    let mut persistence = app_state.persistence.lock().await;
    let response =
        pestcare_api::list_admin_bookings(&mut persistence, &principal, query.status.as_deref())?;
    Ok(success(response))
}

// ============================================================================
// Fulfillment
// ============================================================================

async fn handle_assign_technician(
    AxumState(app_state): AxumState<AppState>,
    AdminSession(principal): AdminSession,
    JsonBody(req): JsonBody<AssignTechnicianRequest>,
) -> HttpResult<AssignTechnicianResponse> {
    info!(
        admin_id = principal.principal_id,
        booking_id = ?req.booking_id,
        technician_id = ?req.technician_id,
        "Handling technician assignment"
    );
    let mut persistence = app_state.persistence.lock().await;
    let response = pestcare_api::assign_technician(
        &mut persistence,
        app_state.dispatcher.as_ref(),
        &principal,
        &req,
        OffsetDateTime::now_utc(),
    )?;
    Ok(success(response))
}

async fn handle_report_status(
    AxumState(app_state): AxumState<AppState>,
    TechnicianSession(principal): TechnicianSession,
    JsonBody(req): JsonBody<StatusReportRequest>,
) -> HttpResult<StatusReportResponse> {
    info!(
        technician_id = principal.principal_id,
        booking_id = ?req.booking_id,
        status = ?req.status,
        "Handling status report"
    );
    let mut persistence = app_state.persistence.lock().await;
    let response = pestcare_api::report_status(
        &mut persistence,
        app_state.dispatcher.as_ref(),
        &principal,
        &req,
        OffsetDateTime::now_utc(),
    )?;
    Ok(success(response))
}

async fn handle_list_technician_jobs(
    AxumState(app_state): AxumState<AppState>,
    TechnicianSession(principal): TechnicianSession,
) -> HttpResult<TechnicianJobsResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response = pestcare_api::list_technician_jobs(&mut persistence, &principal)?;
    Ok(success(response))
}

// ============================================================================
// Notifications
// ============================================================================

async fn handle_list_notifications(
    AxumState(app_state): AxumState<AppState>,
    AnySession(principal, _): AnySession,
) -> HttpResult<NotificationListResponse> {
    let mut persistence = app_state.persistence.lock().await;
    let response = pestcare_api::list_notifications(&mut persistence, &principal)?;
    Ok(success(response))
}

async fn handle_mark_notification_read(
    AxumState(app_state): AxumState<AppState>,
    AnySession(principal, _): AnySession,
    notification_id: Result<Path<i64>, PathRejection>,
) -> HttpResult<MessageResponse> {
    let notification_id: i64 = path_value(notification_id)?;
    let mut persistence = app_state.persistence.lock().await;
    let response =
        pestcare_api::mark_notification_read(&mut persistence, &principal, notification_id)?;
    Ok(success(response))
}

/// Builds the application router.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/customers/signup", post(handle_signup_customer))
        .route("/sessions", post(handle_login).delete(handle_logout))
        .route("/principals/password", post(handle_change_password))
        .route("/admin/technicians", post(handle_create_technician))
        .route("/admin/catalog", post(handle_upsert_catalog_entry))
        .route("/admin/coupons/{code}", put(handle_upsert_coupon))
        .route("/admin/bookings", get(handle_list_admin_bookings))
        .route("/coupons/{code}", get(handle_evaluate_coupon))
        .route(
            "/bookings",
            get(handle_list_customer_bookings).post(handle_create_booking),
        )
        .route("/bookings/{id}", get(handle_get_booking))
        .route("/bookings/{id}/status-log", get(handle_get_status_log))
        .route("/bookings/{id}/payment", post(handle_record_payment))
        .route("/bookings/{id}/cancel", post(handle_cancel_booking))
        .route("/assignments", post(handle_assign_technician))
        .route("/technician-status", post(handle_report_status))
        .route("/technician/jobs", get(handle_list_technician_jobs))
        .route("/notifications", get(handle_list_notifications))
        .route(
            "/notifications/{id}/read",
            post(handle_mark_notification_read),
        )
        .with_state(app_state)
}

fn bootstrap(persistence: &mut Persistence, args: &Args) -> Result<(), ApiError> {
    if let (Some(login_name), Some(password)) =
        (&args.bootstrap_admin_login, &args.bootstrap_admin_password)
    {
        match pestcare_api::bootstrap_admin(
            persistence,
            login_name,
            password,
            OffsetDateTime::now_utc(),
        )? {
            Some(admin_id) => info!(admin_id, "Created bootstrap admin"),
            None => info!("An admin already exists, skipping bootstrap"),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing PestCare Server");

    let settings: ServiceSettings =
        ServiceSettings::new(&args.service_timezone, args.session_ttl_days)?;

    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {db_path}");
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    bootstrap(&mut persistence, &args)?;

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        dispatcher: Arc::new(TracingDispatcher),
        settings,
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!(timezone = %args.service_timezone, "Server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
