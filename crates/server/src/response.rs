// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The JSON response envelope and the mapping from API errors to HTTP.
//!
//! Every response body has the shape
//! `{"status": "success" | "error", "message"?: string, "data"?: object}`.

use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pestcare_api::ApiError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{error, warn};

/// The response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Wraps a successful result.
pub const fn success<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        status: "success",
        message: None,
        data: Some(data),
    })
}

/// Result type of every route handler.
pub type HttpResult<T> = Result<Json<Envelope<T>>, HttpError>;

/// Machine-readable part of an error envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorData {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_remaining: Option<f64>,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
pub struct HttpError {
    /// The HTTP status code.
    pub status: StatusCode,
    /// Stable error code.
    pub code: &'static str,
    /// The error message shown to the client.
    pub message: String,
    /// Set only for a closed cancellation window.
    pub hours_remaining: Option<f64>,
}

impl HttpError {
    /// A malformed request that never reached the API layer.
    pub fn bad_request(message: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "ValidationError",
            message,
            hours_remaining: None,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<Envelope<ErrorData>> = Json(Envelope {
            status: "error",
            message: Some(self.message),
            data: Some(ErrorData {
                error: self.code,
                hours_remaining: self.hours_remaining,
            }),
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let code: &'static str = err.code();
        let status: StatusCode = match err {
            ApiError::ValidationError { .. } | ApiError::PasswordPolicyViolation { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized { .. }
            | ApiError::InvalidSession
            | ApiError::SessionExpired
            | ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidTransition { .. } | ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::CancellationWindowClosed { .. } | ApiError::CouponInvalid { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Internal { ref message } => {
                error!(error = %message, "Internal error");
                return Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    code,
                    message: String::from("The request could not be completed"),
                    hours_remaining: None,
                };
            }
        };

        let hours_remaining: Option<f64> = if let ApiError::CancellationWindowClosed {
            hours_remaining,
            ..
        } = err
        {
            Some(hours_remaining)
        } else {
            None
        };

        Self {
            status,
            code,
            message: err.to_string(),
            hours_remaining,
        }
    }
}

/// JSON body extractor whose rejection uses the error envelope.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                warn!(reason = %rejection.body_text(), "Rejected request body");
                Err(HttpError::bad_request(rejection.body_text()))
            }
        }
    }
}
