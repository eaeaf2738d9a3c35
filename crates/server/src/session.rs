// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for the server.
//!
//! Every authenticated route takes one of the extractors below. They read
//! the `Session-ID` header, resolve it against the session store and
//! reject the request with the error envelope when it does not resolve to
//! a live session of the expected principal kind.
//!
//! A token issued to one kind of principal never authenticates a route
//! meant for another; such a request is answered as an invalid session,
//! not as forbidden.

use axum::{extract::FromRequestParts, http::request::Parts};
use pestcare_api::{ApiError, AuthenticatedPrincipal, AuthenticationService};
use pestcare_domain::PrincipalKind;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::AppState;
use crate::response::HttpError;

/// Name of the header carrying the session token.
pub const SESSION_HEADER: &str = "Session-ID";

/// Any authenticated principal, together with the presented token.
pub struct AnySession(pub AuthenticatedPrincipal, pub String);

/// An authenticated customer.
pub struct CustomerSession(pub AuthenticatedPrincipal);

/// An authenticated technician.
pub struct TechnicianSession(pub AuthenticatedPrincipal);

/// An authenticated admin.
pub struct AdminSession(pub AuthenticatedPrincipal);

fn session_token(parts: &Parts) -> Result<Option<String>, HttpError> {
    // Header names are matched case-insensitively by `HeaderMap`.
    parts
        .headers
        .get(SESSION_HEADER)
        .map(|value| {
            value.to_str().map(str::to_string).map_err(|_| {
                warn!("Session header is not valid ASCII");
                HttpError::from(ApiError::InvalidSession)
            })
        })
        .transpose()
}

async fn authenticate(
    parts: &Parts,
    state: &AppState,
    expected_kind: Option<PrincipalKind>,
) -> Result<(AuthenticatedPrincipal, String), HttpError> {
    let token: Option<String> = session_token(parts)?;

    let mut persistence = state.persistence.lock().await;
    let principal: AuthenticatedPrincipal = AuthenticationService::validate_session(
        &mut persistence,
        token.as_deref(),
        expected_kind,
        OffsetDateTime::now_utc(),
    )
    .map_err(|e| {
        warn!(error = %e, "Session validation failed");
        HttpError::from(ApiError::from(e))
    })?;

    debug!(
        principal_id = principal.principal_id,
        kind = %principal.kind,
        "Session validated"
    );

    Ok((principal, token.unwrap_or_default()))
}

impl FromRequestParts<AppState> for AnySession {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (principal, token) = authenticate(parts, state, None).await?;
        Ok(Self(principal, token))
    }
}

impl FromRequestParts<AppState> for CustomerSession {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (principal, _) = authenticate(parts, state, Some(PrincipalKind::Customer)).await?;
        Ok(Self(principal))
    }
}

impl FromRequestParts<AppState> for TechnicianSession {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (principal, _) = authenticate(parts, state, Some(PrincipalKind::Technician)).await?;
        Ok(Self(principal))
    }
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (principal, _) = authenticate(parts, state, Some(PrincipalKind::Admin)).await?;
        Ok(Self(principal))
    }
}
