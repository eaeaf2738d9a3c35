// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use pestcare_domain::PrincipalKind;
use pestcare_notify::Recipient;
use pestcare_persistence::{Persistence, PersistenceError, PrincipalData, SessionData};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::config::ServiceSettings;
use crate::error::AuthError;

/// An authenticated principal of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    pub principal_id: i64,
    pub kind: PrincipalKind,
    pub login_name: String,
    pub display_name: String,
    pub phone: Option<String>,
}

impl AuthenticatedPrincipal {
    /// The notification inbox of this principal.
    #[must_use]
    pub const fn recipient(&self) -> Recipient {
        Recipient {
            kind: self.kind,
            id: self.principal_id,
        }
    }
}

impl From<PrincipalData> for AuthenticatedPrincipal {
    fn from(data: PrincipalData) -> Self {
        Self {
            principal_id: data.principal_id,
            kind: data.kind,
            login_name: data.login_name,
            display_name: data.display_name,
            phone: data.phone,
        }
    }
}

/// Authorization service for kind-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the principal is of the required kind.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Forbidden` otherwise.
    pub fn require_kind(
        principal: &AuthenticatedPrincipal,
        required_kind: PrincipalKind,
        action: &str,
    ) -> Result<(), AuthError> {
        if principal.kind == required_kind {
            Ok(())
        } else {
            warn!(
                principal_id = principal.principal_id,
                kind = %principal.kind,
                action,
                "Action refused for principal kind"
            );
            Err(AuthError::Forbidden {
                action: action.to_string(),
                required_kind,
            })
        }
    }
}

/// A freshly issued session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub session_token: String,
    pub expires_at: OffsetDateTime,
    pub principal: AuthenticatedPrincipal,
}

/// Session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Verifies credentials for one principal kind and issues a session.
    ///
    /// Earlier sessions of the principal stay valid. Sessions that have
    /// already expired are purged.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` for an unknown login or a
    /// wrong password, without saying which.
    pub fn login(
        persistence: &mut Persistence,
        kind: PrincipalKind,
        login_name: &str,
        password: &str,
        settings: &ServiceSettings,
        now: OffsetDateTime,
    ) -> Result<LoginOutcome, AuthError> {
        let rejected = || AuthError::AuthenticationFailed {
            reason: String::from("Invalid login or password"),
        };

        let Some(principal) = persistence
            .get_principal_by_login(kind, login_name)
            .map_err(Self::map_persistence_error)?
        else {
            warn!(%kind, login_name, "Login for unknown principal");
            return Err(rejected());
        };

        let password_valid: bool = Persistence::verify_password(password, &principal.password_hash)
            .map_err(Self::map_persistence_error)?;
        if !password_valid {
            warn!(%kind, principal_id = principal.principal_id, "Login with wrong password");
            return Err(rejected());
        }

        persistence
            .delete_expired_sessions(now)
            .map_err(Self::map_persistence_error)?;

        let session_token: String = Self::generate_session_token();
        let expires_at: OffsetDateTime = now
            .checked_add(settings.session_ttl)
            .ok_or_else(|| AuthError::Storage(String::from("Session expiry out of range")))?;

        persistence
            .create_session(&session_token, principal.principal_id, now, expires_at)
            .map_err(Self::map_persistence_error)?;

        info!(%kind, principal_id = principal.principal_id, "Session issued");

        Ok(LoginOutcome {
            session_token,
            expires_at,
            principal: AuthenticatedPrincipal::from(principal),
        })
    }

    /// Validates a session token.
    ///
    /// With `expected_kind` set, only sessions of that principal kind are
    /// accepted; a token of any other kind is reported as invalid. No
    /// state is changed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingToken`, `AuthError::InvalidSession` or
    /// `AuthError::SessionExpired`.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: Option<&str>,
        expected_kind: Option<PrincipalKind>,
        now: OffsetDateTime,
    ) -> Result<AuthenticatedPrincipal, AuthError> {
        let session_token: &str = session_token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or(AuthError::InvalidSession)?;

        let principal: PrincipalData = persistence
            .get_principal_by_id(session.principal_id)
            .map_err(Self::map_persistence_error)?
            .ok_or(AuthError::InvalidSession)?;

        if let Some(expected) = expected_kind
            && principal.kind != expected
        {
            debug!(
                expected = %expected,
                actual = %principal.kind,
                "Session belongs to another principal kind"
            );
            return Err(AuthError::InvalidSession);
        }

        if session.expires_at <= now {
            return Err(AuthError::SessionExpired);
        }

        Ok(AuthenticatedPrincipal::from(principal))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        let deleted: usize = persistence
            .delete_session(session_token)
            .map_err(Self::map_persistence_error)?;
        debug!(deleted, "Session deleted");
        Ok(())
    }

    /// Generates an unguessable session token.
    #[must_use]
    pub fn generate_session_token() -> String {
        format!(
            "{:016x}{:016x}{:016x}",
            rand::random::<u64>(),
            rand::random::<u64>(),
            rand::random::<u64>()
        )
    }

    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::Storage(err.to_string())
    }
}
