// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for signup, sessions and password management.

use pestcare_domain::PrincipalKind;
use pestcare_persistence::Persistence;
use time::Duration;

use crate::auth::AuthenticationService;
use crate::config::ServiceSettings;
use crate::error::{ApiError, AuthError};
use crate::handlers::{
    bootstrap_admin, change_password, create_technician, login, logout, signup_customer,
};
use crate::request_response::{
    ChangePasswordRequest, CreateTechnicianRequest, LoginRequest, SignupRequest,
};
use crate::tests::helpers::{
    PASSWORD, create_test_admin, create_test_customer, create_test_technician, now, settings,
};

fn signup_request(login_name: &str) -> SignupRequest {
    SignupRequest {
        login_name: Some(String::from(login_name)),
        display_name: Some(String::from("Asha Customer")),
        phone: Some(String::from("+91 98450 00000")),
        password: Some(String::from(PASSWORD)),
        password_confirmation: Some(String::from(PASSWORD)),
    }
}

fn login_request(kind: &str, login_name: &str, password: &str) -> LoginRequest {
    LoginRequest {
        kind: Some(String::from(kind)),
        login_name: Some(String::from(login_name)),
        password: Some(String::from(password)),
    }
}

#[test]
fn test_customer_signup_then_login() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let created = signup_customer(&mut persistence, &signup_request("Asha@Example.com"), now())
        .unwrap();
    assert_eq!(created.kind, "customer");
    assert_eq!(created.login_name, "asha@example.com");

    let response = login(
        &mut persistence,
        &login_request("customer", "asha@example.com", PASSWORD),
        &settings(),
        now(),
    )
    .unwrap();

    assert_eq!(response.principal.principal_id, created.principal_id);
    assert_eq!(response.principal.kind, "customer");
    assert_eq!(response.expires_at, "2026-05-31T09:00:00Z");
    assert!(!response.session_id.is_empty());
}

#[test]
fn test_duplicate_signup_is_a_conflict() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    signup_customer(&mut persistence, &signup_request("asha@example.com"), now()).unwrap();

    let result = signup_customer(&mut persistence, &signup_request("ASHA@example.com"), now());

    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_signup_missing_login_is_a_validation_error() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let mut request = signup_request("asha@example.com");
    request.login_name = None;

    let result = signup_customer(&mut persistence, &request, now());

    match result {
        Err(ApiError::ValidationError { field, .. }) => assert_eq!(field, "login_name"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_signup_with_weak_password_is_rejected() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let mut request = signup_request("asha@example.com");
    request.password = Some(String::from("short"));
    request.password_confirmation = Some(String::from("short"));

    let result = signup_customer(&mut persistence, &request, now());

    assert!(matches!(
        result,
        Err(ApiError::PasswordPolicyViolation { .. })
    ));
    assert_eq!(
        persistence.count_principals(PrincipalKind::Customer).unwrap(),
        0
    );
}

#[test]
fn test_login_with_wrong_password_fails_generically() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    create_test_customer(&mut persistence, "asha@example.com");

    let wrong_password = login(
        &mut persistence,
        &login_request("customer", "asha@example.com", "Wrong-Passw0rd"),
        &settings(),
        now(),
    );
    let unknown_login = login(
        &mut persistence,
        &login_request("customer", "nobody@example.com", PASSWORD),
        &settings(),
        now(),
    );

    assert_eq!(wrong_password, unknown_login);
    assert!(matches!(
        wrong_password,
        Err(ApiError::AuthenticationFailed { .. })
    ));
}

#[test]
fn test_login_checks_only_the_requested_directory() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    create_test_customer(&mut persistence, "asha@example.com");

    let result = login(
        &mut persistence,
        &login_request("technician", "asha@example.com", PASSWORD),
        &settings(),
        now(),
    );

    assert!(matches!(result, Err(ApiError::AuthenticationFailed { .. })));
}

#[test]
fn test_login_with_unknown_kind_is_a_validation_error() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let result = login(
        &mut persistence,
        &login_request("operator", "asha@example.com", PASSWORD),
        &settings(),
        now(),
    );

    match result {
        Err(ApiError::ValidationError { field, .. }) => assert_eq!(field, "kind"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_session_validation_outcomes() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let customer = create_test_customer(&mut persistence, "asha@example.com");
    let outcome = AuthenticationService::login(
        &mut persistence,
        PrincipalKind::Customer,
        "asha@example.com",
        PASSWORD,
        &settings(),
        now(),
    )
    .unwrap();
    let token: &str = &outcome.session_token;

    let valid = AuthenticationService::validate_session(
        &mut persistence,
        Some(token),
        Some(PrincipalKind::Customer),
        now(),
    )
    .unwrap();
    assert_eq!(valid, customer);

    let any_kind =
        AuthenticationService::validate_session(&mut persistence, Some(token), None, now());
    assert!(any_kind.is_ok());

    let missing = AuthenticationService::validate_session(
        &mut persistence,
        None,
        Some(PrincipalKind::Customer),
        now(),
    );
    assert_eq!(missing, Err(AuthError::MissingToken));

    let unknown = AuthenticationService::validate_session(
        &mut persistence,
        Some("not-a-session"),
        Some(PrincipalKind::Customer),
        now(),
    );
    assert_eq!(unknown, Err(AuthError::InvalidSession));

    let wrong_kind = AuthenticationService::validate_session(
        &mut persistence,
        Some(token),
        Some(PrincipalKind::Admin),
        now(),
    );
    assert_eq!(wrong_kind, Err(AuthError::InvalidSession));

    let expired = AuthenticationService::validate_session(
        &mut persistence,
        Some(token),
        Some(PrincipalKind::Customer),
        outcome.expires_at,
    );
    assert_eq!(expired, Err(AuthError::SessionExpired));
}

#[test]
fn test_logout_invalidates_only_that_session() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    create_test_customer(&mut persistence, "asha@example.com");
    let request = login_request("customer", "asha@example.com", PASSWORD);
    let first = login(&mut persistence, &request, &settings(), now()).unwrap();
    let second = login(&mut persistence, &request, &settings(), now()).unwrap();

    logout(&mut persistence, &first.session_id).unwrap();

    let first_result = AuthenticationService::validate_session(
        &mut persistence,
        Some(&first.session_id),
        None,
        now(),
    );
    let second_result = AuthenticationService::validate_session(
        &mut persistence,
        Some(&second.session_id),
        None,
        now(),
    );
    assert_eq!(first_result, Err(AuthError::InvalidSession));
    assert!(second_result.is_ok());
}

#[test]
fn test_login_purges_expired_sessions() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    create_test_customer(&mut persistence, "asha@example.com");
    let request = login_request("customer", "asha@example.com", PASSWORD);
    let old = login(&mut persistence, &request, &settings(), now()).unwrap();

    let later = now() + Duration::days(45);
    login(&mut persistence, &request, &settings(), later).unwrap();

    assert!(
        persistence
            .get_session_by_token(&old.session_id)
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_change_password_requires_current_password() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let customer = create_test_customer(&mut persistence, "asha@example.com");

    let wrong = change_password(
        &mut persistence,
        &customer,
        &ChangePasswordRequest {
            current_password: Some(String::from("Wrong-Passw0rd")),
            new_password: Some(String::from("Another-Passw0rd")),
            new_password_confirmation: Some(String::from("Another-Passw0rd")),
        },
    );
    assert!(matches!(wrong, Err(ApiError::AuthenticationFailed { .. })));

    change_password(
        &mut persistence,
        &customer,
        &ChangePasswordRequest {
            current_password: Some(String::from(PASSWORD)),
            new_password: Some(String::from("Another-Passw0rd")),
            new_password_confirmation: Some(String::from("Another-Passw0rd")),
        },
    )
    .unwrap();

    let old = login(
        &mut persistence,
        &login_request("customer", "asha@example.com", PASSWORD),
        &settings(),
        now(),
    );
    let new = login(
        &mut persistence,
        &login_request("customer", "asha@example.com", "Another-Passw0rd"),
        &settings(),
        now(),
    );
    assert!(old.is_err());
    assert!(new.is_ok());
}

#[test]
fn test_change_password_rejects_login_as_password() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let technician = create_test_technician(&mut persistence, "Ravi-Tech-01");

    let result = change_password(
        &mut persistence,
        &technician,
        &ChangePasswordRequest {
            current_password: Some(String::from(PASSWORD)),
            new_password: Some(String::from("ravi-tech-01")),
            new_password_confirmation: Some(String::from("ravi-tech-01")),
        },
    );

    assert!(matches!(
        result,
        Err(ApiError::PasswordPolicyViolation { .. })
    ));
}

#[test]
fn test_only_admins_create_technicians() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin = create_test_admin(&mut persistence);
    let customer = create_test_customer(&mut persistence, "asha@example.com");
    let request = CreateTechnicianRequest {
        login_name: Some(String::from("ravi@pestcare.test")),
        display_name: Some(String::from("Ravi")),
        phone: Some(String::from("+91 98450 11111")),
        password: Some(String::from(PASSWORD)),
        password_confirmation: Some(String::from(PASSWORD)),
    };

    let refused = create_technician(&mut persistence, &customer, &request, now());
    assert!(matches!(refused, Err(ApiError::Forbidden { .. })));

    let created = create_technician(&mut persistence, &admin, &request, now()).unwrap();
    assert_eq!(created.kind, "technician");
    assert_eq!(
        persistence
            .count_principals(PrincipalKind::Technician)
            .unwrap(),
        1
    );
}

#[test]
fn test_bootstrap_admin_runs_once() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let first = bootstrap_admin(&mut persistence, "root@pestcare.test", PASSWORD, now()).unwrap();
    let second =
        bootstrap_admin(&mut persistence, "other@pestcare.test", PASSWORD, now()).unwrap();

    assert!(first.is_some());
    assert!(second.is_none());
    assert_eq!(persistence.count_principals(PrincipalKind::Admin).unwrap(), 1);
}

#[test]
fn test_service_settings_validation() {
    assert!(ServiceSettings::new("Asia/Kolkata", 7).is_ok());
    assert!(matches!(
        ServiceSettings::new("Mars/Olympus", 7),
        Err(ApiError::ValidationError { .. })
    ));
    assert!(matches!(
        ServiceSettings::new("UTC", 0),
        Err(ApiError::ValidationError { .. })
    ));
    assert!(ServiceSettings::new("UTC", ServiceSettings::MAX_SESSION_TTL_DAYS).is_ok());
    assert!(matches!(
        ServiceSettings::new("UTC", u32::MAX),
        Err(ApiError::ValidationError { field, .. }) if field == "session_ttl_days"
    ));
}

#[test]
fn test_login_with_out_of_range_expiry_fails_cleanly() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    create_test_customer(&mut persistence, "asha@example.com");
    let long_lived = ServiceSettings {
        session_ttl: Duration::days(i64::from(u32::MAX)),
        ..settings()
    };

    let result = login(
        &mut persistence,
        &login_request("customer", "asha@example.com", PASSWORD),
        &long_lived,
        now(),
    );

    assert!(matches!(result, Err(ApiError::Internal { .. })));
}
