// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for coupon evaluation and the admin catalog writes.

use pestcare_domain::Money;
use pestcare_persistence::Persistence;
use time::macros::datetime;

use crate::error::ApiError;
use crate::handlers::{evaluate_coupon, upsert_catalog_entry, upsert_coupon};
use crate::request_response::{CatalogEntryRequest, CouponRequest};
use crate::tests::helpers::{
    SERVICE_NAME, create_test_admin, create_test_customer, now, seed_catalog, settings,
};

fn coupon_request(start_date: &str, end_date: &str, percentage: f64) -> CouponRequest {
    CouponRequest {
        title: Some(String::from("Summer offer")),
        start_date: Some(String::from(start_date)),
        end_date: Some(String::from(end_date)),
        percentage: Some(percentage),
    }
}

#[test]
fn test_coupon_evaluation_inside_window() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    seed_catalog(&mut persistence);

    let evaluation =
        evaluate_coupon(&mut persistence, "save10", Some(500.0), &settings(), now()).unwrap();

    assert_eq!(evaluation.offer.code, "SAVE10");
    assert_eq!(evaluation.offer.start_date, "2026-05-01");
    assert_eq!(evaluation.offer.end_date, "2026-05-31");
    assert!((evaluation.offer.percentage - 10.0).abs() < f64::EPSILON);
    assert!((evaluation.discount_amount - 50.0).abs() < f64::EPSILON);
}

#[test]
fn test_coupon_valid_on_last_day_only() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    seed_catalog(&mut persistence);

    let last_day = evaluate_coupon(
        &mut persistence,
        "SAVE10",
        Some(100.0),
        &settings(),
        datetime!(2026-05-31 23:59 UTC),
    );
    let day_after = evaluate_coupon(
        &mut persistence,
        "SAVE10",
        Some(100.0),
        &settings(),
        datetime!(2026-06-01 00:00 UTC),
    );

    assert!(last_day.is_ok());
    assert!(matches!(day_after, Err(ApiError::CouponInvalid { .. })));
}

#[test]
fn test_coupon_window_uses_service_timezone() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    seed_catalog(&mut persistence);
    let kolkata = crate::config::ServiceSettings::new("Asia/Kolkata", 30).unwrap();

    // 20:00 UTC on the last day is already 1 June in Kolkata.
    let result = evaluate_coupon(
        &mut persistence,
        "SAVE10",
        Some(100.0),
        &kolkata,
        datetime!(2026-05-31 20:00 UTC),
    );

    assert!(matches!(result, Err(ApiError::CouponInvalid { .. })));
}

#[test]
fn test_unknown_coupon_is_invalid() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let result = evaluate_coupon(&mut persistence, "NOPE", Some(100.0), &settings(), now());

    assert!(matches!(result, Err(ApiError::CouponInvalid { .. })));
}

#[test]
fn test_coupon_evaluation_requires_amount() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    seed_catalog(&mut persistence);

    let missing = evaluate_coupon(&mut persistence, "SAVE10", None, &settings(), now());
    let negative = evaluate_coupon(&mut persistence, "SAVE10", Some(-5.0), &settings(), now());

    for result in [missing, negative] {
        match result {
            Err(ApiError::ValidationError { field, .. }) => assert_eq!(field, "order_amount"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}

#[test]
fn test_admin_upserts_coupon() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin = create_test_admin(&mut persistence);

    let offer = upsert_coupon(
        &mut persistence,
        &admin,
        " summer20 ",
        &coupon_request("2026-05-01", "2026-08-31", 20.0),
    )
    .unwrap();
    assert_eq!(offer.code, "SUMMER20");

    upsert_coupon(
        &mut persistence,
        &admin,
        "SUMMER20",
        &coupon_request("2026-05-01", "2026-08-31", 25.0),
    )
    .unwrap();

    let evaluation =
        evaluate_coupon(&mut persistence, "summer20", Some(200.0), &settings(), now()).unwrap();
    assert!((evaluation.discount_amount - 50.0).abs() < f64::EPSILON);
}

#[test]
fn test_coupon_upsert_validation() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin = create_test_admin(&mut persistence);
    let customer = create_test_customer(&mut persistence, "asha@example.com");

    let inverted = upsert_coupon(
        &mut persistence,
        &admin,
        "BACKWARDS",
        &coupon_request("2026-08-31", "2026-05-01", 10.0),
    );
    match inverted {
        Err(ApiError::ValidationError { field, .. }) => assert_eq!(field, "end_date"),
        other => panic!("expected validation error, got {other:?}"),
    }

    let too_generous = upsert_coupon(
        &mut persistence,
        &admin,
        "FREE",
        &coupon_request("2026-05-01", "2026-05-31", 150.0),
    );
    match too_generous {
        Err(ApiError::ValidationError { field, .. }) => assert_eq!(field, "percentage"),
        other => panic!("expected validation error, got {other:?}"),
    }

    let not_admin = upsert_coupon(
        &mut persistence,
        &customer,
        "MINE",
        &coupon_request("2026-05-01", "2026-05-31", 10.0),
    );
    assert!(matches!(not_admin, Err(ApiError::Forbidden { .. })));
}

#[test]
fn test_admin_upserts_catalog_entry() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin = create_test_admin(&mut persistence);
    let request = CatalogEntryRequest {
        service_name: Some(String::from(SERVICE_NAME)),
        service_type_name: Some(String::from("Ant Control")),
        room_size: Some(String::from("1BHK")),
        unit_price: Some(350.5),
        active: None,
    };

    let saved = upsert_catalog_entry(&mut persistence, &admin, &request).unwrap();
    assert!(saved.active);
    assert_eq!(
        persistence
            .get_catalog_price(SERVICE_NAME, "Ant Control", "1BHK")
            .unwrap(),
        Some(Money::from_minor(35_050))
    );

    let retired = CatalogEntryRequest {
        active: Some(false),
        ..request
    };
    upsert_catalog_entry(&mut persistence, &admin, &retired).unwrap();
    assert_eq!(
        persistence
            .get_catalog_price(SERVICE_NAME, "Ant Control", "1BHK")
            .unwrap(),
        None
    );
}
