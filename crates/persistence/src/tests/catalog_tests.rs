// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Persistence;
use pestcare_domain::{Coupon, Money, Percentage};
use time::macros::date;

#[test]
fn test_catalog_upsert_updates_price_in_place() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    persistence
        .upsert_catalog_entry(&super::create_test_catalog_entry(60_000))
        .unwrap();
    persistence
        .upsert_catalog_entry(&super::create_test_catalog_entry(65_000))
        .unwrap();

    let price = persistence
        .get_catalog_price(super::SERVICE_NAME, "Cockroach Control", "2BHK")
        .unwrap();
    assert_eq!(price, Some(Money::from_minor(65_000)));
    assert_eq!(persistence.list_catalog_entries().unwrap().len(), 1);
}

#[test]
fn test_inactive_catalog_entry_has_no_price() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let mut entry = super::create_test_catalog_entry(60_000);
    entry.active = false;
    persistence.upsert_catalog_entry(&entry).unwrap();

    assert_eq!(
        persistence
            .get_catalog_price(super::SERVICE_NAME, "Cockroach Control", "2BHK")
            .unwrap(),
        None
    );
    assert!(!persistence.list_catalog_entries().unwrap()[0].active);
}

#[test]
fn test_unknown_catalog_entry_has_no_price() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    persistence
        .upsert_catalog_entry(&super::create_test_catalog_entry(60_000))
        .unwrap();

    assert_eq!(
        persistence
            .get_catalog_price(super::SERVICE_NAME, "Cockroach Control", "3BHK")
            .unwrap(),
        None
    );
}

#[test]
fn test_coupon_round_trip_and_case_insensitive_lookup() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let coupon = Coupon {
        code: String::from("WELCOME10"),
        title: String::from("Welcome offer"),
        start_date: date!(2026 - 04 - 01),
        end_date: date!(2026 - 05 - 31),
        percentage: Percentage::from_percent(12.5).unwrap(),
    };
    persistence.upsert_coupon(&coupon).unwrap();

    assert_eq!(persistence.get_coupon("welcome10").unwrap(), Some(coupon.clone()));

    let replaced = Coupon {
        percentage: Percentage::from_percent(15.0).unwrap(),
        ..coupon
    };
    persistence.upsert_coupon(&replaced).unwrap();
    assert_eq!(persistence.get_coupon("WELCOME10").unwrap(), Some(replaced));
}

#[test]
fn test_missing_coupon_returns_none() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    assert_eq!(persistence.get_coupon("NOPE").unwrap(), None);
}
