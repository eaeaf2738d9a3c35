// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, MAX_TEXT_LEN, optional_text, require_text, validate_quantity};

#[test]
fn test_require_text_trims() {
    assert_eq!(
        require_text("service_address", Some("  12 Park Street ")),
        Ok(String::from("12 Park Street"))
    );
}

#[test]
fn test_require_text_rejects_blank_and_missing() {
    assert_eq!(
        require_text("service_name", Some("   ")),
        Err(DomainError::MissingField("service_name"))
    );
    assert_eq!(
        require_text("service_name", None),
        Err(DomainError::MissingField("service_name"))
    );
}

#[test]
fn test_require_text_rejects_oversized() {
    let long: String = "x".repeat(MAX_TEXT_LEN + 1);
    assert!(matches!(
        require_text("special_notes", Some(&long)),
        Err(DomainError::InvalidField { field: "special_notes", .. })
    ));
}

#[test]
fn test_optional_text_blank_is_none() {
    assert_eq!(optional_text("special_notes", Some("  ")), Ok(None));
    assert_eq!(optional_text("special_notes", None), Ok(None));
    assert_eq!(
        optional_text("special_notes", Some(" gate code 42 ")),
        Ok(Some(String::from("gate code 42")))
    );
}

#[test]
fn test_validate_quantity() {
    assert_eq!(validate_quantity("Termite", 3), Ok(3));
    assert_eq!(
        validate_quantity("Termite", 0),
        Err(DomainError::InvalidQuantity {
            service_type_name: String::from("Termite"),
            quantity: 0,
        })
    );
    assert!(validate_quantity("Termite", -2).is_err());
    assert!(validate_quantity("Termite", i64::MAX).is_err());
}
