// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;

/// Maximum length accepted for free-text fields.
pub const MAX_TEXT_LEN: usize = 2_000;

/// Validates a required text field and returns it trimmed.
///
/// # Errors
///
/// Returns `DomainError::MissingField` if the value is absent or blank, and
/// `DomainError::InvalidField` if it exceeds [`MAX_TEXT_LEN`].
pub fn require_text(field: &'static str, value: Option<&str>) -> Result<String, DomainError> {
    let trimmed: &str = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(DomainError::MissingField(field));
    }
    check_length(field, trimmed)?;
    Ok(trimmed.to_string())
}

/// Normalises an optional text field: blank becomes `None`.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` if the value exceeds [`MAX_TEXT_LEN`].
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<String>, DomainError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => {
            check_length(field, v)?;
            Ok(Some(v.to_string()))
        }
    }
}

/// Validates a line-item quantity as submitted (signed) and narrows it.
///
/// # Errors
///
/// Returns `DomainError::InvalidQuantity` if the value is below one or
/// does not fit.
pub fn validate_quantity(service_type_name: &str, quantity: i64) -> Result<u32, DomainError> {
    u32::try_from(quantity)
        .ok()
        .filter(|q| *q >= 1)
        .ok_or_else(|| DomainError::InvalidQuantity {
            service_type_name: service_type_name.to_string(),
            quantity,
        })
}

fn check_length(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(DomainError::InvalidField {
            field,
            reason: format!("must be at most {MAX_TEXT_LEN} characters"),
        });
    }
    Ok(())
}
