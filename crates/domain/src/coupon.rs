// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Time-windowed percentage coupons.

use crate::error::DomainError;
use crate::money::{Money, Percentage};
use time::Date;

/// A coupon as stored in the offer table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coupon {
    /// Coupon code, normalised to upper case.
    pub code: String,
    /// Human-readable offer title.
    pub title: String,
    /// First day the coupon may be used.
    pub start_date: Date,
    /// Last day the coupon may be used (inclusive).
    pub end_date: Date,
    pub percentage: Percentage,
}

impl Coupon {
    /// Returns true if `today` lies in `[start_date, end_date]`.
    #[must_use]
    pub fn is_active_on(&self, today: Date) -> bool {
        self.start_date <= today && today <= self.end_date
    }
}

/// Normalises a coupon code for lookup.
#[must_use]
pub fn normalize_coupon_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// A successfully applied coupon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponEvaluation {
    pub code: String,
    pub title: String,
    pub percentage: Percentage,
    /// Discount on the evaluated order amount.
    pub discount: Money,
}

/// Evaluates a coupon against an order amount on a given day.
///
/// `coupon` is the result of looking `code` up; `None` means it does not
/// exist.
///
/// # Errors
///
/// Returns `DomainError::CouponNotFound` or `DomainError::CouponOutsideWindow`.
/// Callers creating a booking treat either as "no coupon".
pub fn evaluate_coupon(
    coupon: Option<&Coupon>,
    code: &str,
    order_amount: Money,
    today: Date,
) -> Result<CouponEvaluation, DomainError> {
    let Some(coupon) = coupon else {
        return Err(DomainError::CouponNotFound(normalize_coupon_code(code)));
    };

    if !coupon.is_active_on(today) {
        return Err(DomainError::CouponOutsideWindow {
            code: coupon.code.clone(),
            start_date: coupon.start_date,
            end_date: coupon.end_date,
            today,
        });
    }

    let discount: Money =
        order_amount
            .percent_of(coupon.percentage)
            .ok_or_else(|| DomainError::InvalidAmount {
                field: "order_amount",
                reason: format!("discount on {order_amount} overflows"),
            })?;

    Ok(CouponEvaluation {
        code: coupon.code.clone(),
        title: coupon.title.clone(),
        percentage: coupon.percentage,
        discount,
    })
}
