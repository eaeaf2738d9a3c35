// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking price computation.
//!
//! The server is the authority on every derived amount. Callers declare a
//! subtotal (checked exactly against the line items) and a promotional
//! discount (bounded by the subtotal); the coupon discount and the total are
//! always computed here.
//!
//! ```text
//! subtotal        = Σ unit_price × quantity
//! coupon_discount = (subtotal − discount_amount) × percentage / 100
//! total_amount    = subtotal − discount_amount − coupon_discount
//! ```

use crate::coupon::{Coupon, CouponEvaluation, evaluate_coupon};
use crate::error::DomainError;
use crate::money::Money;
use time::Date;

/// One entry of a submitted cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub service_type_name: String,
    pub room_size: String,
    pub unit_price: Money,
    pub quantity: u32,
}

/// A priced line item, as persisted with its booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingLineItem {
    pub service_type_name: String,
    pub room_size: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub line_total: Money,
}

/// Every amount stored on a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingBreakdown {
    pub subtotal: Money,
    pub discount_amount: Money,
    /// The coupon that was applied, if any.
    pub coupon: Option<CouponEvaluation>,
    pub total_amount: Money,
}

impl PricingBreakdown {
    /// The coupon discount, zero when no coupon applied.
    #[must_use]
    pub fn coupon_discount(&self) -> Money {
        self.coupon.as_ref().map_or(Money::ZERO, |c| c.discount)
    }

    #[must_use]
    pub fn coupon_code(&self) -> Option<&str> {
        self.coupon.as_ref().map(|c| c.code.as_str())
    }
}

fn overflow(field: &'static str) -> DomainError {
    DomainError::InvalidAmount {
        field,
        reason: String::from("amount overflows"),
    }
}

/// Prices every cart entry.
///
/// # Errors
///
/// Returns `DomainError::EmptyCart` for an empty cart and
/// `DomainError::InvalidQuantity` for a zero quantity.
pub fn price_cart(items: &[CartItem]) -> Result<Vec<BookingLineItem>, DomainError> {
    if items.is_empty() {
        return Err(DomainError::EmptyCart);
    }

    items
        .iter()
        .map(|item| {
            if item.quantity == 0 {
                return Err(DomainError::InvalidQuantity {
                    service_type_name: item.service_type_name.clone(),
                    quantity: 0,
                });
            }
            let line_total: Money = item
                .unit_price
                .checked_mul(item.quantity)
                .ok_or_else(|| overflow("price"))?;
            Ok(BookingLineItem {
                service_type_name: item.service_type_name.clone(),
                room_size: item.room_size.clone(),
                unit_price: item.unit_price,
                quantity: item.quantity,
                line_total,
            })
        })
        .collect()
}

/// Sums the line totals.
///
/// # Errors
///
/// Returns an error if the sum overflows.
pub fn line_items_subtotal(items: &[BookingLineItem]) -> Result<Money, DomainError> {
    items.iter().try_fold(Money::ZERO, |acc, item| {
        acc.checked_add(item.line_total)
            .ok_or_else(|| overflow("subtotal"))
    })
}

/// Result of pricing a cart: the breakdown plus, when a coupon code was
/// supplied but could not be applied, the reason it was dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingOutcome {
    pub breakdown: PricingBreakdown,
    pub coupon_rejection: Option<DomainError>,
}

/// Computes the full breakdown for a priced cart.
///
/// `coupon` is the outcome of looking up the submitted code: `None` when no
/// code was submitted, `Some(None)` when the code does not exist. An unknown
/// or out-of-window coupon does not fail pricing; it is reported in
/// [`PricingOutcome::coupon_rejection`] and the booking proceeds without it.
///
/// # Errors
///
/// Returns `DomainError::SubtotalMismatch` if the declared subtotal differs
/// from the line items, and `DomainError::DiscountExceedsSubtotal` if the
/// declared discount is larger than the subtotal.
pub fn compute_pricing(
    items: &[BookingLineItem],
    declared_subtotal: Money,
    discount_amount: Money,
    coupon: Option<(&str, Option<&Coupon>)>,
    today: Date,
) -> Result<PricingOutcome, DomainError> {
    let subtotal: Money = line_items_subtotal(items)?;
    if subtotal != declared_subtotal {
        return Err(DomainError::SubtotalMismatch {
            declared: declared_subtotal,
            computed: subtotal,
        });
    }
    if discount_amount > subtotal {
        return Err(DomainError::DiscountExceedsSubtotal {
            discount: discount_amount,
            subtotal,
        });
    }

    let discounted: Money = subtotal
        .checked_sub(discount_amount)
        .ok_or_else(|| overflow("discount_amount"))?;

    let (coupon, coupon_rejection): (Option<CouponEvaluation>, Option<DomainError>) = match coupon
    {
        None => (None, None),
        Some((code, found)) => match evaluate_coupon(found, code, discounted, today) {
            Ok(eval) => (Some(eval), None),
            Err(e @ (DomainError::CouponNotFound(_) | DomainError::CouponOutsideWindow { .. })) => {
                (None, Some(e))
            }
            Err(e) => return Err(e),
        },
    };

    let coupon_discount: Money = coupon.as_ref().map_or(Money::ZERO, |c| c.discount);
    let total_amount: Money = discounted
        .checked_sub(coupon_discount)
        .ok_or_else(|| overflow("total_amount"))?;

    Ok(PricingOutcome {
        breakdown: PricingBreakdown {
            subtotal,
            discount_amount,
            coupon,
            total_amount,
        },
        coupon_rejection,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::money::Percentage;
    use time::macros::date;

    const TODAY: Date = date!(2026 - 06 - 15);

    fn item(price: i64, quantity: u32) -> CartItem {
        CartItem {
            service_type_name: String::from("Cockroach"),
            room_size: String::from("2BHK"),
            unit_price: Money::from_minor(price),
            quantity,
        }
    }

    fn ten_percent() -> Coupon {
        Coupon {
            code: String::from("TEN"),
            title: String::from("Ten off"),
            start_date: date!(2026 - 06 - 01),
            end_date: date!(2026 - 06 - 30),
            percentage: Percentage::from_percent(10.0).unwrap(),
        }
    }

    #[test]
    fn test_line_totals() {
        let lines = price_cart(&[item(25_000, 2), item(50_000, 1)]).unwrap();
        assert_eq!(lines[0].line_total, Money::from_minor(50_000));
        assert_eq!(line_items_subtotal(&lines).unwrap(), Money::from_minor(100_000));
    }

    #[test]
    fn test_empty_cart_and_zero_quantity() {
        assert_eq!(price_cart(&[]), Err(DomainError::EmptyCart));
        assert!(matches!(
            price_cart(&[item(100, 0)]),
            Err(DomainError::InvalidQuantity { quantity: 0, .. })
        ));
    }

    #[test]
    fn test_coupon_applies_after_discount() {
        let lines = price_cart(&[item(100_000, 1)]).unwrap();
        let coupon: Coupon = ten_percent();
        let outcome = compute_pricing(
            &lines,
            Money::from_minor(100_000),
            Money::from_minor(20_000),
            Some(("ten", Some(&coupon))),
            TODAY,
        )
        .unwrap();
        assert_eq!(outcome.coupon_rejection, None);
        assert_eq!(outcome.breakdown.coupon_discount(), Money::from_minor(8_000));
        assert_eq!(outcome.breakdown.total_amount, Money::from_minor(72_000));
        assert_eq!(outcome.breakdown.coupon_code(), Some("TEN"));
    }

    #[test]
    fn test_expired_coupon_is_dropped() {
        let lines = price_cart(&[item(100_000, 1)]).unwrap();
        let coupon: Coupon = ten_percent();
        let outcome = compute_pricing(
            &lines,
            Money::from_minor(100_000),
            Money::ZERO,
            Some(("TEN", Some(&coupon))),
            date!(2026 - 07 - 01),
        )
        .unwrap();
        assert!(matches!(
            outcome.coupon_rejection,
            Some(DomainError::CouponOutsideWindow { .. })
        ));
        assert_eq!(outcome.breakdown.coupon, None);
        assert_eq!(outcome.breakdown.total_amount, Money::from_minor(100_000));
    }

    #[test]
    fn test_total_identity_without_coupon() {
        let lines = price_cart(&[item(33_333, 3)]).unwrap();
        let outcome = compute_pricing(
            &lines,
            Money::from_minor(99_999),
            Money::from_minor(9),
            Some(("MISSING", None)),
            TODAY,
        )
        .unwrap();
        let b: PricingBreakdown = outcome.breakdown;
        assert_eq!(
            b.total_amount.minor(),
            b.subtotal.minor() - b.discount_amount.minor() - b.coupon_discount().minor()
        );
    }

    #[test]
    fn test_rejects_bad_declarations() {
        let lines = price_cart(&[item(1_000, 1)]).unwrap();
        assert!(matches!(
            compute_pricing(&lines, Money::from_minor(999), Money::ZERO, None, TODAY),
            Err(DomainError::SubtotalMismatch { .. })
        ));
        assert!(matches!(
            compute_pricing(
                &lines,
                Money::from_minor(1_000),
                Money::from_minor(1_001),
                None,
                TODAY
            ),
            Err(DomainError::DiscountExceedsSubtotal { .. })
        ));
    }
}
