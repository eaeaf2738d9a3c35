// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use pestcare_domain::{
    Booking, BookingLineItem, BookingStatus, CartItem, Coupon, DomainError, Money, PaymentStatus,
    PricingOutcome, TimeSlot, compute_pricing, price_cart,
};
use time::{Date, OffsetDateTime};

/// A validated booking request, before pricing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub customer_id: i64,
    pub service_name: String,
    pub service_date: Date,
    pub time_slot: TimeSlot,
    pub service_address: String,
    pub special_notes: Option<String>,
    pub items: Vec<CartItem>,
    pub coupon_code: Option<String>,
    pub declared_subtotal: Money,
    pub discount_amount: Money,
    pub declared_total: Option<Money>,
    pub payment_method: String,
    pub payment_reference: Option<String>,
}

/// A priced booking ready to be inserted.
///
/// The booking id is assigned by the store at insert time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub customer_id: i64,
    pub service_name: String,
    pub service_date: Date,
    pub time_slot: String,
    pub service_address: String,
    pub special_notes: Option<String>,
    pub line_items: Vec<BookingLineItem>,
    pub subtotal: Money,
    pub discount_amount: Money,
    pub coupon_code: Option<String>,
    pub coupon_discount: Money,
    pub total_amount: Money,
    pub payment_method: String,
    pub payment_reference: Option<String>,
    pub created_at: OffsetDateTime,
}

impl NewBooking {
    /// The booking record this insert produces.
    #[must_use]
    pub fn to_booking(&self, booking_id: &str) -> Booking {
        Booking {
            booking_id: booking_id.to_string(),
            customer_id: self.customer_id,
            service_name: self.service_name.clone(),
            service_date: self.service_date,
            time_slot: self.time_slot.clone(),
            service_address: self.service_address.clone(),
            special_notes: self.special_notes.clone(),
            subtotal: self.subtotal,
            discount_amount: self.discount_amount,
            coupon_code: self.coupon_code.clone(),
            coupon_discount: self.coupon_discount,
            total_amount: self.total_amount,
            payment_method: self.payment_method.clone(),
            payment_status: PaymentStatus::Pending,
            payment_reference: self.payment_reference.clone(),
            booking_status: BookingStatus::Pending,
            assigned_technician_id: None,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// A priced booking plus what pricing had to ignore.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedBooking {
    pub booking: NewBooking,
    /// Why a submitted coupon code was not applied.
    pub coupon_rejection: Option<DomainError>,
    /// The declared total, when it disagrees with the computed one.
    pub ignored_declared_total: Option<Money>,
}

/// Prices a booking draft against the catalog and the submitted coupon.
///
/// # Arguments
///
/// * `draft` - The validated request
/// * `catalog_prices` - Current catalog price for each cart item, by index;
///   `None` when the item has no active catalog entry
/// * `coupon` - The stored coupon matching `draft.coupon_code`, if any
/// * `today` - The current date in the service timezone
/// * `now` - The creation instant
///
/// # Errors
///
/// Returns an error if a catalog entry is missing, a submitted price is
/// stale, the cart is invalid, or the declared amounts are inconsistent.
pub fn price_booking(
    draft: BookingDraft,
    catalog_prices: &[Option<Money>],
    coupon: Option<&Coupon>,
    today: Date,
    now: OffsetDateTime,
) -> Result<PricedBooking, CoreError> {
    if catalog_prices.len() != draft.items.len() {
        return Err(DomainError::InvalidField {
            field: "cart_items",
            reason: format!(
                "{} catalog prices supplied for {} items",
                catalog_prices.len(),
                draft.items.len()
            ),
        }
        .into());
    }

    for (item, catalog) in draft.items.iter().zip(catalog_prices) {
        match catalog {
            None => {
                return Err(DomainError::CatalogEntryNotFound {
                    service_name: draft.service_name.clone(),
                    service_type_name: item.service_type_name.clone(),
                    room_size: item.room_size.clone(),
                }
                .into());
            }
            Some(price) if *price != item.unit_price => {
                return Err(DomainError::PriceMismatch {
                    service_type_name: item.service_type_name.clone(),
                    room_size: item.room_size.clone(),
                    submitted: item.unit_price,
                    catalog: *price,
                }
                .into());
            }
            Some(_) => {}
        }
    }

    let line_items: Vec<BookingLineItem> = price_cart(&draft.items)?;
    let outcome: PricingOutcome = compute_pricing(
        &line_items,
        draft.declared_subtotal,
        draft.discount_amount,
        draft.coupon_code.as_deref().map(|code| (code, coupon)),
        today,
    )?;

    let ignored_declared_total: Option<Money> = draft
        .declared_total
        .filter(|declared| *declared != outcome.breakdown.total_amount);

    let coupon_discount: Money = outcome.breakdown.coupon_discount();
    let coupon_code: Option<String> = outcome.breakdown.coupon_code().map(str::to_string);

    Ok(PricedBooking {
        booking: NewBooking {
            customer_id: draft.customer_id,
            service_name: draft.service_name,
            service_date: draft.service_date,
            time_slot: draft.time_slot.label().to_string(),
            service_address: draft.service_address,
            special_notes: draft.special_notes,
            line_items,
            subtotal: outcome.breakdown.subtotal,
            discount_amount: outcome.breakdown.discount_amount,
            coupon_code,
            coupon_discount,
            total_amount: outcome.breakdown.total_amount,
            payment_method: draft.payment_method,
            payment_reference: draft.payment_reference,
            created_at: now,
        },
        coupon_rejection: outcome.coupon_rejection,
        ignored_declared_total,
    })
}
