use std::cmp::Ordering;

use super::domain::{Property, PropertyOffer};
use super::policy::ListingPolicy;
use crate::error::ValidationError;

/// Monetary amounts are compared at two decimal digits.
const PRICE_PRECISION_DIGITS: i32 = 2;

/// Compares two floats after rounding both to the given number of decimal
/// digits, so near-equal amounts differing only by representation noise
/// compare equal.
pub(crate) fn float_compare(a: f64, b: f64, decimals: i32) -> Ordering {
    let scale = 10_f64.powi(decimals);
    let scaled_a = (a * scale).round();
    let scaled_b = (b * scale).round();
    scaled_a.partial_cmp(&scaled_b).unwrap_or(Ordering::Equal)
}

/// Invariant checks run inside every committing mutation that touches the
/// constrained fields. A failure aborts the enclosing transaction.
pub(crate) fn check_property(
    property: &Property,
    policy: &ListingPolicy,
) -> Result<(), ValidationError> {
    if property.expected_price <= 0.0 {
        return Err(ValidationError::NonPositiveExpectedPrice);
    }

    // A zero selling price means "not sold yet" and is exempt.
    if property.selling_price != 0.0 {
        let floor = property.expected_price * policy.min_selling_ratio;
        if float_compare(property.selling_price, floor, PRICE_PRECISION_DIGITS) == Ordering::Less {
            return Err(ValidationError::SellingPriceBelowFloor {
                selling: property.selling_price,
                floor,
            });
        }
    }

    for offer in &property.offers {
        check_offer(offer)?;
    }

    Ok(())
}

pub(crate) fn check_offer(offer: &PropertyOffer) -> Result<(), ValidationError> {
    if offer.price <= 0.0 {
        return Err(ValidationError::NonPositiveOfferPrice);
    }
    Ok(())
}
