//! # Order Totals
//!
//! Derives subtotal, tax, shipping and grand total from cart lines and a
//! delivery quote. Totals are never stored by the checkout session; they are
//! recomputed from current state whenever they are needed, and the order store
//! recomputes them independently when persisting an order.
//!
//! Amounts are `Decimal` in major currency units.

use crate::model::{CartLine, DeliveryQuote};
use rust_decimal::prelude::*;
use serde::Deserialize;
use thiserror::Error;

/// Errors computing totals or converting them for the payment gateway.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PricingError {
    #[error("Order total is too large")]
    Overflow,

    #[error("Amount {0} cannot be expressed in minor units")]
    AmountOutOfRange(Decimal),
}

/// Store-wide pricing rules.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PricingPolicy {
    /// Orders whose subtotal is strictly above this ship free.
    pub free_shipping_threshold: Decimal,
    /// Minor units per major unit (100 paise per rupee).
    pub minor_units_per_major: u32,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Decimal::from(999),
            minor_units_per_major: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub grand_total: Decimal,
}

impl OrderTotals {
    /// Computes totals for `lines`.
    ///
    /// Without a quote the shipping charge is zero; callers must still refuse to
    /// place the order until a quote exists.
    pub fn compute(
        lines: &[CartLine],
        tax_rate_percent: Decimal,
        quote: Option<&DeliveryQuote>,
        policy: &PricingPolicy,
    ) -> Result<Self, PricingError> {
        let subtotal = subtotal(lines)?;
        let tax = tax_for(subtotal, tax_rate_percent)?;
        let shipping = shipping_for(subtotal, quote, policy);
        let grand_total = subtotal
            .checked_add(tax)
            .and_then(|total| total.checked_add(shipping))
            .ok_or(PricingError::Overflow)?;
        Ok(Self {
            subtotal,
            tax,
            shipping,
            grand_total,
        })
    }

    /// The grand total in the gateway's minor currency unit, rounded to the nearest unit.
    pub fn amount_in_minor_units(&self, policy: &PricingPolicy) -> Result<u64, PricingError> {
        let minor = self
            .grand_total
            .checked_mul(Decimal::from(policy.minor_units_per_major))
            .ok_or(PricingError::AmountOutOfRange(self.grand_total))?;
        minor
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u64()
            .ok_or(PricingError::AmountOutOfRange(self.grand_total))
    }
}

/// Σ unit price × quantity.
pub fn subtotal(lines: &[CartLine]) -> Result<Decimal, PricingError> {
    lines.iter().try_fold(Decimal::ZERO, |sum, line| {
        line.line_total()
            .and_then(|total| sum.checked_add(total))
            .ok_or(PricingError::Overflow)
    })
}

/// `subtotal × rate / 100`, rounded to a whole currency unit with halves rounding up.
pub fn tax_for(subtotal: Decimal, tax_rate_percent: Decimal) -> Result<Decimal, PricingError> {
    let tax = subtotal
        .checked_mul(tax_rate_percent)
        .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(PricingError::Overflow)?;
    Ok(tax.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
}

/// Free above the threshold, otherwise the quoted charge (zero with no quote).
pub fn shipping_for(
    subtotal: Decimal,
    quote: Option<&DeliveryQuote>,
    policy: &PricingPolicy,
) -> Decimal {
    match quote {
        _ if subtotal > policy.free_shipping_threshold => Decimal::ZERO,
        Some(quote) => quote.shipping_charge,
        None => Decimal::ZERO,
    }
}
