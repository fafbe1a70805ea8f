//! Order quotes — subtotal, discount, charges and total
//!
//! Delivery and packing tiers are resolved against the subtotal before any
//! coupon discount. A coupon that does not apply is reported on the quote
//! rather than failing it.

use crate::coupon::Coupon;
use crate::error::{Error, Result};
use crate::policy::PricingPolicy;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One ordered print product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl LineItem {
    pub fn new(name: &str, quantity: u32, unit_price: impl Into<Decimal>) -> Self {
        Self {
            name: name.to_string(),
            quantity,
            unit_price: unit_price.into(),
        }
    }

    pub fn line_total(&self) -> Result<Decimal> {
        let quantity = Decimal::from(self.quantity);
        self.unit_price.checked_mul(quantity).ok_or_else(|| {
            Error::Quote(format!("Line item '{}' total is too large", self.name))
        })
    }
}

/// Sum of all line totals
pub fn order_subtotal(items: &[LineItem]) -> Result<Decimal> {
    items.iter().try_fold(Decimal::ZERO, |acc, item| {
        acc.checked_add(item.line_total()?)
            .ok_or_else(|| Error::Quote("Order subtotal is too large".into()))
    })
}

/// Parse a YAML list of line items, rejecting negative prices and totals
/// that cannot be represented
pub fn items_from_yaml(yaml: &str) -> Result<Vec<LineItem>> {
    let items: Vec<LineItem> = serde_norway::from_str(yaml)?;
    if let Some(bad) = items.iter().find(|i| i.unit_price < Decimal::ZERO) {
        return Err(Error::Quote(format!(
            "Line item '{}' has a negative unit price",
            bad.name
        )));
    }
    order_subtotal(&items)?;
    Ok(items)
}

/// Priced order
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[schemars(title = "Order Quote")]
pub struct OrderQuote {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub delivery: Decimal,
    pub packing: Decimal,
    pub total: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    /// Why the coupon was not applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_error: Option<String>,
}

/// Quote an order of line items
pub fn quote(
    items: &[LineItem],
    policy: &PricingPolicy,
    coupon: Option<&Coupon>,
    now: DateTime<Utc>,
) -> Result<OrderQuote> {
    quote_subtotal(order_subtotal(items)?, policy, coupon, now)
}

/// Quote a bare subtotal; negative subtotals are refused
pub fn quote_subtotal(
    subtotal: Decimal,
    policy: &PricingPolicy,
    coupon: Option<&Coupon>,
    now: DateTime<Utc>,
) -> Result<OrderQuote> {
    if subtotal < Decimal::ZERO {
        return Err(Error::Quote(format!(
            "Subtotal cannot be negative, got {}",
            subtotal
        )));
    }
    let charges = policy.charges(subtotal);

    let (discount, coupon_error) = match coupon.map(|c| c.discount_for(subtotal, now)) {
        Some(Ok(amount)) => (amount, None),
        Some(Err(rejection)) => (Decimal::ZERO, Some(rejection.to_string())),
        None => (Decimal::ZERO, None),
    };

    let total = (subtotal - discount)
        .checked_add(charges.delivery)
        .and_then(|t| t.checked_add(charges.packing))
        .ok_or_else(|| Error::Quote("Order total is too large".into()))?;

    Ok(OrderQuote {
        subtotal,
        discount,
        delivery: charges.delivery,
        packing: charges.packing,
        total,
        coupon_code: coupon.map(|c| c.code.clone()),
        coupon_error,
    })
}

impl OrderQuote {
    pub fn to_report(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Subtotal:  {:>10}\n", self.subtotal));
        if let Some(code) = &self.coupon_code {
            match &self.coupon_error {
                Some(reason) => {
                    out.push_str(&format!("Coupon:    {} not applied ({})\n", code, reason))
                }
                None => {
                    out.push_str(&format!("Discount:  {:>10}  ({})\n", -self.discount, code))
                }
            }
        }
        out.push_str(&format!("Delivery:  {:>10}\n", self.delivery));
        out.push_str(&format!("Packing:   {:>10}\n", self.packing));
        out.push_str(&format!("Total:     {:>10}\n", self.total));
        out
    }
}
