//! Tiered charges — the step function behind delivery and packing fees
//!
//! A threshold table is an unordered list of `(minAmount, charge)` tiers.
//! An order subtotal lands on the highest tier it reaches:
//!
//! ```text
//!   charge
//!     50 ┤━━━━━━━━━━━━┓
//!     30 ┤            ┗━━━━━━━┓
//!      0 ┤                    ┗━━━━━━━━━━━━━
//!        └────────────┬───────┬──────────── subtotal
//!        0           300     500
//! ```
//!
//! Tables are resolved as authored: no sorting or de-duplication is assumed.
//! Lint them with [`crate::policy_validate`] when they are written, not here.

use crate::error::{Error, Result};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One tier: `charge` applies once the subtotal reaches `min_amount`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChargeThreshold {
    /// Smallest subtotal that qualifies for this tier
    pub min_amount: Decimal,

    /// Charge applied to qualifying subtotals
    pub charge: Decimal,
}

impl ChargeThreshold {
    pub fn new(min_amount: impl Into<Decimal>, charge: impl Into<Decimal>) -> Self {
        Self {
            min_amount: min_amount.into(),
            charge: charge.into(),
        }
    }
}

impl fmt::Display for ChargeThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.min_amount, self.charge)
    }
}

/// Which charge a threshold table prices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChargeKind {
    Delivery,
    Packing,
}

impl ChargeKind {
    pub const ALL: [ChargeKind; 2] = [ChargeKind::Delivery, ChargeKind::Packing];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChargeKind::Delivery => "delivery",
            ChargeKind::Packing => "packing",
        }
    }
}

impl fmt::Display for ChargeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChargeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "delivery" => Ok(ChargeKind::Delivery),
            "packing" => Ok(ChargeKind::Packing),
            other => Err(Error::Other(format!(
                "Unknown charge kind: {}. Use 'delivery' or 'packing'.",
                other
            ))),
        }
    }
}

/// Resolve the charge for `amount` against a threshold table.
///
/// Picks the tier with the largest `min_amount` not exceeding `amount`.
/// Equal `min_amount`s resolve to the entry listed first. When no tier
/// qualifies (empty table, or every tier above `amount`) the charge is zero.
///
/// # Examples
/// ```
/// use printdesk::charges::{resolve_charge, ChargeThreshold};
/// use rust_decimal::Decimal;
///
/// let tiers = [
///     ChargeThreshold::new(0, 50),
///     ChargeThreshold::new(300, 30),
///     ChargeThreshold::new(500, 0),
/// ];
/// assert_eq!(resolve_charge(&tiers, Decimal::from(299)), Decimal::from(50));
/// assert_eq!(resolve_charge(&tiers, Decimal::from(300)), Decimal::from(30));
/// assert_eq!(resolve_charge(&[], Decimal::from(300)), Decimal::ZERO);
/// ```
pub fn resolve_charge(thresholds: &[ChargeThreshold], amount: Decimal) -> Decimal {
    selected_tier(thresholds, amount)
        .map(|tier| tier.charge)
        .unwrap_or(Decimal::ZERO)
}

/// The tier `amount` lands on, if any
pub fn selected_tier(
    thresholds: &[ChargeThreshold],
    amount: Decimal,
) -> Option<&ChargeThreshold> {
    let mut best: Option<&ChargeThreshold> = None;
    for tier in thresholds.iter().filter(|t| t.min_amount <= amount) {
        match best {
            Some(current) if tier.min_amount <= current.min_amount => {}
            _ => best = Some(tier),
        }
    }
    best
}

/// Parse a compact tier list such as `0:50,300:30,500:0`
///
/// Whitespace around entries is ignored; an empty string yields an empty table.
pub fn parse_tiers(input: &str) -> Result<Vec<ChargeThreshold>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (min, charge) = entry.split_once(':').ok_or_else(|| {
                Error::Other(format!(
                    "Invalid tier '{}': expected <minAmount>:<charge>",
                    entry
                ))
            })?;
            Ok(ChargeThreshold {
                min_amount: parse_amount(min)?,
                charge: parse_amount(charge)?,
            })
        })
        .collect()
}

/// Parse a plain decimal amount such as `49.99`
pub fn parse_amount(input: &str) -> Result<Decimal> {
    Decimal::from_str(input.trim())
        .map_err(|e| Error::Other(format!("Invalid amount '{}': {}", input.trim(), e)))
}

/// Render a tier list back into the compact `min:charge` form
pub fn format_tiers(thresholds: &[ChargeThreshold]) -> String {
    thresholds
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
