//! Pricing policy — the singleton record of delivery and packing tiers
//!
//! Exactly one policy exists per deployment, identified by the key
//! [`POLICY_KEY`]. It is created with defaults on first administrative
//! access and mutated only through [`PricingPolicy::apply`].
//!
//! ## Document format
//!
//! ```yaml
//! key: global
//! deliveryThresholds:
//!   - minAmount: 0
//!     charge: 50
//!   - minAmount: 300
//!     charge: 30
//!   - minAmount: 500
//!     charge: 0
//! packingThresholds:
//!   - minAmount: 0
//!     charge: 20
//! isDeliveryEnabled: true
//! isPackingEnabled: true
//! updatedBy: admin@example.com
//! createdAt: 2026-01-01T00:00:00Z
//! updatedAt: 2026-01-02T09:30:00Z
//! ```

use crate::charges::{resolve_charge, ChargeKind, ChargeThreshold};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Singleton key of the one pricing policy
pub const POLICY_KEY: &str = "global";

/// The process-wide pricing policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[schemars(
    title = "Pricing Policy",
    description = "Delivery and packing charge tiers with their enable flags"
)]
pub struct PricingPolicy {
    /// Singleton key, always "global"
    #[serde(default = "default_key")]
    pub key: String,

    /// Delivery charge tiers
    #[serde(default)]
    pub delivery_thresholds: Vec<ChargeThreshold>,

    /// Packing charge tiers
    #[serde(default)]
    pub packing_thresholds: Vec<ChargeThreshold>,

    /// When false, delivery is free regardless of tiers
    #[serde(default = "default_true")]
    pub is_delivery_enabled: bool,

    /// When false, packing is free regardless of tiers
    #[serde(default = "default_true")]
    pub is_packing_enabled: bool,

    /// Last editor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,

    #[schemars(with = "String")]
    pub created_at: DateTime<Utc>,

    #[schemars(with = "String")]
    pub updated_at: DateTime<Utc>,
}

fn default_key() -> String {
    POLICY_KEY.to_string()
}

fn default_true() -> bool {
    true
}

/// Delivery tiers a fresh policy starts with
pub fn default_delivery_thresholds() -> Vec<ChargeThreshold> {
    vec![
        ChargeThreshold::new(0, 50),
        ChargeThreshold::new(300, 30),
        ChargeThreshold::new(500, 0),
    ]
}

/// Packing tiers a fresh policy starts with
pub fn default_packing_thresholds() -> Vec<ChargeThreshold> {
    vec![ChargeThreshold::new(0, 20), ChargeThreshold::new(1000, 0)]
}

/// Administrative settings update; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[schemars(title = "Pricing Policy Update")]
pub struct PolicyUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_thresholds: Option<Vec<ChargeThreshold>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packing_thresholds: Option<Vec<ChargeThreshold>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_delivery_enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_packing_enabled: Option<bool>,
}

impl PolicyUpdate {
    pub fn is_empty(&self) -> bool {
        self.delivery_thresholds.is_none()
            && self.packing_thresholds.is_none()
            && self.is_delivery_enabled.is_none()
            && self.is_packing_enabled.is_none()
    }
}

/// Delivery and packing charges for one subtotal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChargeBreakdown {
    pub delivery: Decimal,
    pub packing: Decimal,
}

impl ChargeBreakdown {
    pub fn total(&self) -> Decimal {
        self.delivery + self.packing
    }
}

impl PricingPolicy {
    /// A fresh policy with default tiers, both charges enabled
    pub fn with_defaults(now: DateTime<Utc>) -> Self {
        Self {
            key: default_key(),
            delivery_thresholds: default_delivery_thresholds(),
            packing_thresholds: default_packing_thresholds(),
            is_delivery_enabled: true,
            is_packing_enabled: true,
            updated_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Parse a policy document from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let policy: PricingPolicy = serde_norway::from_str(yaml)?;
        policy.check_key()?;
        Ok(policy)
    }

    /// Parse a policy document from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let policy: PricingPolicy = serde_json::from_str(json)?;
        policy.check_key()?;
        Ok(policy)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_norway::to_string(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn check_key(&self) -> Result<()> {
        if self.key != POLICY_KEY {
            return Err(Error::Policy(format!(
                "Expected singleton key '{}', found '{}'",
                POLICY_KEY, self.key
            )));
        }
        Ok(())
    }

    pub fn thresholds(&self, kind: ChargeKind) -> &[ChargeThreshold] {
        match kind {
            ChargeKind::Delivery => &self.delivery_thresholds,
            ChargeKind::Packing => &self.packing_thresholds,
        }
    }

    pub fn is_enabled(&self, kind: ChargeKind) -> bool {
        match kind {
            ChargeKind::Delivery => self.is_delivery_enabled,
            ChargeKind::Packing => self.is_packing_enabled,
        }
    }

    /// Charge of `kind` for `subtotal`; zero when that charge is disabled
    pub fn charge_for(&self, kind: ChargeKind, subtotal: Decimal) -> Decimal {
        if !self.is_enabled(kind) {
            return Decimal::ZERO;
        }
        resolve_charge(self.thresholds(kind), subtotal)
    }

    pub fn charges(&self, subtotal: Decimal) -> ChargeBreakdown {
        ChargeBreakdown {
            delivery: self.charge_for(ChargeKind::Delivery, subtotal),
            packing: self.charge_for(ChargeKind::Packing, subtotal),
        }
    }

    /// Apply an administrative update. Last write wins.
    pub fn apply(&mut self, update: PolicyUpdate, editor: Option<&str>, now: DateTime<Utc>) {
        if let Some(tiers) = update.delivery_thresholds {
            self.delivery_thresholds = tiers;
        }
        if let Some(tiers) = update.packing_thresholds {
            self.packing_thresholds = tiers;
        }
        if let Some(enabled) = update.is_delivery_enabled {
            self.is_delivery_enabled = enabled;
        }
        if let Some(enabled) = update.is_packing_enabled {
            self.is_packing_enabled = enabled;
        }
        self.updated_by = editor.map(str::to_string);
        self.updated_at = now;
    }

    /// Human-readable summary
    pub fn to_report(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Pricing policy '{}'\n", self.key));
        for kind in ChargeKind::ALL {
            let state = if self.is_enabled(kind) { "enabled" } else { "disabled" };
            out.push_str(&format!("\n{} ({}):\n", capitalize(kind.as_str()), state));
            let tiers = self.thresholds(kind);
            if tiers.is_empty() {
                out.push_str("  (no tiers)\n");
            }
            for tier in tiers {
                out.push_str(&format!(
                    "  from {:>10}  charge {:>8}\n",
                    tier.min_amount, tier.charge
                ));
            }
        }
        out.push_str(&format!(
            "\nUpdated {} by {}\n",
            self.updated_at.to_rfc3339(),
            self.updated_by.as_deref().unwrap_or("-")
        ));
        out
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
