//! Coupons — percentage or fixed discounts on an order subtotal

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discount granted by a coupon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Discount {
    /// Percent of the subtotal, 0 to 100
    Percentage(Decimal),
    /// Flat amount off
    Fixed(Decimal),
}

/// A coupon as authored in the admin dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[schemars(title = "Coupon")]
pub struct Coupon {
    pub code: String,

    pub discount: Discount,

    /// Smallest subtotal the coupon applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_order_amount: Option<Decimal>,

    /// Cap on a percentage discount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_discount: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub expires_at: Option<DateTime<Utc>>,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Why a coupon did not apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "reason", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CouponRejection {
    Inactive,
    Expired { expired_at: String },
    BelowMinimum { minimum: Decimal },
}

impl fmt::Display for CouponRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CouponRejection::Inactive => f.write_str("Coupon is not active"),
            CouponRejection::Expired { expired_at } => {
                write!(f, "Coupon expired at {}", expired_at)
            }
            CouponRejection::BelowMinimum { minimum } => {
                write!(f, "Coupon requires a subtotal of at least {}", minimum)
            }
        }
    }
}

impl Coupon {
    pub fn percentage(code: &str, percent: impl Into<Decimal>) -> Self {
        Self::new(code, Discount::Percentage(percent.into()))
    }

    pub fn fixed(code: &str, amount: impl Into<Decimal>) -> Self {
        Self::new(code, Discount::Fixed(amount.into()))
    }

    fn new(code: &str, discount: Discount) -> Self {
        Self {
            code: code.to_string(),
            discount,
            min_order_amount: None,
            max_discount: None,
            expires_at: None,
            is_active: true,
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let coupon: Coupon = serde_norway::from_str(yaml)?;
        coupon.validate()?;
        Ok(coupon)
    }

    /// Reject coupons that could never be applied sensibly
    pub fn validate(&self) -> Result<()> {
        if self.code.trim().is_empty() {
            return Err(Error::Coupon("Coupon code cannot be empty".into()));
        }
        match self.discount {
            Discount::Percentage(p) if p < Decimal::ZERO || p > Decimal::ONE_HUNDRED => {
                return Err(Error::Coupon(format!(
                    "{}: percentage must be between 0 and 100, got {}",
                    self.code, p
                )));
            }
            Discount::Fixed(amount) if amount < Decimal::ZERO => {
                return Err(Error::Coupon(format!(
                    "{}: fixed discount cannot be negative, got {}",
                    self.code, amount
                )));
            }
            _ => {}
        }
        if let Some(cap) = self.max_discount {
            if cap < Decimal::ZERO {
                return Err(Error::Coupon(format!(
                    "{}: maxDiscount cannot be negative",
                    self.code
                )));
            }
        }
        Ok(())
    }

    /// Case-insensitive code comparison
    pub fn matches_code(&self, code: &str) -> bool {
        self.code.trim().eq_ignore_ascii_case(code.trim())
    }

    /// Discount for `subtotal` at `now`, never more than the subtotal
    pub fn discount_for(
        &self,
        subtotal: Decimal,
        now: DateTime<Utc>,
    ) -> std::result::Result<Decimal, CouponRejection> {
        if !self.is_active {
            return Err(CouponRejection::Inactive);
        }
        if let Some(expires_at) = self.expires_at {
            if now >= expires_at {
                return Err(CouponRejection::Expired {
                    expired_at: expires_at.to_rfc3339(),
                });
            }
        }
        if let Some(minimum) = self.min_order_amount {
            if subtotal < minimum {
                return Err(CouponRejection::BelowMinimum { minimum });
            }
        }

        let raw = match self.discount {
            Discount::Percentage(p) => {
                // scale down first when the product does not fit
                let amount = subtotal
                    .checked_mul(p)
                    .map(|v| v / Decimal::ONE_HUNDRED)
                    .or_else(|| (subtotal / Decimal::ONE_HUNDRED).checked_mul(p))
                    .unwrap_or(subtotal);
                match self.max_discount {
                    Some(cap) => amount.min(cap),
                    None => amount,
                }
            }
            Discount::Fixed(amount) => amount,
        };

        Ok(raw
            .min(subtotal)
            .max(Decimal::ZERO)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_percentage_discount() {
        let coupon = Coupon::percentage("SPRING10", 10);
        assert_eq!(
            coupon.discount_for(Decimal::from(250), now()),
            Ok(Decimal::from(25))
        );
    }

    #[test]
    fn test_percentage_capped() {
        let mut coupon = Coupon::percentage("BIG50", 50);
        coupon.max_discount = Some(Decimal::from(100));
        assert_eq!(
            coupon.discount_for(Decimal::from(1000), now()),
            Ok(Decimal::from(100))
        );
    }

    #[test]
    fn test_fixed_never_exceeds_subtotal() {
        let coupon = Coupon::fixed("FLAT75", 75);
        assert_eq!(
            coupon.discount_for(Decimal::from(40), now()),
            Ok(Decimal::from(40))
        );
    }

    #[test]
    fn test_rounds_to_cents() {
        let coupon = Coupon::percentage("THIRD", Decimal::new(3333, 2));
        // 33.33% of 10.00
        assert_eq!(
            coupon.discount_for(Decimal::from(10), now()),
            Ok(Decimal::new(333, 2))
        );
    }

    #[test]
    fn test_percentage_of_largest_subtotal() {
        let coupon = Coupon::percentage("TEN", 10);
        let discount = coupon.discount_for(Decimal::MAX, now()).unwrap();
        assert!(discount > Decimal::ZERO);
        assert!(discount < Decimal::MAX);
    }

    #[test]
    fn test_rejection_serializes_camel_case() {
        let rejection = CouponRejection::Expired {
            expired_at: "2026-01-01T00:00:00+00:00".into(),
        };
        let json = serde_json::to_value(&rejection).unwrap();
        assert_eq!(json["reason"], "expired");
        assert_eq!(json["expiredAt"], "2026-01-01T00:00:00+00:00");
        assert!(json.get("expired_at").is_none());
    }

    #[test]
    fn test_rejections() {
        let mut coupon = Coupon::fixed("OLD", 5);
        coupon.is_active = false;
        assert_eq!(
            coupon.discount_for(Decimal::from(100), now()),
            Err(CouponRejection::Inactive)
        );

        coupon.is_active = true;
        coupon.expires_at = Some(now());
        assert!(matches!(
            coupon.discount_for(Decimal::from(100), now()),
            Err(CouponRejection::Expired { .. })
        ));

        coupon.expires_at = None;
        coupon.min_order_amount = Some(Decimal::from(200));
        let err = coupon.discount_for(Decimal::from(100), now()).unwrap_err();
        assert_eq!(err.to_string(), "Coupon requires a subtotal of at least 200");
    }

    #[test]
    fn test_validate_bounds() {
        assert!(Coupon::percentage("X", 101).validate().is_err());
        assert!(Coupon::fixed("X", -1).validate().is_err());
        assert!(Coupon::fixed(" ", 1).validate().is_err());
        assert!(Coupon::percentage("OK", 100).validate().is_ok());
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
code: WELCOME15
discount:
  type: percentage
  value: 15
minOrderAmount: 100
expiresAt: 2026-12-31T23:59:59Z
"#;
        let coupon = Coupon::from_yaml(yaml).unwrap();
        assert!(coupon.is_active);
        assert!(coupon.matches_code("welcome15"));
        assert_eq!(
            coupon.discount_for(Decimal::from(200), now()),
            Ok(Decimal::from(30))
        );
    }
}
