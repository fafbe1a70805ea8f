//! Policy validation for printdesk
//!
//! Lints a pricing policy when it is authored. Resolution itself never
//! fails, so these checks are the only place a misconfigured table
//! (negative charges, missing zero tier, duplicate tiers) gets reported.

use crate::charges::{ChargeKind, ChargeThreshold};
use crate::policy::PricingPolicy;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

/// Severity level for validation issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A validation issue found in a policy
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PolicyIssue {
    pub severity: Severity,
    pub code: String,
    pub message: String,
    /// `delivery`, `packing` or `document`
    pub table: String,
}

impl PolicyIssue {
    pub fn error(code: &str, message: &str, table: &str) -> Self {
        Self {
            severity: Severity::Error,
            code: code.to_string(),
            message: message.to_string(),
            table: table.to_string(),
        }
    }

    pub fn warning(code: &str, message: &str, table: &str) -> Self {
        Self {
            severity: Severity::Warning,
            code: code.to_string(),
            message: message.to_string(),
            table: table.to_string(),
        }
    }
}

/// Result of policy validation
#[derive(Debug, Default, Serialize, JsonSchema)]
pub struct PolicyValidationResult {
    pub issues: Vec<PolicyIssue>,
    pub tables_checked: usize,
}

impl PolicyValidationResult {
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }
}

/// Validate both threshold tables of a policy
pub fn validate_policy(policy: &PricingPolicy) -> PolicyValidationResult {
    let mut result = PolicyValidationResult::default();
    for kind in ChargeKind::ALL {
        validate_table(
            kind,
            policy.thresholds(kind),
            policy.is_enabled(kind),
            &mut result,
        );
    }
    result
}

/// Validate a policy document on disk
pub fn validate_policy_file(path: &Path) -> PolicyValidationResult {
    let mut result = PolicyValidationResult::default();

    if !path.exists() {
        result.issues.push(PolicyIssue::error(
            "E010",
            &format!("File does not exist: {}", path.display()),
            "document",
        ));
        return result;
    }

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            result.issues.push(PolicyIssue::error(
                "E010",
                &format!("Cannot read file: {}", e),
                "document",
            ));
            return result;
        }
    };

    match PricingPolicy::from_yaml(&content) {
        Ok(policy) => validate_policy(&policy),
        Err(e) => {
            result.issues.push(PolicyIssue::error(
                "E011",
                &format!("Invalid policy document: {}", e),
                "document",
            ));
            result
        }
    }
}

/// Validate one threshold table
pub fn validate_table(
    kind: ChargeKind,
    tiers: &[ChargeThreshold],
    enabled: bool,
    result: &mut PolicyValidationResult,
) {
    let table = kind.as_str();
    result.tables_checked += 1;

    if tiers.is_empty() {
        if enabled {
            result.issues.push(PolicyIssue::warning(
                "W003",
                &format!("{} is enabled but has no tiers; it will always be free", table),
                table,
            ));
        }
        return;
    }

    for tier in tiers {
        if tier.min_amount < Decimal::ZERO {
            result.issues.push(PolicyIssue::error(
                "E001",
                &format!("Tier {} has a negative minAmount", tier),
                table,
            ));
        }
        if tier.charge < Decimal::ZERO {
            result.issues.push(PolicyIssue::error(
                "E002",
                &format!("Tier {} has a negative charge", tier),
                table,
            ));
        }
    }

    let mut seen = HashSet::new();
    for tier in tiers {
        // normalize so 300 and 300.00 collide
        if !seen.insert(tier.min_amount.normalize()) {
            result.issues.push(PolicyIssue::error(
                "E003",
                &format!("Duplicate tier at minAmount {}", tier.min_amount),
                table,
            ));
        }
    }

    if !tiers.iter().any(|t| t.min_amount <= Decimal::ZERO) {
        result.issues.push(PolicyIssue::warning(
            "W001",
            &format!(
                "No tier starts at 0; subtotals below {} get no {} charge",
                smallest_min(tiers),
                table
            ),
            table,
        ));
    }

    if tiers.windows(2).any(|w| w[0].min_amount > w[1].min_amount) {
        result.issues.push(PolicyIssue::warning(
            "W002",
            "Tiers are not sorted by minAmount",
            table,
        ));
    }

    let mut sorted: Vec<&ChargeThreshold> = tiers.iter().collect();
    sorted.sort_by(|a, b| a.min_amount.cmp(&b.min_amount));
    if let Some(w) = sorted.windows(2).find(|w| w[1].charge > w[0].charge) {
        result.issues.push(PolicyIssue::warning(
            "W004",
            &format!(
                "Charge rises from {} to {} as the subtotal grows past {}",
                w[0].charge, w[1].charge, w[1].min_amount
            ),
            table,
        ));
    }
}

fn smallest_min(tiers: &[ChargeThreshold]) -> Decimal {
    tiers
        .iter()
        .map(|t| t.min_amount)
        .min()
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn policy_with(delivery: Vec<ChargeThreshold>) -> PricingPolicy {
        let mut policy = PricingPolicy::with_defaults(Utc::now());
        policy.delivery_thresholds = delivery;
        policy
    }

    #[test]
    fn test_defaults_are_clean() {
        let result = validate_policy(&PricingPolicy::with_defaults(Utc::now()));
        assert!(result.issues.is_empty(), "{:?}", result.issues);
        assert_eq!(result.tables_checked, 2);
    }

    #[test]
    fn test_negative_values() {
        let result = validate_policy(&policy_with(vec![
            ChargeThreshold::new(0, 10),
            ChargeThreshold::new(-5, 10),
            ChargeThreshold::new(100, -1),
        ]));
        assert!(result.has_errors());
        assert!(result.has_code("E001"));
        assert!(result.has_code("E002"));
    }

    #[test]
    fn test_duplicate_min_amount() {
        let result = validate_policy(&policy_with(vec![
            ChargeThreshold::new(0, 10),
            ChargeThreshold::new(300, 5),
            ChargeThreshold {
                min_amount: Decimal::new(30000, 2),
                charge: Decimal::from(4),
            },
        ]));
        assert!(result.has_code("E003"));
        assert_eq!(result.error_count(), 1);
    }

    #[test]
    fn test_missing_zero_tier_and_unsorted() {
        let result = validate_policy(&policy_with(vec![
            ChargeThreshold::new(500, 0),
            ChargeThreshold::new(100, 10),
        ]));
        assert!(!result.has_errors());
        assert!(result.has_code("W001"));
        assert!(result.has_code("W002"));
        assert!(!result.has_code("W004"));
    }

    #[test]
    fn test_rising_charge() {
        let result = validate_policy(&policy_with(vec![
            ChargeThreshold::new(0, 10),
            ChargeThreshold::new(100, 25),
        ]));
        assert!(result.has_code("W004"));
    }

    #[test]
    fn test_empty_table_only_warns_when_enabled() {
        let mut policy = policy_with(vec![]);
        let result = validate_policy(&policy);
        assert!(result.has_code("W003"));

        policy.is_delivery_enabled = false;
        let result = validate_policy(&policy);
        assert!(!result.has_code("W003"));
    }

    #[test]
    fn test_validate_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = validate_policy_file(&dir.path().join("nope.yaml"));
        assert!(result.has_code("E010"));
    }

    #[test]
    fn test_validate_wrong_key_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("policy.yaml");
        std::fs::write(
            &file,
            "key: other\ncreatedAt: 2026-01-01T00:00:00Z\nupdatedAt: 2026-01-01T00:00:00Z\n",
        )
        .unwrap();
        let result = validate_policy_file(&file);
        assert!(result.has_code("E011"));
    }

    #[test]
    fn test_validate_file_with_warnings() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("policy.yaml");
        let content = r#"
key: global
deliveryThresholds:
  - minAmount: 100
    charge: 10
packingThresholds: []
isPackingEnabled: false
createdAt: 2026-01-01T00:00:00Z
updatedAt: 2026-01-01T00:00:00Z
"#;
        std::fs::write(&file, content).unwrap();
        let result = validate_policy_file(&file);
        assert!(!result.has_errors(), "{:?}", result.issues);
        assert_eq!(result.warning_count(), 1);
        assert!(result.has_code("W001"));
    }
}
