//! Tests for the YAML-backed policy store and settings lifecycle

use printdesk::store::FileStore;
use printdesk::{
    validate_policy_file, ChargeKind, ChargeThreshold, Error, PolicyStore, PolicyUpdate,
    PricingSettings,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use tempfile::TempDir;

#[test]
fn test_first_access_writes_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config").join("pricing_policy.yaml");

    let settings = PricingSettings::open(FileStore::new(&path)).unwrap();
    assert!(settings.was_created());
    assert!(path.exists());

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("# Pricing policy"));
    assert!(content.contains("deliveryThresholds"));

    // Defaults lint clean
    let result = validate_policy_file(&path);
    assert!(result.issues.is_empty(), "{:?}", result.issues);
}

#[test]
fn test_update_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pricing_policy.yaml");

    let mut settings = PricingSettings::open(FileStore::new(&path)).unwrap();
    settings
        .update(
            PolicyUpdate {
                delivery_thresholds: Some(vec![
                    ChargeThreshold::new(0, 45),
                    ChargeThreshold::new(Decimal::new(2499, 1), 0),
                ]),
                is_packing_enabled: Some(false),
                ..Default::default()
            },
            Some("ops@printdesk.test"),
        )
        .unwrap();

    let reopened = PricingSettings::open(FileStore::new(&path)).unwrap();
    assert!(!reopened.was_created());
    assert_eq!(reopened.policy(), settings.policy());

    let policy = reopened.policy();
    assert_eq!(policy.updated_by.as_deref(), Some("ops@printdesk.test"));
    assert_eq!(
        policy.charge_for(ChargeKind::Delivery, Decimal::new(2499, 1)),
        Decimal::ZERO
    );
    assert_eq!(
        policy.charge_for(ChargeKind::Delivery, Decimal::from(249)),
        Decimal::from(45)
    );
    assert_eq!(
        policy.charge_for(ChargeKind::Packing, Decimal::from(10)),
        Decimal::ZERO
    );
}

#[test]
fn test_reload_picks_up_hand_edit() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pricing_policy.yaml");
    let mut settings = PricingSettings::open(FileStore::new(&path)).unwrap();

    let edited = std::fs::read_to_string(&path)
        .unwrap()
        .replace("isDeliveryEnabled: true", "isDeliveryEnabled: false");
    std::fs::write(&path, edited).unwrap();

    let policy = settings.reload().unwrap();
    assert!(!policy.is_delivery_enabled);
}

#[test]
fn test_foreign_singleton_key_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pricing_policy.yaml");
    std::fs::write(
        &path,
        "key: store-2\ncreatedAt: 2026-01-01T00:00:00Z\nupdatedAt: 2026-01-01T00:00:00Z\n",
    )
    .unwrap();

    let store = FileStore::new(&path);
    assert!(matches!(store.load(), Err(Error::Store(_))));
    assert!(PricingSettings::open(store).is_err());
}

#[test]
fn test_open_existing_does_not_create() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pricing_policy.yaml");

    assert!(PricingSettings::open_existing(FileStore::new(&path)).is_err());
    assert!(!path.exists());
}
