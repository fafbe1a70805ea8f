// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # printdesk — pricing back-office for a print shop
//!
//! Delivery and packing charges, the pricing policy that holds them,
//! coupons, order quotes and request-field validation.
//!
//! ## Core Concept
//!
//! Charges are **tiered**: a table of `(minAmount, charge)` pairs forms a
//! step function over the order subtotal. A subtotal pays the charge of the
//! highest tier it reaches; below every tier the charge is zero. Each
//! charge can be switched off entirely in the pricing policy.
//!
//! ## Quick Start
//!
//! ```rust
//! use printdesk::{quote_subtotal, ChargeKind, MemoryStore, PricingSettings};
//! use rust_decimal::Decimal;
//!
//! // First access creates the singleton policy with defaults
//! let store = MemoryStore::new();
//! let settings = PricingSettings::open(&store)?;
//! let policy = settings.policy();
//!
//! assert_eq!(policy.charge_for(ChargeKind::Delivery, Decimal::from(299)), Decimal::from(50));
//! assert_eq!(policy.charge_for(ChargeKind::Delivery, Decimal::from(300)), Decimal::from(30));
//!
//! let q = quote_subtotal(Decimal::from(350), policy, None, chrono::Utc::now())?;
//! assert_eq!(q.total, Decimal::from(400));
//! # Ok::<(), printdesk::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                                                             │
//! │  PolicyStore (memory | YAML file)                           │
//! │       │                                                     │
//! │       └──► PricingSettings::open ──► PricingPolicy          │
//! │                                          │                  │
//! │            policy_validate ◄─────────────┤                  │
//! │                                          │                  │
//! │  LineItems + Coupon ──► quote ──► charges::resolve_charge   │
//! │                            │                                │
//! │                            └──► OrderQuote                  │
//! │                                                             │
//! │  request input ──► validate::{email, phone, ...}            │
//! │                            └──► FieldCheck                  │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod charges;
pub mod coupon;
pub mod error;
pub mod policy;
pub mod policy_validate;
pub mod quote;
pub mod store;
pub mod validate;

// Re-exports
pub use charges::{resolve_charge, ChargeKind, ChargeThreshold};
pub use coupon::{Coupon, CouponRejection, Discount};
pub use error::{Error, Result};
pub use policy::{ChargeBreakdown, PolicyUpdate, PricingPolicy, POLICY_KEY};
pub use policy_validate::{
    validate_policy, validate_policy_file, PolicyIssue, PolicyValidationResult,
};
pub use quote::{quote, quote_subtotal, LineItem, OrderQuote};
pub use store::{FileStore, MemoryStore, PolicyStore, PricingSettings};
pub use validate::{FieldCheck, FieldErrors, FieldKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
