//! CLI command implementations
//!
//! This module contains all CLI command handlers, organized by category:
//! - `quote`: Price a subtotal or a list of line items
//! - `policy`: Show, initialize, update and check the pricing policy
//! - `check`: Run a single field validator
//! - `schema`: Print JSON schemas for document types
//! - `util`: Shared argument helpers

pub mod check;
pub mod policy;
pub mod quote;
pub mod schema;
pub mod util;

// Re-export all command functions for convenient access
pub use check::cmd_check;
pub use policy::cmd_policy;
pub use quote::cmd_quote;
pub use schema::cmd_schema;
