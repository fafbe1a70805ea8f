//! Quote CLI command

use super::util::{flag_value, has_flag, policy_store_arg, positional, print_json};
use chrono::Utc;
use printdesk::charges::parse_amount;
use printdesk::quote::items_from_yaml;
use printdesk::*;
use std::fs;
use tracing::warn;

const VALUE_FLAGS: [&str; 4] = ["--policy", "-p", "--coupon", "-c"];

pub fn cmd_quote(args: &[String]) -> Result<()> {
    let target = positional(args, &VALUE_FLAGS).ok_or(
        "Usage: printdesk quote <subtotal|items.yaml> [--policy FILE] [--coupon FILE] [--json]",
    )?;
    let json_output = has_flag(args, "--json");

    let policy = load_policy_or_defaults(args)?;

    let coupon = match flag_value(args, &["--coupon", "-c"]) {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(Error::Io)?;
            Some(Coupon::from_yaml(&content)?)
        }
        None => None,
    };

    let now = Utc::now();
    let result = match parse_amount(&target) {
        Ok(subtotal) => quote_subtotal(subtotal, &policy, coupon.as_ref(), now)?,
        Err(_) => {
            let content = fs::read_to_string(&target).map_err(Error::Io)?;
            let items = items_from_yaml(&content)?;
            quote(&items, &policy, coupon.as_ref(), now)?
        }
    };

    if json_output {
        print_json(&result)?;
    } else {
        print!("{}", result.to_report());
    }
    Ok(())
}

/// Quoting never creates the policy file; an absent one prices with defaults
fn load_policy_or_defaults(args: &[String]) -> Result<PricingPolicy> {
    let store = policy_store_arg(args);
    match store.load()? {
        Some(policy) => Ok(policy),
        None => {
            warn!(
                path = %store.path().display(),
                "no pricing policy found, quoting with defaults"
            );
            Ok(PricingPolicy::with_defaults(Utc::now()))
        }
    }
}
