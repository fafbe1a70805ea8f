//! Pricing policy CLI commands

use super::util::{flag_value, has_flag, parse_toggle, policy_store_arg, print_json};
use printdesk::charges::parse_tiers;
use printdesk::policy_validate::Severity;
use printdesk::*;
use tracing::info;

pub fn cmd_policy(args: &[String]) -> Result<()> {
    if args.is_empty() {
        return Err("Usage: printdesk policy <show|init|set|check> [options]".into());
    }

    match args[0].as_str() {
        "show" => cmd_show(&args[1..]),
        "init" => cmd_init(&args[1..]),
        "set" => cmd_set(&args[1..]),
        "check" => cmd_check_policy(&args[1..]),
        cmd => Err(format!(
            "Unknown policy subcommand: {}. Use 'show', 'init', 'set' or 'check'.",
            cmd
        )
        .into()),
    }
}

fn cmd_show(args: &[String]) -> Result<()> {
    let settings = PricingSettings::open_existing(policy_store_arg(args))?;

    if has_flag(args, "--json") {
        print_json(settings.policy())?;
    } else {
        print!("{}", settings.policy().to_report());
    }
    Ok(())
}

fn cmd_init(args: &[String]) -> Result<()> {
    let store = policy_store_arg(args);
    let path = store.path().display().to_string();
    let settings = PricingSettings::open(store)?;

    if settings.was_created() {
        println!("✓ Created pricing policy with defaults: {}", path);
    } else {
        println!("Pricing policy already exists: {}", path);
    }
    Ok(())
}

/// Build a policy update from `set` flags
pub fn update_from_args(args: &[String]) -> Result<PolicyUpdate> {
    Ok(PolicyUpdate {
        delivery_thresholds: flag_value(args, &["--delivery-tiers"])
            .map(parse_tiers)
            .transpose()?,
        packing_thresholds: flag_value(args, &["--packing-tiers"])
            .map(parse_tiers)
            .transpose()?,
        is_delivery_enabled: flag_value(args, &["--delivery"])
            .map(parse_toggle)
            .transpose()?,
        is_packing_enabled: flag_value(args, &["--packing"])
            .map(parse_toggle)
            .transpose()?,
    })
}

fn cmd_set(args: &[String]) -> Result<()> {
    let update = update_from_args(args)?;
    if update.is_empty() {
        return Err("Usage: printdesk policy set [--delivery on|off] [--packing on|off] \
                    [--delivery-tiers 0:50,300:30] [--packing-tiers 0:20] [--editor NAME]"
            .into());
    }
    let editor = flag_value(args, &["--editor"]);

    let mut settings = PricingSettings::open(policy_store_arg(args))?;
    let report = settings.update_checked(update, editor)?;
    print_issues(&report);
    info!(updated_at = %settings.policy().updated_at, "policy written");
    println!("✓ Pricing policy updated");
    Ok(())
}

fn cmd_check_policy(args: &[String]) -> Result<()> {
    let store = policy_store_arg(args);
    let result = validate_policy_file(store.path());

    if has_flag(args, "--json") {
        let output = serde_json::json!({
            "valid": !result.has_errors(),
            "errors": result.error_count(),
            "warnings": result.warning_count(),
            "issues": result.issues,
        });
        print_json(&output)?;
    } else if result.issues.is_empty() {
        println!("✓ Pricing policy is valid");
    } else {
        print_issues(&result);
        println!();
        if result.has_errors() {
            println!(
                "✗ {} error(s), {} warning(s)",
                result.error_count(),
                result.warning_count()
            );
        } else {
            println!("✓ {} warning(s) (no errors)", result.warning_count());
        }
    }

    if result.has_errors() {
        return Err("Policy validation failed".into());
    }
    Ok(())
}

fn print_issues(result: &PolicyValidationResult) {
    for issue in &result.issues {
        let (prefix, level) = match issue.severity {
            Severity::Error => ("✗", "ERROR"),
            Severity::Warning => ("⚠", "WARN"),
        };
        println!(
            "{} [{}] {} ({}): {}",
            prefix, issue.code, level, issue.table, issue.message
        );
    }
}
