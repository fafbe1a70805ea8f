//! Field check CLI command

use super::util::{has_flag, print_json};
use printdesk::validate::check_field;
use printdesk::*;

pub fn cmd_check(args: &[String]) -> Result<()> {
    let json_output = has_flag(args, "--json");
    let rest: Vec<&String> = args.iter().filter(|a| a.as_str() != "--json").collect();

    let kind: FieldKind = rest
        .first()
        .ok_or("Usage: printdesk check <required|email|password|url|phone> <value> [--json]")?
        .parse()?;
    let value = rest.get(1).map(|s| s.as_str());

    let check = check_field(kind, value);

    if json_output {
        print_json(&check)?;
    } else if check.is_valid {
        println!("✓ valid {}", kind);
    } else {
        println!("✗ {}", check.error.as_deref().unwrap_or("invalid value"));
    }

    if check.is_valid {
        Ok(())
    } else {
        Err("Validation failed".into())
    }
}
