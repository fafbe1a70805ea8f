//! CLI utility helpers

use printdesk::{Error, FileStore, Result};
use std::path::PathBuf;

/// Value following `--name` (or its short alias), if present
pub fn flag_value<'a>(args: &'a [String], names: &[&str]) -> Option<&'a str> {
    args.iter()
        .position(|arg| names.contains(&arg.as_str()))
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

pub fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|arg| arg == name)
}

/// First argument that is neither a flag nor a flag's value
pub fn positional(args: &[String], flags_with_values: &[&str]) -> Option<String> {
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if flags_with_values.contains(&arg.as_str()) {
            skip_next = true;
            continue;
        }
        if !arg.starts_with("--") {
            return Some(arg.clone());
        }
    }
    None
}

/// Policy store from `--policy`, else `PRINTDESK_POLICY`, else the default file
pub fn policy_store_arg(args: &[String]) -> FileStore {
    match flag_value(args, &["--policy", "-p"]) {
        Some(path) => FileStore::new(PathBuf::from(path)),
        None => FileStore::from_env(),
    }
}

/// Parse an `on`/`off` toggle
pub fn parse_toggle(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(Error::Other(format!(
            "Invalid toggle '{}': use on or off",
            other
        ))),
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_flag_value() {
        let a = args(&["350", "--policy", "p.yaml", "--json"]);
        assert_eq!(flag_value(&a, &["--policy", "-p"]), Some("p.yaml"));
        assert_eq!(flag_value(&a, &["--coupon"]), None);
        assert!(has_flag(&a, "--json"));
    }

    #[test]
    fn test_positional_skips_flag_values() {
        let a = args(&["--policy", "p.yaml", "items.yaml", "--json"]);
        assert_eq!(positional(&a, &["--policy"]).as_deref(), Some("items.yaml"));
        assert_eq!(positional(&args(&["--json"]), &[]), None);
    }

    #[test]
    fn test_parse_toggle() {
        assert!(parse_toggle("ON").unwrap());
        assert!(!parse_toggle("off").unwrap());
        assert!(parse_toggle("maybe").is_err());
    }
}
