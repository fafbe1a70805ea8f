//! printdesk CLI - Command-line interface
//!
//! Commands:
//!   quote    - Price a subtotal or an order
//!   policy   - Show, initialize, update and check the pricing policy
//!   check    - Validate a single input field
//!   schema   - Print JSON schemas

mod cli;

use cli::*;
use printdesk::*;
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let result = match args[1].as_str() {
        "quote" => cmd_quote(&args[2..]),
        "policy" => cmd_policy(&args[2..]),
        "check" => cmd_check(&args[2..]),
        "schema" => cmd_schema(&args[2..]),
        "version" | "--version" | "-v" => {
            println!("printdesk {}", VERSION);
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            Err("Unknown command".into())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"
printdesk - Print shop pricing back-office

USAGE:
    printdesk <COMMAND> [OPTIONS]

COMMANDS:
    quote <subtotal|items.yaml>      Price an order (delivery, packing, coupon, total)
    policy show                      Print the pricing policy
    policy init                      Create the pricing policy with defaults
    policy set [flags]               Update the pricing policy
    policy check                     Lint the pricing policy document
    check <validator> <value>        Run a field validator
                                      (required, email, password, url, phone)
    schema [name]                     Print JSON schema for a document type
    version                          Print version

OPTIONS:
    --policy <file>                  Policy document (default: $PRINTDESK_POLICY
                                      or pricing_policy.yaml)
    --coupon <file>                  Coupon document to apply (quote)
    --delivery <on|off>              Toggle delivery charges (policy set)
    --packing <on|off>               Toggle packing charges (policy set)
    --delivery-tiers <min:charge,..> Replace delivery tiers (policy set)
    --packing-tiers <min:charge,..>  Replace packing tiers (policy set)
    --editor <name>                  Recorded as the last editor (policy set)
    --json                           JSON output format

ENVIRONMENT:
    RUST_LOG                         Log filter, e.g. printdesk=debug

EXAMPLES:
    printdesk policy init
    printdesk policy set --delivery-tiers 0:50,300:30,500:0 --editor ops
    printdesk quote 349.90
    printdesk quote order.yaml --coupon spring.yaml --json
    printdesk check email someone@example.com
"#
    );
}
