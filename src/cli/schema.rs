//! Schema CLI command

use printdesk::*;

pub fn cmd_schema(args: &[String]) -> Result<()> {
    let schema_name = args.first().map(|s| s.as_str()).unwrap_or("list");

    match schema_name {
        "list" => {
            println!("Available schemas: policy, update, coupon, items, quote, check, issues");
            Ok(())
        }
        "policy" => print_schema::<PricingPolicy>(),
        "update" => print_schema::<PolicyUpdate>(),
        "coupon" => print_schema::<Coupon>(),
        "items" => print_schema::<Vec<LineItem>>(),
        "quote" => print_schema::<OrderQuote>(),
        "check" => print_schema::<FieldCheck>(),
        "issues" => print_schema::<PolicyValidationResult>(),
        _ => Err(format!("Unknown schema: {}", schema_name).into()),
    }
}

fn print_schema<T: schemars::JsonSchema>() -> Result<()> {
    let schema = schemars::schema_for!(T);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
