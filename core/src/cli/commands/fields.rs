use super::{print_json, Context};
use crate::catalog::SPEC_FIELDS;
use colored::Colorize;

pub fn run(ctx: &Context) -> Result<(), String> {
    if ctx.is_json() {
        print_json(&SPEC_FIELDS);
        return Ok(());
    }

    println!("{}", "Spec fields".bold());
    for field in SPEC_FIELDS {
        let kind = match field.unit {
            Some(unit) => format!("numeric, {unit}"),
            None => "text".to_owned(),
        };
        println!(
            "  {:<14} {:<14} {}",
            field.key.cyan(),
            field.label,
            kind.dimmed()
        );
    }

    Ok(())
}
