use super::{display_value, print_json, runtime, Context};
use crate::admin::decode_image_to_file;
use crate::catalog::{RecordId, SPEC_FIELDS};
use crate::sources::CatalogSource;
use colored::Colorize;
use std::path::Path;

pub fn run(ctx: &Context, id: &RecordId, save_image: Option<&Path>) -> Result<(), String> {
    let client = ctx.client()?;
    let product = runtime()?
        .block_on(client.get_product(id))
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("Product {id} not found"))?;

    let saved = match (save_image, product.image_base64.as_deref()) {
        (Some(path), Some(image)) => Some(decode_image_to_file(image, path)?),
        (Some(_), None) => return Err(format!("Product {id} has no image")),
        (None, _) => None,
    };

    if ctx.is_json() {
        print_json(&product);
        return Ok(());
    }

    println!("{}", product.product_name.bold());
    println!("  {} {}", "Id:".dimmed(), product.id);
    println!("  {} {}", "Segment:".dimmed(), product.segment.label());
    println!();
    for field in SPEC_FIELDS {
        println!(
            "  {:<14} {}",
            format!("{}:", field.label).dimmed(),
            display_value(product.spec(field.key))
        );
    }
    if let (Some(path), Some(bytes)) = (save_image, saved) {
        println!();
        println!(
            "{} Saved image to {} ({} bytes)",
            "✓".green(),
            path.display(),
            bytes
        );
    }

    Ok(())
}
