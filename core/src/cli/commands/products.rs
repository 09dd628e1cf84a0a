use super::{print_json, runtime, Context};
use crate::catalog::{ProductRecord, RecordId, Segment, SegmentScope};
use crate::compare::SelectionPair;
use crate::filters::filter_by_name;
use crate::session;
use crate::sources::CatalogSource;
use colored::Colorize;
use serde::Serialize;

/// Listing entry without the image payload.
#[derive(Serialize)]
pub(super) struct ProductSummary<'a> {
    pub id: &'a RecordId,
    pub product_name: &'a str,
    pub segment: Segment,
    pub has_image: bool,
    pub selected: bool,
}

impl<'a> ProductSummary<'a> {
    pub(super) fn new(product: &'a ProductRecord, picks: &SelectionPair<RecordId>) -> Self {
        Self {
            id: &product.id,
            product_name: &product.product_name,
            segment: product.segment,
            has_image: product.image_base64.is_some(),
            selected: picks.contains(&product.id),
        }
    }
}

pub fn run(ctx: &Context, segment: Option<SegmentScope>, query: Option<&str>) -> Result<(), String> {
    let scope = segment
        .or(ctx.settings.default_segment)
        .unwrap_or_default();
    let client = ctx.client()?;
    let products = runtime()?
        .block_on(client.list_products(scope.segment()))
        .map_err(|e| e.to_string())?;
    let picks = session::load_selection(&ctx.data_dir, ctx.initial_scope())
        .map_err(|e| e.to_string())?
        .picks;

    let matches = filter_by_name(&products, query.unwrap_or_default());

    if ctx.is_json() {
        let summaries: Vec<ProductSummary> = matches
            .iter()
            .map(|p| ProductSummary::new(p, &picks))
            .collect();
        print_json(&serde_json::json!({
            "segment": scope,
            "products": summaries,
        }));
        return Ok(());
    }

    if matches.is_empty() {
        println!("No products found");
        return Ok(());
    }

    println!("{} {}", "Products".bold(), format!("({scope})").dimmed());
    for product in &matches {
        let marker = if picks.contains(&product.id) {
            "●".green().to_string()
        } else {
            " ".to_owned()
        };
        println!(
            "  {} {:>4}  {}  {}",
            marker,
            product.id.to_string().dimmed(),
            product.product_name,
            product.segment.label().cyan()
        );
    }
    println!();
    println!(
        "Total: {} product(s), {} selected for comparison",
        matches.len(),
        picks.len()
    );

    Ok(())
}
