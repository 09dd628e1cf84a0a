use super::{display_value, print_json, runtime, Context};
use crate::catalog::{ProductRecord, SegmentScope, SPEC_FIELDS};
use crate::compare::{evaluate, ComparisonRow, ComparisonView, SelectionPair, Winner};
use crate::session::{self, StoredSelection};
use crate::sources::{CatalogSource, RestClient};
use colored::Colorize;

const METER_CELLS: usize = 20;
const MIN_COLUMN: usize = 18;
const LABEL_COLUMN: usize = 14;

pub fn run(
    ctx: &Context,
    diff_only: bool,
    clear: bool,
    segment: Option<SegmentScope>,
) -> Result<(), String> {
    let mut selection = session::load_selection(&ctx.data_dir, ctx.initial_scope())
        .map_err(|e| e.to_string())?;
    let mut dirty = false;

    if clear && !selection.picks.is_empty() {
        selection.picks.clear();
        dirty = true;
    }
    if let Some(scope) = segment {
        dirty |= selection.set_scope(scope);
    }

    let products = if selection.picks.is_empty() {
        Vec::new()
    } else {
        let client = ctx.client()?;
        let (products, pruned) = fetch_picks(&client, &selection)?;
        dirty |= pruned;
        products
    };
    let pair = SelectionPair::from_selections(products);
    if dirty {
        selection.picks = pair.ids();
        session::save_selection(&ctx.data_dir, &selection).map_err(|e| e.to_string())?;
    }

    let view = evaluate(&pair, SPEC_FIELDS, diff_only);

    if ctx.is_json() {
        print_json(&serde_json::json!({
            "segment": selection.scope,
            "view": view,
        }));
        return Ok(());
    }

    print_view(&view, selection.scope);
    Ok(())
}

/// Fetch the selected products, dropping picks the backend no longer has.
///
/// Images are stripped since nothing here renders them.
fn fetch_picks(
    client: &RestClient,
    selection: &StoredSelection,
) -> Result<(Vec<ProductRecord>, bool), String> {
    let rt = runtime()?;
    let mut products = Vec::with_capacity(selection.picks.len());
    let mut pruned = false;
    for id in selection.picks.iter() {
        match rt.block_on(client.get_product(id)).map_err(|e| e.to_string())? {
            Some(mut product) => {
                product.image_base64 = None;
                products.push(product);
            }
            None => {
                log::warn!("[selection] Product {id} no longer exists, dropping it");
                pruned = true;
            }
        }
    }
    Ok((products, pruned))
}

/// A horizontal bar `percent` wide.
fn meter_bar(percent: u8) -> String {
    let filled = (usize::from(percent) * METER_CELLS + 50) / 100;
    let filled = filled.min(METER_CELLS);
    format!("{}{}", "█".repeat(filled), "░".repeat(METER_CELLS - filled))
}

/// Value cell text, with the unit appended when the value is a bare number.
fn value_cell(row: &ComparisonRow<'_>, value: Option<&str>) -> String {
    let shown = display_value(value);
    match row.unit {
        Some(unit) if shown.parse::<f64>().is_ok() => format!("{shown} {unit}"),
        _ => shown.to_owned(),
    }
}

fn print_view(view: &ComparisonView<'_>, scope: SegmentScope) {
    println!("{} {}", "Compare".bold(), format!("({scope})").dimmed());
    println!();

    if view.first.is_none() {
        println!("No products selected. Use 'phone-compare pick <id>' to add one.");
        return;
    }

    let name_a = view.first.map_or("-", |p| p.product_name.as_str());
    let name_b = view
        .second
        .map_or("(pick a second product)", |p| p.product_name.as_str());

    let width = view
        .rows
        .iter()
        .flat_map(|row| [value_cell(row, row.value_a), value_cell(row, row.value_b)])
        .map(|cell| cell.chars().count() + 2)
        .chain([name_a.chars().count(), METER_CELLS])
        .max()
        .unwrap_or(MIN_COLUMN)
        .max(MIN_COLUMN);

    println!(
        "  {:<label$} {:<width$} {}",
        "",
        name_a.bold(),
        if view.second.is_some() {
            name_b.bold()
        } else {
            name_b.dimmed()
        },
        label = LABEL_COLUMN,
    );

    if view.complete {
        let badge = match view.difference_count {
            0 => "Identical specs".green(),
            1 => "1 difference".yellow(),
            n => format!("{n} differences").yellow(),
        };
        println!("  {:<label$} {}", "", badge, label = LABEL_COLUMN);
    }
    println!();

    if view.rows.is_empty() {
        println!("  No differing fields");
        return;
    }

    for row in &view.rows {
        print_row(row, width, view.complete);
    }
}

fn print_row(row: &ComparisonRow<'_>, width: usize, complete: bool) {
    let marker = |side: Winner| {
        if row.winner == side {
            " ▲".green().to_string()
        } else {
            "  ".to_owned()
        }
    };
    let label = format!("{:<LABEL_COLUMN$}", row.label);
    let label = if complete && row.is_different {
        label.yellow()
    } else {
        label.dimmed()
    };
    let cell_a = format!("{:<w$}", value_cell(row, row.value_a), w = width - 2);
    let cell_b = value_cell(row, row.value_b);

    println!(
        "  {} {}{} {}{}",
        label,
        cell_a,
        marker(Winner::First),
        cell_b,
        marker(Winner::Second)
    );

    if let Some((a, b)) = row.meters() {
        println!(
            "  {:<LABEL_COLUMN$} {:<width$} {}",
            "",
            meter_bar(a).cyan(),
            meter_bar(b).cyan(),
        );
    }
}
