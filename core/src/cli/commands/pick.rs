use super::{print_json, runtime, Context};
use crate::catalog::RecordId;
use crate::compare::Toggle;
use crate::session;
use crate::sources::CatalogSource;
use colored::Colorize;

pub fn run(ctx: &Context, ids: Vec<RecordId>) -> Result<(), String> {
    let mut selection = session::load_selection(&ctx.data_dir, ctx.initial_scope())
        .map_err(|e| e.to_string())?;
    let client = ctx.client()?;
    let rt = runtime()?;

    let mut changes = Vec::with_capacity(ids.len());
    for id in ids {
        // Deselecting never needs the backend
        if !selection.picks.contains(&id) {
            let product = rt
                .block_on(client.get_product(&id))
                .map_err(|e| e.to_string())?
                .ok_or_else(|| format!("Product {id} not found"))?;
            selection.check_in_scope(&product).map_err(|e| {
                format!("{e}. Use 'compare --segment all' to switch.")
            })?;
        }
        let outcome = selection.picks.toggle(id.clone());
        log::debug!("[selection] {id}: {outcome:?}");
        changes.push((id, outcome));
    }

    session::save_selection(&ctx.data_dir, &selection).map_err(|e| e.to_string())?;

    if ctx.is_json() {
        let picks: Vec<&RecordId> = selection.picks.iter().collect();
        print_json(&serde_json::json!({
            "segment": selection.scope,
            "selected": picks,
        }));
        return Ok(());
    }

    for (id, outcome) in &changes {
        match outcome {
            Toggle::Added => println!("{} Selected {}", "+".green(), id),
            Toggle::AddedEvicting => println!(
                "{} Selected {} {}",
                "+".green(),
                id,
                "(dropped the oldest pick)".dimmed()
            ),
            Toggle::Removed => println!("{} Deselected {}", "-".yellow(), id),
        }
    }
    let picks: Vec<String> = selection.picks.iter().map(ToString::to_string).collect();
    println!(
        "Selected: {}/2 {}",
        selection.picks.len(),
        if picks.is_empty() {
            String::new()
        } else {
            format!("[{}]", picks.join(", "))
        }
    );

    Ok(())
}
