use super::{print_json, Context};
use crate::catalog::SegmentScope;
use crate::config::Settings;
use crate::sources::http::normalize_base_url;
use colored::Colorize;

pub fn run(
    ctx: &Context,
    set_api_url: Option<String>,
    set_segment: Option<SegmentScope>,
    reset: bool,
) -> Result<(), String> {
    let mut settings = ctx.settings.clone();
    let changed = reset || set_api_url.is_some() || set_segment.is_some();

    if reset {
        settings = Settings::default();
    }
    if let Some(url) = set_api_url {
        settings.api_url = Some(normalize_base_url(&url).map_err(|e| e.to_string())?);
    }
    if let Some(scope) = set_segment {
        settings.default_segment = Some(scope);
    }
    if changed {
        settings.save(&ctx.data_dir).map_err(|e| e.to_string())?;
        log::info!("[config] Saved settings to {}", ctx.data_dir.display());
    }

    let effective_url = settings.resolve_api_url(ctx.api_url_flag.as_deref());

    if ctx.is_json() {
        print_json(&serde_json::json!({
            "data_dir": ctx.data_dir,
            "settings": settings,
            "effective_api_url": effective_url,
        }));
        return Ok(());
    }

    if changed {
        println!("{} Settings saved", "✓".green());
    }
    println!("  {} {}", "Data dir:".dimmed(), ctx.data_dir.display());
    println!(
        "  {} {}",
        "Saved API URL:".dimmed(),
        settings.api_url.as_deref().unwrap_or("-")
    );
    println!(
        "  {} {}",
        "Default segment:".dimmed(),
        settings.default_segment.unwrap_or_default()
    );
    println!("  {} {}", "Backend in use:".dimmed(), effective_url);

    Ok(())
}
