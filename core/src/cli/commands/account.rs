use super::{describe_user, password_or_prompt, print_json, runtime, Context};
use crate::accounts::{self, ProfileEdit};
use crate::admin::encode_image_file;
use crate::session;
use colored::Colorize;
use std::path::PathBuf;

pub fn login(ctx: &Context, username: &str, password: Option<String>) -> Result<(), String> {
    let password = password_or_prompt(password)?;
    let client = ctx.client()?;
    let user =
        runtime()?.block_on(accounts::login(&client, &ctx.data_dir, username, &password))?;

    if ctx.is_json() {
        print_json(&user);
    } else {
        println!("{} Signed in as {}", "✓".green(), describe_user(&user));
    }
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<(), String> {
    let previous = session::load_session(&ctx.data_dir).map_err(|e| e.to_string())?;
    accounts::logout(&ctx.data_dir)?;

    if ctx.is_json() {
        print_json(&serde_json::json!({
            "signed_out": previous.as_ref().map(|u| &u.username),
        }));
    } else if let Some(user) = previous {
        println!("{} Signed out {}", "✓".green(), user.username);
    } else {
        println!("Not signed in");
    }
    Ok(())
}

pub fn register(ctx: &Context, username: &str, password: Option<String>) -> Result<(), String> {
    let password = password_or_prompt(password)?;
    let client = ctx.client()?;
    let user = runtime()?.block_on(accounts::register(&client, username, &password))?;

    if ctx.is_json() {
        print_json(&user);
    } else {
        println!("{} Registered {}", "✓".green(), describe_user(&user));
        println!("  Sign in with 'phone-compare login {}'", user.username);
    }
    Ok(())
}

pub fn whoami(ctx: &Context) -> Result<(), String> {
    let user = session::load_session(&ctx.data_dir).map_err(|e| e.to_string())?;

    if ctx.is_json() {
        print_json(&user);
        return Ok(());
    }
    match user {
        Some(user) => {
            println!("{}", describe_user(&user));
            if user.img_profile_base64.is_some() {
                println!("  {}", "Has a profile image".dimmed());
            }
        }
        None => println!("Not signed in"),
    }
    Ok(())
}

pub fn profile(
    ctx: &Context,
    username: Option<String>,
    password: Option<String>,
    avatar: Option<PathBuf>,
    remove_avatar: bool,
) -> Result<(), String> {
    let current = accounts::require_session(&ctx.data_dir)?;
    if username.is_none() && password.is_none() && avatar.is_none() && !remove_avatar {
        return Err(
            "Nothing to change. Pass --username, --password, --avatar or --remove-avatar."
                .to_owned(),
        );
    }

    let image = match (avatar, remove_avatar) {
        (Some(path), _) => Some(encode_image_file(&path)?),
        (None, true) => None,
        (None, false) => current.img_profile_base64.clone(),
    };
    let edit = ProfileEdit {
        username: username.unwrap_or_else(|| current.username.clone()),
        password: password.unwrap_or_default(),
        image,
    };

    let client = ctx.client()?;
    let updated = runtime()?.block_on(accounts::update_profile(
        &client,
        &ctx.data_dir,
        &current,
        &edit,
    ))?;

    if ctx.is_json() {
        print_json(&updated);
    } else {
        println!("{} Profile updated: {}", "✓".green(), describe_user(&updated));
    }
    Ok(())
}
