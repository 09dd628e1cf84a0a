use super::products::ProductSummary;
use super::{print_json, runtime, Context};
use crate::accounts::require_admin;
use crate::admin::{
    self, check_spec_key, encode_image_file, parse_spec_assignment, ProductEdit, UserEdit,
};
use crate::catalog::{ProductDraft, RecordId, Role, SpecMap, UserRecord, SPEC_FIELDS};
use crate::cli::AdminCommands;
use crate::compare::SelectionPair;
use crate::filters::{
    filter_users, search_catalog, sort_by_segment, sort_users, RoleOrder, SegmentOrder,
};
use crate::sources::{CatalogSource, RestClient, UserDirectory, UserQuery};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

pub fn run(ctx: &Context, command: AdminCommands) -> Result<(), String> {
    let me = require_admin(&ctx.data_dir)?;
    log::debug!("[admin] {} running an admin command", me.username);
    let client = ctx.client()?;

    match command {
        AdminCommands::Products { query, sort } => {
            list_products(ctx, &client, query.as_deref(), sort)
        }
        AdminCommands::AddProduct {
            name,
            segment,
            specs,
            image,
        } => {
            let mut draft = ProductDraft::new(name, segment);
            draft.spec_list = specs
                .iter()
                .map(|raw| parse_spec_assignment(raw))
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .filter(|(_, value)| !value.is_empty())
                .collect::<SpecMap>();
            draft.image_base64 = read_image(image.as_deref())?;
            let created = runtime()?.block_on(admin::create_product(&client, &draft))?;
            report(ctx, &ProductSummary::new(&created, &SelectionPair::new()), || {
                format!("Added product {} ({})", created.id, created.product_name)
            });
            Ok(())
        }
        AdminCommands::EditProduct {
            id,
            name,
            segment,
            specs,
            unset,
            image,
            remove_image,
        } => {
            let edit = ProductEdit {
                product_name: name,
                segment,
                set_specs: specs
                    .iter()
                    .map(|raw| parse_spec_assignment(raw))
                    .collect::<Result<_, _>>()?,
                unset_specs: unset
                    .iter()
                    .map(|key| check_spec_key(key))
                    .collect::<Result<_, _>>()?,
                image_base64: image_change(image.as_deref(), remove_image)?,
            };
            if edit.is_empty() {
                return Err("Nothing to change".to_owned());
            }
            let updated = runtime()?.block_on(admin::edit_product(&client, &id, &edit))?;
            report(ctx, &ProductSummary::new(&updated, &SelectionPair::new()), || {
                format!("Updated product {} ({})", updated.id, updated.product_name)
            });
            Ok(())
        }
        AdminCommands::DeleteProduct { id, yes } => {
            runtime()?.block_on(admin::delete_product(&client, &id, yes))?;
            report(ctx, &serde_json::json!({"deleted": "product", "id": id}), || {
                format!("Deleted product {id}")
            });
            Ok(())
        }
        AdminCommands::Users { query, sort } => list_users(ctx, &client, query.as_deref(), sort),
        AdminCommands::AddUser {
            username,
            password,
            role,
            avatar,
        } => {
            let image = read_image(avatar.as_deref())?;
            let created =
                runtime()?.block_on(admin::add_user(&client, &username, &password, role, image))?;
            report(ctx, &UserSummary::from(&created), || {
                format!("Added {} {} (id {})", created.role_type, created.username, created.id)
            });
            Ok(())
        }
        AdminCommands::EditUser {
            id,
            username,
            password,
            role,
            avatar,
            remove_avatar,
        } => {
            let edit = UserEdit {
                username,
                password,
                role,
                image: image_change(avatar.as_deref(), remove_avatar)?,
            };
            let updated = runtime()?.block_on(admin::edit_user(&client, &id, &edit))?;
            if updated.id == me.id {
                log::warn!("[admin] Edited the signed-in account; sign in again to refresh it");
            }
            report(ctx, &UserSummary::from(&updated), || {
                format!("Updated user {} ({})", updated.id, updated.username)
            });
            Ok(())
        }
        AdminCommands::DeleteUser { id, yes } => {
            runtime()?.block_on(admin::delete_user(&client, &me.id, &id, yes))?;
            report(ctx, &serde_json::json!({"deleted": "user", "id": id}), || {
                format!("Deleted user {id}")
            });
            Ok(())
        }
    }
}

/// Print `value` as JSON, or a one-line confirmation in text mode.
fn report(ctx: &Context, value: &impl Serialize, message: impl FnOnce() -> String) {
    if ctx.is_json() {
        print_json(value);
    } else {
        println!("{} {}", "✓".green(), message());
    }
}

fn read_image(path: Option<&Path>) -> Result<Option<String>, String> {
    path.map(encode_image_file).transpose().map_err(String::from)
}

fn image_change(path: Option<&Path>, remove: bool) -> Result<Option<Option<String>>, String> {
    if remove {
        return Ok(Some(None));
    }
    Ok(read_image(path)?.map(Some))
}

/// User listing entry without the password or avatar payload.
#[derive(Serialize)]
struct UserSummary<'a> {
    id: &'a RecordId,
    username: &'a str,
    role_type: Role,
    has_avatar: bool,
}

impl<'a> From<&'a UserRecord> for UserSummary<'a> {
    fn from(user: &'a UserRecord) -> Self {
        Self {
            id: &user.id,
            username: &user.username,
            role_type: user.role_type,
            has_avatar: user.img_profile_base64.is_some(),
        }
    }
}

fn list_products(
    ctx: &Context,
    client: &RestClient,
    query: Option<&str>,
    sort: SegmentOrder,
) -> Result<(), String> {
    let products = runtime()?
        .block_on(client.list_products(None))
        .map_err(|e| e.to_string())?;
    let mut matches = search_catalog(&products, query.unwrap_or_default());
    sort_by_segment(&mut matches, sort);

    if ctx.is_json() {
        let none = SelectionPair::new();
        let summaries: Vec<ProductSummary> =
            matches.iter().map(|p| ProductSummary::new(p, &none)).collect();
        print_json(&summaries);
        return Ok(());
    }

    if matches.is_empty() {
        println!("No products found");
        return Ok(());
    }
    for product in &matches {
        let filled = SPEC_FIELDS
            .iter()
            .filter(|f| product.spec(f.key).is_some())
            .count();
        println!(
            "  {:>4}  {:<32} {:<10} {}",
            product.id.to_string().dimmed(),
            product.product_name,
            product.segment.label().cyan(),
            format!("{filled}/{} specs", SPEC_FIELDS.len()).dimmed()
        );
    }
    println!();
    println!("Total: {} product(s)", matches.len());
    Ok(())
}

fn list_users(
    ctx: &Context,
    client: &RestClient,
    query: Option<&str>,
    sort: RoleOrder,
) -> Result<(), String> {
    let users = runtime()?
        .block_on(client.find_users(&UserQuery::default()))
        .map_err(|e| e.to_string())?;
    let mut matches = filter_users(&users, query.unwrap_or_default());
    sort_users(&mut matches, sort);

    if ctx.is_json() {
        let summaries: Vec<UserSummary> = matches.iter().map(|u| UserSummary::from(*u)).collect();
        print_json(&summaries);
        return Ok(());
    }

    if matches.is_empty() {
        println!("No users found");
        return Ok(());
    }
    for user in &matches {
        let role = match user.role_type {
            Role::Admin => user.role_type.as_str().magenta(),
            Role::User => user.role_type.as_str().normal(),
        };
        println!(
            "  {:>4}  {:<24} {}",
            user.id.to_string().dimmed(),
            user.username,
            role
        );
    }
    println!();
    println!("Total: {} user(s)", matches.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_image_change() {
        assert_eq!(image_change(None, false).unwrap(), None);
        assert_eq!(image_change(None, true).unwrap(), Some(None));

        let temp_dir = TempDir::new().unwrap();
        let path: PathBuf = temp_dir.path().join("a.png");
        std::fs::write(&path, b"png").unwrap();
        assert_eq!(
            image_change(Some(path.as_path()), false).unwrap(),
            Some(Some("cG5n".to_owned()))
        );
        assert!(read_image(Some(temp_dir.path().join("missing.png").as_path())).is_err());
    }
}
