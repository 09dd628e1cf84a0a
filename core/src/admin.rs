//! Catalog and account management for administrators.
//!
//! Callers gate these with [`crate::accounts::require_admin`]; the functions
//! here only validate input and talk to the backend.

use crate::accounts::ensure_username_available;
use crate::catalog::schema::field;
use crate::catalog::{
    NewUser, ProductDraft, ProductRecord, RecordId, Role, Segment, UserPatch, UserRecord,
    SPEC_FIELDS,
};
use crate::error::AppError;
use crate::sources::{CatalogSource, UserDirectory, UserQuery};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fs;
use std::path::Path;

/// Read an image file and encode it as base64.
pub fn encode_image_file(path: &Path) -> Result<String, AppError> {
    let bytes = fs::read(path)
        .map_err(|e| AppError::io(format!("cannot read image {}: {e}", path.display())))?;
    if bytes.is_empty() {
        return Err(AppError::validation(format!(
            "image {} is empty",
            path.display()
        )));
    }
    Ok(STANDARD.encode(bytes))
}

/// Decode a base64 image and write it to `path`. Returns the byte count.
pub fn decode_image_to_file(encoded: &str, path: &Path) -> Result<usize, AppError> {
    // Some clients send data URLs
    let payload = encoded
        .split_once(";base64,")
        .map_or(encoded, |(_, data)| data)
        .trim();
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| AppError::parse(format!("image is not valid base64: {e}")))?;
    fs::write(path, &bytes)?;
    Ok(bytes.len())
}

/// Changes to apply on top of an existing product.
#[derive(Debug, Clone, Default)]
pub struct ProductEdit {
    pub product_name: Option<String>,
    pub segment: Option<Segment>,
    /// Spec values to set, by field key.
    pub set_specs: Vec<(String, String)>,
    /// Spec keys to remove.
    pub unset_specs: Vec<String>,
    /// `Some(None)` removes the image.
    pub image_base64: Option<Option<String>>,
}

impl ProductEdit {
    pub fn is_empty(&self) -> bool {
        self.product_name.is_none()
            && self.segment.is_none()
            && self.set_specs.is_empty()
            && self.unset_specs.is_empty()
            && self.image_base64.is_none()
    }

    pub fn apply(&self, draft: &mut ProductDraft) {
        if let Some(name) = &self.product_name {
            draft.product_name = name.trim().to_owned();
        }
        if let Some(segment) = self.segment {
            draft.segment = segment;
        }
        for key in &self.unset_specs {
            draft.spec_list.remove(key);
        }
        for (key, value) in &self.set_specs {
            let value = value.trim();
            if value.is_empty() {
                draft.spec_list.remove(key);
            } else {
                draft.spec_list.insert(key.clone(), value);
            }
        }
        if let Some(image) = &self.image_base64 {
            draft.image_base64.clone_from(image);
        }
    }
}

/// Parse a `key=value` spec assignment. The key must be a known spec field.
pub fn parse_spec_assignment(raw: &str) -> Result<(String, String), AppError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| AppError::validation(format!("expected key=value, got '{raw}'")))?;
    let key = check_spec_key(key)?;
    Ok((key, value.trim().to_owned()))
}

/// Normalize a spec key and reject ones outside the schema.
pub fn check_spec_key(key: &str) -> Result<String, AppError> {
    let key = key.trim().to_lowercase();
    if field(&key).is_none() {
        let known: Vec<&str> = SPEC_FIELDS.iter().map(|f| f.key).collect();
        return Err(AppError::validation(format!(
            "unknown spec field '{key}' (known: {})",
            known.join(", ")
        )));
    }
    Ok(key)
}

fn require_confirmation(confirmed: bool, what: &str) -> Result<(), AppError> {
    if !confirmed {
        return Err(AppError::validation(format!(
            "deleting {what} needs confirmation (pass --yes)"
        )));
    }
    Ok(())
}

pub async fn create_product<S>(source: &S, draft: &ProductDraft) -> Result<ProductRecord, AppError>
where
    S: CatalogSource,
    AppError: From<S::Error>,
{
    draft.validate()?;
    let mut draft = draft.clone();
    draft.product_name = draft.product_name.trim().to_owned();
    let record = source.create_product(&draft).await?;
    log::info!("[admin] Created product {} ({})", record.id, record.product_name);
    Ok(record)
}

/// Fetch a product, apply the edit, and send the whole draft back.
pub async fn edit_product<S>(
    source: &S,
    id: &RecordId,
    edit: &ProductEdit,
) -> Result<ProductRecord, AppError>
where
    S: CatalogSource,
    AppError: From<S::Error>,
{
    let existing = source
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("product {id}")))?;
    let mut draft = existing.to_draft();
    edit.apply(&mut draft);
    draft.validate()?;

    let updated = source
        .update_product(id, &draft)
        .await?
        .ok_or_else(|| AppError::not_found(format!("product {id}")))?;
    log::info!("[admin] Updated product {id}");
    Ok(updated)
}

pub async fn delete_product<S>(source: &S, id: &RecordId, confirmed: bool) -> Result<(), AppError>
where
    S: CatalogSource,
    AppError: From<S::Error>,
{
    require_confirmation(confirmed, &format!("product {id}"))?;
    if !source.delete_product(id).await? {
        return Err(AppError::not_found(format!("product {id}")));
    }
    log::info!("[admin] Deleted product {id}");
    Ok(())
}

/// Create an account with the given role.
pub async fn add_user<D>(
    directory: &D,
    username: &str,
    password: &str,
    role: Role,
    image: Option<String>,
) -> Result<UserRecord, AppError>
where
    D: UserDirectory,
    AppError: From<D::Error>,
{
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::validation("username is required"));
    }
    if password.is_empty() {
        return Err(AppError::validation("password is required"));
    }
    ensure_username_available(directory, username, None).await?;

    let record = directory
        .create_user(&NewUser {
            username: username.to_owned(),
            password: password.to_owned(),
            role_type: role,
            img_profile_base64: image,
        })
        .await?;
    log::info!("[admin] Added {} user {}", record.role_type, record.username);
    Ok(record)
}

/// Changes to another user's account. Unset fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct UserEdit {
    pub username: Option<String>,
    /// Empty or `None` keeps the current password.
    pub password: Option<String>,
    pub role: Option<Role>,
    /// `Some(None)` removes the avatar.
    pub image: Option<Option<String>>,
}

async fn find_user<D>(directory: &D, id: &RecordId) -> Result<UserRecord, AppError>
where
    D: UserDirectory,
    AppError: From<D::Error>,
{
    directory
        .find_users(&UserQuery::default())
        .await?
        .into_iter()
        .find(|u| &u.id == id)
        .ok_or_else(|| AppError::not_found(format!("user {id}")))
}

/// Edit a user. Username, role and avatar are always sent; the password only
/// when a new one is given.
pub async fn edit_user<D>(
    directory: &D,
    id: &RecordId,
    edit: &UserEdit,
) -> Result<UserRecord, AppError>
where
    D: UserDirectory,
    AppError: From<D::Error>,
{
    let current = find_user(directory, id).await?;
    let username = edit
        .username
        .as_deref()
        .unwrap_or(&current.username)
        .trim()
        .to_owned();
    if username.is_empty() {
        return Err(AppError::validation("username is required"));
    }
    ensure_username_available(directory, &username, Some(id)).await?;

    let patch = UserPatch {
        username: Some(username),
        password: edit.password.clone().filter(|p| !p.is_empty()),
        role_type: Some(edit.role.unwrap_or(current.role_type)),
        img_profile_base64: Some(
            edit.image
                .clone()
                .unwrap_or_else(|| current.img_profile_base64.clone()),
        ),
    };
    let updated = directory.update_user(id, &patch).await?;
    log::info!("[admin] Updated user {id}");
    Ok(updated.unwrap_or_else(|| UserRecord {
        id: current.id,
        username: patch.username.unwrap_or(current.username),
        password: None,
        role_type: patch.role_type.unwrap_or(current.role_type),
        img_profile_base64: patch.img_profile_base64.flatten(),
    }))
}

/// Delete a user on behalf of `acting`. An admin cannot delete their own
/// signed-in account.
pub async fn delete_user<D>(
    directory: &D,
    acting: &RecordId,
    id: &RecordId,
    confirmed: bool,
) -> Result<(), AppError>
where
    D: UserDirectory,
    AppError: From<D::Error>,
{
    if id == acting {
        return Err(AppError::forbidden("refusing to delete the signed-in account"));
    }
    require_confirmation(confirmed, &format!("user {id}"))?;
    if !directory.delete_user(id).await? {
        return Err(AppError::not_found(format!("user {id}")));
    }
    log::info!("[admin] Deleted user {id}");
    Ok(())
}
