//! Sign-in, registration and profile flows.
//!
//! These run against any [`UserDirectory`] and persist the resulting
//! [`SessionUser`] in the data directory.

use crate::catalog::{NewUser, RecordId, Role, UserPatch};
use crate::error::AppError;
use crate::session::{self, SessionUser};
use crate::sources::{UserDirectory, UserQuery};
use std::path::Path;

fn required<'a>(value: &'a str, what: &str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{what} is required")));
    }
    Ok(value)
}

/// Sign in with a username and password and store the session.
pub async fn login<D>(
    directory: &D,
    data_dir: &Path,
    username: &str,
    password: &str,
) -> Result<SessionUser, AppError>
where
    D: UserDirectory,
    AppError: From<D::Error>,
{
    let username = required(username, "username")?;
    if password.is_empty() {
        return Err(AppError::validation("password is required"));
    }

    let matches = directory
        .find_users(&UserQuery::by_credentials(username, password))
        .await?;
    let user = matches
        .into_iter()
        .next()
        .ok_or_else(|| AppError::unauthorized("invalid username or password"))?;

    let session_user = SessionUser::from(user);
    session::save_session(data_dir, &session_user)?;
    log::info!("[accounts] Signed in as {}", session_user.username);
    Ok(session_user)
}

/// Fail with a conflict when another account already uses `username`.
///
/// Names are compared trimmed and case-insensitively; `exclude` skips the
/// caller's own record when renaming.
pub async fn ensure_username_available<D>(
    directory: &D,
    username: &str,
    exclude: Option<&RecordId>,
) -> Result<(), AppError>
where
    D: UserDirectory,
    AppError: From<D::Error>,
{
    let wanted = username.trim().to_lowercase();
    let users = directory.find_users(&UserQuery::default()).await?;
    let taken = users
        .iter()
        .filter(|u| exclude.is_none_or(|id| &u.id != id))
        .any(|u| u.username.trim().to_lowercase() == wanted);
    if taken {
        return Err(AppError::conflict(format!(
            "username '{}' is already taken",
            username.trim()
        )));
    }
    Ok(())
}

/// Create a regular account. Does not sign in.
pub async fn register<D>(
    directory: &D,
    username: &str,
    password: &str,
) -> Result<SessionUser, AppError>
where
    D: UserDirectory,
    AppError: From<D::Error>,
{
    let username = required(username, "username")?;
    if password.is_empty() {
        return Err(AppError::validation("password is required"));
    }
    ensure_username_available(directory, username, None).await?;

    let created = directory
        .create_user(&NewUser {
            username: username.to_owned(),
            password: password.to_owned(),
            role_type: Role::User,
            img_profile_base64: None,
        })
        .await?;
    log::info!("[accounts] Registered {}", created.username);
    Ok(SessionUser::from(created))
}

/// Requested changes to the signed-in user's own profile.
#[derive(Debug, Clone, Default)]
pub struct ProfileEdit {
    pub username: String,
    /// Empty keeps the current password.
    pub password: String,
    /// Avatar to store; `None` removes it.
    pub image: Option<String>,
}

/// Build the patch for a profile edit.
fn profile_patch(current: &SessionUser, edit: &ProfileEdit, username: &str) -> UserPatch {
    let renamed = username.to_lowercase() != current.username.trim().to_lowercase();
    UserPatch {
        username: renamed.then(|| username.to_owned()),
        password: (!edit.password.is_empty()).then(|| edit.password.clone()),
        role_type: None,
        img_profile_base64: Some(edit.image.clone()),
    }
}

/// Apply a profile edit for the signed-in user and refresh the session.
pub async fn update_profile<D>(
    directory: &D,
    data_dir: &Path,
    current: &SessionUser,
    edit: &ProfileEdit,
) -> Result<SessionUser, AppError>
where
    D: UserDirectory,
    AppError: From<D::Error>,
{
    let username = required(&edit.username, "username")?;
    let patch = profile_patch(current, edit, username);
    if patch.username.is_some() {
        ensure_username_available(directory, username, Some(&current.id)).await?;
    }

    let updated = directory.update_user(&current.id, &patch).await?;
    let session_user = match updated {
        Some(record) => SessionUser::from(record),
        None => SessionUser {
            username: patch.username.unwrap_or_else(|| current.username.clone()),
            img_profile_base64: edit.image.clone(),
            ..current.clone()
        },
    };
    session::save_session(data_dir, &session_user)?;
    log::info!("[accounts] Updated profile for {}", session_user.username);
    Ok(session_user)
}

/// Sign out. Succeeds when nobody is signed in.
pub fn logout(data_dir: &Path) -> Result<(), AppError> {
    session::clear_session(data_dir)?;
    Ok(())
}

/// The signed-in user, or an unauthorized error.
pub fn require_session(data_dir: &Path) -> Result<SessionUser, AppError> {
    session::load_session(data_dir)?
        .ok_or_else(|| AppError::unauthorized("not signed in; run 'phone-compare login'"))
}

/// The signed-in user when they are an admin.
pub fn require_admin(data_dir: &Path) -> Result<SessionUser, AppError> {
    let user = require_session(data_dir)?;
    if !user.is_admin() {
        return Err(AppError::forbidden(format!(
            "'{}' is not an administrator",
            user.username
        )));
    }
    Ok(user)
}
