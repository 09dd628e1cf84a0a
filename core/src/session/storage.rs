//! On-disk state for the signed-in user and the current comparison picks.
//!
//! Layout:
//! ```text
//! ~/.phone-compare/            (or $PHONE_COMPARE_HOME)
//!   config.json                # Settings
//!   session_user.json          # SessionUser
//!   selection.json             # StoredSelection
//! ```

use crate::catalog::{ProductRecord, RecordId, Role, SegmentScope, UserRecord};
use crate::compare::SelectionPair;
use crate::error::AppError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const HOME_ENV: &str = "PHONE_COMPARE_HOME";

const SESSION_FILE: &str = "session_user.json";
const SELECTION_FILE: &str = "selection.json";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Could not determine home directory")]
    Home,
}

/// Return the data directory.
///
/// Uses `$PHONE_COMPARE_HOME` if set, otherwise `~/.phone-compare/`.
pub fn get_data_dir() -> Result<PathBuf, StorageError> {
    if let Ok(home) = std::env::var(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    let home = dirs::home_dir().ok_or(StorageError::Home)?;
    Ok(home.join(".phone-compare"))
}

/// The signed-in user. The password never reaches disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: RecordId,
    pub username: String,
    #[serde(default)]
    pub role_type: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_profile_base64: Option<String>,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role_type == Role::Admin
    }
}

impl From<UserRecord> for SessionUser {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role_type: user.role_type,
            img_profile_base64: user.img_profile_base64,
        }
    }
}

/// Products picked for comparison, plus the catalog scope they were picked in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredSelection {
    #[serde(default)]
    pub scope: SegmentScope,
    #[serde(default)]
    pub picks: SelectionPair<RecordId>,
}

impl StoredSelection {
    pub fn with_scope(scope: SegmentScope) -> Self {
        Self {
            scope,
            picks: SelectionPair::new(),
        }
    }

    /// Switch the browsing scope. Picks never outlive a scope change.
    ///
    /// Returns whether anything changed.
    pub fn set_scope(&mut self, scope: SegmentScope) -> bool {
        if scope == self.scope {
            return false;
        }
        log::info!("[selection] Segment {} -> {}, clearing picks", self.scope, scope);
        self.scope = scope;
        self.picks.clear();
        true
    }

    /// Check that `product` belongs to the current scope before picking it.
    pub fn check_in_scope(&self, product: &ProductRecord) -> Result<(), AppError> {
        match self.scope.segment() {
            Some(segment) if product.segment != segment => Err(AppError::validation(format!(
                "product {} is {}, but the comparison is browsing {segment}",
                product.id, product.segment
            ))),
            _ => Ok(()),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

/// Write JSON atomically: write tmp + rename.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    let content = serde_json::to_string_pretty(value)?;
    fs::write(&tmp_path, content)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn remove_if_exists(path: &Path) -> Result<(), StorageError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Load the signed-in user, if any.
pub fn load_session(data_dir: &Path) -> Result<Option<SessionUser>, StorageError> {
    read_json(&data_dir.join(SESSION_FILE))
}

pub fn save_session(data_dir: &Path, user: &SessionUser) -> Result<(), StorageError> {
    log::debug!("[session] Saving session for {}", user.username);
    write_json(&data_dir.join(SESSION_FILE), user)
}

/// Forget the signed-in user. Succeeds when nobody is signed in.
pub fn clear_session(data_dir: &Path) -> Result<(), StorageError> {
    log::debug!("[session] Clearing session");
    remove_if_exists(&data_dir.join(SESSION_FILE))
}

/// Load the comparison picks. With nothing saved, start empty in
/// `initial_scope`.
pub fn load_selection(
    data_dir: &Path,
    initial_scope: SegmentScope,
) -> Result<StoredSelection, StorageError> {
    Ok(read_json(&data_dir.join(SELECTION_FILE))?
        .unwrap_or_else(|| StoredSelection::with_scope(initial_scope)))
}

pub fn save_selection(data_dir: &Path, selection: &StoredSelection) -> Result<(), StorageError> {
    write_json(&data_dir.join(SELECTION_FILE), selection)
}

pub fn clear_selection(data_dir: &Path) -> Result<(), StorageError> {
    remove_if_exists(&data_dir.join(SELECTION_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Segment, SpecMap};
    use tempfile::TempDir;

    fn create_test_user() -> SessionUser {
        SessionUser {
            id: RecordId::Number(3),
            username: "malee".to_owned(),
            role_type: Role::Admin,
            img_profile_base64: Some("aGVsbG8=".to_owned()),
        }
    }

    #[test]
    fn test_load_session_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_session(temp_dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_session_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let user = create_test_user();

        save_session(temp_dir.path(), &user).unwrap();
        let loaded = load_session(temp_dir.path()).unwrap().unwrap();

        assert_eq!(loaded, user);
        assert!(loaded.is_admin());
        assert!(!temp_dir.path().join("session_user.json.tmp").exists());
    }

    #[test]
    fn test_session_creates_missing_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("home");

        save_session(&nested, &create_test_user()).unwrap();
        assert!(nested.join("session_user.json").exists());
    }

    #[test]
    fn test_session_never_stores_password() {
        let temp_dir = TempDir::new().unwrap();
        let record = UserRecord {
            id: RecordId::Number(1),
            username: "somchai".to_owned(),
            password: Some("hunter2".to_owned()),
            role_type: Role::User,
            img_profile_base64: None,
        };

        save_session(temp_dir.path(), &SessionUser::from(record)).unwrap();
        let raw = fs::read_to_string(temp_dir.path().join("session_user.json")).unwrap();
        assert!(!raw.contains("hunter2"));
        assert!(!raw.contains("password"));
    }

    #[test]
    fn test_clear_session() {
        let temp_dir = TempDir::new().unwrap();
        save_session(temp_dir.path(), &create_test_user()).unwrap();

        clear_session(temp_dir.path()).unwrap();
        assert!(load_session(temp_dir.path()).unwrap().is_none());

        // Clearing twice is fine
        assert!(clear_session(temp_dir.path()).is_ok());
    }

    #[test]
    fn test_selection_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(
            load_selection(temp_dir.path(), SegmentScope::All).unwrap(),
            StoredSelection::default()
        );

        let selection = StoredSelection {
            scope: SegmentScope::Only(Segment::Budget),
            picks: SelectionPair::from_selections([RecordId::Number(4), RecordId::Number(9)]),
        };
        save_selection(temp_dir.path(), &selection).unwrap();
        assert_eq!(
            load_selection(temp_dir.path(), SegmentScope::All).unwrap(),
            selection
        );

        clear_selection(temp_dir.path()).unwrap();
        assert!(load_selection(temp_dir.path(), SegmentScope::All)
            .unwrap()
            .picks
            .is_empty());
    }

    #[test]
    fn test_missing_selection_starts_in_initial_scope() {
        let temp_dir = TempDir::new().unwrap();
        let midrange = SegmentScope::Only(Segment::Midrange);

        let loaded = load_selection(temp_dir.path(), midrange).unwrap();
        assert_eq!(loaded.scope, midrange);
        assert!(loaded.picks.is_empty());

        // A saved scope wins over the initial one
        save_selection(temp_dir.path(), &StoredSelection::default()).unwrap();
        let loaded = load_selection(temp_dir.path(), midrange).unwrap();
        assert_eq!(loaded.scope, SegmentScope::All);
    }

    #[test]
    fn test_scope_change_clears_picks() {
        let mut selection = StoredSelection {
            scope: SegmentScope::Only(Segment::Budget),
            picks: SelectionPair::from_selections([RecordId::Number(4), RecordId::Number(9)]),
        };

        assert!(selection.set_scope(SegmentScope::Only(Segment::Flagship)));
        assert_eq!(selection.scope, SegmentScope::Only(Segment::Flagship));
        assert!(selection.picks.is_empty());
    }

    #[test]
    fn test_same_scope_keeps_picks() {
        let mut selection = StoredSelection {
            scope: SegmentScope::Only(Segment::Budget),
            picks: SelectionPair::from_selections([RecordId::Number(4)]),
        };

        assert!(!selection.set_scope(SegmentScope::Only(Segment::Budget)));
        assert_eq!(selection.picks.len(), 1);
    }

    #[test]
    fn test_check_in_scope() {
        let phone = |segment| ProductRecord {
            id: RecordId::Number(7),
            product_name: "Redmi 13".to_owned(),
            segment,
            image_base64: None,
            spec_list: SpecMap::new(),
        };
        let budget = StoredSelection::with_scope(SegmentScope::Only(Segment::Budget));

        assert!(budget.check_in_scope(&phone(Segment::Budget)).is_ok());
        assert!(matches!(
            budget.check_in_scope(&phone(Segment::Flagship)),
            Err(AppError::Validation { .. })
        ));
        assert!(StoredSelection::default()
            .check_in_scope(&phone(Segment::Flagship))
            .is_ok());
    }

    #[test]
    fn test_corrupt_session_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("session_user.json"), "{not json").unwrap();
        assert!(matches!(
            load_session(temp_dir.path()),
            Err(StorageError::Json(_))
        ));
    }
}
