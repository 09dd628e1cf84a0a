//! User settings and backend URL resolution.

use crate::catalog::SegmentScope;
use crate::session::storage::StorageError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const API_URL_ENV: &str = "PHONE_COMPARE_API_URL";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3001";

const CONFIG_FILE: &str = "config.json";

/// Contents of `config.json` in the data directory. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    /// Scope used by `products` when none is given, and the starting scope of
    /// a comparison that has not been saved yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_segment: Option<SegmentScope>,
}

impl Settings {
    /// Load settings, falling back to defaults when the file is missing.
    pub fn load(data_dir: &Path) -> Result<Self, StorageError> {
        let path = data_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, data_dir: &Path) -> Result<(), StorageError> {
        crate::session::storage::write_json(&data_dir.join(CONFIG_FILE), self)
    }

    /// Backend URL: explicit flag, then `$PHONE_COMPARE_API_URL`, then the
    /// config file, then the local default.
    pub fn resolve_api_url(&self, flag: Option<&str>) -> String {
        let from_env = std::env::var(API_URL_ENV).ok();
        resolve_api_url(flag, from_env.as_deref(), self.api_url.as_deref())
    }
}

fn resolve_api_url(flag: Option<&str>, env: Option<&str>, file: Option<&str>) -> String {
    [flag, env, file]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .unwrap_or(DEFAULT_API_URL)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Segment;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_default() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(Settings::load(temp_dir.path()).unwrap(), Settings::default());
    }

    #[test]
    fn test_settings_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings {
            api_url: Some("http://10.0.0.2:3001".to_owned()),
            default_segment: Some(SegmentScope::Only(Segment::Flagship)),
        };
        settings.save(temp_dir.path()).unwrap();
        assert_eq!(Settings::load(temp_dir.path()).unwrap(), settings);
    }

    #[test]
    fn test_partial_config_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("config.json"),
            r#"{"api_url": "http://phones.local"}"#,
        )
        .unwrap();
        let settings = Settings::load(temp_dir.path()).unwrap();
        assert_eq!(settings.api_url.as_deref(), Some("http://phones.local"));
        assert!(settings.default_segment.is_none());
    }

    #[test]
    fn test_api_url_precedence() {
        assert_eq!(
            resolve_api_url(Some("http://flag"), Some("http://env"), Some("http://file")),
            "http://flag"
        );
        assert_eq!(
            resolve_api_url(None, Some("http://env"), Some("http://file")),
            "http://env"
        );
        assert_eq!(resolve_api_url(None, None, Some("http://file")), "http://file");
        assert_eq!(resolve_api_url(None, Some("  "), None), DEFAULT_API_URL);
        assert_eq!(resolve_api_url(None, None, None), DEFAULT_API_URL);
    }
}
