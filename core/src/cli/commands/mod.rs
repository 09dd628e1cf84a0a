pub mod account;
pub mod admin;
pub mod compare;
pub mod config;
pub mod fields;
pub mod pick;
pub mod products;
pub mod show;

use crate::catalog::SegmentScope;
use crate::cli::OutputFormat;
use crate::config::Settings;
use crate::session::{self, SessionUser};
use crate::sources::RestClient;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Resolved per-invocation state shared by every command.
pub struct Context {
    pub data_dir: PathBuf,
    pub settings: Settings,
    pub api_url: String,
    /// The `--api-url` flag as given.
    pub api_url_flag: Option<String>,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(
        home: Option<PathBuf>,
        api_url_flag: Option<&str>,
        format: OutputFormat,
    ) -> Result<Self, String> {
        let data_dir = match home {
            Some(dir) => dir,
            None => session::get_data_dir().map_err(|e| e.to_string())?,
        };
        let settings = Settings::load(&data_dir).map_err(|e| e.to_string())?;
        let api_url = settings.resolve_api_url(api_url_flag);
        log::debug!(
            "[cli] data dir {}, backend {}",
            data_dir.display(),
            api_url
        );
        Ok(Self {
            data_dir,
            settings,
            api_url,
            api_url_flag: api_url_flag.map(str::to_owned),
            format,
        })
    }

    pub fn client(&self) -> Result<RestClient, String> {
        RestClient::new(&self.api_url).map_err(|e| e.to_string())
    }

    /// Scope for a comparison that has never been saved.
    pub fn initial_scope(&self) -> SegmentScope {
        self.settings.default_segment.unwrap_or_default()
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

/// Runtime for driving the async backend calls.
fn runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Runtime::new().map_err(|e| e.to_string())
}

/// Serialize a value as pretty-printed JSON and print it to stdout.
fn print_json(value: &impl serde::Serialize) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).expect("failed to serialize JSON output")
    );
}

/// Display form of a spec value; absent or blank values show as "-".
fn display_value(value: Option<&str>) -> &str {
    value.map(str::trim).filter(|v| !v.is_empty()).unwrap_or("-")
}

/// Use the given password or read one line from stdin.
fn password_or_prompt(password: Option<String>) -> Result<String, String> {
    if let Some(password) = password {
        return Ok(password);
    }
    eprint!("Password: ");
    io::stderr().flush().map_err(|e| e.to_string())?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| e.to_string())?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

/// One-line summary of the signed-in user.
fn describe_user(user: &SessionUser) -> String {
    format!("{} ({}, id {})", user.username, user.role_type, user.id)
}
