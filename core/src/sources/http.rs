//! REST backend client.
//!
//! The backend is a plain JSON resource server exposing `/products` and
//! `/users` collections with `GET`, `POST`, `PATCH` and `DELETE`.

use super::traits::{CatalogSource, UserDirectory, UserQuery};
use crate::catalog::{
    NewUser, ProductDraft, ProductRecord, RecordId, Segment, UserPatch, UserRecord,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Backend returned {status} for {url}")]
    Status { status: u16, url: String },
    #[error("Unreadable response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid backend URL: {0}")]
    InvalidBaseUrl(String),
}

/// [`CatalogSource`] and [`UserDirectory`] backed by the REST API.
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
    client: Client,
}

impl RestClient {
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        let base_url = normalize_base_url(base_url)?;
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> Result<Response, HttpError> {
        let response = request.send().await?;
        let status = response.status();
        log::debug!("[catalog] {url} -> {status}");
        if status.is_success() {
            Ok(response)
        } else {
            Err(HttpError::Status {
                status: status.as_u16(),
                url: url.to_owned(),
            })
        }
    }

    /// GET a collection; a `null` body reads as empty.
    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, HttpError> {
        let url = self.url(path);
        let response = self.send(self.client.get(&url), &url).await?;
        let list: Option<Vec<T>> = response.json().await?;
        Ok(list.unwrap_or_default())
    }

    /// GET a single record; 404 reads as `None`.
    async fn get_one<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, HttpError> {
        let url = self.url(path);
        match self.send(self.client.get(&url), &url).await {
            Ok(response) => Ok(response.json().await?),
            Err(HttpError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn post<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, HttpError> {
        let url = self.url(path);
        let response = self.send(self.client.post(&url).json(body), &url).await?;
        Ok(response.json().await?)
    }

    /// PATCH a record; 404 and an empty body both read as `None`.
    async fn patch<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>, HttpError> {
        let url = self.url(path);
        match self.send(self.client.patch(&url).json(body), &url).await {
            Ok(response) => {
                let text = response.text().await?;
                if text.trim().is_empty() {
                    return Ok(None);
                }
                Ok(serde_json::from_str(&text)?)
            }
            Err(HttpError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn delete(&self, path: &str) -> Result<bool, HttpError> {
        let url = self.url(path);
        match self.send(self.client.delete(&url), &url).await {
            Ok(_) => Ok(true),
            Err(HttpError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

/// Trim trailing slashes and require an http(s) scheme with a host.
pub fn normalize_base_url(base_url: &str) -> Result<String, HttpError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"));
    match host {
        Some(host) if !host.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(HttpError::InvalidBaseUrl(base_url.to_owned())),
    }
}

/// Path for a product listing, optionally scoped to a segment.
pub fn products_path(segment: Option<Segment>) -> String {
    match segment {
        Some(segment) => format!("/products?segment={segment}"),
        None => "/products".to_owned(),
    }
}

/// Path for a user lookup with percent-encoded query values.
pub fn users_path(query: &UserQuery) -> String {
    let params: Vec<String> = [("username", &query.username), ("password", &query.password)]
        .into_iter()
        .filter_map(|(name, value)| {
            value
                .as_deref()
                .map(|v| format!("{name}={}", urlencoding::encode(v)))
        })
        .collect();
    if params.is_empty() {
        "/users".to_owned()
    } else {
        format!("/users?{}", params.join("&"))
    }
}

fn record_path(collection: &str, id: &RecordId) -> String {
    format!("/{collection}/{}", urlencoding::encode(&id.to_string()))
}

impl CatalogSource for RestClient {
    type Error = HttpError;

    async fn list_products(
        &self,
        segment: Option<Segment>,
    ) -> Result<Vec<ProductRecord>, HttpError> {
        self.get_list(&products_path(segment)).await
    }

    async fn get_product(&self, id: &RecordId) -> Result<Option<ProductRecord>, HttpError> {
        self.get_one(&record_path("products", id)).await
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<ProductRecord, HttpError> {
        self.post("/products", draft).await
    }

    async fn update_product(
        &self,
        id: &RecordId,
        draft: &ProductDraft,
    ) -> Result<Option<ProductRecord>, HttpError> {
        self.patch(&record_path("products", id), draft).await
    }

    async fn delete_product(&self, id: &RecordId) -> Result<bool, HttpError> {
        self.delete(&record_path("products", id)).await
    }
}

impl UserDirectory for RestClient {
    type Error = HttpError;

    async fn find_users(&self, query: &UserQuery) -> Result<Vec<UserRecord>, HttpError> {
        self.get_list(&users_path(query)).await
    }

    async fn create_user(&self, user: &NewUser) -> Result<UserRecord, HttpError> {
        self.post("/users", user).await
    }

    async fn update_user(
        &self,
        id: &RecordId,
        patch: &UserPatch,
    ) -> Result<Option<UserRecord>, HttpError> {
        self.patch(&record_path("users", id), patch).await
    }

    async fn delete_user(&self, id: &RecordId) -> Result<bool, HttpError> {
        self.delete(&record_path("users", id)).await
    }
}
