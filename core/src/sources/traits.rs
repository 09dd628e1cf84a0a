#![allow(
    async_fn_in_trait,
    reason = "implementations are driven from a single-threaded block_on"
)]

use crate::catalog::{
    NewUser, ProductDraft, ProductRecord, RecordId, Segment, UserPatch, UserRecord,
};

/// Filter for user lookups. Absent fields don't constrain the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl UserQuery {
    pub fn by_username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: None,
        }
    }

    pub fn by_credentials(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }
}

/// Trait for product catalog backends - abstracts over the REST API and test fakes.
pub trait CatalogSource {
    type Error: std::error::Error;

    /// List products, optionally limited to one segment
    async fn list_products(
        &self,
        segment: Option<Segment>,
    ) -> Result<Vec<ProductRecord>, Self::Error>;

    /// Fetch one product; `None` when it doesn't exist
    async fn get_product(&self, id: &RecordId) -> Result<Option<ProductRecord>, Self::Error>;

    async fn create_product(&self, draft: &ProductDraft) -> Result<ProductRecord, Self::Error>;

    /// Replace a product's editable fields
    async fn update_product(
        &self,
        id: &RecordId,
        draft: &ProductDraft,
    ) -> Result<Option<ProductRecord>, Self::Error>;

    /// Delete a product; `false` when it didn't exist
    async fn delete_product(&self, id: &RecordId) -> Result<bool, Self::Error>;
}

/// Trait for user account backends.
pub trait UserDirectory {
    type Error: std::error::Error;

    /// Find users matching every field set in the query
    async fn find_users(&self, query: &UserQuery) -> Result<Vec<UserRecord>, Self::Error>;

    async fn create_user(&self, user: &NewUser) -> Result<UserRecord, Self::Error>;

    /// Apply a partial update; `None` when the backend returns no record
    async fn update_user(
        &self,
        id: &RecordId,
        patch: &UserPatch,
    ) -> Result<Option<UserRecord>, Self::Error>;

    /// Delete a user; `false` when it didn't exist
    async fn delete_user(&self, id: &RecordId) -> Result<bool, Self::Error>;
}
