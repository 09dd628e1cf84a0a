//! In-memory backend used by unit tests.

use super::traits::{CatalogSource, UserDirectory, UserQuery};
use crate::catalog::{
    NewUser, ProductDraft, ProductRecord, RecordId, Segment, UserPatch, UserRecord,
};
use crate::error::AppError;
use std::sync::Mutex;

#[derive(Default)]
struct MemoryState {
    products: Vec<ProductRecord>,
    users: Vec<UserRecord>,
    next_id: u64,
}

impl MemoryState {
    fn allocate_id(&mut self) -> RecordId {
        self.next_id += 1;
        RecordId::Number(self.next_id)
    }
}

/// Behaves like the JSON resource server: exact-match query filters,
/// sequential numeric ids.
#[derive(Default)]
pub(crate) struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_product(self, draft: &ProductDraft) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = state.allocate_id();
            state.products.push(record_from_draft(id, draft));
        }
        self
    }

    pub(crate) fn with_user(self, user: &NewUser) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = state.allocate_id();
            state.users.push(record_from_new_user(id, user));
        }
        self
    }

    pub(crate) fn users(&self) -> Vec<UserRecord> {
        self.state.lock().unwrap().users.clone()
    }

    pub(crate) fn products(&self) -> Vec<ProductRecord> {
        self.state.lock().unwrap().products.clone()
    }
}

fn record_from_draft(id: RecordId, draft: &ProductDraft) -> ProductRecord {
    ProductRecord {
        id,
        product_name: draft.product_name.clone(),
        segment: draft.segment,
        image_base64: draft.image_base64.clone(),
        spec_list: draft.spec_list.clone(),
    }
}

fn record_from_new_user(id: RecordId, user: &NewUser) -> UserRecord {
    UserRecord {
        id,
        username: user.username.clone(),
        password: Some(user.password.clone()),
        role_type: user.role_type,
        img_profile_base64: user.img_profile_base64.clone(),
    }
}

impl CatalogSource for MemoryBackend {
    type Error = AppError;

    async fn list_products(
        &self,
        segment: Option<Segment>,
    ) -> Result<Vec<ProductRecord>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .products
            .iter()
            .filter(|p| segment.is_none_or(|s| p.segment == s))
            .cloned()
            .collect())
    }

    async fn get_product(&self, id: &RecordId) -> Result<Option<ProductRecord>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.products.iter().find(|p| &p.id == id).cloned())
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<ProductRecord, AppError> {
        let mut state = self.state.lock().unwrap();
        let id = state.allocate_id();
        let record = record_from_draft(id, draft);
        state.products.push(record.clone());
        Ok(record)
    }

    async fn update_product(
        &self,
        id: &RecordId,
        draft: &ProductDraft,
    ) -> Result<Option<ProductRecord>, AppError> {
        let mut state = self.state.lock().unwrap();
        let Some(existing) = state.products.iter_mut().find(|p| &p.id == id) else {
            return Ok(None);
        };
        *existing = record_from_draft(existing.id.clone(), draft);
        Ok(Some(existing.clone()))
    }

    async fn delete_product(&self, id: &RecordId) -> Result<bool, AppError> {
        let mut state = self.state.lock().unwrap();
        let before = state.products.len();
        state.products.retain(|p| &p.id != id);
        Ok(state.products.len() != before)
    }
}

impl UserDirectory for MemoryBackend {
    type Error = AppError;

    async fn find_users(&self, query: &UserQuery) -> Result<Vec<UserRecord>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .filter(|u| query.username.as_ref().is_none_or(|name| &u.username == name))
            .filter(|u| {
                query
                    .password
                    .as_ref()
                    .is_none_or(|pw| u.password.as_ref() == Some(pw))
            })
            .cloned()
            .collect())
    }

    async fn create_user(&self, user: &NewUser) -> Result<UserRecord, AppError> {
        let mut state = self.state.lock().unwrap();
        let id = state.allocate_id();
        let record = record_from_new_user(id, user);
        state.users.push(record.clone());
        Ok(record)
    }

    async fn update_user(
        &self,
        id: &RecordId,
        patch: &UserPatch,
    ) -> Result<Option<UserRecord>, AppError> {
        let mut state = self.state.lock().unwrap();
        let Some(user) = state.users.iter_mut().find(|u| &u.id == id) else {
            return Ok(None);
        };
        if let Some(username) = &patch.username {
            user.username.clone_from(username);
        }
        if let Some(password) = &patch.password {
            user.password = Some(password.clone());
        }
        if let Some(role) = patch.role_type {
            user.role_type = role;
        }
        if let Some(image) = &patch.img_profile_base64 {
            user.img_profile_base64.clone_from(image);
        }
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: &RecordId) -> Result<bool, AppError> {
        let mut state = self.state.lock().unwrap();
        let before = state.users.len();
        state.users.retain(|u| &u.id != id);
        Ok(state.users.len() != before)
    }
}
