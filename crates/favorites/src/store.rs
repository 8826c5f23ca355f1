use async_trait::async_trait;
use persistence::favorite::{self, DeleteOutcome, FavoriteRecord, Query, StoreError};
use std::sync::Arc;
use std::time::Duration;

/// Persistence contract for favorite records.
///
/// The backing engine owns the uniqueness constraint and the atomic
/// find-and-delete; implementations perform no compare-and-swap of their
/// own.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert(&self, file_id: &str, user_id: &str) -> Result<FavoriteRecord, StoreError>;
    async fn delete(&self, file_id: &str, user_id: &str) -> Result<FavoriteRecord, StoreError>;
    async fn get(&self, file_id: &str, user_id: &str) -> Result<FavoriteRecord, StoreError>;
    async fn scan(&self, query: Query) -> Result<Vec<FavoriteRecord>, StoreError>;
    async fn delete_all(&self, file_id: &str) -> Result<DeleteOutcome, StoreError>;
    async fn probe(&self, timeout: Duration) -> Result<bool, StoreError>;
}

#[async_trait]
impl<S: Store> Store for Arc<S> {
    async fn insert(&self, file_id: &str, user_id: &str) -> Result<FavoriteRecord, StoreError> {
        self.as_ref().insert(file_id, user_id).await
    }

    async fn delete(&self, file_id: &str, user_id: &str) -> Result<FavoriteRecord, StoreError> {
        self.as_ref().delete(file_id, user_id).await
    }

    async fn get(&self, file_id: &str, user_id: &str) -> Result<FavoriteRecord, StoreError> {
        self.as_ref().get(file_id, user_id).await
    }

    async fn scan(&self, query: Query) -> Result<Vec<FavoriteRecord>, StoreError> {
        self.as_ref().scan(query).await
    }

    async fn delete_all(&self, file_id: &str) -> Result<DeleteOutcome, StoreError> {
        self.as_ref().delete_all(file_id).await
    }

    async fn probe(&self, timeout: Duration) -> Result<bool, StoreError> {
        self.as_ref().probe(timeout).await
    }
}

/// Store backed by the shared MongoDB database handle.
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoStore;

#[async_trait]
impl Store for MongoStore {
    async fn insert(&self, file_id: &str, user_id: &str) -> Result<FavoriteRecord, StoreError> {
        favorite::insert(file_id, user_id).await
    }

    async fn delete(&self, file_id: &str, user_id: &str) -> Result<FavoriteRecord, StoreError> {
        favorite::delete(file_id, user_id).await
    }

    async fn get(&self, file_id: &str, user_id: &str) -> Result<FavoriteRecord, StoreError> {
        favorite::get(file_id, user_id).await
    }

    async fn scan(&self, query: Query) -> Result<Vec<FavoriteRecord>, StoreError> {
        favorite::scan(&query).await
    }

    async fn delete_all(&self, file_id: &str) -> Result<DeleteOutcome, StoreError> {
        favorite::delete_all(file_id).await
    }

    async fn probe(&self, timeout: Duration) -> Result<bool, StoreError> {
        favorite::probe(timeout).await
    }
}
