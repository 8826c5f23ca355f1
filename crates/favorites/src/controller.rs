use crate::error::Error;
use crate::store::Store;
use logging::*;
use persistence::favorite::{DeleteOutcome, FavoriteRecord, Query};
use std::result::Result;
use std::time::Duration;


/// Business rules over a [`Store`]: classifies store outcomes into domain
/// results and shapes query responses. Holds no state of its own beyond
/// the store handle.
#[derive(Debug, Clone)]
pub struct Controller<S> {
    store: S,
}

impl<S: Store> Controller<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates a favorite for the pair. A pair that already exists is
    /// rejected with [`Error::AlreadyExists`]; the unique index on the
    /// collection is the constraint being reported.
    pub async fn create_favorite(
        &self,
        file_id: &str,
        user_id: &str,
    ) -> Result<FavoriteRecord, Error> {
        Ok(self.store.insert(file_id, user_id).await?)
    }

    /// Deletes the favorite matching the pair and returns its snapshot.
    /// An already-absent pair is [`Error::NotFound`], an expected caller
    /// mistake rather than a system fault.
    pub async fn delete_favorite(
        &self,
        file_id: &str,
        user_id: &str,
    ) -> Result<FavoriteRecord, Error> {
        Ok(self.store.delete(file_id, user_id).await?)
    }

    /// Answers "is this a favorite" lookups without leaking store-layer
    /// error types to the caller.
    pub async fn get_by_file_and_user(
        &self,
        file_id: &str,
        user_id: &str,
    ) -> Result<FavoriteRecord, Error> {
        Ok(self.store.get(file_id, user_id).await?)
    }

    /// All file ids the user favorited. An empty list is success.
    pub async fn get_all_favorites_by_user_id(&self, user_id: &str) -> Result<Vec<String>, Error> {
        let records = self
            .store
            .scan(Query::ByUser {
                user_id: user_id.to_string(),
            })
            .await?;
        Ok(records.into_iter().map(|r| r.file_id).collect())
    }

    /// Removes every favorite of the file, passing the store's outcome
    /// report through unchanged.
    pub async fn delete_all_by_file(&self, file_id: &str) -> Result<DeleteOutcome, Error> {
        Ok(self.store.delete_all(file_id).await?)
    }

    /// Boolean-only contract: a failed probe is logged and reported as
    /// unhealthy, never propagated to the caller.
    pub async fn health_check(&self, timeout: Duration) -> bool {
        match self.store.probe(timeout).await {
            Ok(healthy) => healthy,
            Err(err) => {
                let log = DEFAULT.new(o!("function" => "health_check"));
                error!(log, "store probe failed"; "error" => %err);
                false
            }
        }
    }
}
