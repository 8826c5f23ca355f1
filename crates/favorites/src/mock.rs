use crate::Store;
use anyhow::anyhow;
use async_trait::async_trait;
use persistence::favorite::{DeleteOutcome, FavoriteRecord, Query, StoreError};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// In-memory store mirroring the MongoDB store's contract, including the
/// uniqueness constraint on the pair. Counts every call so tests can
/// assert that validation failures never reach the store.
#[derive(Debug, Default)]
pub struct MemStore {
    records: Mutex<Vec<FavoriteRecord>>,
    calls: AtomicUsize,
    probe_fails: AtomicBool,
    probe_unhealthy: AtomicBool,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations performed, validation-rejected requests
    /// included only if they (wrongly) reached the store.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Makes `probe` return an error, as a broken transport would.
    pub fn set_probe_fails(&self, fails: bool) {
        self.probe_fails.store(fails, Ordering::SeqCst);
    }

    /// Makes `probe` answer false, as a timed-out ping would.
    pub fn set_probe_unhealthy(&self, unhealthy: bool) {
        self.probe_unhealthy.store(unhealthy, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<FavoriteRecord> {
        self.records.lock().expect("mock store poisoned").clone()
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn query_matches(record: &FavoriteRecord, query: &Query) -> bool {
    match query {
        Query::ByPair { file_id, user_id } => {
            record.file_id == *file_id && record.user_id == *user_id
        }
        Query::ByUser { user_id } => record.user_id == *user_id,
        Query::ByFile { file_id } => record.file_id == *file_id,
    }
}

#[async_trait]
impl Store for MemStore {
    async fn insert(&self, file_id: &str, user_id: &str) -> Result<FavoriteRecord, StoreError> {
        self.touch();
        let mut records = self.records.lock().expect("mock store poisoned");
        if records
            .iter()
            .any(|r| r.file_id == file_id && r.user_id == user_id)
        {
            return Err(StoreError::Duplicate);
        }
        let record = FavoriteRecord {
            file_id: file_id.to_string(),
            user_id: user_id.to_string(),
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn delete(&self, file_id: &str, user_id: &str) -> Result<FavoriteRecord, StoreError> {
        self.touch();
        let mut records = self.records.lock().expect("mock store poisoned");
        let pos = records
            .iter()
            .position(|r| r.file_id == file_id && r.user_id == user_id)
            .ok_or(StoreError::NotFound)?;
        Ok(records.remove(pos))
    }

    async fn get(&self, file_id: &str, user_id: &str) -> Result<FavoriteRecord, StoreError> {
        self.touch();
        let records = self.records.lock().expect("mock store poisoned");
        records
            .iter()
            .find(|r| r.file_id == file_id && r.user_id == user_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn scan(&self, query: Query) -> Result<Vec<FavoriteRecord>, StoreError> {
        self.touch();
        let records = self.records.lock().expect("mock store poisoned");
        Ok(records
            .iter()
            .filter(|r| query_matches(r, &query))
            .cloned()
            .collect())
    }

    async fn delete_all(&self, file_id: &str) -> Result<DeleteOutcome, StoreError> {
        self.touch();
        let mut records = self.records.lock().expect("mock store poisoned");
        let before = records.len();
        records.retain(|r| r.file_id != file_id);
        let deleted_count = (before - records.len()) as u64;
        Ok(DeleteOutcome {
            acknowledged: deleted_count > 0,
            deleted_count,
        })
    }

    async fn probe(&self, _timeout: Duration) -> Result<bool, StoreError> {
        self.touch();
        if self.probe_fails.load(Ordering::SeqCst) {
            return Err(StoreError::Io(anyhow!("mock transport down")));
        }
        Ok(!self.probe_unhealthy.load(Ordering::SeqCst))
    }
}
