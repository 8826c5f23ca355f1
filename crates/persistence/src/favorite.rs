use crate::client;
use futures_util::TryStreamExt;
use logging::*;
use mongodb::IndexModel;
use mongodb::bson::{Document, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};
use std::result::Result;
use std::time::Duration;
use thiserror::Error;

#[cfg(test)]
mod tests;

/// Name of the favorites collection.
pub const COLLECTION: &str = "favorite";

/// Name of the fileID field in BSON.
pub const FILE_ID_FIELD: &str = "fileID";

/// Name of the userID field in BSON.
pub const USER_ID_FIELD: &str = "userID";

// Mongo server error code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// A favorite as it is stored: "this user favorited this file".
/// The (fileID, userID) pair is the natural key; there is no update,
/// only create and delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    #[serde(rename = "fileID")]
    pub file_id: String,
    #[serde(rename = "userID")]
    pub user_id: String,
}

/// Query intent against the favorites collection, translated internally
/// to the driver's filter documents so no raw BSON crosses the store
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    ByPair { file_id: String, user_id: String },
    ByUser { user_id: String },
    ByFile { file_id: String },
}

impl Query {
    fn filter(&self) -> Document {
        match self {
            Query::ByPair { file_id, user_id } => doc! {
                FILE_ID_FIELD: file_id,
                USER_ID_FIELD: user_id,
            },
            Query::ByUser { user_id } => doc! { USER_ID_FIELD: user_id },
            Query::ByFile { file_id } => doc! { FILE_ID_FIELD: file_id },
        }
    }
}

/// Outcome report of a bulk delete. "Nothing matched" is an expected
/// case, not an error: acknowledged is false and the count is 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Raw store failures, classified where the driver leaves them implicit.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("favorite not found")]
    NotFound,
    #[error("favorite already exists")]
    Duplicate,
    #[error(transparent)]
    Io(#[from] anyhow::Error),
}

fn io(err: mongodb::error::Error) -> StoreError {
    StoreError::Io(err.into())
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY_CODE
    )
}

async fn collection() -> Result<mongodb::Collection<FavoriteRecord>, StoreError> {
    let db = client::get().await.map_err(StoreError::Io)?;
    Ok(db.collection::<FavoriteRecord>(COLLECTION))
}

/// Creates the unique compound index on (fileID, userID).
///
/// Called once at startup. Safe to call repeatedly: creating an index
/// that already exists with the same specification is a no-op on the
/// server side.
pub async fn init() -> Result<(), StoreError> {
    let col = collection().await?;
    let index = IndexModel::builder()
        .keys(doc! { FILE_ID_FIELD: 1, USER_ID_FIELD: 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();
    col.create_index(index).await.map_err(io)?;
    Ok(())
}

/// Inserts a favorite record for (fileID, userID).
///
/// The unique index is the only uniqueness mechanism; a concurrent or
/// repeated insert of the same pair fails at the server with a
/// duplicate-key error, surfaced as `StoreError::Duplicate`.
pub async fn insert(file_id: &str, user_id: &str) -> Result<FavoriteRecord, StoreError> {
    let record = FavoriteRecord {
        file_id: file_id.to_string(),
        user_id: user_id.to_string(),
    };
    let col = collection().await?;
    match col.insert_one(&record).await {
        Ok(_) => Ok(record),
        Err(e) if is_duplicate_key(&e) => Err(StoreError::Duplicate),
        Err(e) => Err(io(e)),
    }
}

/// Atomically finds and removes the one record matching the pair,
/// returning the removed record's snapshot.
pub async fn delete(file_id: &str, user_id: &str) -> Result<FavoriteRecord, StoreError> {
    let col = collection().await?;
    let filter = Query::ByPair {
        file_id: file_id.to_string(),
        user_id: user_id.to_string(),
    };
    col.find_one_and_delete(filter.filter())
        .await
        .map_err(io)?
        .ok_or(StoreError::NotFound)
}

/// Point lookup by exact pair match.
pub async fn get(file_id: &str, user_id: &str) -> Result<FavoriteRecord, StoreError> {
    let col = collection().await?;
    let filter = Query::ByPair {
        file_id: file_id.to_string(),
        user_id: user_id.to_string(),
    };
    col.find_one(filter.filter())
        .await
        .map_err(io)?
        .ok_or(StoreError::NotFound)
}

/// All records matching the query. An empty result is success, not an
/// error.
pub async fn scan(query: &Query) -> Result<Vec<FavoriteRecord>, StoreError> {
    let col = collection().await?;
    let cursor = col.find(query.filter()).await.map_err(io)?;
    cursor.try_collect().await.map_err(io)
}

/// Removes every record whose fileID matches and reports the outcome.
pub async fn delete_all(file_id: &str) -> Result<DeleteOutcome, StoreError> {
    let col = collection().await?;
    let filter = Query::ByFile {
        file_id: file_id.to_string(),
    };
    let result = col.delete_many(filter.filter()).await.map_err(io)?;
    Ok(DeleteOutcome {
        acknowledged: result.deleted_count > 0,
        deleted_count: result.deleted_count,
    })
}

/// Lightweight connectivity check: true iff the server answered the ping
/// within `timeout`. An elapsed timeout is "not healthy", not an error.
pub async fn probe(timeout: Duration) -> Result<bool, StoreError> {
    let log = DEFAULT.new(o!("function" => "favorite::probe"));
    let db = client::get().await.map_err(StoreError::Io)?;
    match tokio::time::timeout(timeout, db.run_command(doc! { "ping": 1 })).await {
        Ok(Ok(_)) => Ok(true),
        Ok(Err(e)) => Err(io(e)),
        Err(_) => {
            trace!(log, "ping timed out"; "timeout" => ?timeout);
            Ok(false)
        }
    }
}
