use persistence::favorite::StoreError;
use thiserror::Error;

/// Domain outcomes surfaced to the request layer.
///
/// NotFound and AlreadyExists are expected caller conditions, not system
/// faults; everything else is a storage failure.
#[derive(Debug, Error)]
pub enum Error {
    #[error("favorite not found")]
    NotFound,
    #[error("favorite already exists")]
    AlreadyExists,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Error::NotFound,
            StoreError::Duplicate => Error::AlreadyExists,
            StoreError::Io(e) => Error::Storage(e),
        }
    }
}
