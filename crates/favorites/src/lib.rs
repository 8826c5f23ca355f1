#![deny(warnings)]

mod controller;
mod error;
mod store;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use controller::Controller;
pub use error::Error;
pub use store::{MongoStore, Store};

pub use persistence::favorite::{DeleteOutcome, FavoriteRecord, Query, StoreError};
