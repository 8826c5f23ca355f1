#![deny(warnings)]

pub mod client;
pub mod favorite;

type Result<T> = anyhow::Result<T>;
