#![deny(warnings)]

pub mod config;

type Result<T> = anyhow::Result<T>;
