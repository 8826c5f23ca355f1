use crate::Result;
use anyhow::anyhow;
use async_once_cell::OnceCell;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use std::time::Duration;

static DATABASE: OnceCell<Database> = OnceCell::new();

/// Returns the shared database handle, connecting on first use.
///
/// The connection string comes from `MONGO_HOST`; the database name is
/// taken from the URI path. The driver's session pool is safe for
/// concurrent use, so one handle is shared by every caller.
pub async fn get() -> Result<&'static Database> {
    DATABASE.get_or_try_init(connect()).await
}

async fn connect() -> Result<Database> {
    let host = common::config::get("MONGO_HOST")
        .unwrap_or_else(|_| "mongodb://localhost:27017/favorite".to_string());
    let connect_timeout: u64 = common::config::get("MONGO_CLIENT_CONNECTION_TIMEOUT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);

    let mut options = ClientOptions::parse(&host)
        .await
        .map_err(|e| anyhow!("failed parsing connection string {host}: {e}"))?;
    options.connect_timeout = Some(Duration::from_secs(connect_timeout));
    options.server_selection_timeout = Some(Duration::from_secs(connect_timeout));

    let db_name = options
        .default_database
        .clone()
        .ok_or_else(|| anyhow!("no database name in connection string: {host}"))?;

    let client = Client::with_options(options)
        .map_err(|e| anyhow!("failed creating mongodb client for {host}: {e}"))?;
    Ok(client.database(&db_name))
}
