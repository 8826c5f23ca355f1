use crate::Result;
use anyhow::anyhow;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

// TOML configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub mongo: MongoConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_health_check_interval")]
    pub health_check_interval: u64,
}

#[derive(Debug, Deserialize)]
pub struct MongoConfig {
    #[serde(default = "default_mongo_host")]
    pub host: String,
    #[serde(default = "default_mongo_connection_timeout")]
    pub connection_timeout: u64,
    #[serde(default = "default_mongo_ping_timeout")]
    pub ping_timeout: u64,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_rust_log_format")]
    pub rust_log_format: String,
}

// Default values
fn default_port() -> u16 {
    8080
}
fn default_health_check_interval() -> u64 {
    3 // seconds
}
fn default_mongo_host() -> String {
    "mongodb://localhost:27017/favorite".to_string()
}
fn default_mongo_connection_timeout() -> u64 {
    10 // seconds
}
fn default_mongo_ping_timeout() -> u64 {
    10 // seconds
}
fn default_rust_log_format() -> String {
    "json".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            health_check_interval: default_health_check_interval(),
        }
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            host: default_mongo_host(),
            connection_timeout: default_mongo_connection_timeout(),
            ping_timeout: default_mongo_ping_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log_format: default_rust_log_format(),
        }
    }
}

static CONFIG: Lazy<Config> = Lazy::new(|| {
    load_config().unwrap_or_else(|e| {
        eprintln!(
            "Warning: Failed to load config files: {}. Using defaults.",
            e
        );
        Config::default()
    })
});

static CONFIG_STORE: Lazy<Arc<Mutex<HashMap<String, String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(HashMap::new())));

pub fn get(name: &str) -> Result<String> {
    // Priority 1: CONFIG_STORE (runtime overrides)
    if let Some(value) = get_from_store(name) {
        if value.is_empty() {
            return Err(anyhow!("{} is empty", name));
        }
        return Ok(value);
    }

    // Priority 2: Environment variables
    if let Ok(val) = std::env::var(name)
        && !val.is_empty()
    {
        return Ok(val);
    }

    // Priority 3: TOML config
    let toml_value = match name {
        "PORT" => Some(CONFIG.server.port.to_string()),
        "HEALTH_CHECK_INTERVAL" => Some(CONFIG.server.health_check_interval.to_string()),
        "MONGO_HOST" => Some(CONFIG.mongo.host.clone()),
        "MONGO_CLIENT_CONNECTION_TIMEOUT" => Some(CONFIG.mongo.connection_timeout.to_string()),
        "MONGO_CLIENT_PING_TIMEOUT" => Some(CONFIG.mongo.ping_timeout.to_string()),
        "RUST_LOG_FORMAT" => Some(CONFIG.logging.rust_log_format.clone()),
        _ => None,
    };

    if let Some(value) = toml_value
        && !value.is_empty()
    {
        return Ok(value);
    }

    Err(anyhow!("Configuration key not found: {}", name))
}

/// Overrides a configuration value at runtime.
///
/// Note: kept `#[doc(hidden)]` instead of `#[cfg(test)]` so tests in
/// downstream crates can set values as well.
#[doc(hidden)]
pub fn set(name: &str, value: &str) {
    if let Ok(mut store) = CONFIG_STORE.lock() {
        store.insert(name.to_string(), value.to_string());
    }
}

/// Removes a runtime override from CONFIG_STORE.
#[doc(hidden)]
pub fn remove(name: &str) {
    if let Ok(mut store) = CONFIG_STORE.lock() {
        store.remove(name);
    }
}

/// RAII guard that sets a value in CONFIG_STORE and restores the previous
/// state on Drop, so a panicking test still cleans up after itself.
#[doc(hidden)]
pub struct ConfigGuard {
    key: String,
    previous: Option<String>,
}

impl ConfigGuard {
    pub fn new(key: &str, value: &str) -> Self {
        let previous = get_from_store(key);
        set(key, value);
        Self {
            key: key.to_string(),
            previous,
        }
    }
}

impl Drop for ConfigGuard {
    fn drop(&mut self) {
        match &self.previous {
            Some(prev) => set(&self.key, prev),
            None => remove(&self.key),
        }
    }
}

fn get_from_store(name: &str) -> Option<String> {
    if let Ok(store) = CONFIG_STORE.lock() {
        store.get(name).cloned()
    } else {
        None
    }
}

/// Load configuration from TOML files with priority:
/// 1. config/config.local.toml (git-ignored, for local overrides)
/// 2. config/config.toml (git-managed template)
/// 3. Default values
fn load_config() -> Result<Config> {
    let mut config = Config::default();

    // Load base config from config.toml
    let base_path = "config/config.toml";
    if Path::new(base_path).exists() {
        let content = fs::read_to_string(base_path)?;
        config = toml::from_str(&content)?;
    }

    // Override with local config if exists
    let local_path = "config/config.local.toml";
    if Path::new(local_path).exists() {
        let content = fs::read_to_string(local_path)?;
        let local_config: Config = toml::from_str(&content)?;
        merge_config(&mut config, local_config);
    }

    Ok(config)
}

/// Merge local config into base config (local values override base values)
fn merge_config(base: &mut Config, local: Config) {
    // Server
    if local.server.port != default_port() {
        base.server.port = local.server.port;
    }
    if local.server.health_check_interval != default_health_check_interval() {
        base.server.health_check_interval = local.server.health_check_interval;
    }

    // Mongo
    if local.mongo.host != default_mongo_host() {
        base.mongo.host = local.mongo.host;
    }
    if local.mongo.connection_timeout != default_mongo_connection_timeout() {
        base.mongo.connection_timeout = local.mongo.connection_timeout;
    }
    if local.mongo.ping_timeout != default_mongo_ping_timeout() {
        base.mongo.ping_timeout = local.mongo.ping_timeout;
    }

    // Logging
    if local.logging.rust_log_format != default_rust_log_format() {
        base.logging.rust_log_format = local.logging.rust_log_format;
    }
}
