//! End-to-end test utilities for running the index against a live Redis.
//!
//! Tests using this module are `#[ignore]`d; run them with
//! `cargo test -- --ignored` once `REDIS_URL` points at a disposable server.

use autocomplete_index::store::{IndexStore, RedisStore};
use autocomplete_index::{ConnectionParams, IndexConfig, IndexManager};
use std::env;
use std::sync::Arc;

pub mod fixtures;

/// Test configuration loaded from environment variables.
pub struct TestConfig {
    pub redis_url: String,
    pub database: i64,
}

impl TestConfig {
    /// Load configuration from the environment or a .env file.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            database: env::var("REDIS_TEST_DATABASE")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(15),
        }
    }
}

/// Create a Redis-backed store and a manager for `namespace`.
pub fn setup_test_manager(namespace: &str) -> (Arc<RedisStore>, IndexManager) {
    let config = TestConfig::from_env();
    let params = ConnectionParams::new(config.redis_url).with_database(config.database);
    let store = Arc::new(RedisStore::from_params(params));

    let manager = IndexManager::new(
        store.clone() as Arc<dyn IndexStore>,
        IndexConfig::new(namespace).with_stop_words(["the", "of"]),
    );
    (store, manager)
}

/// Namespace unique to this process so parallel runs don't collide.
pub fn test_namespace(name: &str) -> String {
    format!("e2e-{}-{}", name, std::process::id())
}
