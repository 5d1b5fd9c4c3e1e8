//! Autocomplete Index - a prefix-based autocomplete index maintained in Redis.
//!
//! Items (an id, a term, optional aliases, a score and any extra payload) are
//! broken into normalized word prefixes. Each prefix gets a sorted set of the
//! ids that produce it, ranked by score, which a lookup service can read to
//! answer "what starts with ..." queries.
//!
//! # Architecture
//!
//! - **text**: Unicode normalization and prefix generation
//! - **models**: The indexed item
//! - **store**: Store abstraction with Redis and in-memory backends
//! - **index**: Load, clear, add and remove against a store
//! - **config**: Configuration from environment variables
//! - **metrics**: Counters for batches and indexed items
//! - **error**: Custom error types for precise error handling

pub mod config;
pub mod error;
pub mod index;
pub mod metrics;
pub mod models;
pub mod store;
pub mod text;

pub use config::{Config, IndexConfig};
pub use error::{ConfigError, IndexError, StoreError};
pub use index::IndexManager;
pub use metrics::{Metrics, MetricsSummary};
pub use models::{Item, ItemId};
pub use store::{
    ConnectionParams, IndexStore, MemoryStore, RedisConnection, RedisStore, WriteBatch, WriteOp,
};
pub use text::{length, normalize, prefixes_for_phrase, substring, StopWords};
