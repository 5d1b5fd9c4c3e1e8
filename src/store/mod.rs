//! Storage backends for the autocomplete index.
//!
//! The index only needs hashes, sets and sorted sets plus a way to flush a
//! group of writes together. [`IndexStore`] captures that surface;
//! [`RedisStore`] is the production backend and [`MemoryStore`] an in-process
//! stand-in.

mod batch;
mod connection;
mod memory;
mod redis_store;
mod traits;

pub use batch::{WriteBatch, WriteOp};
pub use connection::{ConnectionParams, RedisConnection};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use traits::IndexStore;
