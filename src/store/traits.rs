use super::batch::WriteBatch;
use crate::error::StoreResult;
use async_trait::async_trait;

/// Key-value store holding the index.
///
/// Provides the hash, set and sorted-set primitives the index is built on,
/// enabling different implementations (Redis, in-memory, test doubles).
/// Reads are issued one at a time; writes are queued in a [`WriteBatch`] and
/// flushed together.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Read one field of a hash.
    async fn hash_get(&self, key: &str, field: &str) -> StoreResult<Option<String>>;

    /// List every member of a set.
    async fn set_members(&self, key: &str) -> StoreResult<Vec<String>>;

    /// Member count of each sorted set, in the order of `keys`.
    async fn sorted_set_cards(&self, keys: &[String]) -> StoreResult<Vec<u64>>;

    /// Flush a batch of writes in one round trip, without isolation.
    async fn execute(&self, batch: WriteBatch) -> StoreResult<()>;
}
