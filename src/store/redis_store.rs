use super::batch::{WriteBatch, WriteOp};
use super::connection::{ConnectionParams, RedisConnection};
use super::traits::IndexStore;
use crate::error::StoreResult;
use async_trait::async_trait;
use redis::AsyncCommands;

/// Index store backed by Redis.
///
/// Batches are sent as a plain pipeline (no MULTI/EXEC): one network round
/// trip, but commands from other clients may interleave with it.
#[derive(Debug)]
pub struct RedisStore {
    connection: RedisConnection,
}

impl RedisStore {
    /// Create a new RedisStore with the given connection.
    pub fn new(connection: RedisConnection) -> Self {
        Self { connection }
    }

    /// Create a RedisStore that connects lazily using `params`.
    pub fn from_params(params: ConnectionParams) -> Self {
        Self::new(RedisConnection::from_params(params))
    }

    pub fn connection(&self) -> &RedisConnection {
        &self.connection
    }

    fn pipeline_for(batch: WriteBatch) -> redis::Pipeline {
        let mut pipe = redis::pipe();
        for op in batch.into_ops() {
            match op {
                WriteOp::HashSet { key, field, value } => {
                    pipe.hset(key, field, value).ignore();
                }
                WriteOp::HashDelete { key, fields } => {
                    pipe.hdel(key, fields).ignore();
                }
                WriteOp::Delete { keys } => {
                    pipe.del(keys).ignore();
                }
                WriteOp::SetAdd { key, members } => {
                    pipe.sadd(key, members).ignore();
                }
                WriteOp::SetRemove { key, members } => {
                    pipe.srem(key, members).ignore();
                }
                WriteOp::SortedSetAdd { key, member, score } => {
                    pipe.zadd(key, member, score).ignore();
                }
                WriteOp::SortedSetRemove { key, members } => {
                    pipe.zrem(key, members).ignore();
                }
            }
        }
        pipe
    }
}

#[async_trait]
impl IndexStore for RedisStore {
    async fn hash_get(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        let mut conn = self.connection.resolve().await?;
        let value: Option<String> = conn.hget(key, field).await?;
        Ok(value)
    }

    async fn set_members(&self, key: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.connection.resolve().await?;
        let members: Vec<String> = conn.smembers(key).await?;
        Ok(members)
    }

    async fn sorted_set_cards(&self, keys: &[String]) -> StoreResult<Vec<u64>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.connection.resolve().await?;
        let mut pipe = redis::pipe();
        for key in keys {
            pipe.zcard(key);
        }
        let cards: Vec<u64> = pipe.query_async(&mut conn).await?;
        Ok(cards)
    }

    async fn execute(&self, batch: WriteBatch) -> StoreResult<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let ops = batch.len();
        let mut conn = self.connection.resolve().await?;
        let pipe = Self::pipeline_for(batch);
        let () = pipe.query_async(&mut conn).await?;

        tracing::trace!(ops = ops, "Pipeline flushed");
        Ok(())
    }
}
