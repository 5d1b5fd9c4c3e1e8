//! In-process index store.
//!
//! Mirrors the Redis semantics the index relies on so it can stand in for
//! Redis in tests and dry runs: empty collections vanish, `DEL` works across
//! types, and a key holds one type at a time (other commands get WRONGTYPE).

use super::batch::{WriteBatch, WriteOp};
use super::traits::IndexStore;
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyKind {
    Hash,
    Set,
    SortedSet,
}

#[derive(Debug, Default)]
struct MemoryState {
    hashes: HashMap<String, HashMap<String, String>>,
    sets: HashMap<String, BTreeSet<String>>,
    sorted_sets: HashMap<String, HashMap<String, f64>>,
}

impl MemoryState {
    fn kind_of(&self, key: &str) -> Option<KeyKind> {
        if self.hashes.contains_key(key) {
            Some(KeyKind::Hash)
        } else if self.sets.contains_key(key) {
            Some(KeyKind::Set)
        } else if self.sorted_sets.contains_key(key) {
            Some(KeyKind::SortedSet)
        } else {
            None
        }
    }

    /// Fail like Redis when `key` already holds a value of another type.
    fn expect_kind(&self, key: &str, expected: KeyKind) -> StoreResult<()> {
        match self.kind_of(key) {
            Some(found) if found != expected => Err(StoreError::Command(format!(
                "WRONGTYPE Operation against a key holding the wrong kind of value: {}",
                key
            ))),
            _ => Ok(()),
        }
    }

    fn apply(&mut self, op: WriteOp) -> StoreResult<()> {
        match op {
            WriteOp::HashSet { key, field, value } => {
                self.expect_kind(&key, KeyKind::Hash)?;
                self.hashes.entry(key).or_default().insert(field, value);
            }
            WriteOp::HashDelete { key, fields } => {
                self.expect_kind(&key, KeyKind::Hash)?;
                if let Some(hash) = self.hashes.get_mut(&key) {
                    for field in &fields {
                        hash.remove(field);
                    }
                    if hash.is_empty() {
                        self.hashes.remove(&key);
                    }
                }
            }
            WriteOp::Delete { keys } => {
                for key in &keys {
                    self.hashes.remove(key);
                    self.sets.remove(key);
                    self.sorted_sets.remove(key);
                }
            }
            WriteOp::SetAdd { key, members } => {
                self.expect_kind(&key, KeyKind::Set)?;
                self.sets.entry(key).or_default().extend(members);
            }
            WriteOp::SetRemove { key, members } => {
                self.expect_kind(&key, KeyKind::Set)?;
                if let Some(set) = self.sets.get_mut(&key) {
                    for member in &members {
                        set.remove(member);
                    }
                    if set.is_empty() {
                        self.sets.remove(&key);
                    }
                }
            }
            WriteOp::SortedSetAdd { key, member, score } => {
                self.expect_kind(&key, KeyKind::SortedSet)?;
                self.sorted_sets.entry(key).or_default().insert(member, score);
            }
            WriteOp::SortedSetRemove { key, members } => {
                self.expect_kind(&key, KeyKind::SortedSet)?;
                if let Some(zset) = self.sorted_sets.get_mut(&key) {
                    for member in &members {
                        zset.remove(member);
                    }
                    if zset.is_empty() {
                        self.sorted_sets.remove(&key);
                    }
                }
            }
        }
        Ok(())
    }
}

/// A thread-safe in-memory store.
///
/// Clones share the same data, so a test can keep a handle for inspection
/// while the index manager owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
    batches: Arc<AtomicU64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    /// Number of batches executed so far.
    pub fn batches_executed(&self) -> u64 {
        self.batches.load(Ordering::Relaxed)
    }

    /// Every key currently holding data, sorted.
    pub fn keys(&self) -> BTreeSet<String> {
        match self.state.read() {
            Ok(state) => state
                .hashes
                .keys()
                .chain(state.sets.keys())
                .chain(state.sorted_sets.keys())
                .cloned()
                .collect(),
            Err(_) => BTreeSet::new(),
        }
    }

    /// Fields of a hash, sorted.
    pub fn hash_fields(&self, key: &str) -> BTreeSet<String> {
        match self.state.read() {
            Ok(state) => state
                .hashes
                .get(key)
                .map(|hash| hash.keys().cloned().collect())
                .unwrap_or_default(),
            Err(_) => BTreeSet::new(),
        }
    }

    /// Members of a set, sorted.
    pub fn members(&self, key: &str) -> BTreeSet<String> {
        match self.state.read() {
            Ok(state) => state.sets.get(key).cloned().unwrap_or_default(),
            Err(_) => BTreeSet::new(),
        }
    }

    /// Members of a sorted set with their scores, highest score first and
    /// ties broken by member.
    pub fn sorted_set(&self, key: &str) -> Vec<(String, f64)> {
        let mut entries: Vec<(String, f64)> = match self.state.read() {
            Ok(state) => state
                .sorted_sets
                .get(key)
                .map(|zset| zset.iter().map(|(m, s)| (m.clone(), *s)).collect())
                .unwrap_or_default(),
            Err(_) => Vec::new(),
        };
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }
}

#[async_trait]
impl IndexStore for MemoryStore {
    async fn hash_get(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        let state = self.read()?;
        state.expect_kind(key, KeyKind::Hash)?;
        Ok(state
            .hashes
            .get(key)
            .and_then(|hash| hash.get(field))
            .cloned())
    }

    async fn set_members(&self, key: &str) -> StoreResult<Vec<String>> {
        let state = self.read()?;
        state.expect_kind(key, KeyKind::Set)?;
        Ok(state
            .sets
            .get(key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn sorted_set_cards(&self, keys: &[String]) -> StoreResult<Vec<u64>> {
        let state = self.read()?;
        keys.iter()
            .map(|key| {
                state.expect_kind(key, KeyKind::SortedSet)?;
                Ok(state.sorted_sets.get(key).map_or(0, |zset| zset.len() as u64))
            })
            .collect()
    }

    /// Applies every op in order. As with a Redis pipeline, a rejected op
    /// does not stop the ones after it; the first error is returned.
    async fn execute(&self, batch: WriteBatch) -> StoreResult<()> {
        let mut state = self.write()?;
        let mut first_error = None;
        for op in batch.into_ops() {
            if let Err(e) = state.apply(op) {
                first_error.get_or_insert(e);
            }
        }
        self.batches.fetch_add(1, Ordering::Relaxed);
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_applies_ops_in_order() {
        let store = MemoryStore::new();
        let mut batch = WriteBatch::new();
        batch
            .hash_set("t::data", "1", "one")
            .hash_set("t::data", "1", "uno")
            .set_add("t", vec!["ca".to_string()])
            .sorted_set_add("t:ca", "1", 1.0)
            .sorted_set_add("t:ca", "2", 5.0);

        tokio_test::block_on(store.execute(batch)).unwrap();

        assert_eq!(store.batches_executed(), 1);
        let value = tokio_test::block_on(store.hash_get("t::data", "1")).unwrap();
        assert_eq!(value.as_deref(), Some("uno"));
        assert_eq!(
            store.sorted_set("t:ca"),
            vec![("2".to_string(), 5.0), ("1".to_string(), 1.0)]
        );
    }

    #[tokio::test]
    async fn test_empty_collections_disappear() {
        let store = MemoryStore::new();
        let mut batch = WriteBatch::new();
        batch
            .hash_set("t::data", "1", "{}")
            .set_add("t", vec!["ca".to_string()])
            .sorted_set_add("t:ca", "1", 0.0);
        store.execute(batch).await.unwrap();
        assert_eq!(store.keys().len(), 3);

        let mut batch = WriteBatch::new();
        batch
            .hash_delete("t::data", vec!["1".to_string()])
            .set_remove("t", vec!["ca".to_string()])
            .sorted_set_remove("t:ca", vec!["1".to_string()]);
        store.execute(batch).await.unwrap();
        assert!(store.keys().is_empty());
    }

    #[tokio::test]
    async fn test_delete_spans_types_and_cards() {
        let store = MemoryStore::new();
        let mut batch = WriteBatch::new();
        batch
            .hash_set("t::data", "1", "{}")
            .set_add("t", vec!["ca".to_string()])
            .sorted_set_add("t:ca", "1", 0.0)
            .sorted_set_add("t:ca", "2", 0.0);
        store.execute(batch).await.unwrap();

        let cards = store
            .sorted_set_cards(&["t:ca".to_string(), "t:zz".to_string()])
            .await
            .unwrap();
        assert_eq!(cards, vec![2, 0]);

        let mut batch = WriteBatch::new();
        batch.delete(vec!["t".to_string(), "t:ca".to_string(), "t::data".to_string()]);
        store.execute(batch).await.unwrap();
        assert!(store.keys().is_empty());
        assert!(store.set_members("t").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_against_wrong_type_is_rejected() {
        let store = MemoryStore::new();
        let mut batch = WriteBatch::new();
        batch
            .hash_set("t:data", "1", "{}")
            .sorted_set_add("t:data", "1", 0.0)
            .sorted_set_add("t:ca", "1", 0.0);

        let result = store.execute(batch).await;

        match result {
            Err(StoreError::Command(message)) => assert!(message.starts_with("WRONGTYPE")),
            other => panic!("Expected WRONGTYPE, got: {:?}", other),
        }
        // ops around the rejected one still land
        assert_eq!(store.hash_fields("t:data").len(), 1);
        assert!(store.sorted_set("t:data").is_empty());
        assert_eq!(store.sorted_set("t:ca"), vec![("1".to_string(), 0.0)]);
    }

    #[tokio::test]
    async fn test_read_against_wrong_type_is_rejected() {
        let store = MemoryStore::new();
        let mut batch = WriteBatch::new();
        batch
            .hash_set("t::data", "1", "{}")
            .set_add("t", vec!["ca".to_string()]);
        store.execute(batch).await.unwrap();

        assert!(matches!(
            store.sorted_set_cards(&["t::data".to_string()]).await,
            Err(StoreError::Command(_))
        ));
        assert!(matches!(
            store.hash_get("t", "ca").await,
            Err(StoreError::Command(_))
        ));
        assert!(matches!(
            store.set_members("t::data").await,
            Err(StoreError::Command(_))
        ));
    }
}
