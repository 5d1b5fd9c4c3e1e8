use async_trait::async_trait;
use autocomplete_index::error::{StoreError, StoreResult};
use autocomplete_index::store::{IndexStore, MemoryStore, WriteBatch};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Mock index store for testing.
///
/// Delegates to an in-memory store, tracks method calls and executed batches
/// for verification, and can be told to fail specific methods.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockIndexStore {
    inner: MemoryStore,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
    batches: Arc<Mutex<Vec<WriteBatch>>>,
    failing: Arc<Mutex<HashSet<String>>>,
}

#[allow(dead_code)]
impl MockIndexStore {
    /// Create a new empty MockIndexStore.
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            call_counts: Arc::new(Mutex::new(HashMap::new())),
            batches: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// The backing in-memory store, for inspecting contents.
    pub fn memory(&self) -> &MemoryStore {
        &self.inner
    }

    /// Make every subsequent call to `method` fail as if the store were down.
    pub fn fail_on(&self, method: &str) {
        self.failing.lock().unwrap().insert(method.to_string());
    }

    /// Stop failing every method.
    pub fn recover(&self) {
        self.failing.lock().unwrap().clear();
    }

    /// Get the number of times a method was called.
    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    /// Total number of calls across every method.
    pub fn total_calls(&self) -> usize {
        self.call_counts.lock().unwrap().values().sum()
    }

    /// Batches that were executed successfully, in order.
    pub fn executed_batches(&self) -> Vec<WriteBatch> {
        self.batches.lock().unwrap().clone()
    }

    /// Reset all call counts and recorded batches.
    pub fn reset_call_counts(&self) {
        self.call_counts.lock().unwrap().clear();
        self.batches.lock().unwrap().clear();
    }

    fn track_call(&self, method: &str) -> StoreResult<()> {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;

        if self.failing.lock().unwrap().contains(method) {
            return Err(StoreError::Unavailable(format!("{} failed", method)));
        }
        Ok(())
    }
}

impl Default for MockIndexStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IndexStore for MockIndexStore {
    async fn hash_get(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        self.track_call("hash_get")?;
        self.inner.hash_get(key, field).await
    }

    async fn set_members(&self, key: &str) -> StoreResult<Vec<String>> {
        self.track_call("set_members")?;
        self.inner.set_members(key).await
    }

    async fn sorted_set_cards(&self, keys: &[String]) -> StoreResult<Vec<u64>> {
        self.track_call("sorted_set_cards")?;
        self.inner.sorted_set_cards(keys).await
    }

    async fn execute(&self, batch: WriteBatch) -> StoreResult<()> {
        self.track_call("execute")?;
        self.batches.lock().unwrap().push(batch.clone());
        self.inner.execute(batch).await
    }
}
