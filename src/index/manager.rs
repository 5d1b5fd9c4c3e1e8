//! Index maintenance: load, clear, add and remove.
//!
//! Each item is written to three structures, all keyed under the namespace
//! `T` of the manager's [`IndexConfig`]:
//!
//! - `T::data`, a hash of id → item JSON (the raw item store)
//! - `T`, the set of every prefix in use (the master registry)
//! - `T:<prefix>`, a sorted set of id → score per prefix (the postings)
//!
//! Every logical operation issues its reads first and then flushes all of its
//! writes as one [`WriteBatch`]. Batches are not isolated, so a concurrent
//! reader may briefly see part of an update.

use crate::config::IndexConfig;
use crate::error::{IndexResult, StoreResult};
use crate::metrics::{BatchTimer, Metrics};
use crate::models::{Item, ItemId};
use crate::store::{IndexStore, WriteBatch};
use crate::text::prefixes_for_phrase;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Maintains the prefix index of one namespace.
pub struct IndexManager {
    store: Arc<dyn IndexStore>,
    config: IndexConfig,
    metrics: Metrics,
}

impl IndexManager {
    pub fn new(store: Arc<dyn IndexStore>, config: IndexConfig) -> Self {
        Self {
            store,
            config,
            metrics: Metrics::new(),
        }
    }

    /// Report into an existing metrics collector.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Prefixes `item` is filed under with this namespace's settings.
    pub fn prefixes(&self, item: &Item) -> BTreeSet<String> {
        prefixes_for_phrase(
            &item.phrase(),
            self.config.min_complete,
            &self.config.stop_words,
        )
    }

    /// Replace the whole namespace with `items`.
    ///
    /// Clears first, then adds each item in order without duplicate checks.
    /// Readers may see an empty or partially rebuilt index until this returns.
    pub async fn load(&self, items: Vec<Item>) -> IndexResult<Vec<Item>> {
        tracing::info!(
            namespace = %self.config.namespace,
            items = items.len(),
            "Loading items"
        );

        self.clear().await?;
        for item in &items {
            self.add(item, true).await?;
        }

        tracing::info!(namespace = %self.config.namespace, "Load complete");
        Ok(items)
    }

    /// Delete every posting, the prefix registry and all raw items.
    pub async fn clear(&self) -> IndexResult<()> {
        let index_key = self.config.index_key();
        let prefixes = self.track(self.store.set_members(&index_key).await)?;

        let mut keys: Vec<String> = prefixes
            .iter()
            .map(|prefix| self.config.postings_key(prefix))
            .collect();
        keys.push(index_key);
        keys.push(self.config.data_key());

        let mut batch = WriteBatch::new();
        batch.delete(keys);
        self.flush(batch).await?;

        tracing::debug!(
            namespace = %self.config.namespace,
            prefixes = prefixes.len(),
            "Namespace cleared"
        );
        Ok(())
    }

    /// Index `item`.
    ///
    /// Unless `skip_duplicate_check` is set, any item already stored under the
    /// same id is removed first so none of its postings survive.
    ///
    /// # Errors
    ///
    /// `IndexError::MalformedItem` is returned before the store is touched.
    pub async fn add(&self, item: &Item, skip_duplicate_check: bool) -> IndexResult<()> {
        item.validate()?;
        let raw = serde_json::to_string(item)?;

        if !skip_duplicate_check {
            self.remove_id(&item.id).await?;
        }

        let id = item.id.as_key();
        let prefixes = self.prefixes(item);

        let mut batch = WriteBatch::new();
        batch.hash_set(self.config.data_key(), id.clone(), raw);
        if !prefixes.is_empty() {
            batch.set_add(self.config.index_key(), prefixes.iter().cloned().collect());
            for prefix in &prefixes {
                batch.sorted_set_add(self.config.postings_key(prefix), id.clone(), item.score);
            }
        }
        self.flush(batch).await?;

        self.metrics.record_item_added(prefixes.len());
        tracing::debug!(id = %id, prefixes = prefixes.len(), "Item indexed");
        Ok(())
    }

    /// Validate an untyped JSON document and index it.
    ///
    /// Returns the typed item that was stored.
    pub async fn add_value(&self, value: Value, skip_duplicate_check: bool) -> IndexResult<Item> {
        let item = Item::from_value(value)?;
        self.add(&item, skip_duplicate_check).await?;
        Ok(item)
    }

    /// Remove the stored item sharing `item`'s id. Only the id is consulted.
    pub async fn remove(&self, item: &Item) -> IndexResult<()> {
        self.remove_id(&item.id).await
    }

    /// Remove the item stored under `id`; a missing id is not an error.
    ///
    /// Postings are located from the stored copy of the item, not from any
    /// caller-supplied content. A prefix leaves the registry only when this
    /// item was its last posting.
    pub async fn remove_id(&self, id: &ItemId) -> IndexResult<()> {
        let id = id.as_key();
        let data_key = self.config.data_key();

        let Some(raw) = self.track(self.store.hash_get(&data_key, &id).await)? else {
            tracing::trace!(id = %id, "Nothing stored, skipping removal");
            return Ok(());
        };
        let stored: Item = serde_json::from_str(&raw)?;

        let prefixes: Vec<String> = self.prefixes(&stored).into_iter().collect();
        let postings_keys: Vec<String> = prefixes
            .iter()
            .map(|prefix| self.config.postings_key(prefix))
            .collect();
        let cards = self.track(self.store.sorted_set_cards(&postings_keys).await)?;

        let mut batch = WriteBatch::new();
        batch.hash_delete(data_key, vec![id.clone()]);

        let mut emptied = Vec::new();
        for (position, (prefix, postings_key)) in prefixes.iter().zip(postings_keys).enumerate() {
            batch.sorted_set_remove(postings_key, vec![id.clone()]);
            if cards.get(position).copied().unwrap_or(0) <= 1 {
                emptied.push(prefix.clone());
            }
        }
        batch.set_remove(self.config.index_key(), emptied);
        self.flush(batch).await?;

        self.metrics.record_item_removed();
        tracing::debug!(id = %id, prefixes = prefixes.len(), "Item removed");
        Ok(())
    }

    /// Read back the stored copy of an item.
    pub async fn get(&self, id: &ItemId) -> IndexResult<Option<Item>> {
        let raw = self.track(
            self.store
                .hash_get(&self.config.data_key(), &id.as_key())
                .await,
        )?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn flush(&self, batch: WriteBatch) -> IndexResult<()> {
        let timer = BatchTimer::new(self.metrics.clone(), batch.len());
        match self.store.execute(batch).await {
            Ok(()) => {
                timer.complete();
                Ok(())
            }
            Err(e) => {
                timer.complete_with_error();
                tracing::warn!(
                    namespace = %self.config.namespace,
                    error = %e,
                    "Batch flush failed"
                );
                Err(e.into())
            }
        }
    }

    fn track<T>(&self, result: StoreResult<T>) -> IndexResult<T> {
        result.map_err(|e| {
            self.metrics.record_store_error();
            tracing::warn!(
                namespace = %self.config.namespace,
                error = %e,
                "Store read failed"
            );
            e.into()
        })
    }
}
