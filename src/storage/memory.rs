use async_trait::async_trait;
use dashmap::DashMap;
use std::time::Duration;

use super::error::{StoreError, StoreResult};
use super::traits::Store;
use super::types::{Key, Record};
use crate::context::RequestContext;

/// In-process store, sharded by entity kind.
///
/// Every `Store` call can optionally sleep for a fixed simulated round trip before touching
/// the maps, so that serial, parallel and multi-key strategies show the latency profile
/// they would against a networked store.
pub struct MemoryStore {
    local_data: DashMap<String, DashMap<String, Record>>,
    latency: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            local_data: DashMap::new(),
            latency: None,
        }
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            local_data: DashMap::new(),
            latency: (!latency.is_zero()).then_some(latency),
        }
    }

    async fn round_trip(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    pub fn store_local(&self, key: &Key, record: Record) {
        let kind_map = self
            .local_data
            .entry(key.kind.clone())
            .or_insert_with(DashMap::new);
        kind_map.insert(key.name.clone(), record);
    }

    pub fn get_local(&self, key: &Key) -> Option<Record> {
        if let Some(kind_map) = self.local_data.get(&key.kind) {
            if let Some(record) = kind_map.get(&key.name) {
                return Some(record.clone());
            }
        }

        None
    }

    /// All records of `kind`, ordered by name.
    pub fn dump_kind(&self, kind: &str) -> Vec<(Key, Record)> {
        let mut entries = Vec::new();
        if let Some(kind_map) = self.local_data.get(kind) {
            for entry in kind_map.iter() {
                entries.push((Key::new(kind, entry.key().clone()), entry.value().clone()));
            }
        }
        entries.sort_by(|(a, _), (b, _)| a.name.cmp(&b.name));
        entries
    }

    pub fn entry_count(&self) -> usize {
        self.local_data
            .iter()
            .map(|entry| entry.value().len())
            .sum()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn put(&self, ctx: &RequestContext, key: &Key, record: &Record) -> StoreResult<Key> {
        self.round_trip().await;
        self.store_local(key, record.clone());
        tracing::trace!(parent: ctx.span(), key = %key, "memory put");
        Ok(key.clone())
    }

    async fn get(&self, ctx: &RequestContext, key: &Key) -> StoreResult<Record> {
        self.round_trip().await;
        tracing::trace!(parent: ctx.span(), key = %key, "memory get");
        self.get_local(key)
            .ok_or_else(|| StoreError::NotFound { key: key.clone() })
    }

    async fn put_multi(
        &self,
        ctx: &RequestContext,
        keys: &[Key],
        records: &[Record],
    ) -> StoreResult<Vec<Key>> {
        if keys.len() != records.len() {
            return Err(StoreError::InvalidBatch {
                keys: keys.len(),
                records: records.len(),
            });
        }

        self.round_trip().await;
        for (key, record) in keys.iter().zip(records) {
            self.store_local(key, record.clone());
        }
        tracing::trace!(parent: ctx.span(), count = keys.len(), "memory put_multi");
        Ok(keys.to_vec())
    }

    async fn get_multi(&self, ctx: &RequestContext, keys: &[Key]) -> StoreResult<Vec<Record>> {
        self.round_trip().await;
        tracing::trace!(parent: ctx.span(), count = keys.len(), "memory get_multi");

        let mut records = Vec::with_capacity(keys.len());
        let mut failed = 0;
        for key in keys {
            match self.get_local(key) {
                Some(record) => records.push(record),
                None => failed += 1,
            }
        }

        if failed > 0 {
            return Err(StoreError::Batch {
                failed,
                total: keys.len(),
            });
        }
        Ok(records)
    }

    async fn query_by_field(
        &self,
        ctx: &RequestContext,
        kind: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<Vec<Record>> {
        self.round_trip().await;
        tracing::trace!(parent: ctx.span(), kind, field, value, "memory query");

        Ok(self
            .dump_kind(kind)
            .into_iter()
            .map(|(_, record)| record)
            .filter(|record| record.indexed_property(field).as_deref() == Some(value))
            .collect())
    }
}
