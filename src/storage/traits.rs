//! Store trait definition.

use async_trait::async_trait;

use super::error::StoreResult;
use super::types::{Key, Record};
use crate::context::RequestContext;

/// Abstract key-value document store.
///
/// Implementations must be safe for concurrent use: the parallel strategy shares one
/// instance across every fan-out task. Each call receives the originating request's
/// context.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Writes the record under `key`, replacing any previous record. Returns the stored key.
    async fn put(&self, ctx: &RequestContext, key: &Key, record: &Record) -> StoreResult<Key>;

    /// Reads the record under `key`. Fails with `NotFound` when absent.
    async fn get(&self, ctx: &RequestContext, key: &Key) -> StoreResult<Record>;

    /// Writes `records[i]` under `keys[i]` in a single call.
    async fn put_multi(
        &self,
        ctx: &RequestContext,
        keys: &[Key],
        records: &[Record],
    ) -> StoreResult<Vec<Key>>;

    /// Reads all `keys` in a single call, in key order.
    async fn get_multi(&self, ctx: &RequestContext, keys: &[Key]) -> StoreResult<Vec<Record>>;

    /// Returns the records of `kind` whose indexed `field` equals `value`.
    async fn query_by_field(
        &self,
        ctx: &RequestContext,
        kind: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<Vec<Record>>;
}
