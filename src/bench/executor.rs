//! Fan-Out Batch Executor
//!
//! Performs the N store operations behind each harness endpoint.
//!
//! ## Strategies
//! - **Serial**: a plain loop, one awaited store call per index.
//! - **Parallel**: one task per index in a `JoinSet`, drained before returning. With a
//!   deadline configured, tasks still running when it passes are aborted.
//! - **Multi**: all keys (and records) built up front, then a single batched store call.
//!
//! Every failure is logged as a `StoreOperationFailed` and the loop carries on.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tracing::Instrument;

use super::error::StoreOperationFailed;
use super::types::Operation;
use crate::context::RequestContext;
use crate::storage::types::synthetic_name;
use crate::storage::{Key, Record, Store};

/// Property the query-based read filters on.
pub const QUERY_FIELD: &str = "name";

#[derive(Debug, Clone)]
pub struct FanOutSettings {
    /// Records touched per request.
    pub record_count: usize,
    /// Entity kind every key is created under.
    pub kind: String,
    /// Upper bound on the parallel join. `None` waits for every task.
    pub deadline: Option<Duration>,
}

impl Default for FanOutSettings {
    fn default() -> Self {
        Self {
            record_count: 50,
            kind: "data".to_string(),
            deadline: None,
        }
    }
}

pub struct FanOutExecutor {
    store: Arc<dyn Store>,
    settings: FanOutSettings,
}

impl FanOutExecutor {
    pub fn new(store: Arc<dyn Store>, settings: FanOutSettings) -> Arc<Self> {
        Arc::new(Self { store, settings })
    }

    pub fn settings(&self) -> &FanOutSettings {
        &self.settings
    }

    /// Deterministic key for iteration `index`.
    pub fn key_for(&self, index: usize) -> Key {
        Key::new(self.settings.kind.clone(), synthetic_name(index))
    }

    /// Runs `operation` to completion inside the request's span.
    pub async fn run(&self, ctx: &RequestContext, operation: Operation) {
        let started = Instant::now();

        async {
            match operation {
                Operation::PutSerial => self.put_serial(ctx).await,
                Operation::PutParallel => self.put_parallel(ctx).await,
                Operation::PutMulti => self.put_multi(ctx).await,
                Operation::GetSerial => self.get_serial(ctx).await,
                Operation::GetSerialWithQuery => self.get_serial_with_query(ctx).await,
                Operation::GetParallel => self.get_parallel(ctx).await,
                Operation::GetMulti => self.get_multi(ctx).await,
            }

            tracing::info!(
                operation = %operation,
                mode = ?operation.mode(),
                strategy = ?operation.strategy(),
                query = operation.uses_query(),
                records = self.settings.record_count,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "{}",
                operation.finished_message()
            );
        }
        .instrument(ctx.span().clone())
        .await
    }

    pub async fn put_serial(&self, ctx: &RequestContext) {
        for index in 0..self.settings.record_count {
            put_one(self.store.as_ref(), ctx, self.key_for(index), index).await;
        }
    }

    pub async fn put_parallel(&self, ctx: &RequestContext) {
        self.fan_out(ctx, |store, ctx, key, index| async move {
            put_one(store.as_ref(), &ctx, key, index).await;
        })
        .await;
    }

    pub async fn put_multi(&self, ctx: &RequestContext) {
        let (keys, records): (Vec<Key>, Vec<Record>) = (0..self.settings.record_count)
            .map(|index| (self.key_for(index), Record::synthetic(index)))
            .unzip();

        match self.store.put_multi(ctx, &keys, &records).await {
            Ok(_) => {
                for record in &records {
                    tracing::info!(record = ?record, "put");
                }
            }
            Err(cause) => {
                StoreOperationFailed::new("put_multi", format!("{} keys", keys.len()), cause)
                    .log()
            }
        }
    }

    pub async fn get_serial(&self, ctx: &RequestContext) {
        for index in 0..self.settings.record_count {
            get_one(self.store.as_ref(), ctx, self.key_for(index)).await;
        }
    }

    pub async fn get_serial_with_query(&self, ctx: &RequestContext) {
        for index in 0..self.settings.record_count {
            let name = synthetic_name(index);
            match self
                .store
                .query_by_field(ctx, &self.settings.kind, QUERY_FIELD, &name)
                .await
            {
                Ok(records) => match records.first() {
                    Some(record) => tracing::info!(record = ?record, "got"),
                    None => tracing::info!(
                        field = QUERY_FIELD,
                        value = %name,
                        matches = 0,
                        "query matched no records"
                    ),
                },
                Err(cause) => {
                    let subject = format!("{} = {}", QUERY_FIELD, name);
                    StoreOperationFailed::new("query", subject, cause).log()
                }
            }
        }
    }

    pub async fn get_parallel(&self, ctx: &RequestContext) {
        self.fan_out(ctx, |store, ctx, key, _index| async move {
            get_one(store.as_ref(), &ctx, key).await;
        })
        .await;
    }

    pub async fn get_multi(&self, ctx: &RequestContext) {
        let keys: Vec<Key> = (0..self.settings.record_count)
            .map(|index| self.key_for(index))
            .collect();

        match self.store.get_multi(ctx, &keys).await {
            Ok(records) => {
                for record in &records {
                    tracing::info!(record = ?record, "got");
                }
            }
            Err(cause) => {
                StoreOperationFailed::new("get_multi", format!("{} keys", keys.len()), cause)
                    .log()
            }
        }
    }

    /// Spawns one task per index and waits for all of them (or the deadline).
    async fn fan_out<F, Fut>(&self, ctx: &RequestContext, task: F)
    where
        F: Fn(Arc<dyn Store>, RequestContext, Key, usize) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let deadline = self
            .settings
            .deadline
            .map(|limit| tokio::time::Instant::now() + limit);

        let mut tasks = JoinSet::new();
        for index in 0..self.settings.record_count {
            let unit = task(
                Arc::clone(&self.store),
                ctx.clone(),
                self.key_for(index),
                index,
            );
            tasks.spawn(unit.instrument(ctx.span().clone()));
        }

        join_all(tasks, deadline).await;
    }
}

async fn put_one(store: &dyn Store, ctx: &RequestContext, key: Key, index: usize) {
    let record = Record::synthetic(index);
    match store.put(ctx, &key, &record).await {
        Ok(stored) => tracing::info!(key = %stored, "put"),
        Err(cause) => StoreOperationFailed::new("put", key.to_string(), cause).log(),
    }
}

async fn get_one(store: &dyn Store, ctx: &RequestContext, key: Key) {
    match store.get(ctx, &key).await {
        Ok(record) => tracing::info!(record = ?record, "got"),
        Err(cause) => StoreOperationFailed::new("get", key.to_string(), cause).log(),
    }
}

/// Join barrier. Releases once every task has finished, or once `deadline` passes, in which
/// case the stragglers are aborted.
async fn join_all(mut tasks: JoinSet<()>, deadline: Option<tokio::time::Instant>) {
    loop {
        let next = match deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                Ok(next) => next,
                Err(_) => {
                    tracing::warn!(
                        outstanding = tasks.len(),
                        "fan-out deadline exceeded, aborting outstanding tasks"
                    );
                    tasks.shutdown().await;
                    return;
                }
            },
            None => tasks.join_next().await,
        };

        match next {
            None => return,
            Some(Ok(())) => {}
            Some(Err(e)) if e.is_panic() => {
                tracing::warn!("fan-out task panicked: {}", e);
            }
            Some(Err(e)) => {
                tracing::debug!("fan-out task cancelled: {}", e);
            }
        }
    }
}
