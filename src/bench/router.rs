//! Route table for the harness endpoints.
//!
//! The table is a plain value assembled once at startup and handed to `build_router`.

use axum::{
    Extension, Router,
    http::HeaderMap,
    routing::{any, get},
};
use std::sync::Arc;

use super::executor::FanOutExecutor;
use super::handlers::{handle_health, handle_operation};
use super::types::Operation;

pub const ENDPOINT_HEALTH: &str = "/health";

/// Path to operation mapping.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<(String, Operation)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The seven harness endpoints, each at its canonical path.
    pub fn standard() -> Self {
        Operation::ALL
            .iter()
            .fold(Self::new(), |table, operation| {
                table.with_route(operation.path(), *operation)
            })
    }

    /// Adds (or replaces) the operation served at `path`.
    pub fn with_route(mut self, path: impl Into<String>, operation: Operation) -> Self {
        let path = path.into();
        self.routes.retain(|(existing, _)| existing != &path);
        self.routes.push((path, operation));
        self
    }

    pub fn routes(&self) -> &[(String, Operation)] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Builds the harness router. Every table entry accepts any HTTP method.
pub fn build_router(table: &RouteTable, executor: Arc<FanOutExecutor>) -> Router {
    if table.is_empty() {
        tracing::warn!("Route table is empty, only {} will be served", ENDPOINT_HEALTH);
    }

    let mut router = Router::new().route(ENDPOINT_HEALTH, get(handle_health));

    for (path, operation) in table.routes() {
        let operation = *operation;
        router = router.route(
            path,
            any(
                move |executor: Extension<Arc<FanOutExecutor>>, headers: HeaderMap| {
                    handle_operation(executor, headers, operation)
                },
            ),
        );
        tracing::debug!("Registered {} -> {:?}", path, operation);
    }

    router.layer(Extension(executor))
}
