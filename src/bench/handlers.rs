use axum::{Extension, Json, http::HeaderMap, http::StatusCode};
use serde::Serialize;
use std::sync::Arc;

use super::executor::FanOutExecutor;
use super::types::Operation;
use crate::context::RequestContext;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Runs `operation` for one request and answers `200 OK` with an empty body, whatever
/// the store did.
pub async fn handle_operation(
    Extension(executor): Extension<Arc<FanOutExecutor>>,
    headers: HeaderMap,
    operation: Operation,
) -> StatusCode {
    let ctx = RequestContext::from_headers(&headers, operation.path());
    executor.run(&ctx, operation).await;
    StatusCode::OK
}

pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
