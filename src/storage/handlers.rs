use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use std::sync::Arc;

use super::error::StoreError;
use super::memory::MemoryStore;
use super::protocol::{
    ENDPOINT_GET, ENDPOINT_GET_MULTI, ENDPOINT_PUT, ENDPOINT_PUT_MULTI, ENDPOINT_QUERY,
    GetMultiRequest, PutMultiRequest, PutMultiResponse, PutRequest, PutResponse, QueryRequest,
    RecordsResponse,
};
use super::traits::Store;
use super::types::{Key, Record};
use crate::context::RequestContext;

type StoreReply<T> = Result<Json<T>, (StatusCode, Json<StoreError>)>;

/// Routes that serve `store` to remote harness nodes.
pub fn store_routes(store: Arc<MemoryStore>) -> Router {
    Router::new()
        .route(ENDPOINT_PUT, post(handle_put))
        .route(&format!("{}/:kind/:name", ENDPOINT_GET), get(handle_get))
        .route(ENDPOINT_PUT_MULTI, post(handle_put_multi))
        .route(ENDPOINT_GET_MULTI, post(handle_get_multi))
        .route(ENDPOINT_QUERY, post(handle_query))
        .layer(Extension(store))
}

fn status_for(err: &StoreError) -> StatusCode {
    match err {
        StoreError::NotFound { .. } | StoreError::Batch { .. } => StatusCode::NOT_FOUND,
        StoreError::InvalidBatch { .. } | StoreError::Serialization { .. } => {
            StatusCode::BAD_REQUEST
        }
        StoreError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn reject(err: StoreError) -> (StatusCode, Json<StoreError>) {
    tracing::debug!("Store call rejected: {}", err);
    (status_for(&err), Json(err))
}

pub async fn handle_put(
    Extension(store): Extension<Arc<MemoryStore>>,
    headers: HeaderMap,
    Json(req): Json<PutRequest>,
) -> StoreReply<PutResponse> {
    let ctx = RequestContext::from_headers(&headers, ENDPOINT_PUT);
    let key = store.put(&ctx, &req.key, &req.record).await.map_err(reject)?;
    Ok(Json(PutResponse { key }))
}

pub async fn handle_get(
    Extension(store): Extension<Arc<MemoryStore>>,
    headers: HeaderMap,
    Path((kind, name)): Path<(String, String)>,
) -> StoreReply<Record> {
    let ctx = RequestContext::from_headers(&headers, ENDPOINT_GET);
    let record = store
        .get(&ctx, &Key::new(kind, name))
        .await
        .map_err(reject)?;
    Ok(Json(record))
}

pub async fn handle_put_multi(
    Extension(store): Extension<Arc<MemoryStore>>,
    headers: HeaderMap,
    Json(req): Json<PutMultiRequest>,
) -> StoreReply<PutMultiResponse> {
    let ctx = RequestContext::from_headers(&headers, ENDPOINT_PUT_MULTI);
    let keys = store
        .put_multi(&ctx, &req.keys, &req.records)
        .await
        .map_err(reject)?;
    Ok(Json(PutMultiResponse { keys }))
}

pub async fn handle_get_multi(
    Extension(store): Extension<Arc<MemoryStore>>,
    headers: HeaderMap,
    Json(req): Json<GetMultiRequest>,
) -> StoreReply<RecordsResponse> {
    let ctx = RequestContext::from_headers(&headers, ENDPOINT_GET_MULTI);
    let records = store.get_multi(&ctx, &req.keys).await.map_err(reject)?;
    Ok(Json(RecordsResponse { records }))
}

pub async fn handle_query(
    Extension(store): Extension<Arc<MemoryStore>>,
    headers: HeaderMap,
    Json(req): Json<QueryRequest>,
) -> StoreReply<RecordsResponse> {
    let ctx = RequestContext::from_headers(&headers, ENDPOINT_QUERY);
    let records = store
        .query_by_field(&ctx, &req.kind, &req.field, &req.value)
        .await
        .map_err(reject)?;
    Ok(Json(RecordsResponse { records }))
}
