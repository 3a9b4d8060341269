//! Store Network Protocol
//!
//! Endpoints and Data Transfer Objects used when one harness node acts as the store of
//! another. Bodies are JSON. Failed calls answer with a serialized `StoreError`.

use serde::{Deserialize, Serialize};

use super::types::{Key, Record};

// --- API Endpoints ---

/// Single-record write.
pub const ENDPOINT_PUT: &str = "/internal/store/put";
/// Single-record read. The kind and name follow as path segments.
pub const ENDPOINT_GET: &str = "/internal/store/get";
/// Batched write.
pub const ENDPOINT_PUT_MULTI: &str = "/internal/store/put_multi";
/// Batched read.
pub const ENDPOINT_GET_MULTI: &str = "/internal/store/get_multi";
/// Equality query on an indexed property.
pub const ENDPOINT_QUERY: &str = "/internal/store/query";

// --- Data Transfer Objects ---

#[derive(Debug, Serialize, Deserialize)]
pub struct PutRequest {
    pub key: Key,
    pub record: Record,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PutResponse {
    pub key: Key,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PutMultiRequest {
    pub keys: Vec<Key>,
    pub records: Vec<Record>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PutMultiResponse {
    pub keys: Vec<Key>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetMultiRequest {
    pub keys: Vec<Key>,
}

/// Response of batched reads and queries.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordsResponse {
    pub records: Vec<Record>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueryRequest {
    pub kind: String,
    pub field: String,
    pub value: String,
}
