use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::error::{StoreError, StoreResult};
use super::protocol::*;
use super::traits::Store;
use super::types::{Key, Record};
use crate::context::{REQUEST_ID_HEADER, RequestContext};

/// Store client for a peer node that serves its `MemoryStore` over HTTP.
///
/// Each call is a single attempt bounded by `timeout`. The request id of the calling
/// context is forwarded so both nodes log under the same id.
pub struct RemoteStore {
    base_url: String,
    http_client: reqwest::Client,
    timeout: Duration,
}

impl RemoteStore {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            http_client: reqwest::Client::new(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<T, R>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        payload: &T,
    ) -> StoreResult<R>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        let response = self
            .http_client
            .post(format!("{}{}", self.base_url, endpoint))
            .header(REQUEST_ID_HEADER, ctx.request_id())
            .json(payload)
            .timeout(self.timeout)
            .send()
            .await?;

        decode(response).await
    }
}

async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> StoreResult<R> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<R>().await?);
    }

    let body = response.bytes().await?;
    Err(
        serde_json::from_slice::<StoreError>(&body).unwrap_or_else(|_| StoreError::Unavailable {
            message: format!("peer answered {}", status),
        }),
    )
}

fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let normalized = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    normalized.trim_end_matches('/').to_string()
}

#[async_trait]
impl Store for RemoteStore {
    async fn put(&self, ctx: &RequestContext, key: &Key, record: &Record) -> StoreResult<Key> {
        let payload = PutRequest {
            key: key.clone(),
            record: record.clone(),
        };
        let response: PutResponse = self.post_json(ctx, ENDPOINT_PUT, &payload).await?;
        Ok(response.key)
    }

    async fn get(&self, ctx: &RequestContext, key: &Key) -> StoreResult<Record> {
        let response = self
            .http_client
            .get(format!(
                "{}{}/{}/{}",
                self.base_url,
                ENDPOINT_GET,
                urlencoding::encode(&key.kind),
                urlencoding::encode(&key.name)
            ))
            .header(REQUEST_ID_HEADER, ctx.request_id())
            .timeout(self.timeout)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound { key: key.clone() });
        }
        decode(response).await
    }

    async fn put_multi(
        &self,
        ctx: &RequestContext,
        keys: &[Key],
        records: &[Record],
    ) -> StoreResult<Vec<Key>> {
        let payload = PutMultiRequest {
            keys: keys.to_vec(),
            records: records.to_vec(),
        };
        let response: PutMultiResponse = self.post_json(ctx, ENDPOINT_PUT_MULTI, &payload).await?;
        Ok(response.keys)
    }

    async fn get_multi(&self, ctx: &RequestContext, keys: &[Key]) -> StoreResult<Vec<Record>> {
        let payload = GetMultiRequest {
            keys: keys.to_vec(),
        };
        let response: RecordsResponse = self.post_json(ctx, ENDPOINT_GET_MULTI, &payload).await?;
        Ok(response.records)
    }

    async fn query_by_field(
        &self,
        ctx: &RequestContext,
        kind: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<Vec<Record>> {
        let payload = QueryRequest {
            kind: kind.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        };
        let response: RecordsResponse = self.post_json(ctx, ENDPOINT_QUERY, &payload).await?;
        Ok(response.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalization() {
        let store = RemoteStore::new("127.0.0.1:9000/", Duration::from_secs(1));
        assert_eq!(store.base_url(), "http://127.0.0.1:9000");

        let store = RemoteStore::new(" https://store.example ", Duration::from_secs(1));
        assert_eq!(store.base_url(), "https://store.example");
    }
}
