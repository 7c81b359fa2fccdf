//! Read and write operations against the garage REST API.

use crate::cache::{QueryCache, QueryState};
use crate::credentials::{authorization_header, CredentialStore};
use crate::error::{ClientError, ClientResult};
use crate::query::QueryKey;
use crate::retry::RetryPolicy;
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};
use futures_util::future::FutureExt;
use garage_core::resource::decode_collection;
use garage_core::{decode_list, Resource, ServiceReportRow};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Endpoint of the aggregated services report.
pub const REPORT_ENDPOINT: &str = "/api/v1/services/get/report";

/// Field carrying the rows of the services report.
const REPORT_FIELD: &str = "report";

#[derive(Clone)]
pub struct DataClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialStore>,
    cache: Arc<QueryCache>,
    retry: RetryPolicy,
}

impl DataClient {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn CredentialStore>,
        cache: Arc<QueryCache>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            credentials,
            cache,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Key of the unparameterized list query for `R`.
    pub fn list_key<R: Resource>() -> QueryKey {
        QueryKey::new(R::KIND.endpoint())
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// Cached state for `key` without issuing a request.
    pub fn peek(&self, key: &QueryKey) -> QueryState {
        self.cache.get(key)
    }

    /// Read `key`, reusing a fresh cached payload or an in-flight request.
    pub async fn read(&self, key: &QueryKey) -> QueryState {
        self.fetch(key, false).await
    }

    /// Re-fetch `key` even if the cached payload is fresh.
    pub async fn refresh(&self, key: &QueryKey) -> QueryState {
        self.fetch(key, true).await
    }

    /// Read and decode a resource list.
    ///
    /// A stale payload is still decoded when the latest attempt failed; the
    /// error is only returned when there is nothing to show.
    pub async fn list<R: Resource>(&self, key: &QueryKey) -> ClientResult<Vec<R>> {
        let state = self.read(key).await;
        decode_state(&state, key, decode_list::<R>)
    }

    /// [`list`](Self::list) that bypasses a fresh cached payload.
    pub async fn refresh_list<R: Resource>(&self, key: &QueryKey) -> ClientResult<Vec<R>> {
        let state = self.refresh(key).await;
        decode_state(&state, key, decode_list::<R>)
    }

    /// Rows of the services report.
    pub async fn report(&self) -> ClientResult<Vec<ServiceReportRow>> {
        let key = QueryKey::new(REPORT_ENDPOINT);
        let state = self.read(&key).await;
        decode_state(&state, &key, |value| decode_collection(value, REPORT_FIELD))
    }

    async fn fetch(&self, key: &QueryKey, force: bool) -> QueryState {
        let client = self.clone();
        let request_key = key.clone();
        self.cache
            .fetch_with(key, force, move || {
                async move {
                    let label = request_key.to_string();
                    client
                        .retry
                        .run(&label, || {
                            client.execute(
                                Method::Get,
                                request_key.endpoint().to_string(),
                                request_key.query_pairs(),
                                None,
                            )
                        })
                        .await
                }
                .boxed()
            })
            .await
    }

    // ------------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------------

    /// POST to `endpoint`.
    pub fn create(&self, endpoint: impl Into<String>) -> Mutation {
        Mutation::new(self.clone(), Method::Post, endpoint.into())
    }

    /// PUT to `endpoint`.
    pub fn update(&self, endpoint: impl Into<String>) -> Mutation {
        Mutation::new(self.clone(), Method::Put, endpoint.into())
    }

    /// DELETE `endpoint_base/{id}`.
    pub fn delete(&self, endpoint_base: impl Into<String>) -> DeleteMutation {
        DeleteMutation {
            client: self.clone(),
            endpoint_base: endpoint_base.into(),
        }
    }

    // ------------------------------------------------------------------------
    // Request plumbing
    // ------------------------------------------------------------------------

    async fn execute(
        &self,
        method: Method,
        path: String,
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> ClientResult<Value> {
        let request = HttpRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            query,
            authorization: authorization_header(self.credentials.as_ref()),
            body,
        };
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            authenticated = request.authorization.is_some(),
            "Sending request"
        );
        let response = self.transport.send(request).await?;
        parse_response(response)
    }
}

fn decode_state<T, F>(state: &QueryState, key: &QueryKey, decode: F) -> ClientResult<T>
where
    F: FnOnce(&Value) -> garage_core::CoreResult<T>,
{
    match state.result() {
        Some(Ok(value)) => Ok(decode(value)?),
        Some(Err(err)) => Err(err.clone()),
        None => Err(ClientError::Decode(format!("no payload for {}", key))),
    }
}

fn parse_response(response: HttpResponse) -> ClientResult<Value> {
    if response.is_success() {
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return Ok(serde_json::from_str(&response.body)?);
    }

    let message = serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|v| {
            ["message", "error", "detail"]
                .iter()
                .find_map(|field| v.get(*field).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| {
            if response.body.trim().is_empty() {
                format!("HTTP {}", response.status)
            } else {
                response.body.clone()
            }
        });
    Err(ClientError::Server {
        status: response.status,
        message,
    })
}

/// A pending create or update. Revalidation targets are invalidated only
/// after the server accepted the write.
pub struct Mutation {
    client: DataClient,
    method: Method,
    endpoint: String,
    revalidate: Vec<QueryKey>,
}

impl Mutation {
    fn new(client: DataClient, method: Method, endpoint: String) -> Self {
        Self {
            client,
            method,
            endpoint,
            revalidate: Vec::new(),
        }
    }

    pub fn revalidate(mut self, key: QueryKey) -> Self {
        self.revalidate.push(key);
        self
    }

    pub async fn submit<B: Serialize + ?Sized>(&self, payload: &B) -> ClientResult<Value> {
        let body = serde_json::to_value(payload)?;
        let result = self
            .client
            .execute(self.method, self.endpoint.clone(), Vec::new(), Some(body))
            .await;
        match &result {
            Ok(_) => {
                tracing::info!(method = %self.method, endpoint = %self.endpoint, "Write accepted");
                for key in &self.revalidate {
                    self.client.cache.invalidate(key);
                }
            }
            Err(err) => {
                tracing::warn!(method = %self.method, endpoint = %self.endpoint, error = %err, "Write failed");
            }
        }
        result
    }
}

pub struct DeleteMutation {
    client: DataClient,
    endpoint_base: String,
}

impl DeleteMutation {
    pub async fn submit(&self, id: &str, revalidate: Option<&QueryKey>) -> ClientResult<Value> {
        let path = format!("{}/{}", self.endpoint_base.trim_end_matches('/'), id);
        let result = self
            .client
            .execute(Method::Delete, path.clone(), Vec::new(), None)
            .await;
        match &result {
            Ok(_) => {
                tracing::info!(path = %path, "Delete accepted");
                if let Some(key) = revalidate {
                    self.client.cache.invalidate(key);
                }
            }
            Err(err) => {
                tracing::warn!(path = %path, error = %err, "Delete failed");
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn empty_success_body_is_null() {
        assert_eq!(parse_response(response(204, "")), Ok(Value::Null));
    }

    #[test]
    fn server_message_is_extracted() {
        let err = parse_response(response(400, r#"{"status":"fail","message":"Price required"}"#))
            .unwrap_err();
        assert_eq!(
            err,
            ClientError::Server {
                status: 400,
                message: "Price required".to_string()
            }
        );
    }

    #[test]
    fn plain_text_error_body_is_kept() {
        let err = parse_response(response(502, "upstream down")).unwrap_err();
        assert_eq!(err.user_message(), "upstream down");
    }

    #[test]
    fn invalid_json_success_is_decode_error() {
        assert!(matches!(
            parse_response(response(200, "<html>")),
            Err(ClientError::Decode(_))
        ));
    }
}
