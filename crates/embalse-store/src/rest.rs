//! REST client for the hosted content backend.
//!
//! Speaks the backend's two HTTP surfaces with the public (anon) key:
//!
//! - table API at `{url}/rest/v1/{table}` with `column=eq.value` filters
//! - object storage at `{url}/storage/v1/object/{bucket}/{name}`
//!
//! Each operation is exactly one request. There is no retry or backoff;
//! callers decide what a failure means.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;
use tracing::debug;

use crate::{ContentStore, Direction, Query, Row, StoreError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`RestStore`].
#[derive(Clone)]
pub struct RestStoreConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub url: String,
    /// Public (anon) API key.
    pub api_key: String,
    /// Per-request timeout. Default: 10 seconds.
    pub timeout: Duration,
}

impl RestStoreConfig {
    /// Settings with the default timeout.
    #[must_use]
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl std::fmt::Debug for RestStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestStoreConfig")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// [`ContentStore`] backed by the hosted backend's REST API.
#[derive(Clone)]
pub struct RestStore {
    base_url: String,
    client: Client,
}

impl std::fmt::Debug for RestStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestStore")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Error body returned by either API surface.
#[derive(Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    error: Option<String>,
    /// Storage API only. Can differ from the HTTP status, e.g. a duplicate
    /// object is a 400 carrying `"statusCode": "409"`.
    #[serde(rename = "statusCode")]
    status_code: Option<serde_json::Value>,
}

impl ApiErrorBody {
    fn reported_status(&self) -> Option<u16> {
        match self.status_code.as_ref()? {
            serde_json::Value::String(s) => s.parse().ok(),
            serde_json::Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            _ => None,
        }
    }
}

impl RestStore {
    /// Validate the settings and build the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the URL is not an absolute `http`/`https`
    /// URL or the key is empty or not a valid header value.
    pub fn connect(config: &RestStoreConfig) -> Result<Self, StoreError> {
        let url = config.url.trim();
        let parsed = Url::parse(url)
            .map_err(|e| StoreError::Config(format!("invalid store URL '{url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(StoreError::Config(format!(
                "store URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        let key = config.api_key.trim();
        if key.is_empty() {
            return Err(StoreError::Config("missing store API key".to_owned()));
        }

        let mut headers = HeaderMap::new();
        let key_value = HeaderValue::from_str(key)
            .map_err(|_| StoreError::Config("store API key is not a valid header".to_owned()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|_| StoreError::Config("store API key is not a valid header".to_owned()))?;
        headers.insert(HeaderName::from_static("apikey"), key_value);
        headers.insert(reqwest::header::AUTHORIZATION, bearer);

        let timeout = if config.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            config.timeout
        };

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .user_agent(concat!("embalse/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(StoreError::Network)?;

        Ok(Self {
            base_url: url.trim_end_matches('/').to_owned(),
            client,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn object_url(&self, bucket: &str, name: &str) -> String {
        format!(
            "{}/storage/v1/object/{bucket}/{}",
            self.base_url,
            urlencoding::encode(name)
        )
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, StoreError> {
        let req = req.build()?;
        let method = req.method().clone();
        let path = req.url().path().to_owned();

        let resp = self.client.execute(req).await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                StoreError::Unavailable(e.to_string())
            } else {
                StoreError::Network(e)
            }
        })?;

        let status = resp.status();
        debug!(%method, path = %path, status = status.as_u16(), "store request");
        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_default();
        let body = serde_json::from_str::<ApiErrorBody>(&text).ok();
        let reported = body.as_ref().and_then(ApiErrorBody::reported_status);
        let message = body
            .and_then(|b| b.message.or(b.error))
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

        Err(StoreError::Api {
            status: reported.unwrap_or_else(|| status.as_u16()),
            message,
        })
    }
}

/// Query-string pairs in the table API's filter syntax.
fn query_pairs(query: &Query) -> Vec<(String, String)> {
    let mut pairs = vec![("select".to_owned(), "*".to_owned())];
    for (column, value) in &query.filters {
        pairs.push((column.clone(), format!("eq.{value}")));
    }
    if let Some((column, direction)) = &query.order {
        let dir = match direction {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        };
        pairs.push(("order".to_owned(), format!("{column}.{dir}")));
    }
    pairs
}

#[async_trait::async_trait]
impl ContentStore for RestStore {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>, StoreError> {
        let req = self.client.get(self.table_url(table)).query(&query_pairs(query));
        let resp = self.send(req).await?;
        let rows: Vec<Row> = resp.json().await?;
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Row) -> Result<Row, StoreError> {
        let req = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(&row);
        let resp = self.send(req).await?;
        let rows: Vec<Row> = resp.json().await?;
        rows.into_iter().next().ok_or_else(|| StoreError::Api {
            status: 200,
            message: format!("insert into '{table}' returned no row"),
        })
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
        let req = self
            .client
            .delete(self.table_url(table))
            .query(&[("id", format!("eq.{id}"))]);
        self.send(req).await?;
        Ok(())
    }

    async fn upload(
        &self,
        bucket: &str,
        name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<(), StoreError> {
        let req = self
            .client
            .post(self.object_url(bucket, name))
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes.to_vec());

        match self.send(req).await {
            Ok(_) => Ok(()),
            Err(StoreError::Api { status: 409, .. }) => Err(StoreError::ObjectExists {
                bucket: bucket.to_owned(),
                name: name.to_owned(),
            }),
            Err(e) => Err(e),
        }
    }

    fn public_url(&self, bucket: &str, name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{bucket}/{}",
            self.base_url,
            urlencoding::encode(name)
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::extract::Request;
    use axum::http::StatusCode;
    use serde_json::json;
    use tokio::sync::Mutex;

    use super::*;

    /// One request as the backend received it.
    #[derive(Debug)]
    struct Seen {
        method: String,
        path: String,
        query: String,
        headers: HeaderMap,
        body: Vec<u8>,
    }

    type Log = Arc<Mutex<Vec<Seen>>>;

    /// A backend on a random port that answers every request with
    /// `status` and `body`, recording what it was sent.
    async fn backend(status: u16, body: &'static str) -> (RestStore, Log) {
        let log: Log = Arc::default();
        let seen = log.clone();
        let app = Router::new().fallback(move |req: Request| {
            let seen = seen.clone();
            async move {
                let (parts, incoming) = req.into_parts();
                let bytes = axum::body::to_bytes(incoming, usize::MAX).await.unwrap();
                seen.lock().await.push(Seen {
                    method: parts.method.to_string(),
                    path: parts.uri.path().to_owned(),
                    query: parts.uri.query().unwrap_or_default().to_owned(),
                    headers: parts.headers,
                    body: bytes.to_vec(),
                });
                (
                    StatusCode::from_u16(status).unwrap(),
                    [(CONTENT_TYPE, "application/json")],
                    body,
                )
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let store =
            RestStore::connect(&RestStoreConfig::new(format!("http://{addr}"), "anon-key")).unwrap();
        (store, log)
    }

    #[tokio::test]
    async fn select_sends_filters_and_key() {
        let (store, log) = backend(200, r#"[{"id":1,"title":"Lengua"}]"#).await;
        let query = Query::all()
            .eq("section", "raices")
            .order_by("display_order", Direction::Ascending);

        let rows = store.select("highlight_cards", &query).await.unwrap();
        assert_eq!(rows, vec![json!({ "id": 1, "title": "Lengua" })]);

        let seen = log.lock().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, "GET");
        assert_eq!(seen[0].path, "/rest/v1/highlight_cards");
        assert_eq!(
            seen[0].query,
            "select=*&section=eq.raices&order=display_order.asc"
        );
        assert_eq!(seen[0].headers["apikey"], "anon-key");
        assert_eq!(seen[0].headers["authorization"], "Bearer anon-key");
    }

    #[tokio::test]
    async fn insert_asks_for_the_stored_row() {
        let (store, log) = backend(201, r#"[{"id":"e1","title":"Taller"}]"#).await;

        let row = store
            .insert("events", json!({ "title": "Taller" }))
            .await
            .unwrap();
        assert_eq!(row["id"], "e1");

        let seen = log.lock().await;
        assert_eq!(seen[0].method, "POST");
        assert_eq!(seen[0].path, "/rest/v1/events");
        assert_eq!(seen[0].headers["prefer"], "return=representation");
        assert_eq!(seen[0].headers["content-type"], "application/json");
        let sent: Row = serde_json::from_slice(&seen[0].body).unwrap();
        assert_eq!(sent, json!({ "title": "Taller" }));
    }

    #[tokio::test]
    async fn insert_without_returned_row_fails() {
        let (store, _) = backend(201, "[]").await;
        let result = store.insert("events", json!({ "title": "Taller" })).await;
        assert!(matches!(result, Err(StoreError::Api { .. })));
    }

    #[tokio::test]
    async fn delete_filters_by_id() {
        let (store, log) = backend(204, "").await;
        store.delete("events", "abc").await.unwrap();

        let seen = log.lock().await;
        assert_eq!(seen[0].method, "DELETE");
        assert_eq!(seen[0].path, "/rest/v1/events");
        assert_eq!(seen[0].query, "id=eq.abc");
    }

    #[tokio::test]
    async fn upload_sends_bytes_without_upsert() {
        let (store, log) = backend(200, r#"{"Key":"highlight-images/1-ab.png"}"#).await;
        store
            .upload("highlight-images", "1-ab.png", "image/png", b"\x89PNG")
            .await
            .unwrap();

        let seen = log.lock().await;
        assert_eq!(seen[0].method, "POST");
        assert_eq!(seen[0].path, "/storage/v1/object/highlight-images/1-ab.png");
        assert_eq!(seen[0].headers["x-upsert"], "false");
        assert_eq!(seen[0].headers["content-type"], "image/png");
        assert_eq!(seen[0].body, b"\x89PNG");
    }

    #[tokio::test]
    async fn upload_conflict_is_object_exists() {
        let (store, _) = backend(409, r#"{"message":"The resource already exists"}"#).await;
        let result = store
            .upload("highlight-images", "1-ab.png", "image/png", b"x")
            .await;
        assert!(matches!(result, Err(StoreError::ObjectExists { .. })));
    }

    #[tokio::test]
    async fn duplicate_reported_in_body_is_object_exists() {
        let (store, _) = backend(
            400,
            r#"{"statusCode":"409","error":"Duplicate","message":"The resource already exists"}"#,
        )
        .await;
        let result = store
            .upload("highlight-images", "1-ab.png", "image/png", b"x")
            .await;
        assert!(matches!(result, Err(StoreError::ObjectExists { .. })));
    }

    #[tokio::test]
    async fn error_bodies_become_api_errors() {
        let (store, _) = backend(400, r#"{"message":"column \"sección\" does not exist"}"#).await;
        let err = store.select("events", &Query::all()).await.unwrap_err();
        assert!(
            matches!(&err, StoreError::Api { status: 400, message } if message.contains("does not exist")),
            "{err:?}"
        );

        let (store, _) = backend(401, r#"{"error":"Invalid API key"}"#).await;
        let err = store.select("events", &Query::all()).await.unwrap_err();
        assert!(
            matches!(&err, StoreError::Api { status: 401, message } if message == "Invalid API key"),
            "{err:?}"
        );

        let (store, _) = backend(502, "upstream down").await;
        let err = store.delete("events", "x").await.unwrap_err();
        assert!(
            matches!(&err, StoreError::Api { status: 502, message } if message == "HTTP 502"),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn refused_connection_is_unavailable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let store =
            RestStore::connect(&RestStoreConfig::new(format!("http://{addr}"), "anon-key")).unwrap();
        let result = store.select("events", &Query::all()).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))), "{result:?}");
    }

    #[test]
    fn connect_rejects_missing_key() {
        let result = RestStore::connect(&RestStoreConfig::new("https://x.supabase.co", "  "));
        assert!(matches!(result, Err(StoreError::Config(_))));
    }

    #[test]
    fn connect_rejects_malformed_url() {
        let result = RestStore::connect(&RestStoreConfig::new("not a url", "key"));
        assert!(matches!(result, Err(StoreError::Config(_))));
    }

    #[test]
    fn connect_rejects_non_http_scheme() {
        let result = RestStore::connect(&RestStoreConfig::new("ftp://x.supabase.co", "key"));
        assert!(matches!(result, Err(StoreError::Config(_))));
    }

    #[test]
    fn connect_trims_trailing_slash() {
        let store = RestStore::connect(&RestStoreConfig::new("https://x.supabase.co/", "key"))
            .unwrap();
        assert_eq!(
            store.table_url("events"),
            "https://x.supabase.co/rest/v1/events"
        );
    }

    #[test]
    fn object_and_public_urls() {
        let store =
            RestStore::connect(&RestStoreConfig::new("https://x.supabase.co", "key")).unwrap();
        assert_eq!(
            store.object_url("highlight-images", "1-ab.png"),
            "https://x.supabase.co/storage/v1/object/highlight-images/1-ab.png"
        );
        assert_eq!(
            store.public_url("highlight-images", "1-ab.png"),
            "https://x.supabase.co/storage/v1/object/public/highlight-images/1-ab.png"
        );
    }

    #[test]
    fn query_pairs_use_filter_syntax() {
        let query = Query::all()
            .eq("section", "raices")
            .order_by("display_order", Direction::Ascending);
        let pairs = query_pairs(&query);
        assert_eq!(
            pairs,
            vec![
                ("select".to_owned(), "*".to_owned()),
                ("section".to_owned(), "eq.raices".to_owned()),
                ("order".to_owned(), "display_order.asc".to_owned()),
            ]
        );
    }
}
