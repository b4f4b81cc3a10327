use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{Client, Url};
use serde_json::{json, Value as JsonValue};

use crate::clients::auth::{StaticToken, TokenSource};
use crate::core::error::CatalogError;
use crate::domain::{ListQuery, Operation, ResourceKind};
use crate::infra::config::UpstreamConfig;
use crate::infra::http::headers::add_standard_headers;
use crate::infra::runtime::limits::make_http_client_with;

/// Longest slice of an upstream error body kept in `CatalogError::Status`.
const DETAIL_LIMIT: usize = 512;

/// One client for every TMF620 resource kind. Each call is a single request
/// against `{base}/{path}[/{id}]`; nothing is retried.
#[derive(Clone)]
pub struct CatalogClient {
    base: String,
    http: Client,
    token: Arc<dyn TokenSource>,
    request_timeout: Duration,
}

impl CatalogClient {
    pub fn new(base: impl Into<String>) -> Result<Self, CatalogError> {
        Self::from_config(&UpstreamConfig::with_base_url(base))
    }

    pub fn from_config(cfg: &UpstreamConfig) -> Result<Self, CatalogError> {
        let http = make_http_client_with(cfg)
            .map_err(|e| CatalogError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            base: cfg.base_url.clone(),
            http,
            token: Arc::new(StaticToken::new(cfg.token.clone())),
            request_timeout: cfg.request_timeout,
        })
    }

    pub fn with_token_source(mut self, token: Arc<dyn TokenSource>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// GET a single resource when `id` is given, otherwise the collection.
    pub async fn retrieve(
        &self,
        kind: ResourceKind,
        id: Option<&str>,
        query: &ListQuery,
    ) -> Result<JsonValue, CatalogError> {
        let pairs = query.to_pairs().map_err(CatalogError::InvalidRequest)?;
        self.execute(Operation::Retrieve, kind, id, &pairs, None)
            .await?
            .ok_or_else(|| self.failed(Operation::Retrieve, kind, CatalogError::Decode("empty response body".into())))
    }

    pub async fn list(&self, kind: ResourceKind) -> Result<JsonValue, CatalogError> {
        self.retrieve(kind, None, &ListQuery::default()).await
    }

    pub async fn get(&self, kind: ResourceKind, id: &str) -> Result<JsonValue, CatalogError> {
        let id = require_id(id)?;
        self.retrieve(kind, Some(id), &ListQuery::default()).await
    }

    /// POST a new resource. Only 201 counts as created.
    pub async fn create(&self, kind: ResourceKind, data: &JsonValue) -> Result<JsonValue, CatalogError> {
        self.execute(Operation::Create, kind, None, &[], Some(data))
            .await?
            .ok_or_else(|| self.failed(Operation::Create, kind, CatalogError::Decode("empty response body".into())))
    }

    /// PATCH a partial document. A bodiless success answers `{"id": id}`.
    pub async fn update(
        &self,
        kind: ResourceKind,
        id: &str,
        data: &JsonValue,
    ) -> Result<JsonValue, CatalogError> {
        let id = require_id(id)?;
        let body = self.execute(Operation::Update, kind, Some(id), &[], Some(data)).await?;
        Ok(body.unwrap_or_else(|| json!({ "id": id })))
    }

    /// DELETE by id. Only 204 counts as deleted.
    pub async fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), CatalogError> {
        let id = require_id(id)?;
        self.execute(Operation::Delete, kind, Some(id), &[], None).await?;
        Ok(())
    }

    fn url(&self, kind: ResourceKind, id: Option<&str>) -> Result<Url, CatalogError> {
        let mut url = Url::parse(&self.base)
            .map_err(|e| CatalogError::InvalidRequest(format!("invalid base URL '{}': {e}", self.base)))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| CatalogError::InvalidRequest(format!("base URL cannot carry a path: {}", self.base)))?;
            segments.pop_if_empty().push(kind.path());
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn execute(
        &self,
        op: Operation,
        kind: ResourceKind,
        id: Option<&str>,
        query: &[(String, String)],
        body: Option<&JsonValue>,
    ) -> Result<Option<JsonValue>, CatalogError> {
        let url = self.url(kind, id)?;
        let tool = format!("{}_{}", kind.tool_prefix(), op.tool_suffix());
        tracing::info!(
            op = %op,
            kind = %kind,
            id = id.unwrap_or(""),
            method = %op.method(),
            url = %url,
            "sending upstream request"
        );
        if !query.is_empty() {
            tracing::debug!(params = ?query, "with query parameters");
        }

        let mut builder = self.http.request(op.method(), url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        let token = self.token.access_token();
        let (mut builder, rid) = add_standard_headers(builder, None, &token, body.is_some());
        if let Some(data) = body {
            tracing::debug!(data = %data, "request body");
            builder = builder.body(data.to_string());
        }

        let start = Instant::now();
        let resp = match builder.send().await {
            Ok(resp) => resp,
            Err(e) => return Err(self.failed(op, kind, self.classify(e))),
        };
        let status = resp.status().as_u16();
        tracing::info!(status, request_id = %rid, "upstream responded");

        let text = match resp.text().await {
            Ok(text) => text,
            Err(e) => return Err(self.failed(op, kind, self.classify(e))),
        };
        crate::infra::logging::log_metric(&tool, "upstream_latency_ms", start.elapsed().as_millis() as f64);

        if !op.accepts(status) {
            return Err(self.failed(
                op,
                kind,
                CatalogError::Status { status, detail: truncate(&text, DETAIL_LIMIT) },
            ));
        }

        if text.trim().is_empty() || op == Operation::Delete {
            return Ok(None);
        }
        match serde_json::from_str::<JsonValue>(&text) {
            Ok(v) => {
                tracing::info!(op = %op, kind = %kind, "response received successfully");
                Ok(Some(v))
            }
            Err(e) => Err(self.failed(op, kind, CatalogError::Decode(e.to_string()))),
        }
    }

    fn classify(&self, e: reqwest::Error) -> CatalogError {
        if e.is_timeout() {
            CatalogError::Timeout(self.request_timeout)
        } else if e.is_decode() {
            CatalogError::Decode(e.to_string())
        } else {
            CatalogError::Transport(e.to_string())
        }
    }

    /// Log a failure once, count it, and hand it back.
    fn failed(&self, op: Operation, kind: ResourceKind, err: CatalogError) -> CatalogError {
        match &err {
            CatalogError::Timeout(after) => {
                tracing::error!(op = %op, kind = %kind, timeout = ?after, "timeout error: request timed out")
            }
            CatalogError::Status { status, detail } => {
                tracing::error!(op = %op, kind = %kind, status = *status, detail = %detail, "HTTP status error")
            }
            CatalogError::Decode(msg) => {
                tracing::error!(op = %op, kind = %kind, error = %msg, "failed to decode JSON response")
            }
            CatalogError::Transport(msg) => {
                tracing::error!(op = %op, kind = %kind, error = %msg, "HTTP error")
            }
            CatalogError::InvalidRequest(msg) => {
                tracing::error!(op = %op, kind = %kind, error = %msg, "invalid request")
            }
        }
        let tool = format!("{}_{}", kind.tool_prefix(), op.tool_suffix());
        crate::infra::logging::log_metric(&tool, "upstream_error_total", 1.0);
        err
    }
}

fn require_id(id: &str) -> Result<&str, CatalogError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(CatalogError::InvalidRequest("id must not be empty".into()));
    }
    Ok(id)
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
