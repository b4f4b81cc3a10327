use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use thiserror::Error;

/// Failure of a single upstream call. Every variant is logged once where it
/// is produced and then surfaced to callers as a value.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("upstream returned status {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("failed to decode upstream JSON: {0}")]
    Decode(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl CatalogError {
    pub fn kind(&self) -> FailureKind {
        match self {
            CatalogError::Timeout(_) => FailureKind::Timeout,
            CatalogError::Transport(_) => FailureKind::Transport,
            CatalogError::Status { .. } => FailureKind::Status,
            CatalogError::Decode(_) => FailureKind::Decode,
            CatalogError::InvalidRequest(_) => FailureKind::InvalidArguments,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the upstream said the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    Transport,
    Status,
    Decode,
    InvalidArguments,
}

/// The one error shape every tool returns: `{"error": {kind, message, status?}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolFailure {
    pub kind: FailureKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ToolFailure {
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::InvalidArguments,
            message: message.into(),
            status: None,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        json!({ "error": self })
    }
}

impl From<CatalogError> for ToolFailure {
    fn from(e: CatalogError) -> Self {
        Self {
            kind: e.kind(),
            status: e.status(),
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_keeps_upstream_status() {
        let e = CatalogError::Status { status: 404, detail: "not found".into() };
        assert!(e.is_not_found());
        let failure: ToolFailure = e.into();
        let v = failure.to_json();
        assert_eq!(v["error"]["kind"], "status");
        assert_eq!(v["error"]["status"], 404);
        assert!(v["error"]["message"].as_str().unwrap().contains("404"));
    }

    #[test]
    fn transport_error_omits_status() {
        let failure: ToolFailure = CatalogError::Transport("connection refused".into()).into();
        let v = failure.to_json();
        assert_eq!(v["error"]["kind"], "transport");
        assert!(v["error"].get("status").is_none());
    }

    #[test]
    fn invalid_arguments_shape() {
        let v = ToolFailure::invalid_arguments("missing required field: id").to_json();
        assert_eq!(v["error"]["kind"], "invalid_arguments");
        assert_eq!(v["error"]["message"], "missing required field: id");
    }

    #[test]
    fn invalid_request_maps_to_invalid_arguments() {
        let failure: ToolFailure = CatalogError::InvalidRequest("id must not be empty".into()).into();
        assert_eq!(failure.kind, FailureKind::InvalidArguments);
        assert!(failure.message.contains("id must not be empty"));
    }

    #[test]
    fn timeout_displays_duration() {
        let e = CatalogError::Timeout(std::time::Duration::from_secs(30));
        assert!(e.to_string().contains("30s"));
        assert_eq!(e.kind(), FailureKind::Timeout);
    }
}
