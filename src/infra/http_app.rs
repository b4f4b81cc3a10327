use axum::{
    routing::{any_service, get},
    Router,
};
use std::sync::Arc;

use crate::infra::mcp::CatalogMcpServer;
use crate::infra::runtime::mcp_transport::{make_streamable_http_service, LocalSessionManager};

/// `/healthz` plus streamable MCP mounted at `mount_path`.
pub fn build_app(server: CatalogMcpServer, mount_path: &str) -> Router {
    let session_mgr = Arc::new(LocalSessionManager::default());
    let mcp_service = make_streamable_http_service(server, session_mgr);

    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route_service(mount_path, any_service(mcp_service))
}
