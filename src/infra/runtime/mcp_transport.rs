//! Generic MCP transport helpers (stdio + streamable HTTP) decoupled from tool logic.

use std::sync::Arc;

use rmcp::serve_server;
use rmcp::transport::streamable_http_server::tower::{StreamableHttpServerConfig, StreamableHttpService};

pub use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
pub use rmcp::ServerHandler;

/// Serve one MCP session over stdin/stdout until the peer disconnects.
pub async fn serve_stdio<H>(handler: H) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    H: ServerHandler,
{
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();
    let running = serve_server(handler, (stdin, stdout)).await?;
    let reason = running.waiting().await?;
    tracing::info!(reason = ?reason, "stdio session ended");
    Ok(())
}

/// Streamable HTTP service; every session gets its own clone of `handler`.
pub fn make_streamable_http_service<H>(
    handler: H,
    session_mgr: Arc<LocalSessionManager>,
) -> StreamableHttpService<H, LocalSessionManager>
where
    H: ServerHandler + Clone,
{
    let cfg = StreamableHttpServerConfig::default();
    StreamableHttpService::new(move || Ok(handler.clone()), session_mgr, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::catalog::CatalogClient;
    use crate::infra::mcp::CatalogMcpServer;

    #[tokio::test]
    async fn test_make_streamable_http_service() {
        let session_mgr = Arc::new(LocalSessionManager::default());
        let handler = CatalogMcpServer::new(CatalogClient::new("http://test").unwrap());
        let _service = make_streamable_http_service(handler, session_mgr);
    }
}
