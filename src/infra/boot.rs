use crate::infra::config::{Config, Transport};
use crate::infra::mcp::CatalogMcpServer;
use std::net::SocketAddr;

pub async fn run_server(cfg: Config) -> anyhow::Result<()> {
    tracing::info!(
        transport = %cfg.transport,
        port = cfg.port,
        mount_path = %cfg.mount_path,
        api_url = %cfg.upstream.base_url,
        "BOOT tmf620-mcp-gateway"
    );

    let server = CatalogMcpServer::from_config(&cfg)?;

    if cfg.transport == Transport::Stdio {
        crate::infra::runtime::mcp_transport::serve_stdio(server)
            .await
            .map_err(|e| anyhow::anyhow!(e))?;
        return Ok(());
    }

    let app = crate::infra::http_app::build_app(server, &cfg.mount_path);
    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, mount_path = %cfg.mount_path, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
