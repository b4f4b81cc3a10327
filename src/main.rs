use clap::Parser;

use tmf620_mcp_gateway::infra::{self, config::Config, config::Overrides};

/// MCP gateway in front of a TMF620 Product Catalog Management API.
#[derive(Parser, Debug)]
#[command(name = "tmf620-mcp-gateway", version)]
struct ServeArgs {
    /// MCP transport: stdio or streamable-http
    #[arg(long, env = "MCP_TRANSPORT")]
    transport: Option<String>,
    /// Port for the streamable HTTP transport
    #[arg(long)]
    port: Option<u16>,
    /// Path the MCP endpoint is mounted at
    #[arg(long)]
    mount_path: Option<String>,
    /// Upstream TMF620 base URL
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    infra::logging::init();

    let args = ServeArgs::parse();
    let mut cfg = Config::from_env()?;
    cfg.apply_overrides(Overrides {
        transport: args.transport,
        port: args.port,
        mount_path: args.mount_path,
        api_url: args.api_url,
    });
    cfg.validate()?;

    infra::boot::run_server(cfg).await
}
