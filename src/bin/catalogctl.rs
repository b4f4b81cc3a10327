use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    tmf620_mcp_gateway::infra::logging::init();
    tmf620_mcp_gateway::cli::run().await
}
