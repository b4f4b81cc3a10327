use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::batch::cleanup::cleanup;
use crate::batch::payloads::PayloadSet;
use crate::batch::populate::populate;
use crate::clients::catalog::CatalogClient;
use crate::domain::ResourceKind;
use crate::infra::config::Config;

#[derive(Parser)]
#[command(name = "catalogctl")]
#[command(about = "TMF620 MCP Gateway - Admin CLI")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Health check a running gateway
    Health {
        /// Gateway URL to check
        #[arg(short, long, default_value = "http://localhost:8000")]
        url: String,
    },
    /// Validate configuration
    Config,
    /// Show gateway status and configuration
    Status {
        /// Gateway URL to check
        #[arg(short, long, default_value = "http://localhost:8000")]
        url: String,
    },
    /// List catalogs on the upstream TMF620 API
    PingUpstream {
        /// Upstream base URL (defaults to the configured one)
        #[arg(long)]
        api_url: Option<String>,
    },
    /// Create catalog resources from a directory of JSON payloads
    Populate {
        /// Directory holding *_catalog.json, *_category.json, *_spec.json,
        /// *_offering.json and *_price.json files
        #[arg(short, long, default_value = "payloads")]
        dir: PathBuf,
        /// Upstream base URL (defaults to the configured one)
        #[arg(long)]
        api_url: Option<String>,
    },
    /// Delete every resource from the upstream catalog
    Cleanup {
        /// Upstream base URL (defaults to the configured one)
        #[arg(long)]
        api_url: Option<String>,
    },
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    run_commands(cli.command).await
}

pub async fn run_commands(command: Commands) -> ExitCode {
    match command {
        Commands::Health { url } => match health_check(&url).await {
            Ok(_) => {
                println!("✅ Gateway is healthy");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Health check failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Config => match validate_config() {
            Ok(cfg) => {
                println!("✅ Configuration is valid");
                print_config(&cfg);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Configuration validation failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Status { url } => match show_status(&url).await {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("❌ Status check failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::PingUpstream { api_url } => match ping_upstream(api_url).await {
            Ok(count) => {
                println!("✅ Upstream reachable: {} catalog(s)", count);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Upstream check failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Populate { dir, api_url } => match run_populate(&dir, api_url).await {
            Ok(summary) => {
                println!("✅ {}", summary);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Populate failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Cleanup { api_url } => match run_cleanup(api_url).await {
            Ok(summary) => {
                println!("✅ {}", summary);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Cleanup failed: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

async fn health_check(url: &str) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/healthz", url.trim_end_matches('/')))
        .timeout(std::time::Duration::from_millis(500))
        .send()
        .await?;

    if response.status().is_success() {
        Ok(())
    } else {
        anyhow::bail!("HTTP {}", response.status())
    }
}

fn load_config(api_url: Option<String>) -> anyhow::Result<Config> {
    let mut cfg = Config::from_env()?;
    if let Some(url) = api_url {
        cfg.upstream.base_url = url;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn validate_config() -> anyhow::Result<Config> {
    load_config(None)
}

fn print_config(cfg: &Config) {
    println!("\n📋 Configuration:");
    println!("  Transport: {}", cfg.transport);
    println!("  Port: {}", cfg.port);
    println!("  Mount path: {}", cfg.mount_path);
    println!("  Upstream API: {}", cfg.upstream.base_url);
    println!(
        "  TLS verification: {}",
        if cfg.upstream.accept_invalid_certs { "disabled" } else { "enabled" }
    );
    println!(
        "  Timeouts: connect {:?}, request {:?}",
        cfg.upstream.connect_timeout, cfg.upstream.request_timeout
    );
    println!("  Batch concurrency: {}", cfg.batch.concurrency);
    println!(
        "  Log Level: {}",
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into())
    );
}

async fn show_status(url: &str) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let base = url.trim_end_matches('/');

    // Health check
    let health_response = client
        .get(format!("{}/healthz", base))
        .timeout(std::time::Duration::from_secs(5))
        .send()
        .await?;

    println!(
        "🏥 Health Status: {}",
        if health_response.status().is_success() {
            "✅ Healthy"
        } else {
            "❌ Unhealthy"
        }
    );

    let mount_path = Config::from_env().map(|c| c.mount_path).unwrap_or_else(|_| "/mcp".into());
    let mcp_response = client
        .post(format!("{}{}", base, mount_path))
        .header("accept", "application/json, text/event-stream")
        .header("content-type", "application/json")
        .json(&serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2025-03-26",
                "capabilities": {},
                "clientInfo": {"name": "catalogctl", "version": env!("CARGO_PKG_VERSION")}
            }
        }))
        .timeout(std::time::Duration::from_millis(500))
        .send()
        .await;

    match mcp_response {
        Ok(resp) if resp.status().is_success() => {
            println!("🔧 MCP: ✅ Available at {}", mount_path);
        }
        Ok(resp) => {
            println!("🔧 MCP: ❌ HTTP {}", resp.status());
        }
        Err(_) => {
            println!("🔧 MCP: ❌ Unavailable");
        }
    }

    match Config::from_env() {
        Ok(cfg) => print_config(&cfg),
        Err(e) => println!("\n📋 Configuration: ❌ {}", e),
    }

    Ok(())
}

async fn ping_upstream(api_url: Option<String>) -> anyhow::Result<usize> {
    let cfg = load_config(api_url)?;
    let client = CatalogClient::from_config(&cfg.upstream)?;
    let catalogs = client.list(ResourceKind::Catalog).await?;
    match catalogs.as_array() {
        Some(items) => Ok(items.len()),
        None => anyhow::bail!("expected a JSON array of catalogs, got {}", catalogs),
    }
}

async fn run_populate(dir: &std::path::Path, api_url: Option<String>) -> anyhow::Result<String> {
    let cfg = load_config(api_url)?;
    let set = PayloadSet::load_dir(dir, &cfg.batch.href_base)
        .map_err(|e| anyhow::anyhow!("cannot read payload directory {}: {}", dir.display(), e))?;
    if set.is_empty() {
        anyhow::bail!("no payload files found in {}", dir.display());
    }
    let client = CatalogClient::from_config(&cfg.upstream)?;
    match populate(&client, &set, &cfg.batch).await {
        Ok(report) => Ok(format!(
            "Created {} resource(s), linked {} price(s), {} link failure(s)",
            report.created.len(),
            report.linked,
            report.link_failures
        )),
        Err(e) => {
            let created = e.report().created.len();
            Err(anyhow::anyhow!("{} ({} resource(s) created before stopping)", e, created))
        }
    }
}

async fn run_cleanup(api_url: Option<String>) -> anyhow::Result<String> {
    let cfg = load_config(api_url)?;
    let client = CatalogClient::from_config(&cfg.upstream)?;
    let report = cleanup(&client, cfg.batch.concurrency).await;
    let summary = format!("Deleted {} resource(s), {} failure(s)", report.deleted(), report.failed());
    if report.failed() > 0 {
        anyhow::bail!(summary);
    }
    Ok(summary)
}
