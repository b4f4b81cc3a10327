//! Gateway configuration: defaults, then an optional TOML file named by
//! `TMF620_CONFIG`, then environment variables, then command-line flags.
//! Built once at startup and passed down explicitly.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const LOCAL_API_URL: &str = "http://localhost:8080/tmf-api/productCatalogManagement/v4";
pub const CLUSTER_API_URL: &str =
    "http://productcatalogmanagement:8080/tmf-api/productCatalogManagement/v4";
pub const DEFAULT_HREF_BASE: &str = "https://localhost/r1-productcatalogmanagement/tmf-api";
pub const PLACEHOLDER_TOKEN: &str = "dummy-token";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Stdio,
    StreamableHttp,
}

impl Transport {
    pub fn parse(s: &str) -> Option<Transport> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdio" => Some(Transport::Stdio),
            "streamable-http" | "streamable_http" | "http" | "sse" => Some(Transport::StreamableHttp),
            _ => None,
        }
    }

    /// Unknown names fall back to stdio with a warning rather than failing.
    pub fn parse_or_default(s: &str) -> Transport {
        Transport::parse(s).unwrap_or_else(|| {
            tracing::warn!(transport = %s, "invalid transport, using default 'stdio'");
            Transport::Stdio
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Transport::Stdio => "stdio",
            Transport::StreamableHttp => "streamable-http",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Local,
    Cluster,
}

impl Profile {
    fn parse(s: &str) -> Result<Profile, ConfigError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Profile::Local),
            "cluster" => Ok(Profile::Cluster),
            _ => Err(ConfigError::InvalidValue { key: "TMF620_PROFILE", value: s.to_string() }),
        }
    }

    pub fn default_api_url(self) -> &'static str {
        match self {
            Profile::Local => LOCAL_API_URL,
            Profile::Cluster => CLUSTER_API_URL,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub token: String,
    pub accept_invalid_certs: bool,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub pool_max_idle_per_host: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: LOCAL_API_URL.to_string(),
            token: PLACEHOLDER_TOKEN.to_string(),
            accept_invalid_certs: false,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 5,
        }
    }
}

impl UpstreamConfig {
    /// Upstream settings pointing at `base_url`, everything else default.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub concurrency: usize,
    pub href_base: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { concurrency: 4, href_base: DEFAULT_HREF_BASE.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub transport: Transport,
    pub port: u16,
    pub mount_path: String,
    pub upstream: UpstreamConfig,
    pub batch: BatchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transport: Transport::Stdio,
            port: 8000,
            mount_path: "/mcp".to_string(),
            upstream: UpstreamConfig::default(),
            batch: BatchConfig::default(),
        }
    }
}

/// Command-line overrides; `None` leaves the env/file value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub transport: Option<String>,
    pub port: Option<u16>,
    pub mount_path: Option<String>,
    pub api_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    server: FileServer,
    #[serde(default)]
    upstream: FileUpstream,
    #[serde(default)]
    batch: FileBatch,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileServer {
    transport: Option<String>,
    port: Option<u16>,
    mount_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileUpstream {
    profile: Option<Profile>,
    api_url: Option<String>,
    token: Option<String>,
    accept_invalid_certs: Option<bool>,
    connect_timeout_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    pool_max_idle_per_host: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileBatch {
    concurrency: Option<usize>,
    href_base: Option<String>,
}

impl Config {
    /// Load from the process environment (and `TMF620_CONFIG` if set).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let file = match lookup("TMF620_CONFIG").filter(|p| !p.trim().is_empty()) {
            Some(path) => Self::read_file(Path::new(&path))?,
            None => FileConfig::default(),
        };

        let mut cfg = Config::default();

        // Base URL: explicit value wins over the profile default.
        let mut profile = file.upstream.profile.unwrap_or(Profile::Local);
        if let Some(p) = lookup("TMF620_PROFILE").filter(|p| !p.trim().is_empty()) {
            profile = Profile::parse(&p)?;
        }
        cfg.upstream.base_url = profile.default_api_url().to_string();

        if let Some(t) = file.server.transport {
            cfg.transport = Transport::parse_or_default(&t);
        }
        if let Some(p) = file.server.port {
            cfg.port = p;
        }
        if let Some(m) = file.server.mount_path {
            cfg.mount_path = m;
        }
        if let Some(u) = file.upstream.api_url {
            cfg.upstream.base_url = u;
        }
        if let Some(t) = file.upstream.token {
            cfg.upstream.token = t;
        }
        if let Some(b) = file.upstream.accept_invalid_certs {
            cfg.upstream.accept_invalid_certs = b;
        }
        if let Some(s) = file.upstream.connect_timeout_secs {
            cfg.upstream.connect_timeout = Duration::from_secs(s);
        }
        if let Some(s) = file.upstream.request_timeout_secs {
            cfg.upstream.request_timeout = Duration::from_secs(s);
        }
        if let Some(n) = file.upstream.pool_max_idle_per_host {
            cfg.upstream.pool_max_idle_per_host = n;
        }
        if let Some(n) = file.batch.concurrency {
            cfg.batch.concurrency = n;
        }
        if let Some(h) = file.batch.href_base {
            cfg.batch.href_base = h;
        }

        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(t) = var("MCP_TRANSPORT") {
            cfg.transport = Transport::parse_or_default(&t);
        }
        if let Some(p) = var("PORT") {
            cfg.port = parse_num("PORT", &p)?;
        }
        if let Some(m) = var("MCP_MOUNT_PATH") {
            cfg.mount_path = m;
        }
        if let Some(u) = var("TMF620_API_URL") {
            cfg.upstream.base_url = u;
        }
        if let Some(t) = var("TMF620_API_TOKEN") {
            cfg.upstream.token = t;
        }
        if let Some(b) = var("TMF620_ACCEPT_INVALID_CERTS") {
            cfg.upstream.accept_invalid_certs = parse_bool(&b);
        }
        if let Some(s) = var("TMF620_CONNECT_TIMEOUT_SECS") {
            cfg.upstream.connect_timeout = Duration::from_secs(parse_num("TMF620_CONNECT_TIMEOUT_SECS", &s)?);
        }
        if let Some(s) = var("TMF620_REQUEST_TIMEOUT_SECS") {
            cfg.upstream.request_timeout = Duration::from_secs(parse_num("TMF620_REQUEST_TIMEOUT_SECS", &s)?);
        }
        if let Some(n) = var("TMF620_BATCH_CONCURRENCY") {
            cfg.batch.concurrency = parse_num("TMF620_BATCH_CONCURRENCY", &n)?;
        }

        Ok(cfg)
    }

    fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn apply_overrides(&mut self, o: Overrides) {
        if let Some(t) = o.transport {
            self.transport = Transport::parse_or_default(&t);
        }
        if let Some(p) = o.port {
            self.port = p;
        }
        if let Some(m) = o.mount_path {
            self.mount_path = m;
        }
        if let Some(u) = o.api_url {
            self.upstream.base_url = u;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transport == Transport::StreamableHttp && self.port == 0 {
            return Err(ConfigError::Invalid("PORT cannot be 0".into()));
        }
        if !self.mount_path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "mount path must start with '/': {}",
                self.mount_path
            )));
        }
        let url = self.upstream.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Invalid("upstream API URL is empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "upstream API URL must be http(s): {url}"
            )));
        }
        if self.upstream.connect_timeout.is_zero() || self.upstream.request_timeout.is_zero() {
            return Err(ConfigError::Invalid("timeouts must be greater than zero".into()));
        }
        if self.batch.concurrency == 0 {
            return Err(ConfigError::Invalid("batch concurrency must be at least 1".into()));
        }
        Ok(())
    }
}

fn parse_num<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue { key, value: value.to_string() })
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
