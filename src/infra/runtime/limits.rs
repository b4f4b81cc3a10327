use crate::infra::config::UpstreamConfig;

/// Build the upstream reqwest client: fixed connect/request timeouts and a
/// bounded idle pool. TLS certificates are verified unless the configuration
/// explicitly opts out.
pub fn make_http_client_with(cfg: &UpstreamConfig) -> Result<reqwest::Client, reqwest::Error> {
    if cfg.accept_invalid_certs {
        tracing::warn!(
            base_url = %cfg.base_url,
            "TLS certificate verification is DISABLED for upstream calls"
        );
    }
    reqwest::Client::builder()
        .connect_timeout(cfg.connect_timeout)
        .timeout(cfg.request_timeout)
        .pool_max_idle_per_host(cfg.pool_max_idle_per_host)
        .danger_accept_invalid_certs(cfg.accept_invalid_certs)
        .build()
}
