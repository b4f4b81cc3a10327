pub fn init() {
    // Initialize tracing subscriber once, honoring RUST_LOG if set.
    // Logs go to stderr: in stdio mode stdout carries the MCP stream.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log a metric line and record it through the `metrics` facade. Names
/// ending in `_total` are counters, everything else a histogram.
pub fn log_metric(tool: &str, metric: &str, value: f64) {
    tracing::info!(tool = tool, metric = metric, value = value, "metric");
    let name = format!("tmf620_{metric}");
    if metric.ends_with("_total") {
        metrics::counter!(name, "tool" => tool.to_string()).increment(value as u64);
    } else {
        metrics::histogram!(name, "tool" => tool.to_string()).record(value);
    }
}
