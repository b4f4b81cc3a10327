use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::RequestBuilder;

/// TMF620 services answer and expect this exact media type.
pub const TMF_JSON: &str = "application/json;charset=utf-8";

/// Generate a simple request id suitable for logging/correlation.
pub fn generate_request_id() -> String {
    let now = chrono::Utc::now();
    format!("tmf620-{}-{}", now.timestamp(), now.timestamp_subsec_nanos())
}

/// Add the headers every upstream call carries. Returns the updated builder
/// and the request id used.
pub fn add_standard_headers(
    builder: RequestBuilder,
    request_id: Option<String>,
    token: &str,
    with_body: bool,
) -> (RequestBuilder, String) {
    let rid = request_id.unwrap_or_else(generate_request_id);
    let mut b = builder
        .header("x-request-id", rid.as_str())
        .header(USER_AGENT, format!("tmf620-mcp-gateway/{}", env!("CARGO_PKG_VERSION")))
        .header(ACCEPT, HeaderValue::from_static(TMF_JSON));
    if !token.is_empty() {
        b = b.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    if with_body {
        b = b.header(CONTENT_TYPE, HeaderValue::from_static(TMF_JSON));
    }
    (b, rid)
}
