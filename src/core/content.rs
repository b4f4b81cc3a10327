//! Mapping of tool outcomes onto MCP call results.

use rmcp::model::{CallToolResult, Content};
use serde_json::Value as JsonValue;

use crate::core::error::ToolFailure;

/// Every result carries the JSON as a text block. Objects (single resources
/// and the `{"error": ...}` document) are also mirrored into
/// `structuredContent`; TMF list responses are arrays and stay text only.
pub fn into_call_result(outcome: Result<JsonValue, ToolFailure>) -> CallToolResult {
    match outcome {
        Ok(value) => json_result(value, false),
        Err(failure) => json_result(failure.to_json(), true),
    }
}

fn json_result(value: JsonValue, is_error: bool) -> CallToolResult {
    let text = Content::text(value.to_string());
    let structured_content = value.is_object().then_some(value);
    CallToolResult {
        content: Some(vec![text]),
        structured_content,
        is_error: Some(is_error),
    }
}
