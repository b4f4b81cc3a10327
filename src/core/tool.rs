use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::core::error::ToolFailure;

/// Minimal metadata every tool must expose.
pub trait ToolSpec {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> JsonValue;
}

/// Tool = Spec + call. Failures come back as the uniform `ToolFailure`
/// shape, never as a panic.
#[async_trait]
pub trait Tool: ToolSpec + Send + Sync {
    async fn call(&self, arguments: &JsonValue) -> Result<JsonValue, ToolFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl ToolSpec for Echo {
        fn name(&self) -> &str {
            "test_echo"
        }
        fn description(&self) -> &str {
            "echo tool"
        }
        fn input_schema(&self) -> JsonValue {
            serde_json::json!({"type":"object"})
        }
    }

    #[async_trait]
    impl Tool for Echo {
        async fn call(&self, args: &JsonValue) -> Result<JsonValue, ToolFailure> {
            if args.is_null() {
                return Err(ToolFailure::invalid_arguments("no arguments"));
            }
            Ok(args.clone())
        }
    }

    #[tokio::test]
    async fn it_runs_echo() {
        let t = Echo;
        let out = t.call(&serde_json::json!({"x":1})).await.unwrap();
        assert_eq!(out["x"], 1);
    }

    #[tokio::test]
    async fn it_surfaces_failures_as_values() {
        let err = Echo.call(&JsonValue::Null).await.unwrap_err();
        assert_eq!(err.to_json()["error"]["kind"], "invalid_arguments");
    }
}
