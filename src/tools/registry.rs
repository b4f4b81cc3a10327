use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::clients::catalog::CatalogClient;
use crate::core::error::ToolFailure;
use crate::core::tool::Tool;
use crate::domain::{Operation, ResourceKind};
use crate::tools::resource_tool::ResourceTool;

/// Name-indexed set of tools. Cheap to clone; contents are immutable after
/// construction.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    by_name: Arc<BTreeMap<String, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tools<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Tool>>,
    {
        let mut map: BTreeMap<String, Arc<dyn Tool>> = BTreeMap::new();
        for t in iter {
            map.insert(t.name().to_string(), t);
        }
        Self { by_name: Arc::new(map) }
    }

    /// Tool metadata in name order.
    pub fn list(&self) -> Vec<ToolMeta> {
        self.by_name
            .values()
            .map(|t| ToolMeta {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// `None` when no tool has this name.
    pub async fn call(&self, name: &str, args: &JsonValue) -> Option<Result<JsonValue, ToolFailure>> {
        let t = self.by_name.get(name)?;
        Some(t.call(args).await)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolMeta {
    pub name: String,
    pub description: String,
    pub input_schema: JsonValue,
}

/// Every kind×operation tool over one shared client.
pub fn build_registry(client: &CatalogClient) -> ToolRegistry {
    let tools = ResourceKind::ALL.into_iter().flat_map(|kind| {
        Operation::ALL.into_iter().map(move |op| {
            let t: Arc<dyn Tool> = Arc::new(ResourceTool::new(kind, op, client.clone()));
            t
        })
    });
    ToolRegistry::with_tools(tools)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tool::ToolSpec;
    use async_trait::async_trait;

    struct Echo;

    impl ToolSpec for Echo {
        fn name(&self) -> &str {
            "test_echo"
        }
        fn description(&self) -> &str {
            "echo tool"
        }
        fn input_schema(&self) -> JsonValue {
            serde_json::json!({"type": "object"})
        }
    }

    #[async_trait]
    impl Tool for Echo {
        async fn call(&self, args: &JsonValue) -> Result<JsonValue, ToolFailure> {
            Ok(args.clone())
        }
    }

    #[tokio::test]
    async fn registry_registers_lists_and_calls() {
        let reg = ToolRegistry::with_tools([Arc::new(Echo) as Arc<dyn Tool>]);
        let metas = reg.list();
        assert_eq!(metas.len(), 1);
        assert_eq!(metas[0].name, "test_echo");
        let out = reg.call("test_echo", &serde_json::json!({"x": 2})).await.unwrap().unwrap();
        assert_eq!(out["x"], 2);
        assert!(reg.call("nope", &serde_json::json!({})).await.is_none());
    }

    #[test]
    fn catalog_registry_has_twenty_tools() {
        let client = CatalogClient::new("http://127.0.0.1:9").unwrap();
        let reg = build_registry(&client);
        assert_eq!(reg.len(), 20);
        for name in [
            "catalog_get",
            "category_create",
            "product_specification_update",
            "product_offering_delete",
            "product_offering_price_delete",
        ] {
            assert!(reg.contains(name), "missing {name}");
        }
        let names: Vec<String> = reg.list().into_iter().map(|m| m.name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
