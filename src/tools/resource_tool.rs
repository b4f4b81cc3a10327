use async_trait::async_trait;
use serde_json::{json, Map, Value as JsonValue};

use crate::clients::catalog::CatalogClient;
use crate::core::error::ToolFailure;
use crate::core::tool::{Tool, ToolSpec};
use crate::domain::{ListQuery, Operation, ResourceKind};

/// One kind×operation pair exposed as a tool, e.g. `product_offering_create`.
#[derive(Clone)]
pub struct ResourceTool {
    kind: ResourceKind,
    op: Operation,
    client: CatalogClient,
    name: String,
    description: String,
}

impl ResourceTool {
    pub fn new(kind: ResourceKind, op: Operation, client: CatalogClient) -> Self {
        let name = format!("{}_{}", kind.tool_prefix(), op.tool_suffix());
        let label = kind.label();
        let description = match op {
            Operation::Retrieve => format!(
                "Retrieve TMF620 {label} resources. With `id` returns one {label}; without it lists \
                 them, optionally narrowed by `fields`, `offset`, `limit` and an attribute `filter`."
            ),
            Operation::Create => format!(
                "Create a TMF620 {label} from the JSON document in `data`. Returns the created resource \
                 including its server-assigned id."
            ),
            Operation::Update => format!(
                "Partially update (PATCH) the TMF620 {label} with the given `id` using the fields in `data`."
            ),
            Operation::Delete => format!("Delete the TMF620 {label} with the given `id`."),
        };
        Self { kind, op, client, name, description }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn operation(&self) -> Operation {
        self.op
    }

    async fn dispatch(&self, args: &Map<String, JsonValue>) -> Result<JsonValue, ToolFailure> {
        match self.op {
            Operation::Retrieve => {
                let id = optional_str(args, "id")?;
                let query = list_query(args)?;
                tracing::info!(kind = %self.kind, id = id.unwrap_or(""), "retrieving {}", self.kind.label());
                Ok(self.client.retrieve(self.kind, id, &query).await?)
            }
            Operation::Create => {
                let data = required_object(args, "data")?;
                tracing::info!(kind = %self.kind, name = ?data.get("name"), "creating {}", self.kind.label());
                Ok(self.client.create(self.kind, data).await?)
            }
            Operation::Update => {
                let id = required_str(args, "id")?;
                let data = required_object(args, "data")?;
                tracing::info!(kind = %self.kind, id, "updating {}", self.kind.label());
                Ok(self.client.update(self.kind, id, data).await?)
            }
            Operation::Delete => {
                let id = required_str(args, "id")?;
                tracing::info!(kind = %self.kind, id, "deleting {}", self.kind.label());
                self.client.delete(self.kind, id).await?;
                Ok(json!({
                    "success": true,
                    "message": format!("{} {id} deleted", capitalize(self.kind.label())),
                }))
            }
        }
    }
}

impl ToolSpec for ResourceTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> JsonValue {
        let id = json!({"type": "string", "minLength": 1, "description": format!("{} id", self.kind.label())});
        let data = json!({
            "type": "object",
            "description": format!("TMF620 {} document", self.kind.referred_type()),
        });
        match self.op {
            Operation::Retrieve => json!({
                "type": "object",
                "properties": {
                    "id": id,
                    "fields": {"type": "string", "description": "Comma-separated attribute selection"},
                    "offset": {"type": "integer", "minimum": 0},
                    "limit": {"type": "integer", "minimum": 0},
                    "filter": {
                        "type": "object",
                        "description": "Attribute filter, e.g. {\"lifecycleStatus\": \"Active\"}",
                        "additionalProperties": {"type": ["string", "number", "boolean"]}
                    }
                }
            }),
            Operation::Create => json!({
                "type": "object",
                "properties": {"data": data},
                "required": ["data"]
            }),
            Operation::Update => json!({
                "type": "object",
                "properties": {"id": id, "data": data},
                "required": ["id", "data"]
            }),
            Operation::Delete => json!({
                "type": "object",
                "properties": {"id": id},
                "required": ["id"]
            }),
        }
    }
}

#[async_trait]
impl Tool for ResourceTool {
    async fn call(&self, arguments: &JsonValue) -> Result<JsonValue, ToolFailure> {
        let empty = Map::new();
        let args = match arguments {
            JsonValue::Object(map) => map,
            JsonValue::Null => &empty,
            other => {
                return Err(ToolFailure::invalid_arguments(format!(
                    "arguments must be an object, got {other}"
                )))
            }
        };
        let out = self.dispatch(args).await;
        if let Err(failure) = &out {
            tracing::warn!(tool = %self.name, kind = ?failure.kind, error = %failure, "tool call failed");
        }
        out
    }
}

fn optional_str<'a>(args: &'a Map<String, JsonValue>, key: &str) -> Result<Option<&'a str>, ToolFailure> {
    match args.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) if s.trim().is_empty() => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(ToolFailure::invalid_arguments(format!("field '{key}' must be a string"))),
    }
}

fn required_str<'a>(args: &'a Map<String, JsonValue>, key: &str) -> Result<&'a str, ToolFailure> {
    optional_str(args, key)?
        .ok_or_else(|| ToolFailure::invalid_arguments(format!("missing required field: {key}")))
}

fn required_object<'a>(args: &'a Map<String, JsonValue>, key: &str) -> Result<&'a JsonValue, ToolFailure> {
    match args.get(key) {
        Some(v @ JsonValue::Object(_)) => Ok(v),
        None | Some(JsonValue::Null) => Err(ToolFailure::invalid_arguments(format!("missing required field: {key}"))),
        Some(_) => Err(ToolFailure::invalid_arguments(format!("field '{key}' must be a JSON object"))),
    }
}

fn optional_u64(args: &Map<String, JsonValue>, key: &str) -> Result<Option<u64>, ToolFailure> {
    match args.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .map(Some)
            .ok_or_else(|| ToolFailure::invalid_arguments(format!("field '{key}' must be a non-negative integer"))),
    }
}

fn list_query(args: &Map<String, JsonValue>) -> Result<ListQuery, ToolFailure> {
    let filter = match args.get("filter") {
        None | Some(JsonValue::Null) => Map::new(),
        Some(JsonValue::Object(map)) => map.clone(),
        Some(_) => return Err(ToolFailure::invalid_arguments("field 'filter' must be a JSON object")),
    };
    let query = ListQuery {
        fields: optional_str(args, "fields")?.map(str::to_string),
        offset: optional_u64(args, "offset")?,
        limit: optional_u64(args, "limit")?,
        filter,
    };
    // Surface bad filter values here so they never reach the network.
    query.to_pairs().map_err(ToolFailure::invalid_arguments)?;
    Ok(query)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
