//! MCP server for the TMF620 gateway.
//!
//! Bridges the tool registry, the resource providers and the prompt templates
//! onto rmcp's `ServerHandler`. Tool failures are tool results (`isError`),
//! not protocol errors; only unknown names and URIs become `ErrorData`.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use rmcp::model::{
    AnnotateAble, CallToolRequestParam, CallToolResult, GetPromptRequestParam, GetPromptResult, Implementation,
    JsonObject, ListPromptsResult, ListResourceTemplatesResult, ListResourcesResult, ListToolsResult,
    PaginatedRequestParam, Prompt, PromptArgument, PromptMessage, PromptMessageRole, ProtocolVersion, RawResource,
    ReadResourceRequestParam, ReadResourceResult, Resource, ResourceContents, ResourceTemplate, ServerCapabilities,
    ServerInfo, Tool as McpTool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};
use serde_json::Value as JsonValue;

use crate::clients::catalog::CatalogClient;
use crate::core::content::into_call_result;
use crate::core::error::CatalogError;
use crate::infra::config::Config;
use crate::tools::registry::{build_registry, ToolRegistry};
use crate::{prompts, resources};

const INSTRUCTIONS: &str = "Tools for the TMF620 Product Catalog Management API. Each resource kind \
(catalog, category, product_specification, product_offering, product_offering_price) has _get, _create, \
_update and _delete tools. Read guide://tmf620/usage for how they chain and schema://tmf620/<path> for \
field descriptions. Failures are returned as {\"error\": {\"kind\", \"message\", \"status\"}}.";

#[derive(Clone)]
pub struct CatalogMcpServer {
    registry: ToolRegistry,
    client: CatalogClient,
}

impl CatalogMcpServer {
    pub fn new(client: CatalogClient) -> Self {
        let registry = build_registry(&client);
        Self { registry, client }
    }

    pub fn from_config(cfg: &Config) -> Result<Self, CatalogError> {
        Ok(Self::new(CatalogClient::from_config(&cfg.upstream)?))
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    fn mcp_tools(&self) -> Vec<McpTool> {
        self.registry
            .list()
            .into_iter()
            .map(|meta| {
                let schema: JsonObject = match meta.input_schema {
                    JsonValue::Object(map) => map,
                    _ => JsonObject::new(),
                };
                McpTool::new(meta.name, meta.description, Arc::new(schema))
            })
            .collect()
    }
}

fn mcp_resources() -> Vec<Resource> {
    resources::list()
        .into_iter()
        .map(|entry| {
            let mut raw = RawResource::new(entry.uri, entry.name);
            raw.description = Some(entry.description);
            raw.mime_type = Some(entry.mime_type);
            raw.no_annotation()
        })
        .collect()
}

fn mcp_resource_templates() -> Vec<ResourceTemplate> {
    resources::templates()
        .into_iter()
        .filter_map(|entry| match serde_json::to_value(&entry).and_then(serde_json::from_value) {
            Ok(template) => Some(template),
            Err(e) => {
                tracing::warn!(uri_template = %entry.uri_template, error = %e, "skipping resource template");
                None
            }
        })
        .collect()
}

fn mcp_prompts() -> Vec<Prompt> {
    prompts::PROMPTS
        .iter()
        .map(|def| {
            let args: Vec<PromptArgument> = def
                .arguments
                .iter()
                .filter_map(|a| serde_json::to_value(a).and_then(serde_json::from_value).ok())
                .collect();
            Prompt::new(def.name, Some(def.description), Some(args))
        })
        .collect()
}

/// Prompt arguments arrive as a JSON object; non-string values use their JSON text.
fn prompt_args(arguments: Option<JsonObject>) -> HashMap<String, String> {
    arguments
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| {
            let text = match v {
                JsonValue::String(s) => s,
                JsonValue::Null => String::new(),
                other => other.to_string(),
            };
            (k, text)
        })
        .collect()
}

impl ServerHandler for CatalogMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult::with_all_items(self.mcp_tools())))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            let name = request.name.to_string();
            let args = request.arguments.map(JsonValue::Object).unwrap_or(JsonValue::Null);
            tracing::debug!(tool = %name, args = %args, "tools/call");
            match self.registry.call(&name, &args).await {
                Some(outcome) => Ok(into_call_result(outcome)),
                None => Err(McpError::invalid_params(format!("unknown tool: {name}"), None)),
            }
        }
    }

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListResourcesResult::with_all_items(mcp_resources())))
    }

    fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListResourceTemplatesResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListResourceTemplatesResult::with_all_items(mcp_resource_templates())))
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            let uri = request.uri;
            match resources::read(&self.client, &uri).await {
                Ok((text, mime)) => {
                    let mut contents = ResourceContents::text(text, uri);
                    if let ResourceContents::TextResourceContents { mime_type, .. } = &mut contents {
                        *mime_type = Some(mime.to_string());
                    }
                    Ok(ReadResourceResult { contents: vec![contents] })
                }
                Err(resources::ReadError::UnknownUri(uri)) => {
                    Err(McpError::resource_not_found(format!("unknown resource: {uri}"), None))
                }
                Err(resources::ReadError::Upstream(failure)) => {
                    let data = Some(failure.to_json());
                    if failure.status == Some(404) {
                        Err(McpError::resource_not_found(failure.message, data))
                    } else {
                        Err(McpError::internal_error(failure.message, data))
                    }
                }
            }
        }
    }

    fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListPromptsResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListPromptsResult::with_all_items(mcp_prompts())))
    }

    fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<GetPromptResult, McpError>> + Send + '_ {
        let args = prompt_args(request.arguments);
        let result = match (prompts::find(&request.name), prompts::render(&request.name, &args)) {
            (Some(def), Some(text)) => Ok(GetPromptResult {
                description: Some(def.description.to_string()),
                messages: vec![PromptMessage::new_text(PromptMessageRole::User, text)],
            }),
            _ => Err(McpError::invalid_params(format!("unknown prompt: {}", request.name), None)),
        };
        std::future::ready(result)
    }
}
