//! Read-only MCP resources: live catalog collections and items, static
//! per-kind schemas, and two reference documents.

pub mod docs;
pub mod schemas;

use percent_encoding::percent_decode_str;
use serde::Serialize;

use crate::clients::catalog::CatalogClient;
use crate::core::error::ToolFailure;
use crate::domain::ResourceKind;

pub const JSON_MIME: &str = "application/json";
pub const TEXT_MIME: &str = "text/plain";

const LIVE_SCHEME: &str = "tmf620://";
const SCHEMA_PREFIX: &str = "schema://tmf620/";
pub const API_CATEGORIES_URI: &str = "apis://categories";
pub const USAGE_GUIDE_URI: &str = "guide://tmf620/usage";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceUri {
    Collection(ResourceKind),
    Item(ResourceKind, String),
    Schema(ResourceKind),
    ApiCategories,
    UsageGuide,
}

impl ResourceUri {
    pub fn parse(uri: &str) -> Option<ResourceUri> {
        match uri {
            API_CATEGORIES_URI => return Some(ResourceUri::ApiCategories),
            USAGE_GUIDE_URI => return Some(ResourceUri::UsageGuide),
            _ => {}
        }
        if let Some(path) = uri.strip_prefix(SCHEMA_PREFIX) {
            return kind_for_path(path).map(ResourceUri::Schema);
        }
        let rest = uri.strip_prefix(LIVE_SCHEME)?;
        match rest.split_once('/') {
            None => kind_for_path(rest).map(ResourceUri::Collection),
            Some((path, id)) if !id.is_empty() && !id.contains('/') => {
                let kind = kind_for_path(path)?;
                // Template expansion leaves the id percent-encoded; the client re-encodes it.
                let id = percent_decode_str(id).decode_utf8().ok()?;
                Some(ResourceUri::Item(kind, id.into_owned()))
            }
            Some(_) => None,
        }
    }
}

// Only the URL path segment names a kind in a URI.
fn kind_for_path(path: &str) -> Option<ResourceKind> {
    ResourceKind::ALL.into_iter().find(|k| k.path() == path)
}

/// A concrete resource as advertised by `resources/list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEntry {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

/// A URI template as advertised by `resources/templates/list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateEntry {
    pub uri_template: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

pub fn list() -> Vec<ResourceEntry> {
    let mut out = Vec::new();
    for kind in ResourceKind::ALL {
        out.push(ResourceEntry {
            uri: format!("{LIVE_SCHEME}{}", kind.path()),
            name: format!("{}_list", kind.tool_prefix()),
            description: format!("All {} resources from the upstream catalog", kind.label()),
            mime_type: JSON_MIME.into(),
        });
    }
    for kind in ResourceKind::ALL {
        out.push(ResourceEntry {
            uri: format!("{SCHEMA_PREFIX}{}", kind.path()),
            name: format!("{}_schema", kind.tool_prefix()),
            description: format!("Main fields, required fields and an example {}", kind.label()),
            mime_type: JSON_MIME.into(),
        });
    }
    out.push(ResourceEntry {
        uri: API_CATEGORIES_URI.into(),
        name: "api_categories".into(),
        description: "Main categories of TM Forum Open APIs".into(),
        mime_type: TEXT_MIME.into(),
    });
    out.push(ResourceEntry {
        uri: USAGE_GUIDE_URI.into(),
        name: "usage_guide".into(),
        description: "How the catalog tools chain together".into(),
        mime_type: TEXT_MIME.into(),
    });
    out
}

pub fn templates() -> Vec<TemplateEntry> {
    ResourceKind::ALL
        .into_iter()
        .map(|kind| TemplateEntry {
            uri_template: format!("{LIVE_SCHEME}{}/{{id}}", kind.path()),
            name: format!("{}_item", kind.tool_prefix()),
            description: format!("A single {} by id", kind.label()),
            mime_type: JSON_MIME.into(),
        })
        .collect()
}

#[derive(Debug)]
pub enum ReadError {
    UnknownUri(String),
    Upstream(ToolFailure),
}

/// Text body and mime type of a resource. Live URIs hit the upstream.
pub async fn read(client: &CatalogClient, uri: &str) -> Result<(String, &'static str), ReadError> {
    let parsed = ResourceUri::parse(uri).ok_or_else(|| ReadError::UnknownUri(uri.to_string()))?;
    tracing::info!(uri, "reading resource");
    let body = match parsed {
        ResourceUri::Collection(kind) => {
            let v = client.list(kind).await.map_err(|e| ReadError::Upstream(e.into()))?;
            (pretty(&v), JSON_MIME)
        }
        ResourceUri::Item(kind, id) => {
            let v = client.get(kind, &id).await.map_err(|e| ReadError::Upstream(e.into()))?;
            (pretty(&v), JSON_MIME)
        }
        ResourceUri::Schema(kind) => (pretty(&schemas::schema_document(kind)), JSON_MIME),
        ResourceUri::ApiCategories => (docs::API_CATEGORIES.to_string(), TEXT_MIME),
        ResourceUri::UsageGuide => (docs::USAGE_GUIDE.to_string(), TEXT_MIME),
    };
    Ok(body)
}

fn pretty(v: &serde_json::Value) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn parses_every_uri_family() {
        assert_eq!(
            ResourceUri::parse("tmf620://productOffering"),
            Some(ResourceUri::Collection(ResourceKind::ProductOffering))
        );
        assert_eq!(
            ResourceUri::parse("tmf620://catalog/c-1"),
            Some(ResourceUri::Item(ResourceKind::Catalog, "c-1".into()))
        );
        assert_eq!(
            ResourceUri::parse("schema://tmf620/productOfferingPrice"),
            Some(ResourceUri::Schema(ResourceKind::ProductOfferingPrice))
        );
        assert_eq!(ResourceUri::parse("apis://categories"), Some(ResourceUri::ApiCategories));
        assert_eq!(ResourceUri::parse("guide://tmf620/usage"), Some(ResourceUri::UsageGuide));
    }

    #[test]
    fn item_ids_are_percent_decoded() {
        assert_eq!(
            ResourceUri::parse("tmf620://catalog/a%20b"),
            Some(ResourceUri::Item(ResourceKind::Catalog, "a b".into()))
        );
        assert_eq!(
            ResourceUri::parse("tmf620://productOffering/po%2F1"),
            Some(ResourceUri::Item(ResourceKind::ProductOffering, "po/1".into()))
        );
        assert_eq!(ResourceUri::parse("tmf620://catalog/%FF"), None);
    }

    #[test]
    fn rejects_unknown_uris() {
        assert_eq!(ResourceUri::parse("tmf620://product_offering"), None);
        assert_eq!(ResourceUri::parse("tmf620://catalog/"), None);
        assert_eq!(ResourceUri::parse("tmf620://catalog/a/b"), None);
        assert_eq!(ResourceUri::parse("file:///etc/passwd"), None);
    }

    #[test]
    fn listing_covers_kinds_schemas_and_docs() {
        let entries = list();
        assert_eq!(entries.len(), 12);
        assert!(entries.iter().any(|e| e.uri == "tmf620://productOfferingPrice"));
        assert!(entries.iter().any(|e| e.uri == "schema://tmf620/category"));
        assert_eq!(templates().len(), 5);
        assert_eq!(templates()[0].uri_template, "tmf620://catalog/{id}");
    }

    #[tokio::test]
    async fn reading_an_item_hits_the_upstream() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/category/cat-1");
            then.status(200).json_body(json!({"id": "cat-1", "name": "Broadband"}));
        });
        let client = CatalogClient::new(server.base_url()).unwrap();
        let (text, mime) = read(&client, "tmf620://category/cat-1").await.unwrap();
        assert_eq!(mime, JSON_MIME);
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["name"], "Broadband");
    }

    #[tokio::test]
    async fn static_documents_never_touch_the_network() {
        let client = CatalogClient::new("http://127.0.0.1:9").unwrap();
        let (text, mime) = read(&client, "apis://categories").await.unwrap();
        assert_eq!(mime, TEXT_MIME);
        assert!(text.contains("Product Management APIs"));
        let (schema, _) = read(&client, "schema://tmf620/catalog").await.unwrap();
        assert!(schema.contains("catalogType"));
    }

    #[tokio::test]
    async fn upstream_failure_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/catalog");
            then.status(503);
        });
        let client = CatalogClient::new(server.base_url()).unwrap();
        match read(&client, "tmf620://catalog").await {
            Err(ReadError::Upstream(f)) => assert_eq!(f.status, Some(503)),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(read(&client, "tmf620://nope").await, Err(ReadError::UnknownUri(_))));
    }
}
