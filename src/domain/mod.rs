//! TMF620 resource kinds and the per-operation status policy.
//!
//! Every resource the gateway wraps is described by one row of a lookup table
//! instead of a dedicated module: the URL path segment, the tool-name prefix,
//! and the `@referredType` used when other entities point at it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    Catalog,
    Category,
    ProductSpecification,
    ProductOffering,
    ProductOfferingPrice,
}

struct KindRow {
    kind: ResourceKind,
    path: &'static str,
    tool_prefix: &'static str,
    referred_type: &'static str,
    label: &'static str,
}

static KINDS: [KindRow; 5] = [
    KindRow {
        kind: ResourceKind::Catalog,
        path: "catalog",
        tool_prefix: "catalog",
        referred_type: "Catalog",
        label: "catalog",
    },
    KindRow {
        kind: ResourceKind::Category,
        path: "category",
        tool_prefix: "category",
        referred_type: "Category",
        label: "category",
    },
    KindRow {
        kind: ResourceKind::ProductSpecification,
        path: "productSpecification",
        tool_prefix: "product_specification",
        referred_type: "ProductSpecification",
        label: "product specification",
    },
    KindRow {
        kind: ResourceKind::ProductOffering,
        path: "productOffering",
        tool_prefix: "product_offering",
        referred_type: "ProductOffering",
        label: "product offering",
    },
    KindRow {
        kind: ResourceKind::ProductOfferingPrice,
        path: "productOfferingPrice",
        tool_prefix: "product_offering_price",
        referred_type: "ProductOfferingPrice",
        label: "product offering price",
    },
];

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Catalog,
        ResourceKind::Category,
        ResourceKind::ProductSpecification,
        ResourceKind::ProductOffering,
        ResourceKind::ProductOfferingPrice,
    ];

    fn row(self) -> &'static KindRow {
        // KINDS is declared in the same order as ALL.
        &KINDS[self as usize]
    }

    /// URL path segment under the API base, e.g. `productOffering`.
    pub fn path(self) -> &'static str {
        self.row().path
    }

    /// Snake-case prefix for tool names, e.g. `product_offering`.
    pub fn tool_prefix(self) -> &'static str {
        self.row().tool_prefix
    }

    /// Value of `@referredType` in entity references.
    pub fn referred_type(self) -> &'static str {
        self.row().referred_type
    }

    /// Lower-case human label for log lines and messages.
    pub fn label(self) -> &'static str {
        self.row().label
    }

    /// Resolve a kind from its path segment, tool prefix or referred type.
    pub fn lookup(name: &str) -> Option<ResourceKind> {
        KINDS
            .iter()
            .find(|r| r.path == name || r.tool_prefix == name || r.referred_type == name)
            .map(|r| r.kind)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::lookup(s).ok_or_else(|| format!("unknown resource kind: {s}"))
    }
}

/// The four operations every resource kind supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Retrieve,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Retrieve,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
    ];

    /// Suffix used in tool names (`catalog_get`, `catalog_create`, ...).
    pub fn tool_suffix(self) -> &'static str {
        match self {
            Operation::Retrieve => "get",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    pub fn method(self) -> reqwest::Method {
        match self {
            Operation::Retrieve => reqwest::Method::GET,
            Operation::Create => reqwest::Method::POST,
            Operation::Update => reqwest::Method::PATCH,
            Operation::Delete => reqwest::Method::DELETE,
        }
    }

    /// Upstream statuses that count as success. Create is deliberately
    /// 201-only: a 200 with a body is still a failure.
    pub fn accepted_statuses(self) -> &'static [u16] {
        match self {
            Operation::Retrieve => &[200],
            Operation::Create => &[201],
            Operation::Update => &[200, 201, 202, 204],
            Operation::Delete => &[204],
        }
    }

    pub fn accepts(self, status: u16) -> bool {
        self.accepted_statuses().contains(&status)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tool_suffix())
    }
}

/// Optional query parameters of the retrieve operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub fields: Option<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    /// Attribute filter; each entry becomes `key=value`.
    pub filter: Map<String, JsonValue>,
}

impl ListQuery {
    /// Flatten into `(name, value)` pairs in a stable order: fields, offset,
    /// limit, then filter entries. Non-scalar filter values are an error.
    pub fn to_pairs(&self) -> Result<Vec<(String, String)>, String> {
        let mut pairs = Vec::new();
        if let Some(fields) = self.fields.as_deref().filter(|f| !f.is_empty()) {
            pairs.push(("fields".to_string(), fields.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        for (key, value) in &self.filter {
            let text = match value {
                JsonValue::String(s) => s.clone(),
                JsonValue::Number(n) => n.to_string(),
                JsonValue::Bool(b) => b.to_string(),
                other => {
                    return Err(format!(
                        "filter value for '{key}' must be a string, number or boolean, got {other}"
                    ))
                }
            };
            pairs.push((key.clone(), text));
        }
        Ok(pairs)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_none() && self.offset.is_none() && self.limit.is_none() && self.filter.is_empty()
    }
}
