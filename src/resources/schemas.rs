//! Static descriptions of each resource kind served under `schema://tmf620/{path}`.

use serde_json::{json, Value as JsonValue};

use crate::domain::ResourceKind;

/// Main fields, fields required on create, and a minimal example payload.
pub fn schema_document(kind: ResourceKind) -> JsonValue {
    let (fields, required, example) = match kind {
        ResourceKind::Catalog => (
            json!({
                "id": "string (server-assigned)",
                "href": "string (server-assigned)",
                "name": "string",
                "description": "string",
                "catalogType": "string, e.g. Product",
                "version": "string",
                "lifecycleStatus": "string, e.g. Active",
                "validFor": "TimePeriod {startDateTime, endDateTime}",
                "category": "CategoryRef[]",
                "relatedParty": "RelatedParty[]"
            }),
            json!(["name"]),
            json!({
                "name": "Test Catalog",
                "catalogType": "Product",
                "version": "1.0",
                "lifecycleStatus": "Active"
            }),
        ),
        ResourceKind::Category => (
            json!({
                "id": "string (server-assigned)",
                "href": "string (server-assigned)",
                "name": "string",
                "description": "string",
                "isRoot": "boolean",
                "parentId": "string",
                "lifecycleStatus": "string",
                "validFor": "TimePeriod",
                "subCategory": "CategoryRef[]",
                "productOffering": "ProductOfferingRef[]"
            }),
            json!(["name"]),
            json!({"name": "Broadband", "isRoot": true, "lifecycleStatus": "Active"}),
        ),
        ResourceKind::ProductSpecification => (
            json!({
                "id": "string (server-assigned)",
                "href": "string (server-assigned)",
                "name": "string",
                "description": "string",
                "brand": "string",
                "productNumber": "string",
                "isBundle": "boolean",
                "lifecycleStatus": "string",
                "version": "string",
                "productSpecCharacteristic": "ProductSpecificationCharacteristic[]",
                "bundledProductSpecification": "BundledProductSpecification[]"
            }),
            json!(["name"]),
            json!({
                "name": "Fibre Access",
                "brand": "Acme",
                "isBundle": false,
                "lifecycleStatus": "Active"
            }),
        ),
        ResourceKind::ProductOffering => (
            json!({
                "id": "string (server-assigned)",
                "href": "string (server-assigned)",
                "name": "string",
                "description": "string",
                "isBundle": "boolean",
                "isSellable": "boolean",
                "lifecycleStatus": "string",
                "version": "string",
                "validFor": "TimePeriod",
                "productSpecification": "ProductSpecificationRef",
                "category": "CategoryRef[]",
                "productOfferingPrice": "ProductOfferingPriceRef[]"
            }),
            json!(["name"]),
            json!({
                "name": "Fibre 1G",
                "isSellable": true,
                "lifecycleStatus": "Active",
                "productSpecification": {"id": "<specification id>", "@referredType": "ProductSpecification"},
                "category": [{"id": "<category id>", "@referredType": "Category"}]
            }),
        ),
        ResourceKind::ProductOfferingPrice => (
            json!({
                "id": "string (server-assigned)",
                "href": "string (server-assigned)",
                "name": "string",
                "description": "string",
                "priceType": "string: recurring | oneTime | usage",
                "recurringChargePeriodType": "string, e.g. month",
                "recurringChargePeriodLength": "integer",
                "price": "Money {unit, value}",
                "lifecycleStatus": "string",
                "isBundle": "boolean",
                "validFor": "TimePeriod"
            }),
            json!(["name", "priceType"]),
            json!({
                "name": "Fibre 1G monthly",
                "priceType": "recurring",
                "recurringChargePeriodType": "month",
                "recurringChargePeriodLength": 1,
                "price": {"unit": "EUR", "value": 39.99},
                "lifecycleStatus": "Active"
            }),
        ),
    };

    json!({
        "resource": kind.referred_type(),
        "path": kind.path(),
        "tools": {
            "get": format!("{}_get", kind.tool_prefix()),
            "create": format!("{}_create", kind.tool_prefix()),
            "update": format!("{}_update", kind.tool_prefix()),
            "delete": format!("{}_delete", kind.tool_prefix()),
        },
        "fields": fields,
        "requiredOnCreate": required,
        "example": example,
    })
}
