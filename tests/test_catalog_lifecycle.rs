//! End-to-end tool behaviour against a simulated TMF620 upstream.

use std::sync::Arc;

use httpmock::prelude::*;
use httpmock::Method::PATCH;
use serde_json::{json, Value};

use tmf620_mcp_gateway::clients::catalog::CatalogClient;
use tmf620_mcp_gateway::core::error::FailureKind;
use tmf620_mcp_gateway::domain::ResourceKind;
use tmf620_mcp_gateway::tools::registry::{build_registry, ToolRegistry};

fn registry(server: &MockServer) -> ToolRegistry {
    build_registry(&CatalogClient::new(server.base_url()).unwrap())
}

async fn call(reg: &ToolRegistry, name: &str, args: Value) -> Result<Value, tmf620_mcp_gateway::core::error::ToolFailure> {
    reg.call(name, &args).await.expect("tool exists")
}

#[tokio::test]
async fn create_then_get_returns_the_same_fields() {
    let server = MockServer::start();
    let payload = json!({"name": "Test Catalog", "catalogType": "Product", "version": "1.0"});
    server.mock(|when, then| {
        when.method(POST).path("/catalog").json_body(payload.clone());
        then.status(201)
            .json_body(json!({"id": "c-1", "href": "/catalog/c-1", "name": "Test Catalog", "catalogType": "Product", "version": "1.0"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/catalog/c-1");
        then.status(200)
            .json_body(json!({"id": "c-1", "href": "/catalog/c-1", "name": "Test Catalog", "catalogType": "Product", "version": "1.0"}));
    });

    let reg = registry(&server);
    let created = call(&reg, "catalog_create", json!({"data": payload.clone()})).await.unwrap();
    let id = created["id"].as_str().unwrap();
    assert_eq!(created["name"], "Test Catalog");

    let fetched = call(&reg, "catalog_get", json!({"id": id})).await.unwrap();
    for key in ["name", "catalogType", "version"] {
        assert_eq!(fetched[key], payload[key], "field {key}");
    }
}

fn sample(kind: ResourceKind) -> Value {
    match kind {
        ResourceKind::ProductOfferingPrice => json!({"name": "Monthly fee", "priceType": "recurring"}),
        other => json!({"name": format!("Sample {}", other.label()), "description": "created by test"}),
    }
}

#[tokio::test]
async fn create_then_get_holds_for_every_kind() {
    let server = MockServer::start();
    let reg = registry(&server);
    for kind in ResourceKind::ALL {
        let id = format!("{}-1", kind.path());
        let payload = sample(kind);
        let mut stored = payload.clone();
        stored["id"] = json!(id);
        let create_path = format!("/{}", kind.path());
        let item_path = format!("/{}/{id}", kind.path());
        let (body, created) = (payload.clone(), stored.clone());
        server.mock(move |when, then| {
            when.method(POST).path(create_path).json_body(body);
            then.status(201).json_body(created);
        });
        server.mock(move |when, then| {
            when.method(GET).path(item_path);
            then.status(200).json_body(stored);
        });

        let prefix = kind.tool_prefix();
        let created = call(&reg, &format!("{prefix}_create"), json!({"data": payload.clone()}))
            .await
            .unwrap();
        assert_eq!(created["id"], id.as_str());
        let fetched = call(&reg, &format!("{prefix}_get"), json!({"id": id})).await.unwrap();
        for (key, value) in payload.as_object().unwrap() {
            assert_eq!(&fetched[key], value, "{prefix}: field {key}");
        }
    }
}

#[tokio::test]
async fn delete_then_get_fails_for_every_kind() {
    let server = MockServer::start();
    let reg = registry(&server);
    for kind in ResourceKind::ALL {
        let item_path = format!("/{}/gone-1", kind.path());
        let get_path = item_path.clone();
        server.mock(move |when, then| {
            when.method(DELETE).path(item_path);
            then.status(204);
        });
        server.mock(move |when, then| {
            when.method(GET).path(get_path);
            then.status(404).json_body(json!({"code": "404", "reason": "Not found"}));
        });

        let prefix = kind.tool_prefix();
        let deleted = call(&reg, &format!("{prefix}_delete"), json!({"id": "gone-1"})).await.unwrap();
        assert_eq!(deleted["success"], true);
        let err = call(&reg, &format!("{prefix}_get"), json!({"id": "gone-1"})).await.unwrap_err();
        assert_eq!(err.status, Some(404), "{prefix}");
    }
}

#[tokio::test]
async fn update_then_get_shows_the_new_description() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PATCH)
            .path("/productOffering/po-1")
            .json_body(json!({"description": "Now faster"}));
        then.status(200).json_body(json!({"id": "po-1", "description": "Now faster"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/productOffering/po-1");
        then.status(200).json_body(json!({"id": "po-1", "name": "Fibre 1G", "description": "Now faster"}));
    });

    let reg = registry(&server);
    call(&reg, "product_offering_update", json!({"id": "po-1", "data": {"description": "Now faster"}}))
        .await
        .unwrap();
    let fetched = call(&reg, "product_offering_get", json!({"id": "po-1"})).await.unwrap();
    assert_eq!(fetched["description"], "Now faster");
}

#[tokio::test]
async fn delete_then_get_is_a_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(DELETE).path("/category/cat-1");
        then.status(204);
    });
    server.mock(|when, then| {
        when.method(GET).path("/category/cat-1");
        then.status(404).json_body(json!({"code": "404", "reason": "Not found"}));
    });

    let reg = registry(&server);
    let deleted = call(&reg, "category_delete", json!({"id": "cat-1"})).await.unwrap();
    assert_eq!(deleted["success"], true);

    let err = call(&reg, "category_get", json!({"id": "cat-1"})).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Status);
    assert_eq!(err.status, Some(404));
}

#[tokio::test]
async fn create_with_non_201_fails() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/productSpecification");
        then.status(200).json_body(json!({"id": "ps-1", "name": "Fibre Access"}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/category");
        then.status(202);
    });

    let reg = registry(&server);
    let err = call(&reg, "product_specification_create", json!({"data": {"name": "Fibre Access"}}))
        .await
        .unwrap_err();
    assert_eq!(err.status, Some(200));
    let err = call(&reg, "category_create", json!({"data": {"name": "Broadband"}})).await.unwrap_err();
    assert_eq!(err.status, Some(202));
}

#[tokio::test]
async fn concurrent_creates_get_distinct_ids() {
    let server = MockServer::start();
    for n in 0..8 {
        server.mock(move |when, then| {
            when.method(POST)
                .path("/productOfferingPrice")
                .json_body(json!({"name": format!("price-{n}"), "priceType": "oneTime"}));
            then.status(201).json_body(json!({"id": format!("pop-{n}"), "name": format!("price-{n}")}));
        });
    }

    let reg = Arc::new(registry(&server));
    let mut handles = Vec::new();
    for n in 0..8 {
        let reg = reg.clone();
        handles.push(tokio::spawn(async move {
            let args = json!({"data": {"name": format!("price-{n}"), "priceType": "oneTime"}});
            reg.call("product_offering_price_create", &args).await.unwrap().unwrap()
        }));
    }
    let mut ids = Vec::new();
    for h in handles {
        ids.push(h.await.unwrap()["id"].as_str().unwrap().to_string());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8);
}

#[tokio::test]
async fn patch_on_nonexistent_id_is_a_failure_value() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PATCH).path("/catalog/does-not-exist");
        then.status(404).body("Not Found");
    });

    let reg = registry(&server);
    let err = call(&reg, "catalog_update", json!({"id": "does-not-exist", "data": {"description": "x"}}))
        .await
        .unwrap_err();
    let shape = err.to_json();
    assert_eq!(shape["error"]["kind"], "status");
    assert_eq!(shape["error"]["status"], 404);
}

#[tokio::test]
async fn argument_errors_never_reach_the_upstream() {
    let server = MockServer::start();
    let any = server.mock(|when, then| {
        when.path_contains("/");
        then.status(500);
    });

    let reg = registry(&server);
    let err = call(&reg, "catalog_update", json!({"data": {"description": "x"}})).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidArguments);
    let err = call(&reg, "catalog_create", json!({"data": []})).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidArguments);
    assert_eq!(any.hits(), 0);
}
