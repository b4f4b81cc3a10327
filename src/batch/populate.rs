use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::batch::payloads::{entity_ref, Payload, PayloadSet};
use crate::batch::run_bounded;
use crate::clients::catalog::CatalogClient;
use crate::core::error::CatalogError;
use crate::domain::ResourceKind;
use crate::infra::config::BatchConfig;

#[derive(Debug, Error)]
pub enum PopulateError {
    #[error("failed to create {} '{name}': {source}", .kind.label())]
    Create {
        kind: ResourceKind,
        name: String,
        #[source]
        source: CatalogError,
        report: Box<PopulateReport>,
    },
    #[error("created {} '{name}' but the response carried no id", .kind.label())]
    MissingId {
        kind: ResourceKind,
        name: String,
        report: Box<PopulateReport>,
    },
}

impl PopulateError {
    /// What was created before population stopped.
    pub fn report(&self) -> &PopulateReport {
        match self {
            PopulateError::Create { report, .. } | PopulateError::MissingId { report, .. } => report,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Created {
    pub kind: ResourceKind,
    pub base: String,
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulateReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub created: Vec<Created>,
    pub linked: usize,
    pub link_failures: usize,
}

impl PopulateReport {
    fn start() -> Self {
        Self { started_at: Utc::now(), finished_at: None, created: Vec::new(), linked: 0, link_failures: 0 }
    }

    pub fn count(&self, kind: ResourceKind) -> usize {
        self.created.iter().filter(|c| c.kind == kind).count()
    }

    pub fn id_of(&self, kind: ResourceKind, name: &str) -> Option<&str> {
        self.created.iter().find(|c| c.kind == kind && c.name == name).map(|c| c.id.as_str())
    }

    fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    // First created resource of `kind` whose name contains `needle`.
    fn find_by_name(&self, kind: ResourceKind, needle: &str) -> Option<&Created> {
        if needle.is_empty() {
            return None;
        }
        self.created.iter().find(|c| c.kind == kind && c.name.contains(needle))
    }

    fn by_base(&self, kind: ResourceKind, base: &str) -> Option<&Created> {
        self.created.iter().find(|c| c.kind == kind && c.base == base)
    }
}

/// Create every payload in dependency order, then link prices to offerings.
pub async fn populate(
    client: &CatalogClient,
    set: &PayloadSet,
    cfg: &BatchConfig,
) -> Result<PopulateReport, PopulateError> {
    let mut report = PopulateReport::start();
    tracing::info!(payloads = set.payloads.len(), concurrency = cfg.concurrency, "populating catalog");

    let independent: Vec<Payload> = [ResourceKind::Catalog, ResourceKind::Category, ResourceKind::ProductSpecification]
        .into_iter()
        .flat_map(|kind| set.of_kind(kind).cloned())
        .collect();
    report = create_stage(client, independent, cfg.concurrency, report).await?;

    let offerings: Vec<Payload> = set
        .of_kind(ResourceKind::ProductOffering)
        .cloned()
        .map(|mut p| {
            resolve_offering_refs(&mut p.body, &report, &cfg.href_base);
            p
        })
        .collect();
    report = create_stage(client, offerings, cfg.concurrency, report).await?;

    let prices: Vec<Payload> = set
        .of_kind(ResourceKind::ProductOfferingPrice)
        .cloned()
        .map(|mut p| {
            // Offerings point at prices, never the other way round.
            if let Some(obj) = p.body.as_object_mut() {
                obj.remove("productOffering");
            }
            p
        })
        .collect();
    report = create_stage(client, prices, cfg.concurrency, report).await?;

    link_prices(client, &mut report, cfg).await;

    let report = report.finish();
    tracing::info!(
        created = report.created.len(),
        linked = report.linked,
        link_failures = report.link_failures,
        "catalog populated"
    );
    Ok(report)
}

async fn create_stage(
    client: &CatalogClient,
    payloads: Vec<Payload>,
    concurrency: usize,
    mut report: PopulateReport,
) -> Result<PopulateReport, PopulateError> {
    if payloads.is_empty() {
        return Ok(report);
    }
    let results = run_bounded(payloads, concurrency, |p: Payload| {
        let client = client.clone();
        async move {
            let name = p.name();
            let out = client.create(p.kind, &p.body).await;
            (p, name, out)
        }
    })
    .await;

    let mut first_failure: Option<(ResourceKind, String, Option<CatalogError>)> = None;
    for (p, name, out) in results {
        match out {
            Ok(body) => match body.get("id").and_then(JsonValue::as_str) {
                Some(id) => {
                    tracing::info!(kind = %p.kind, name = %name, id, "created");
                    report.created.push(Created { kind: p.kind, base: p.base, name, id: id.to_string() });
                }
                None => {
                    tracing::error!(kind = %p.kind, name = %name, "created resource has no id");
                    first_failure.get_or_insert((p.kind, name, None));
                }
            },
            Err(e) => {
                tracing::error!(kind = %p.kind, name = %name, error = %e, "create failed");
                first_failure.get_or_insert((p.kind, name, Some(e)));
            }
        }
    }

    match first_failure {
        None => Ok(report),
        Some((kind, name, Some(source))) => Err(PopulateError::Create {
            kind,
            name,
            source,
            report: Box::new(report.finish()),
        }),
        Some((kind, name, None)) => Err(PopulateError::MissingId { kind, name, report: Box::new(report.finish()) }),
    }
}

/// Point an offering's specification and category references at the
/// resources created in this run. Unmatched references stay as they are.
fn resolve_offering_refs(body: &mut JsonValue, report: &PopulateReport, href_base: &str) {
    let Some(obj) = body.as_object_mut() else {
        return;
    };

    if let Some(spec) = obj.get_mut("productSpecification") {
        let wanted = ref_name(spec);
        if let Some(found) = report.find_by_name(ResourceKind::ProductSpecification, &wanted) {
            *spec = entity_ref(ResourceKind::ProductSpecification, &found.id, &wanted, href_base);
        }
    }

    if let Some(JsonValue::Array(categories)) = obj.get_mut("category") {
        for category in categories.iter_mut() {
            let wanted = ref_name(category);
            if let Some(found) = report.find_by_name(ResourceKind::Category, &wanted) {
                *category = entity_ref(ResourceKind::Category, &found.id, &wanted, href_base);
            }
        }
    }
}

fn ref_name(reference: &JsonValue) -> String {
    reference.get("name").and_then(JsonValue::as_str).unwrap_or_default().to_string()
}

struct Link {
    offering_id: String,
    price_id: String,
    price_name: String,
}

async fn link_prices(client: &CatalogClient, report: &mut PopulateReport, cfg: &BatchConfig) {
    let links: Vec<Link> = report
        .created
        .iter()
        .filter(|c| c.kind == ResourceKind::ProductOfferingPrice)
        .filter_map(|price| {
            report.by_base(ResourceKind::ProductOffering, &price.base).map(|offering| Link {
                offering_id: offering.id.clone(),
                price_id: price.id.clone(),
                price_name: price.name.clone(),
            })
        })
        .collect();
    if links.is_empty() {
        return;
    }

    // Several prices may share an offering; link those one after another so
    // the read-modify-write cycles do not overwrite each other.
    let mut grouped: HashMap<String, Vec<Link>> = HashMap::new();
    for link in links {
        grouped.entry(link.offering_id.clone()).or_default().push(link);
    }
    let groups: Vec<Vec<Link>> = grouped.into_values().collect();

    let href_base = cfg.href_base.clone();
    let outcomes = run_bounded(groups, cfg.concurrency, |group: Vec<Link>| {
        let client = client.clone();
        let href_base = href_base.clone();
        async move {
            let mut linked = 0usize;
            let mut failed = 0usize;
            for link in group {
                match link_one(&client, &link, &href_base).await {
                    Ok(true) => linked += 1,
                    Ok(false) => {}
                    Err(e) => {
                        tracing::error!(
                            offering = %link.offering_id,
                            price = %link.price_id,
                            error = %e,
                            "failed to link price to offering"
                        );
                        failed += 1;
                    }
                }
            }
            (linked, failed)
        }
    })
    .await;

    for (linked, failed) in outcomes {
        report.linked += linked;
        report.link_failures += failed;
    }
}

/// `Ok(false)` when the offering already references the price.
async fn link_one(client: &CatalogClient, link: &Link, href_base: &str) -> Result<bool, CatalogError> {
    let offering = client.get(ResourceKind::ProductOffering, &link.offering_id).await?;
    let mut prices = match offering.get("productOfferingPrice") {
        Some(JsonValue::Array(items)) => items.clone(),
        _ => Vec::new(),
    };
    let already = prices
        .iter()
        .any(|p| p.get("id").and_then(JsonValue::as_str) == Some(link.price_id.as_str()));
    if already {
        tracing::debug!(offering = %link.offering_id, price = %link.price_id, "price already linked");
        return Ok(false);
    }
    prices.push(entity_ref(ResourceKind::ProductOfferingPrice, &link.price_id, &link.price_name, href_base));
    let patch = serde_json::json!({ "productOfferingPrice": prices });
    client.update(ResourceKind::ProductOffering, &link.offering_id, &patch).await?;
    tracing::info!(offering = %link.offering_id, price = %link.price_id, "linked price to offering");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use httpmock::Method::PATCH;
    use serde_json::json;
    use std::path::PathBuf;

    const BASE: &str = "https://localhost/r1-productcatalogmanagement/tmf-api";

    fn payload(kind: ResourceKind, base: &str, body: JsonValue) -> Payload {
        Payload { kind, base: base.into(), file: PathBuf::from(format!("{base}.json")), body }
    }

    fn cfg() -> BatchConfig {
        BatchConfig { concurrency: 2, href_base: BASE.into() }
    }

    #[test]
    fn offering_refs_resolve_by_name_containment() {
        let mut report = PopulateReport::start();
        report.created.push(Created {
            kind: ResourceKind::ProductSpecification,
            base: "fibre".into(),
            name: "Fibre Access 1G".into(),
            id: "ps-1".into(),
        });
        report.created.push(Created {
            kind: ResourceKind::Category,
            base: "bb".into(),
            name: "Broadband".into(),
            id: "cat-1".into(),
        });
        let mut body = json!({
            "name": "Fibre 1G",
            "productSpecification": {"name": "Fibre Access"},
            "category": [{"name": "Broadband"}, {"name": "Unknown"}]
        });
        resolve_offering_refs(&mut body, &report, BASE);
        assert_eq!(body["productSpecification"]["id"], "ps-1");
        assert_eq!(body["productSpecification"]["@referredType"], "ProductSpecification");
        assert_eq!(
            body["category"],
            json!([entity_ref(ResourceKind::Category, "cat-1", "Broadband", BASE), {"name": "Unknown"}])
        );
    }

    #[test]
    fn unmatched_refs_are_left_alone() {
        let report = PopulateReport::start();
        let mut body = json!({"productSpecification": {"name": "Ghost"}, "category": [{"name": "Nope"}]});
        let before = body.clone();
        resolve_offering_refs(&mut body, &report, BASE);
        assert_eq!(body, before);
    }

    #[tokio::test]
    async fn populates_in_order_and_links_prices() {
        let server = MockServer::start();
        let spec = server.mock(|when, then| {
            when.method(POST).path("/productSpecification");
            then.status(201).json_body(json!({"id": "ps-1", "name": "Fibre Access"}));
        });
        let offering = server.mock(|when, then| {
            when.method(POST)
                .path("/productOffering")
                .body_contains("\"id\":\"ps-1\"");
            then.status(201).json_body(json!({"id": "po-1", "name": "Fibre 1G"}));
        });
        let price = server.mock(|when, then| {
            when.method(POST).path("/productOfferingPrice").matches(|req| {
                let body: JsonValue = serde_json::from_slice(req.body.as_deref().unwrap_or_default()).unwrap_or_default();
                body.get("productOffering").is_none()
            });
            then.status(201).json_body(json!({"id": "pop-1", "name": "Fibre monthly"}));
        });
        let get_offering = server.mock(|when, then| {
            when.method(GET).path("/productOffering/po-1");
            then.status(200).json_body(json!({"id": "po-1", "name": "Fibre 1G"}));
        });
        let patch = server.mock(|when, then| {
            when.method(PATCH).path("/productOffering/po-1").body_contains("pop-1");
            then.status(200).json_body(json!({"id": "po-1"}));
        });

        let set = PayloadSet {
            payloads: vec![
                payload(ResourceKind::ProductSpecification, "fibre", json!({"name": "Fibre Access"})),
                payload(
                    ResourceKind::ProductOffering,
                    "fibre",
                    json!({"name": "Fibre 1G", "productSpecification": {"name": "Fibre Access"}}),
                ),
                payload(
                    ResourceKind::ProductOfferingPrice,
                    "fibre",
                    json!({"name": "Fibre monthly", "productOffering": {"id": "stale"}}),
                ),
            ],
        };
        let client = CatalogClient::new(server.base_url()).unwrap();
        let report = populate(&client, &set, &cfg()).await.unwrap();

        spec.assert();
        offering.assert();
        price.assert();
        get_offering.assert();
        patch.assert();
        assert_eq!(report.created.len(), 3);
        assert_eq!(report.id_of(ResourceKind::ProductOffering, "Fibre 1G"), Some("po-1"));
        assert_eq!(report.linked, 1);
        assert_eq!(report.link_failures, 0);
        assert!(report.finished_at.is_some());
    }

    #[tokio::test]
    async fn already_linked_prices_are_not_patched() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/productOffering");
            then.status(201).json_body(json!({"id": "po-1", "name": "Fibre 1G"}));
        });
        server.mock(|when, then| {
            when.method(POST).path("/productOfferingPrice");
            then.status(201).json_body(json!({"id": "pop-1", "name": "Monthly"}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/productOffering/po-1");
            then.status(200).json_body(json!({"id": "po-1", "productOfferingPrice": [{"id": "pop-1"}]}));
        });
        let patch = server.mock(|when, then| {
            when.method(PATCH).path("/productOffering/po-1");
            then.status(200).json_body(json!({}));
        });

        let set = PayloadSet {
            payloads: vec![
                payload(ResourceKind::ProductOffering, "fibre", json!({"name": "Fibre 1G"})),
                payload(ResourceKind::ProductOfferingPrice, "fibre", json!({"name": "Monthly"})),
            ],
        };
        let client = CatalogClient::new(server.base_url()).unwrap();
        let report = populate(&client, &set, &cfg()).await.unwrap();
        assert_eq!(patch.hits(), 0);
        assert_eq!(report.linked, 0);
    }

    #[tokio::test]
    async fn create_failure_aborts_with_partial_report() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/catalog");
            then.status(201).json_body(json!({"id": "c-1", "name": "Wholesale"}));
        });
        server.mock(|when, then| {
            when.method(POST).path("/category");
            then.status(400).body("bad category");
        });
        let offering = server.mock(|when, then| {
            when.method(POST).path("/productOffering");
            then.status(201).json_body(json!({"id": "po-1"}));
        });

        let set = PayloadSet {
            payloads: vec![
                payload(ResourceKind::Catalog, "main", json!({"name": "Wholesale"})),
                payload(ResourceKind::Category, "bb", json!({"name": "Broadband"})),
                payload(ResourceKind::ProductOffering, "fibre", json!({"name": "Fibre 1G"})),
            ],
        };
        let client = CatalogClient::new(server.base_url()).unwrap();
        let err = populate(&client, &set, &cfg()).await.unwrap_err();
        assert!(err.to_string().contains("category 'Broadband'"));
        assert_eq!(err.report().count(ResourceKind::Catalog), 1);
        assert_eq!(offering.hits(), 0);
    }

    #[tokio::test]
    async fn link_failures_are_counted_not_fatal() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/productOffering");
            then.status(201).json_body(json!({"id": "po-1", "name": "Fibre 1G"}));
        });
        server.mock(|when, then| {
            when.method(POST).path("/productOfferingPrice");
            then.status(201).json_body(json!({"id": "pop-1", "name": "Monthly"}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/productOffering/po-1");
            then.status(500);
        });

        let set = PayloadSet {
            payloads: vec![
                payload(ResourceKind::ProductOffering, "fibre", json!({"name": "Fibre 1G"})),
                payload(ResourceKind::ProductOfferingPrice, "fibre", json!({"name": "Monthly"})),
            ],
        };
        let client = CatalogClient::new(server.base_url()).unwrap();
        let report = populate(&client, &set, &cfg()).await.unwrap();
        assert_eq!(report.linked, 0);
        assert_eq!(report.link_failures, 1);
    }
}
