use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::batch::run_bounded;
use crate::clients::catalog::CatalogClient;
use crate::domain::ResourceKind;

/// Dependents first: prices, offerings, specifications, categories, catalogs.
pub const CLEANUP_ORDER: [ResourceKind; 5] = [
    ResourceKind::ProductOfferingPrice,
    ResourceKind::ProductOffering,
    ResourceKind::ProductSpecification,
    ResourceKind::Category,
    ResourceKind::Catalog,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindCleanup {
    pub kind: ResourceKind,
    pub found: usize,
    pub deleted: usize,
    pub failed: usize,
    /// Listing failed or did not return an array.
    pub skipped: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanupReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub kinds: Vec<KindCleanup>,
}

impl CleanupReport {
    pub fn deleted(&self) -> usize {
        self.kinds.iter().map(|k| k.deleted).sum()
    }

    pub fn failed(&self) -> usize {
        self.kinds.iter().map(|k| k.failed).sum()
    }
}

/// Delete every resource the upstream lists, kind by kind.
pub async fn cleanup(client: &CatalogClient, concurrency: usize) -> CleanupReport {
    let started_at = Utc::now();
    tracing::info!(concurrency, "starting cleanup of all resources");
    let mut kinds = Vec::with_capacity(CLEANUP_ORDER.len());
    for kind in CLEANUP_ORDER {
        kinds.push(cleanup_kind(client, kind, concurrency).await);
    }
    let report = CleanupReport { started_at, finished_at: Utc::now(), kinds };
    tracing::info!(deleted = report.deleted(), failed = report.failed(), "cleanup completed");
    report
}

async fn cleanup_kind(client: &CatalogClient, kind: ResourceKind, concurrency: usize) -> KindCleanup {
    let mut out = KindCleanup { kind, found: 0, deleted: 0, failed: 0, skipped: false };
    let ids: Vec<String> = match client.list(kind).await {
        Ok(JsonValue::Array(items)) => items
            .iter()
            .filter_map(|item| item.get("id").and_then(JsonValue::as_str).map(str::to_string))
            .collect(),
        Ok(_) => {
            tracing::warn!(kind = %kind, "listing did not return an array; skipping");
            out.skipped = true;
            return out;
        }
        Err(e) => {
            tracing::error!(kind = %kind, error = %e, "listing failed; skipping");
            out.skipped = true;
            return out;
        }
    };
    out.found = ids.len();
    tracing::info!(kind = %kind, count = ids.len(), "cleaning up {}", kind.label());

    let results = run_bounded(ids, concurrency, |id: String| {
        let client = client.clone();
        async move {
            let res = client.delete(kind, &id).await;
            if let Err(e) = &res {
                tracing::error!(kind = %kind, id = %id, error = %e, "delete failed");
            }
            res.is_ok()
        }
    })
    .await;
    out.deleted = results.iter().filter(|ok| **ok).count();
    out.failed = results.len() - out.deleted;
    out
}
