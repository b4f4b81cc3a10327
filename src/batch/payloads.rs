use std::path::{Path, PathBuf};

use serde_json::{json, Value as JsonValue};

use crate::domain::ResourceKind;

/// File-name suffix that marks each kind's payloads.
const SUFFIXES: [(&str, ResourceKind); 5] = [
    ("_catalog.json", ResourceKind::Catalog),
    ("_category.json", ResourceKind::Category),
    ("_spec.json", ResourceKind::ProductSpecification),
    ("_offering.json", ResourceKind::ProductOffering),
    ("_price.json", ResourceKind::ProductOfferingPrice),
];

/// One payload file: `fibre_offering.json` has base `fibre`.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    pub kind: ResourceKind,
    pub base: String,
    pub file: PathBuf,
    pub body: JsonValue,
}

impl Payload {
    pub fn name(&self) -> String {
        self.body
            .get("name")
            .and_then(JsonValue::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Unnamed {}", self.kind.label()))
    }
}

/// Split a file name into its base and kind. Unrelated files give `None`.
pub fn classify(file_name: &str) -> Option<(String, ResourceKind)> {
    SUFFIXES.iter().find_map(|(suffix, kind)| {
        file_name
            .strip_suffix(suffix)
            .filter(|base| !base.is_empty())
            .map(|base| (base.to_string(), *kind))
    })
}

#[derive(Debug, Clone, Default)]
pub struct PayloadSet {
    pub payloads: Vec<Payload>,
}

impl PayloadSet {
    /// Load every recognised payload in `dir`, in file-name order. Files that
    /// cannot be read or parsed are logged and skipped.
    pub fn load_dir(dir: &Path, href_base: &str) -> std::io::Result<PayloadSet> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect();
        files.sort();

        let mut payloads = Vec::new();
        for file in files {
            let Some(file_name) = file.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some((base, kind)) = classify(file_name) else {
                tracing::debug!(file = %file.display(), "ignoring non-payload file");
                continue;
            };
            let mut body = match read_payload(&file) {
                Ok(v) => v,
                Err(e) => {
                    tracing::error!(file = %file.display(), error = %e, "skipping unreadable payload");
                    continue;
                }
            };
            rewrite_hrefs(&mut body, href_base);
            payloads.push(Payload { kind, base, file, body });
        }

        let set = PayloadSet { payloads };
        for kind in ResourceKind::ALL {
            tracing::info!(kind = %kind, count = set.of_kind(kind).count(), "loaded payloads");
        }
        Ok(set)
    }

    pub fn of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &Payload> + '_ {
        self.payloads.iter().filter(move |p| p.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

fn read_payload(path: &Path) -> Result<JsonValue, String> {
    let text = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let v: JsonValue = serde_json::from_str(&text).map_err(|e| e.to_string())?;
    if !v.is_object() {
        return Err("payload is not a JSON object".into());
    }
    Ok(v)
}

/// Prefix every relative `href` (one starting with `/`) with `href_base`.
pub fn rewrite_hrefs(value: &mut JsonValue, href_base: &str) {
    match value {
        JsonValue::Object(map) => {
            for (key, v) in map.iter_mut() {
                if let JsonValue::String(s) = v {
                    if key == "href" && s.starts_with('/') {
                        *s = format!("{href_base}{s}");
                    }
                } else {
                    rewrite_hrefs(v, href_base);
                }
            }
        }
        JsonValue::Array(items) => {
            for item in items {
                rewrite_hrefs(item, href_base);
            }
        }
        _ => {}
    }
}

/// TMF entity reference to a created resource.
pub fn entity_ref(kind: ResourceKind, id: &str, name: &str, href_base: &str) -> JsonValue {
    json!({
        "id": id,
        "href": format!("{href_base}/productCatalogManagement/v4/{}/{id}", kind.path()),
        "name": name,
        "@referredType": kind.referred_type(),
    })
}
