//! Evidence payload construction
//!
//! Evidence item *i* is attributed to `documents[i % documents.len()]`. Every
//! payload is pruned of null values, empty strings, empty objects and empty
//! arrays before it leaves this module.

use crate::config::StoreConfig;
use chrono::Utc;
use docanalyser_domain::{AnalysisResult, Document, EvidenceItem, ResourceKind};
use serde_json::{json, Map, Value};
use uuid::Uuid;

const DEFAULT_DESCRIPTION: &str = "Document evidence";

/// Build one evidence-store payload per evidence item
///
/// Returns an empty list when there are no documents to attribute evidence to.
pub fn build_evidence_payloads(
    result: &AnalysisResult,
    documents: &[Document],
    config: &StoreConfig,
) -> Vec<Value> {
    if documents.is_empty() {
        return Vec::new();
    }

    result
        .items
        .iter()
        .enumerate()
        .map(|(idx, item)| evidence_payload(idx, item, &documents[idx % documents.len()], config))
        .collect()
}

fn evidence_payload(
    idx: usize,
    item: &EvidenceItem,
    document: &Document,
    config: &StoreConfig,
) -> Value {
    let description = if item.title.trim().is_empty() {
        DEFAULT_DESCRIPTION
    } else {
        item.title.as_str()
    };

    let mut resource = Map::new();
    resource.insert(
        "id".into(),
        json!(format!("{}:document:{}", config.tool_id, idx)),
    );
    resource.insert("name".into(), json!(document.name()));
    resource.insert("description".into(), json!(description));
    resource.insert("filetype".into(), json!(document.extension()));
    resource.insert(
        "dataLocation".into(),
        json!({ "localDataLocation": { "path": document.path_string() } }),
    );
    if let Some(field) = &item.response_field {
        resource.insert(field.clone(), json!(item.fulfilled));
    }
    resource.insert("raw".into(), json!(merge_raw(&item.snippet, &item.citation)));

    prune_empty(envelope(config, item.resource_kind, Value::Object(resource)))
}

/// Minimal payload used to check connectivity and credentials
pub fn build_test_payload(config: &StoreConfig) -> Value {
    let resource = json!({
        "id": format!("{}:test-resource", config.tool_id),
        "name": "evidence-store-ping",
        "description": "Connectivity test payload",
        "dataLocation": { "localDataLocation": { "path": "N/A" } },
        "raw": "ping",
    });

    prune_empty(envelope(config, ResourceKind::GenericDocument, resource))
}

fn envelope(config: &StoreConfig, kind: ResourceKind, resource: Value) -> Value {
    json!({
        "id": Uuid::new_v4().to_string(),
        "timestamp": Utc::now().to_rfc3339(),
        "targetOfEvaluationId": config.target_of_evaluation_id,
        "toolId": config.tool_id,
        "resource": { kind.as_str(): resource },
    })
}

/// Combine snippet and citation into the `raw` text of a resource
///
/// # Examples
///
/// ```
/// use docanalyser_store::merge_raw;
///
/// assert_eq!(merge_raw("Backups run nightly", "Page 2"), "Backups run nightly\nCitation: Page 2");
/// assert_eq!(merge_raw("", "Page 2"), "Citation: Page 2");
/// assert_eq!(merge_raw("Backups run nightly", ""), "Backups run nightly");
/// ```
pub fn merge_raw(snippet: &str, citation: &str) -> String {
    match (snippet.is_empty(), citation.is_empty()) {
        (_, true) => snippet.to_string(),
        (true, false) => format!("Citation: {}", citation),
        (false, false) => format!("{}\nCitation: {}", snippet, citation),
    }
}

/// Recursively drop null, empty-string, empty-object and empty-array values
pub fn prune_empty(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, prune_empty(v)))
                .filter(|(_, v)| !is_empty(v))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(prune_empty)
                .filter(|v| !is_empty(v))
                .collect(),
        ),
        other => other,
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docanalyser_domain::Confidence;
    use proptest::prelude::*;

    fn item(title: &str, fulfilled: bool) -> EvidenceItem {
        EvidenceItem {
            title: title.to_string(),
            statement: String::new(),
            snippet: "Backups are taken nightly".to_string(),
            citation: String::new(),
            confidence: Confidence::High,
            fulfilled,
            response_field: Some("dataBackups".to_string()),
            requirement_id: Some("E93".to_string()),
            resource_kind: ResourceKind::GenericDocument,
        }
    }

    fn result(items: Vec<EvidenceItem>) -> AnalysisResult {
        AnalysisResult {
            items,
            ..Default::default()
        }
    }

    #[test]
    fn test_documents_wrap_around() {
        let docs = vec![
            Document::new("/data/a.pdf", ""),
            Document::new("/data/b.txt", ""),
        ];
        let result = result(vec![item("one", true), item("two", false), item("three", true)]);

        let payloads = build_evidence_payloads(&result, &docs, &StoreConfig::default());
        assert_eq!(payloads.len(), 3);

        let names: Vec<_> = payloads
            .iter()
            .map(|p| p["resource"]["genericDocument"]["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.txt", "a.pdf"]);

        let ids: Vec<_> = payloads
            .iter()
            .map(|p| p["resource"]["genericDocument"]["id"].as_str().unwrap())
            .collect();
        assert_eq!(
            ids,
            vec![
                "document-analyser:document:0",
                "document-analyser:document:1",
                "document-analyser:document:2"
            ]
        );
    }

    #[test]
    fn test_payload_shape() {
        let docs = vec![Document::new("/data/policy.pdf", "")];
        let payloads =
            build_evidence_payloads(&result(vec![item("", true)]), &docs, &StoreConfig::default());
        let payload = &payloads[0];

        assert!(Uuid::parse_str(payload["id"].as_str().unwrap()).is_ok());
        assert!(chrono::DateTime::parse_from_rfc3339(payload["timestamp"].as_str().unwrap()).is_ok());
        assert_eq!(
            payload["targetOfEvaluationId"],
            "00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(payload["toolId"], "document-analyser");

        let resource = &payload["resource"]["genericDocument"];
        assert_eq!(resource["description"], "Document evidence");
        assert_eq!(resource["filetype"], "pdf");
        assert_eq!(resource["dataLocation"]["localDataLocation"]["path"], "/data/policy.pdf");
        assert_eq!(resource["dataBackups"], true);
        assert_eq!(resource["raw"], "Backups are taken nightly");
    }

    #[test]
    fn test_empty_citation_is_pruned() {
        let docs = vec![Document::new("README", "")];
        let mut evidence = item("Backups", false);
        evidence.snippet.clear();

        let payloads = build_evidence_payloads(&result(vec![evidence]), &docs, &StoreConfig::default());
        let resource = payloads[0]["resource"]["genericDocument"].as_object().unwrap();

        assert!(!resource.contains_key("raw"));
        assert!(!resource.contains_key("filetype"));
        assert_eq!(resource["dataBackups"], false);
    }

    #[test]
    fn test_data_resource_kind() {
        let docs = vec![Document::new("audit.log", "")];
        let mut evidence = item("Logging", true);
        evidence.resource_kind = ResourceKind::Data;

        let payloads = build_evidence_payloads(&result(vec![evidence]), &docs, &StoreConfig::default());
        assert!(payloads[0]["resource"]["data"].is_object());
        assert!(payloads[0]["resource"].get("genericDocument").is_none());
    }

    #[test]
    fn test_general_item_has_no_verdict_field() {
        let docs = vec![Document::new("notes.md", "")];
        let mut evidence = item("Claim", false);
        evidence.response_field = None;
        evidence.requirement_id = None;

        let payloads = build_evidence_payloads(&result(vec![evidence]), &docs, &StoreConfig::default());
        let resource = payloads[0]["resource"]["genericDocument"].as_object().unwrap();
        let keys: Vec<_> = resource.keys().map(String::as_str).collect();
        assert_eq!(
            keys.len(),
            6,
            "unexpected keys: {:?}",
            keys
        );
        assert!(!resource.contains_key("requirementMet"));
    }

    #[test]
    fn test_general_item_with_verdict_uses_default_field() {
        let docs = vec![Document::new("notes.md", "")];
        let mut evidence = item("Claim", true);
        evidence.response_field = Some("requirementMet".to_string());
        evidence.requirement_id = None;

        let payloads = build_evidence_payloads(&result(vec![evidence]), &docs, &StoreConfig::default());
        let resource = &payloads[0]["resource"]["genericDocument"];
        assert_eq!(resource["requirementMet"], true);
    }

    #[test]
    fn test_no_documents_no_payloads() {
        let payloads =
            build_evidence_payloads(&result(vec![item("x", true)]), &[], &StoreConfig::default());
        assert!(payloads.is_empty());
    }

    #[test]
    fn test_build_test_payload() {
        let payload = build_test_payload(&StoreConfig::default());
        let resource = &payload["resource"]["genericDocument"];
        assert_eq!(resource["id"], "document-analyser:test-resource");
        assert_eq!(resource["name"], "evidence-store-ping");
        assert_eq!(resource["raw"], "ping");
    }

    #[test]
    fn test_prune_nested() {
        let pruned = prune_empty(json!({
            "keep": false,
            "zero": 0,
            "gone": null,
            "blank": "",
            "list": [null, {}, [], "x"],
            "nested": { "inner": { "empty": [] } },
        }));
        assert_eq!(pruned, json!({ "keep": false, "zero": 0, "list": ["x"] }));
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            "[a-z]{0,3}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,3}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    fn contains_empty(value: &Value) -> bool {
        match value {
            Value::Object(map) => map.values().any(|v| is_empty(v) || contains_empty(v)),
            Value::Array(items) => items.iter().any(|v| is_empty(v) || contains_empty(v)),
            _ => false,
        }
    }

    proptest! {
        #[test]
        fn prop_pruned_values_hold_no_empties(value in arb_json()) {
            let pruned = prune_empty(value);
            prop_assert!(!contains_empty(&pruned));
            prop_assert_eq!(prune_empty(pruned.clone()), pruned);
        }
    }
}
