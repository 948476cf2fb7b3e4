//! Parse LLM replies into evidence
//!
//! Malformed replies never become errors here: the general reply degrades to a
//! [`ParseOutcome::Degraded`] value and a requirement reply degrades to an empty
//! object, so one bad reply cannot abort a run.

use docanalyser_domain::{Confidence, EvidenceItem, ResourceKind, DEFAULT_RESPONSE_FIELD};
use serde_json::{Map, Value};
use tracing::warn;

/// Reason recorded when a general-mode reply cannot be decoded
pub const PARSE_ERROR_REASON: &str = "Response was not valid JSON.";

const TRUE_TOKENS: &[&str] = &["true", "yes", "y", "1", "fulfilled"];
const FALSE_TOKENS: &[&str] = &["false", "no", "n", "0", "unfulfilled", "not fulfilled"];

/// Result of decoding a model reply
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome<T> {
    /// Reply decoded
    Parsed(T),
    /// Reply unusable; the reason is kept for diagnostics
    Degraded {
        /// Why the reply was rejected
        reason: String,
    },
}

/// Decoded general-mode reply
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeneralReply {
    /// `document_summary`
    pub summary: String,
    /// `evidence` entries that were objects
    pub items: Vec<EvidenceItem>,
    /// `gaps`
    pub gaps: Vec<String>,
}

/// Strip a surrounding markdown code fence, if any
pub fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    // Drop the opening fence line (``` or ```json) and the closing fence
    let body = match trimmed.find('\n') {
        Some(newline) => &trimmed[newline + 1..],
        None => return "",
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Decode a general-mode reply
pub fn parse_general_reply(response: &str) -> ParseOutcome<GeneralReply> {
    let value: Value = match serde_json::from_str(extract_json(response)) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "General reply is not valid JSON");
            return ParseOutcome::Degraded {
                reason: PARSE_ERROR_REASON.to_string(),
            };
        }
    };

    let Value::Object(object) = value else {
        warn!("General reply is not a JSON object");
        return ParseOutcome::Degraded {
            reason: PARSE_ERROR_REASON.to_string(),
        };
    };

    let items = match object.get("evidence") {
        Some(Value::Array(entries)) => entries
            .iter()
            .enumerate()
            .filter_map(|(idx, entry)| match entry {
                Value::Object(fields) => Some(general_item(fields)),
                _ => {
                    warn!("Evidence entry {} is not a JSON object, skipping", idx);
                    None
                }
            })
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(_) => {
            warn!("'evidence' is not a list, ignoring it");
            Vec::new()
        }
    };

    let gaps = match object.get("gaps") {
        Some(Value::Array(gaps)) => gaps.iter().filter_map(value_text).collect(),
        _ => Vec::new(),
    };

    ParseOutcome::Parsed(GeneralReply {
        summary: text_field(&object, &["document_summary"]),
        items,
        gaps,
    })
}

/// Decode a requirement-mode reply; anything but a JSON object becomes an empty object
pub fn parse_requirement_reply(response: &str) -> Map<String, Value> {
    match serde_json::from_str(extract_json(response)) {
        Ok(Value::Object(object)) => object,
        Ok(_) => {
            warn!("Requirement reply is not a JSON object");
            Map::new()
        }
        Err(e) => {
            warn!(error = %e, "Requirement reply is not valid JSON");
            Map::new()
        }
    }
}

/// Interpret a model-supplied verdict value
///
/// Booleans pass through; strings are matched case-insensitively against the
/// known true/false tokens. Anything else is `None`.
pub fn coerce_verdict(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => {
            let normalized = s.trim().to_lowercase();
            if TRUE_TOKENS.contains(&normalized.as_str()) {
                Some(true)
            } else if FALSE_TOKENS.contains(&normalized.as_str()) {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// `true` when either the configured field or the generic `fulfilled` field reads as true
pub fn resolve_verdict(reply: &Map<String, Value>, field: &str) -> bool {
    let reads_true = |key: &str| matches!(reply.get(key).and_then(coerce_verdict), Some(true));
    reads_true(field) || reads_true("fulfilled")
}

/// Confidence label from the reply, `low` when absent or unrecognised
pub fn parse_confidence(reply: &Map<String, Value>) -> Confidence {
    reply
        .get("confidence")
        .and_then(Value::as_str)
        .and_then(Confidence::parse)
        .unwrap_or_default()
}

/// First non-empty textual value among `keys`, or an empty string
pub fn text_field(reply: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| reply.get(*key))
        .filter_map(value_text)
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn general_item(fields: &Map<String, Value>) -> EvidenceItem {
    // A claim that states a verdict publishes it under the default field
    let verdict = fields.get("fulfilled").and_then(coerce_verdict);
    EvidenceItem {
        title: text_field(fields, &["title"]),
        statement: text_field(fields, &["evidence", "statement"]),
        snippet: text_field(fields, &["snippet"]),
        citation: text_field(fields, &["citation"]),
        confidence: parse_confidence(fields),
        fulfilled: verdict.unwrap_or(false),
        response_field: verdict.map(|_| DEFAULT_RESPONSE_FIELD.to_string()),
        requirement_id: None,
        resource_kind: ResourceKind::GenericDocument,
    }
}
