//! Evidence items and the analysis result

use crate::requirement::ResourceKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Model-reported certainty of an evidence item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Clearly supported by the text
    High,
    /// Partially supported
    Medium,
    /// Weak or no support
    #[default]
    Low,
}

impl Confidence {
    /// Parse a model-supplied confidence label, ignoring case and surrounding whitespace
    ///
    /// # Examples
    ///
    /// ```
    /// use docanalyser_domain::Confidence;
    ///
    /// assert_eq!(Confidence::parse(" High "), Some(Confidence::High));
    /// assert_eq!(Confidence::parse("certain"), None);
    /// ```
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Confidence::High),
            "medium" => Some(Confidence::Medium),
            "low" => Some(Confidence::Low),
            _ => None,
        }
    }

    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized evidence record
///
/// `fulfilled` is always concrete: an ambiguous or missing verdict from the
/// model is stored as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceItem {
    /// Short label (the requirement statement in requirement mode)
    pub title: String,

    /// Concise statement derived from the document
    #[serde(rename = "evidence")]
    pub statement: String,

    /// Verbatim quote supporting the statement
    pub snippet: String,

    /// Location hint for the snippet, e.g. "Page 3"
    pub citation: String,

    /// Model-reported certainty
    pub confidence: Confidence,

    /// Fulfilment verdict
    pub fulfilled: bool,

    /// Name of the verdict field on the wire; absent for general-mode claims that state no verdict
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_field: Option<String>,

    /// External id of the requirement this item answers; absent for general-mode claims
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirement_id: Option<String>,

    /// Evidence-store resource kind
    #[serde(rename = "resourceType", default)]
    pub resource_kind: ResourceKind,
}

/// Output of one analysis run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalysisResult {
    /// Free-text overview; empty in requirement mode
    pub summary: String,

    /// Evidence items in requirement order
    pub items: Vec<EvidenceItem>,

    /// Unresolved questions reported by the model
    pub gaps: Vec<String>,

    /// Set when the model reply could not be decoded
    pub parse_error: Option<String>,

    /// Last raw model reply; empty in requirement mode
    pub raw_response: String,

    /// Source document paths in input order
    pub sources: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct Report {
    sources: Vec<String>,
    analysis: Analysis,
    raw_response: String,
}

#[derive(Serialize, Deserialize)]
struct Analysis {
    #[serde(default)]
    document_summary: String,
    #[serde(default)]
    evidence: Vec<EvidenceItem>,
    #[serde(default)]
    gaps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parse_error: Option<String>,
}

impl AnalysisResult {
    /// Whether the model reply was degraded rather than parsed
    pub fn is_degraded(&self) -> bool {
        self.parse_error.is_some()
    }

    /// Structured `analysis` section as a JSON value
    pub fn analysis_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self.analysis())
    }

    /// Serialize as `{"sources", "analysis", "raw_response"}` with two-space indentation
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let report = Report {
            sources: self.sources.clone(),
            analysis: self.analysis(),
            raw_response: self.raw_response.clone(),
        };
        serde_json::to_string_pretty(&report)
    }

    /// Parse a document produced by [`AnalysisResult::to_json`]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let report: Report = serde_json::from_str(json)?;
        Ok(Self {
            summary: report.analysis.document_summary,
            items: report.analysis.evidence,
            gaps: report.analysis.gaps,
            parse_error: report.analysis.parse_error,
            raw_response: report.raw_response,
            sources: report.sources,
        })
    }

    fn analysis(&self) -> Analysis {
        Analysis {
            document_summary: self.summary.clone(),
            evidence: self.items.clone(),
            gaps: self.gaps.clone(),
            parse_error: self.parse_error.clone(),
        }
    }
}
