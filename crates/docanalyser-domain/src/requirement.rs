//! Compliance requirement descriptors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict field name used when a requirement does not configure one
pub const DEFAULT_RESPONSE_FIELD: &str = "requirementMet";

/// Kind of evidence-store resource a requirement targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResourceKind {
    /// A generic document such as a policy or report
    #[default]
    #[serde(rename = "genericDocument")]
    GenericDocument,
    /// Raw data such as logs or monitoring output
    #[serde(rename = "data")]
    Data,
}

impl ResourceKind {
    /// Wire name of the resource kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::GenericDocument => "genericDocument",
            ResourceKind::Data => "data",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog entry describing what evidence to extract for one requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementDescriptor {
    /// Stable external identifier (e.g. "E63")
    pub id: String,

    /// Human-readable requirement statement
    #[serde(default)]
    pub name: String,

    /// Extraction instruction given to the model; may be empty
    #[serde(default)]
    pub instruction: String,

    /// Target resource kind
    #[serde(default)]
    pub resource_kind: ResourceKind,

    /// Override for the boolean verdict field in the model reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_field_name: Option<String>,
}

impl RequirementDescriptor {
    /// Create a descriptor with defaults for the optional parts
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            instruction: String::new(),
            resource_kind: ResourceKind::default(),
            response_field_name: None,
        }
    }

    /// Set the extraction instruction
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    /// Set the resource kind
    pub fn with_resource_kind(mut self, kind: ResourceKind) -> Self {
        self.resource_kind = kind;
        self
    }

    /// Set the verdict field name
    pub fn with_response_field(mut self, field: impl Into<String>) -> Self {
        self.response_field_name = Some(field.into());
        self
    }

    /// Verdict field name, falling back to [`DEFAULT_RESPONSE_FIELD`]
    pub fn response_field(&self) -> &str {
        match self.response_field_name.as_deref() {
            Some(field) if !field.trim().is_empty() => field,
            _ => DEFAULT_RESPONSE_FIELD,
        }
    }

    /// Name to show the model, falling back to the id
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}
