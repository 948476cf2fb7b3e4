//! Requirement catalog
//!
//! The built-in catalog is an embedded TOML data file. Custom catalogs use the
//! same format:
//!
//! ```toml
//! [[requirement]]
//! key = "X.1.1.12.1"
//! id = "E93"
//! name = "Products shall reduce the impact of an incident"
//! instruction = "Regular data backups performed"
//! resource_kind = "genericDocument"
//! response_field_name = "dataBackups"
//! ```

use crate::error::CatalogError;
use docanalyser_domain::{RequirementDescriptor, ResourceKind};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../data/requirements.toml");

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    requirement: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
struct CatalogEntry {
    key: String,
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    instruction: String,
    #[serde(default)]
    resource_kind: ResourceKind,
    #[serde(default)]
    response_field_name: Option<String>,
}

/// Immutable mapping from requirement key to descriptor, in file order
#[derive(Debug, Clone)]
pub struct RequirementCatalog {
    entries: Vec<(String, RequirementDescriptor)>,
}

impl RequirementCatalog {
    /// Load the catalog shipped with the crate
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml(BUILTIN_CATALOG)
    }

    /// Load a catalog from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse a catalog from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(toml_str)?;

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(file.requirement.len());
        for entry in file.requirement {
            if entry.key.trim().is_empty() {
                return Err(CatalogError::MissingField {
                    key: entry.id,
                    field: "key",
                });
            }
            if entry.id.trim().is_empty() {
                return Err(CatalogError::MissingField {
                    key: entry.key,
                    field: "id",
                });
            }
            if !seen.insert(entry.key.clone()) {
                return Err(CatalogError::DuplicateKey(entry.key));
            }

            let descriptor = RequirementDescriptor {
                id: entry.id,
                name: entry.name,
                instruction: entry.instruction,
                resource_kind: entry.resource_kind,
                response_field_name: entry.response_field_name.filter(|f| !f.trim().is_empty()),
            };
            entries.push((entry.key, descriptor));
        }

        Ok(Self { entries })
    }

    /// Look up a requirement by catalog key
    pub fn get(&self, key: &str) -> Option<&RequirementDescriptor> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, descriptor)| descriptor)
    }

    /// All descriptors in catalog order
    pub fn list(&self) -> Vec<RequirementDescriptor> {
        self.entries.iter().map(|(_, d)| d.clone()).collect()
    }

    /// Iterate over `(key, descriptor)` pairs in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RequirementDescriptor)> {
        self.entries.iter().map(|(k, d)| (k.as_str(), d))
    }

    /// Number of requirements
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no requirements
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docanalyser_domain::DEFAULT_RESPONSE_FIELD;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = RequirementCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), 19);

        let first = catalog.iter().next().unwrap();
        assert_eq!(first.0, "X.1.1.9.1");
        assert_eq!(first.1.id, "E83");
        assert_eq!(first.1.response_field(), "businessContinuityPolicy");
    }

    #[test]
    fn test_builtin_lookup() {
        let catalog = RequirementCatalog::builtin().unwrap();

        let logging = catalog.get("X.1.1.13").unwrap();
        assert_eq!(logging.id, "E99");
        assert_eq!(logging.resource_kind, ResourceKind::Data);

        let risk = catalog.get("X.1.1.1").unwrap();
        assert!(risk.instruction.is_empty());

        assert!(catalog.get("X.9.9").is_none());
    }

    #[test]
    fn test_external_ids_may_repeat() {
        let catalog = RequirementCatalog::builtin().unwrap();
        assert_eq!(catalog.get("X.1.1.6").unwrap().id, "E63");
        assert_eq!(catalog.get("X.1.1.7").unwrap().id, "E63");
    }

    #[test]
    fn test_list_preserves_file_order() {
        let catalog = RequirementCatalog::from_toml(
            r#"
            [[requirement]]
            key = "b"
            id = "E2"

            [[requirement]]
            key = "a"
            id = "E1"
            "#,
        )
        .unwrap();

        let ids: Vec<_> = catalog.list().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["E2", "E1"]);
        assert_eq!(catalog.get("a").unwrap().response_field(), DEFAULT_RESPONSE_FIELD);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let result = RequirementCatalog::from_toml(
            r#"
            [[requirement]]
            key = "a"
            id = "E1"

            [[requirement]]
            key = "a"
            id = "E2"
            "#,
        );
        assert!(matches!(result, Err(CatalogError::DuplicateKey(k)) if k == "a"));
    }

    #[test]
    fn test_missing_id_rejected() {
        let result = RequirementCatalog::from_toml(
            r#"
            [[requirement]]
            key = "a"
            id = ""
            "#,
        );
        assert!(matches!(result, Err(CatalogError::MissingField { field: "id", .. })));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = RequirementCatalog::from_toml("").unwrap();
        assert!(catalog.is_empty());
    }
}
