//! Configuration management for the CLI.
//!
//! Settings are layered: defaults, then an optional TOML file, then environment
//! variables, then command-line flags.

use crate::cli::Cli;
use crate::error::{CliError, Result};
use docanalyser_extractor::{ExtractorConfig, RequirementCatalog};
use docanalyser_llm::ModelConfig;
use docanalyser_store::{default_token_endpoint, StoreConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Values of `EVIDENCE_AUTO_PUSH` that enable pushing
const AUTO_PUSH_VALUES: &[&str] = &["1", "true", "yes", "on"];

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// LLM backend settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Analyser settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Evidence store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Custom requirement catalog; the built-in catalog when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from a file, or defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let contents = fs::read_to_string(path)?;
                Self::from_toml(&contents)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Apply environment overrides that have no command-line flag.
    ///
    /// `lookup` returns the value of a variable; pass `|k| std::env::var(k).ok()`
    /// for the process environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(key) = var("OPENAI_API_KEY") {
            self.model.api_key = key;
        }
        if let Some(url) = var("OPENAI_BASE_URL") {
            self.model.base_url = Some(url);
        }
        if let Some(value) = var("DOC_ANALYSER_TEMPERATURE") {
            if let Ok(temperature) = value.parse() {
                self.model.temperature = temperature;
            }
        }
        if let Some(value) = var("DOC_ANALYSER_MAX_TOKENS") {
            if let Ok(max_tokens) = value.parse() {
                self.model.max_tokens = max_tokens;
            }
        }

        if let Some(base) = var("CONFIRMATE_API_BASE") {
            self.set_store_base(base);
        }
        if let Some(endpoint) = var("AUTH_TOKEN_ENDPOINT") {
            self.store.token_endpoint = endpoint;
        }
        if let Some(id) = var("AUTH_CLIENT_ID") {
            self.store.client_id = id;
        }
        if let Some(secret) = var("AUTH_CLIENT_SECRET") {
            self.store.client_secret = secret;
        }
        if let Some(path) = var("EVIDENCE_PATH") {
            self.store.evidence_path = path;
        }
    }

    /// Apply command-line flags (and the environment variables clap binds to them).
    pub fn apply_cli(&mut self, cli: &Cli) -> Result<()> {
        if let Some(model) = &cli.model {
            self.model.model = model.clone();
        }
        if let Some(url) = &cli.base_url {
            self.model.base_url = Some(url.clone());
        }
        if let Some(key) = &cli.api_key {
            self.model.api_key = key.clone();
        }

        if let Some(url) = &cli.evidence_url {
            self.set_store_base(url.clone());
        }
        if let Some(auth) = &cli.evidence_auth {
            let (id, secret) = parse_evidence_auth(auth)?;
            self.store.client_id = id;
            self.store.client_secret = secret;
        }
        if let Some(target) = &cli.evidence_target_id {
            self.store.target_of_evaluation_id = target.clone();
        }
        if let Some(tool) = &cli.evidence_tool_id {
            self.store.tool_id = tool.clone();
        }
        Ok(())
    }

    /// Validate settings needed for analysis.
    pub fn validate(&self) -> Result<()> {
        self.model.validate().map_err(CliError::Config)?;
        self.extractor.validate().map_err(CliError::Config)?;
        Ok(())
    }

    /// Validate settings needed to reach the evidence store.
    pub fn validate_store(&self) -> Result<()> {
        self.store.validate().map_err(CliError::Config)
    }

    /// Load the configured requirement catalog.
    pub fn requirement_catalog(&self) -> Result<RequirementCatalog> {
        let catalog = match &self.catalog {
            Some(path) => RequirementCatalog::from_file(path)?,
            None => RequirementCatalog::builtin()?,
        };
        Ok(catalog)
    }

    /// Point the store at a new base URL; a derived token endpoint follows it.
    fn set_store_base(&mut self, base_url: String) {
        if self.store.token_endpoint == default_token_endpoint(&self.store.base_url) {
            self.store.token_endpoint = default_token_endpoint(&base_url);
        }
        self.store.base_url = base_url;
    }
}

/// Split `client_id:client_secret` at the first colon.
pub fn parse_evidence_auth(auth: &str) -> Result<(String, String)> {
    auth.split_once(':')
        .map(|(id, secret)| (id.to_string(), secret.to_string()))
        .ok_or_else(|| {
            CliError::Config("Evidence auth must be in client_id:client_secret format.".into())
        })
}

/// Whether an `EVIDENCE_AUTO_PUSH` value enables pushing.
pub fn auto_push_enabled(value: Option<&str>) -> bool {
    value.is_some_and(|v| AUTO_PUSH_VALUES.contains(&v.trim().to_lowercase().as_str()))
}
