//! CLI argument definitions.

use clap::Parser;
use std::path::PathBuf;

/// Extract structured compliance evidence from documents using an LLM.
#[derive(Debug, Parser)]
#[command(name = "docanalyser")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path(s) to the documents to analyse
    pub files: Vec<PathBuf>,

    /// Focus area or question to guide general extraction
    #[arg(long)]
    pub focus: Option<String>,

    /// Model name (local or remote)
    #[arg(long, env = "DOC_ANALYSER_MODEL")]
    pub model: Option<String>,

    /// OpenAI-compatible base URL
    #[arg(long, env = "DOC_ANALYSER_BASE_URL")]
    pub base_url: Option<String>,

    /// API key; local no-auth servers accept any placeholder
    #[arg(long, env = "DOC_ANALYSER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Maximum number of evidence items in general mode
    #[arg(long, default_value_t = 8)]
    pub max_items: usize,

    /// Send generated evidence to the evidence store
    #[arg(long)]
    pub push_evidence: bool,

    /// Evidence store base URL
    #[arg(long, env = "EVIDENCE_STORE_BASE")]
    pub evidence_url: Option<String>,

    /// Evidence store credentials as client_id:client_secret
    #[arg(long, hide_env_values = true)]
    pub evidence_auth: Option<String>,

    /// Target of evaluation ID override
    #[arg(long, env = "TARGET_OF_EVALUATION_ID")]
    pub evidence_target_id: Option<String>,

    /// Tool identifier override
    #[arg(long, env = "EVIDENCE_TOOL_ID")]
    pub evidence_tool_id: Option<String>,

    /// Send a minimal test evidence to verify connectivity, then exit
    #[arg(long)]
    pub test_evidence: bool,

    /// Run a single catalog requirement by key (e.g. X.1.1.12.1)
    #[arg(long, conflicts_with = "general")]
    pub test_requirement: Option<String>,

    /// Run every catalog requirement (the default)
    #[arg(long, conflicts_with_all = ["general", "test_requirement"])]
    pub all_requirements: bool,

    /// Run free-form extraction instead of the requirement catalog
    #[arg(long)]
    pub general: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the requirement catalog and exit
    #[arg(long)]
    pub list_requirements: bool,
}

/// Which analysis the invocation asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisMode {
    /// Free-form extraction
    General,
    /// One catalog entry
    Single(String),
    /// Whole catalog
    AllRequirements,
}

impl Cli {
    /// Resolve the mode flags
    pub fn mode(&self) -> AnalysisMode {
        if self.general {
            AnalysisMode::General
        } else if let Some(key) = &self.test_requirement {
            AnalysisMode::Single(key.clone())
        } else {
            AnalysisMode::AllRequirements
        }
    }

    /// Whether there is nothing to analyse and nothing else to do
    pub fn missing_input(&self) -> bool {
        self.files.is_empty() && !self.test_evidence && !self.list_requirements
    }
}
