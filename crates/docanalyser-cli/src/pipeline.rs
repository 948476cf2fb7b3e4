//! End-to-end pipeline: load, analyse, optionally publish.

use docanalyser_domain::{AnalysisResult, ChatProvider, Document, RequirementDescriptor};
use docanalyser_extractor::{
    AnalysisRequest, DocumentLoader, EvidenceAnalyser, ExtractorError, LoaderError,
};
use docanalyser_store::{build_evidence_payloads, EvidenceStoreClient, StoreConfig, StoreError};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that stop a pipeline run before a result exists
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A document could not be loaded
    #[error(transparent)]
    Load(#[from] LoaderError),

    /// Analysis failed
    #[error(transparent)]
    Analysis(#[from] ExtractorError),
}

/// What happened to the evidence after analysis
#[derive(Debug)]
pub enum PublishOutcome {
    /// Publishing was not requested or no publisher is configured
    Skipped,
    /// Number of payloads accepted by the store; zero when nothing was produced
    Published(usize),
    /// Submission failed; the analysis result is still available
    Failed(StoreError),
}

/// Output of one pipeline run
#[derive(Debug)]
pub struct PipelineRun {
    /// Analysis result
    pub result: AnalysisResult,
    /// Publication outcome
    pub publish: PublishOutcome,
}

/// Sends evidence payloads to the evidence store
#[derive(Debug, Clone)]
pub struct EvidencePublisher {
    config: StoreConfig,
}

impl EvidencePublisher {
    /// Create a publisher for the given store
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Build payloads for `result` and submit them in one batch
    ///
    /// Returns the number of payloads submitted.
    pub async fn push(
        &self,
        result: &AnalysisResult,
        documents: &[Document],
    ) -> Result<usize, StoreError> {
        let payloads = build_evidence_payloads(result, documents, &self.config);
        if payloads.is_empty() {
            return Ok(0);
        }

        let client = EvidenceStoreClient::new(self.config.clone())?;
        client.send_batch(&payloads).await?;
        client.close();

        Ok(payloads.len())
    }
}

/// Loads documents, analyses them and optionally publishes the evidence
pub struct DocumentAnalysisPipeline<P>
where
    P: ChatProvider,
{
    loader: DocumentLoader,
    analyser: EvidenceAnalyser<P>,
    publisher: Option<EvidencePublisher>,
}

impl<P> DocumentAnalysisPipeline<P>
where
    P: ChatProvider + 'static,
{
    /// Create a pipeline without a publisher
    pub fn new(analyser: EvidenceAnalyser<P>) -> Self {
        Self {
            loader: DocumentLoader::new(),
            analyser,
            publisher: None,
        }
    }

    /// Attach a publisher used when a run asks to push
    pub fn with_publisher(mut self, publisher: EvidencePublisher) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Run the pipeline
    ///
    /// Requirement mode is used when `requirements` is non-empty. A store
    /// failure is reported in [`PipelineRun::publish`] and never discards the
    /// analysis result.
    pub async fn run<S: AsRef<Path>>(
        &self,
        paths: &[S],
        focus: Option<&str>,
        max_items: usize,
        requirements: &[RequirementDescriptor],
        push: bool,
    ) -> Result<PipelineRun, PipelineError> {
        let documents = self.loader.load_all(paths)?;
        info!("Loaded {} document(s)", documents.len());

        let request = AnalysisRequest {
            focus: focus.map(str::to_string),
            max_items: Some(max_items),
            requirements: requirements.to_vec(),
        };
        let result = self.analyser.analyse(&documents, &request).await?;

        let publish = match (&self.publisher, push) {
            (Some(publisher), true) => match publisher.push(&result, &documents).await {
                Ok(count) => PublishOutcome::Published(count),
                Err(e) => {
                    warn!(submitted = e.submitted(), "Evidence push failed: {}", e);
                    PublishOutcome::Failed(e)
                }
            },
            _ => PublishOutcome::Skipped,
        };

        Ok(PipelineRun { result, publish })
    }
}
