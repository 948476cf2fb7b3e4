//! Core Evidence Analyser implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::loader::concatenate_documents;
use crate::parser::{
    parse_confidence, parse_general_reply, parse_requirement_reply, resolve_verdict, text_field,
    ParseOutcome,
};
use crate::prompt::{GeneralPrompt, RequirementPrompt};
use docanalyser_domain::{
    AnalysisResult, ChatMessage, ChatProvider, Document, EvidenceItem, RequirementDescriptor,
};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info};

/// What to analyse for
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    /// Focus areas passed to the model in general mode
    pub focus: Option<String>,
    /// Evidence entries requested in general mode; the config default when `None`
    pub max_items: Option<usize>,
    /// Requirement mode when non-empty
    pub requirements: Vec<RequirementDescriptor>,
}

/// The Evidence Analyser turns documents into evidence items through an LLM
pub struct EvidenceAnalyser<P>
where
    P: ChatProvider,
{
    provider: Arc<P>,
    config: ExtractorConfig,
}

impl<P> EvidenceAnalyser<P>
where
    P: ChatProvider + 'static,
{
    /// Create a new analyser
    pub fn new(provider: P, config: ExtractorConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            config,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Dispatch to requirement mode when requirements are given, general mode otherwise
    pub async fn analyse(
        &self,
        documents: &[Document],
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, ExtractorError> {
        if request.requirements.is_empty() {
            let max_items = request.max_items.unwrap_or(self.config.default_max_items);
            return self
                .analyse_general(documents, request.focus.as_deref(), max_items)
                .await;
        }

        ensure_documents(documents)?;
        let items = self
            .analyse_by_requirements(documents, &request.requirements)
            .await?;

        Ok(AnalysisResult {
            items,
            sources: sources(documents),
            ..Default::default()
        })
    }

    /// Extract free-form evidence from all documents in one model call
    pub async fn analyse_general(
        &self,
        documents: &[Document],
        focus: Option<&str>,
        max_items: usize,
    ) -> Result<AnalysisResult, ExtractorError> {
        ensure_documents(documents)?;

        let source_names = documents
            .iter()
            .map(Document::name)
            .collect::<Vec<_>>()
            .join(", ");
        let text = concatenate_documents(documents);

        info!(
            "Starting general analysis of {} document(s), {} chars",
            documents.len(),
            text.len()
        );

        let messages = GeneralPrompt::new(&text)
            .with_source(&source_names)
            .with_focus(focus)
            .with_max_items(max_items)
            .build();

        let raw_response = self.call_llm(&messages).await?;
        debug!("LLM response length: {} chars", raw_response.len());

        let result = match parse_general_reply(&raw_response) {
            ParseOutcome::Parsed(reply) => {
                info!(
                    "Parsed {} evidence item(s), {} gap(s)",
                    reply.items.len(),
                    reply.gaps.len()
                );
                AnalysisResult {
                    summary: reply.summary,
                    items: reply.items,
                    gaps: reply.gaps,
                    parse_error: None,
                    raw_response,
                    sources: sources(documents),
                }
            }
            ParseOutcome::Degraded { reason } => AnalysisResult {
                parse_error: Some(reason),
                raw_response,
                sources: sources(documents),
                ..Default::default()
            },
        };

        Ok(result)
    }

    /// Produce exactly one evidence item per requirement, in input order
    pub async fn analyse_by_requirements(
        &self,
        documents: &[Document],
        requirements: &[RequirementDescriptor],
    ) -> Result<Vec<EvidenceItem>, ExtractorError> {
        ensure_documents(documents)?;
        if requirements.is_empty() {
            return Ok(Vec::new());
        }

        let source_names = documents
            .iter()
            .map(Document::name)
            .collect::<Vec<_>>()
            .join(", ");
        let text = concatenate_documents(documents);

        info!(
            "Checking {} requirement(s) against {} document(s), concurrency {}",
            requirements.len(),
            documents.len(),
            self.config.max_concurrent_requests
        );

        let mut indexed: Vec<(usize, EvidenceItem)> = stream::iter(requirements.iter().enumerate())
            .map(|(idx, requirement)| {
                let text = text.as_str();
                let source_names = source_names.as_str();
                async move {
                    let item = self.check_requirement(text, source_names, requirement).await?;
                    Ok::<_, ExtractorError>((idx, item))
                }
            })
            .buffer_unordered(self.config.max_concurrent_requests.max(1))
            .try_collect()
            .await?;

        indexed.sort_by_key(|(idx, _)| *idx);
        let items: Vec<EvidenceItem> = indexed.into_iter().map(|(_, item)| item).collect();

        let fulfilled = items.iter().filter(|item| item.fulfilled).count();
        info!(
            "Requirement check complete: {}/{} fulfilled",
            fulfilled,
            items.len()
        );

        Ok(items)
    }

    async fn check_requirement(
        &self,
        text: &str,
        source_names: &str,
        requirement: &RequirementDescriptor,
    ) -> Result<EvidenceItem, ExtractorError> {
        let messages = RequirementPrompt::new(text, requirement)
            .with_source(source_names)
            .build();

        let raw = self.call_llm(&messages).await?;
        let reply = parse_requirement_reply(&raw);
        let field = requirement.response_field();

        let item = EvidenceItem {
            title: requirement.display_name().to_string(),
            statement: text_field(&reply, &["statement", "evidence"]),
            snippet: text_field(&reply, &["snippet"]),
            citation: text_field(&reply, &["citation"]),
            confidence: parse_confidence(&reply),
            fulfilled: resolve_verdict(&reply, field),
            response_field: Some(field.to_string()),
            requirement_id: Some(requirement.id.clone()),
            resource_kind: requirement.resource_kind,
        };

        debug!(
            requirement = %requirement.id,
            fulfilled = item.fulfilled,
            confidence = %item.confidence,
            "Requirement checked"
        );

        Ok(item)
    }

    /// Call the gateway in JSON mode, bounded by the request timeout
    async fn call_llm(&self, messages: &[ChatMessage]) -> Result<String, ExtractorError> {
        timeout(
            self.config.request_timeout(),
            self.provider.chat(messages, true),
        )
        .await
        .map_err(|_| ExtractorError::Timeout(self.config.request_timeout_secs))?
        .map_err(|e| ExtractorError::Llm(e.to_string()))
    }
}

fn ensure_documents(documents: &[Document]) -> Result<(), ExtractorError> {
    if documents.is_empty() {
        return Err(ExtractorError::InvalidInput(
            "no documents to analyse".to_string(),
        ));
    }
    Ok(())
}

fn sources(documents: &[Document]) -> Vec<String> {
    documents.iter().map(Document::path_string).collect()
}
