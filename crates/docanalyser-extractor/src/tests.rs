//! Integration tests for the Evidence Analyser

#[cfg(test)]
mod tests {
    use crate::{
        AnalysisRequest, EvidenceAnalyser, ExtractorConfig, ExtractorError, RequirementCatalog,
        PARSE_ERROR_REASON,
    };
    use async_trait::async_trait;
    use docanalyser_domain::{
        ChatMessage, ChatProvider, Confidence, Document, RequirementDescriptor, ResourceKind,
    };
    use docanalyser_llm::{LlmError, MockProvider};
    use std::time::Duration;

    fn documents() -> Vec<Document> {
        vec![
            Document::new("docs/policy.txt", "Backups are taken nightly and tested quarterly."),
            Document::new("docs/logging.md", "All admin actions are logged."),
        ]
    }

    fn requirements() -> Vec<RequirementDescriptor> {
        vec![
            RequirementDescriptor::new("E93", "Reduce the impact of an incident")
                .with_instruction("Regular data backups performed")
                .with_response_field("dataBackups"),
            RequirementDescriptor::new("E99", "Log security relevant activity")
                .with_resource_kind(ResourceKind::Data)
                .with_response_field("loggingEnabled"),
            RequirementDescriptor::new("E45", ""),
        ]
    }

    /// Replies after a delay that shrinks with the requirement position,
    /// so later requirements finish first.
    struct StaggeredProvider;

    #[async_trait]
    impl ChatProvider for StaggeredProvider {
        type Error = LlmError;

        async fn chat(&self, messages: &[ChatMessage], _json_mode: bool) -> Result<String, LlmError> {
            let last = &messages[messages.len() - 1].content;
            let delay = if last.contains("(E93)") {
                60
            } else if last.contains("(E99)") {
                30
            } else {
                0
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(r#"{"fulfilled": "yes", "confidence": "medium"}"#.to_string())
        }
    }

    struct HangingProvider;

    #[async_trait]
    impl ChatProvider for HangingProvider {
        type Error = LlmError;

        async fn chat(&self, _messages: &[ChatMessage], _json_mode: bool) -> Result<String, LlmError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok("{}".to_string())
        }
    }

    #[tokio::test]
    async fn test_requirement_mode_order_and_verdicts() {
        let mut llm = MockProvider::default();
        llm.add_response(
            "(E93)",
            r#"{"requirementId": "E93", "dataBackups": "Yes", "snippet": "Backups are taken nightly",
                "citation": "Page 1", "confidence": "high", "statement": "Nightly backups"}"#,
        );
        llm.add_response("(E99)", r#"{"loggingEnabled": "NOT FULFILLED", "fulfilled": "no"}"#);
        llm.add_response("(E45)", r#"{"requirementMet": 42}"#);

        let analyser = EvidenceAnalyser::new(llm.clone(), ExtractorConfig::default());
        let items = analyser
            .analyse_by_requirements(&documents(), &requirements())
            .await
            .unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(llm.call_count(), 3);

        let ids: Vec<_> = items.iter().map(|i| i.requirement_id.clone().unwrap()).collect();
        assert_eq!(ids, vec!["E93", "E99", "E45"]);

        assert!(items[0].fulfilled);
        assert_eq!(items[0].confidence, Confidence::High);
        assert_eq!(items[0].statement, "Nightly backups");
        assert_eq!(items[0].citation, "Page 1");
        assert_eq!(items[0].response_field.as_deref(), Some("dataBackups"));
        assert_eq!(items[0].title, "Reduce the impact of an incident");

        assert!(!items[1].fulfilled);
        assert_eq!(items[1].resource_kind, ResourceKind::Data);

        assert!(!items[2].fulfilled);
        assert_eq!(items[2].title, "E45");
        assert_eq!(items[2].response_field.as_deref(), Some("requirementMet"));
        assert_eq!(items[2].confidence, Confidence::Low);
    }

    #[tokio::test]
    async fn test_unparsable_reply_is_not_fulfilled() {
        let llm = MockProvider::new("I could not find anything relevant.");
        let analyser = EvidenceAnalyser::new(llm, ExtractorConfig::default());

        let items = analyser
            .analyse_by_requirements(&documents(), &requirements())
            .await
            .unwrap();

        assert_eq!(items.len(), 3);
        for item in &items {
            assert!(!item.fulfilled);
            assert_eq!(item.confidence, Confidence::Low);
            assert!(item.snippet.is_empty());
            assert!(item.citation.is_empty());
        }
    }

    #[tokio::test]
    async fn test_concurrent_calls_keep_input_order() {
        let analyser = EvidenceAnalyser::new(StaggeredProvider, ExtractorConfig::default());

        let items = analyser
            .analyse_by_requirements(&documents(), &requirements())
            .await
            .unwrap();

        let ids: Vec<_> = items.iter().map(|i| i.requirement_id.clone().unwrap()).collect();
        assert_eq!(ids, vec!["E93", "E99", "E45"]);
        assert!(items.iter().all(|i| i.fulfilled));
        assert!(items.iter().all(|i| i.confidence == Confidence::Medium));
    }

    #[tokio::test]
    async fn test_sequential_config_calls_in_order() {
        let llm = MockProvider::default();
        let analyser = EvidenceAnalyser::new(llm.clone(), ExtractorConfig::sequential());

        analyser
            .analyse_by_requirements(&documents(), &requirements())
            .await
            .unwrap();

        let asked: Vec<bool> = llm
            .requests()
            .iter()
            .zip(["(E93)", "(E99)", "(E45)"])
            .map(|(request, id)| request.messages[1].content.contains(id))
            .collect();
        assert_eq!(asked, vec![true, true, true]);
        assert!(llm.requests().iter().all(|r| r.json_mode));
    }

    #[tokio::test]
    async fn test_empty_requirements_make_no_calls() {
        let llm = MockProvider::default();
        let analyser = EvidenceAnalyser::new(llm.clone(), ExtractorConfig::default());

        let items = analyser
            .analyse_by_requirements(&documents(), &[])
            .await
            .unwrap();

        assert!(items.is_empty());
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_no_documents_is_invalid_input() {
        let analyser = EvidenceAnalyser::new(MockProvider::default(), ExtractorConfig::default());

        let general = analyser.analyse_general(&[], None, 8).await;
        assert!(matches!(general, Err(ExtractorError::InvalidInput(_))));

        let by_requirement = analyser.analyse_by_requirements(&[], &requirements()).await;
        assert!(matches!(by_requirement, Err(ExtractorError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_general_mode_parses_reply() {
        let llm = MockProvider::new(
            "```json\n{\"document_summary\": \"Backup and logging policies.\", \
             \"evidence\": [{\"title\": \"Backups\", \"evidence\": \"Nightly backups\", \
             \"snippet\": \"taken nightly\", \"citation\": \"\", \"confidence\": \"high\"}], \
             \"gaps\": [\"Retention period\"]}\n```",
        );
        let analyser = EvidenceAnalyser::new(llm.clone(), ExtractorConfig::default());

        let result = analyser
            .analyse_general(&documents(), Some("backups"), 3)
            .await
            .unwrap();

        assert_eq!(result.summary, "Backup and logging policies.");
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].requirement_id, None);
        assert_eq!(result.gaps, vec!["Retention period"]);
        assert!(!result.is_degraded());
        assert_eq!(result.sources, vec!["docs/policy.txt", "docs/logging.md"]);

        let request = &llm.requests()[0];
        assert!(request.messages[0].content.contains("up to 3 evidence objects"));
        assert!(request.messages[1]
            .content
            .starts_with("Source: policy.txt, logging.md."));
        assert!(request.messages[1].content.contains("Focus areas provided by user: backups"));
        assert!(request.messages[1].content.contains("### Document: logging.md"));
    }

    #[tokio::test]
    async fn test_general_mode_degrades_on_invalid_json() {
        let llm = MockProvider::new("Sorry, I cannot help with that.");
        let analyser = EvidenceAnalyser::new(llm, ExtractorConfig::default());

        let result = analyser.analyse_general(&documents(), None, 8).await.unwrap();

        assert!(result.is_degraded());
        assert_eq!(result.parse_error.as_deref(), Some(PARSE_ERROR_REASON));
        assert_eq!(result.raw_response, "Sorry, I cannot help with that.");
        assert!(result.items.is_empty());
        assert!(result.gaps.is_empty());
        assert_eq!(result.sources.len(), 2);
    }

    #[tokio::test]
    async fn test_gateway_error_propagates() {
        let mut llm = MockProvider::default();
        llm.add_error("(E99)");
        let analyser = EvidenceAnalyser::new(llm, ExtractorConfig::default());

        let result = analyser
            .analyse_by_requirements(&documents(), &requirements())
            .await;
        assert!(matches!(result, Err(ExtractorError::Llm(_))));
    }

    #[tokio::test]
    async fn test_gateway_timeout() {
        let config = ExtractorConfig {
            request_timeout_secs: 1,
            ..Default::default()
        };
        let analyser = EvidenceAnalyser::new(HangingProvider, config);

        let result = analyser.analyse_general(&documents(), None, 8).await;
        assert!(matches!(result, Err(ExtractorError::Timeout(1))));
    }

    #[tokio::test]
    async fn test_analyse_dispatches_on_requirements() {
        let llm = MockProvider::new(r#"{"document_summary": "s", "evidence": [], "gaps": []}"#);
        let analyser = EvidenceAnalyser::new(llm.clone(), ExtractorConfig::default());

        let general = analyser
            .analyse(&documents(), &AnalysisRequest::default())
            .await
            .unwrap();
        assert_eq!(general.summary, "s");
        assert!(llm.requests()[0].messages[0].content.contains("up to 8 evidence objects"));

        let catalog = RequirementCatalog::builtin().unwrap();
        let request = AnalysisRequest {
            requirements: catalog.list(),
            ..Default::default()
        };
        let by_requirement = analyser.analyse(&documents(), &request).await.unwrap();

        assert_eq!(by_requirement.items.len(), catalog.len());
        assert!(by_requirement.summary.is_empty());
        assert!(by_requirement.raw_response.is_empty());
        assert!(by_requirement.gaps.is_empty());
        assert_eq!(by_requirement.sources.len(), 2);
    }
}
