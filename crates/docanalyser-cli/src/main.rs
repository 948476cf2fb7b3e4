//! Document Analyser CLI - extract compliance evidence from documents.

use clap::Parser;
use docanalyser_cli::{
    auto_push_enabled, AnalysisMode, AppConfig, Cli, CliError, DocumentAnalysisPipeline,
    EvidencePublisher, PublishOutcome,
};
use docanalyser_extractor::EvidenceAnalyser;
use docanalyser_llm::OpenAiProvider;
use docanalyser_store::{build_test_payload, EvidenceStoreClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Log to stderr; stdout carries the result JSON
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> docanalyser_cli::Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok());
    config.apply_cli(&cli)?;

    if cli.list_requirements {
        let catalog = config.requirement_catalog()?;
        for (key, requirement) in catalog.iter() {
            println!("{}\t{}\t{}", key, requirement.id, requirement.display_name());
        }
        return Ok(());
    }

    if cli.missing_input() {
        return Err(CliError::MissingInput);
    }

    if cli.test_evidence {
        config.validate_store()?;
        let payload = build_test_payload(&config.store);
        println!("payload: {}", serde_json::to_string_pretty(&payload)?);

        let client = EvidenceStoreClient::new(config.store.clone())?;
        client.send_evidence(&payload).await?;
        client.close();
        eprintln!("Test evidence sent successfully.");
        return Ok(());
    }

    config.validate()?;

    let requirements = match cli.mode() {
        AnalysisMode::General => Vec::new(),
        AnalysisMode::Single(key) => {
            let catalog = config.requirement_catalog()?;
            let requirement = catalog
                .get(&key)
                .cloned()
                .ok_or(CliError::UnknownRequirement(key))?;
            vec![requirement]
        }
        AnalysisMode::AllRequirements => config.requirement_catalog()?.list(),
    };

    let push = cli.push_evidence
        || auto_push_enabled(std::env::var("EVIDENCE_AUTO_PUSH").ok().as_deref());

    let provider = OpenAiProvider::new(config.model.clone())?;
    let mut pipeline =
        DocumentAnalysisPipeline::new(EvidenceAnalyser::new(provider, config.extractor.clone()));
    if push {
        config.validate_store()?;
        pipeline = pipeline.with_publisher(EvidencePublisher::new(config.store.clone()));
    }

    let run = pipeline
        .run(
            &cli.files,
            cli.focus.as_deref(),
            cli.max_items,
            &requirements,
            push,
        )
        .await?;

    println!("{}", run.result.to_json()?);

    match run.publish {
        PublishOutcome::Skipped => {}
        PublishOutcome::Published(0) => {
            eprintln!("No evidence items produced; skipping evidence store push.");
        }
        PublishOutcome::Published(count) => {
            eprintln!("Pushed {} evidence item(s) to the evidence store.", count);
        }
        PublishOutcome::Failed(e) => return Err(e.into()),
    }

    Ok(())
}
