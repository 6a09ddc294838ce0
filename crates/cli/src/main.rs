mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movemedia_core::{
    create_metadata_lookup, load_config, validate_config, Classifier, FileLedger, FsPlacer,
    MediaPipeline, Router, RunSummary, SanitizedConfig, SceneNameParser, SourceEnumerator,
};

use cli::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.json_logs);

    let result = run(args).await;
    match &result {
        Ok(summary) if !summary.anything_moved() => info!("Nothing was moved"),
        Ok(_) => {}
        Err(e) => error!("Fatal error: {:#}", e),
    }
    ExitCode::from(exit_status(&result))
}

/// 0 when at least one file was moved, 1 otherwise or on a fatal error.
fn exit_status(result: &Result<RunSummary>) -> u8 {
    match result {
        Ok(summary) if summary.anything_moved() => 0,
        _ => 1,
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

async fn run(args: Args) -> Result<RunSummary> {
    // Load configuration
    info!("Loading configuration from {:?}", args.config);
    let mut config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    if let Some(source) = args.source {
        config.source.path = source;
    }

    validate_config(&config).context("Configuration validation failed")?;
    debug!(
        "Configuration: {}",
        serde_json::to_string(&SanitizedConfig::from(&config)).unwrap_or_default()
    );

    // Ledger ids are absolute paths, so resolve the root once.
    let source_root = std::fs::canonicalize(&config.source.path)
        .with_context(|| format!("Source directory {:?} is not accessible", config.source.path))?;

    let metadata = create_metadata_lookup(&config.metadata)
        .context("Failed to create metadata lookup")?;
    info!("Using metadata backend: {}", metadata.name());

    let classifier = Classifier::new(
        Arc::new(SceneNameParser::new()),
        metadata,
        config.classifier.known_tv_titles.clone(),
    );
    let router = Router::from_config(&config).context("Invalid location override")?;
    let ledger = FileLedger::new(config.ledger.path.clone());
    let placer = FsPlacer::new(config.placer.clone());

    let pipeline = MediaPipeline::new(
        SourceEnumerator::new(&config.source),
        classifier,
        router,
        ledger,
        placer,
        source_root,
    )
    .with_dry_run(args.dry_run);

    let summary = pipeline.run().await.context("Run aborted")?;
    Ok(summary)
}
