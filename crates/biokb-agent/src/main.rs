//! biokb: build a biomedical knowledge base from a PubMed XML corpus.

mod config;
mod progress;
mod shutdown;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use biokb_common::KbError;
use biokb_db::{DocumentStore, MongoStore, PersistenceSink};
use biokb_ingestion::sources::PubmedXmlSource;
use biokb_ingestion::{run_batch, Aggregator, BatchReport, CorpusSource, DocumentProcessor};
use biokb_kg::ExtractorSession;
use biokb_ner::Segmenter;
use clap::{Parser, Subcommand};
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, DatabaseConfig};

#[derive(Parser)]
#[command(name = "biokb")]
#[command(about = "Annotate PubMed abstracts and build a biomedical knowledge base")]
#[command(version)]
struct Cli {
    /// Config file (defaults to biokb.toml)
    #[arg(short, long, global = true, env = "BIOKB_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process the corpus and persist the knowledge base
    Run {
        /// PubMed XML file to process
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// JSON output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the document store insert
        #[arg(long)]
        no_db: bool,

        /// Abort on the first failing article
        #[arg(long)]
        strict: bool,

        /// Articles processed concurrently
        #[arg(short, long)]
        workers: Option<usize>,

        /// Disable the progress bar
        #[arg(long)]
        quiet: bool,
    },
    /// Validate the configuration and print it with defaults filled in
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("biokb=info,warn")),
        )
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(Config::default_path);
    let mut config = Config::load(&config_path)?;

    match cli.command {
        Commands::Run { input, output, no_db, strict, workers, quiet } => {
            if let Some(input) = input {
                config.corpus.input = input;
            }
            if let Some(output) = output {
                config.output.json_path = output;
            }
            if no_db {
                config.database.enabled = false;
            }
            if strict {
                config.pipeline.strict = true;
            }
            if let Some(workers) = workers {
                config.pipeline.workers = workers;
            }
            config.validate()?;
            run(config, !quiet).await
        }
        Commands::CheckConfig => {
            config.validate()?;
            let pool = config.build_pool()?;
            info!(annotators = pool.len(), "Annotator pool builds");
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

async fn run(config: Config, show_progress: bool) -> anyhow::Result<()> {
    info!("🔬 biokb starting up...");

    // Opened before the batch: a bad URI fails here, not after processing
    let store = open_store(&config.database).await?;

    let source = PubmedXmlSource::new(&config.corpus.input);
    let articles = source
        .load()
        .await
        .map_err(|e| KbError::SourceParse(e.to_string()))?;
    info!(source = %source.describe(), articles = articles.len(), "Corpus loaded");

    let pool = Arc::new(config.build_pool().context("building annotator pool")?);
    let segmenter = Segmenter::new(&pool, config.annotators.segmenter.as_deref())?;
    info!(
        annotators = pool.len(),
        segmenter = segmenter.annotator_name(),
        "Annotator pool ready"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if shutdown::forward_interrupts(tokio::signal::ctrl_c, shutdown_tx).await {
            warn!("Second interrupt, exiting without saving");
            std::process::exit(130);
        }
    });

    let (progress_tx, progress_rx) = broadcast::channel(256);
    let bar = progress::spawn(articles.len(), progress_rx, show_progress);

    let options = config.pipeline_options();
    let report: BatchReport = ExtractorSession::scoped(&config.session_config(), |extractor| async move {
        let processor = Arc::new(DocumentProcessor::new(segmenter, Aggregator::new(pool, extractor)));
        run_batch(articles, processor, &options, shutdown_rx, Some(progress_tx))
            .await
            .map_err(anyhow::Error::from)
    })
    .await?;
    let _ = bar.await;

    log_report(&report);

    let sink = PersistenceSink::new(&config.output.json_path, store);
    let saved = sink
        .save(&report.knowledge_base)
        .await
        .map_err(|e| KbError::Persistence(e.to_string()))?;

    info!(
        path = %saved.json_path.display(),
        articles = saved.articles_written,
        inserted = ?saved.documents_inserted,
        "Knowledge base saved"
    );
    Ok(())
}

async fn open_store(db: &DatabaseConfig) -> Result<Option<Arc<dyn DocumentStore>>, KbError> {
    if !db.enabled {
        info!("Document store disabled, writing JSON only");
        return Ok(None);
    }
    let store = MongoStore::connect(&db.uri, &db.database, &db.collection)
        .await
        .map_err(|e| KbError::Persistence(format!("cannot open document store {}: {e}", db.uri)))?;
    Ok(Some(Arc::new(store)))
}

fn log_report(report: &BatchReport) {
    let stats = &report.stats;
    info!(
        total = stats.articles_total,
        processed = stats.articles_processed,
        skipped = stats.articles_skipped,
        failed = stats.articles_failed,
        sentences = stats.sentences,
        entities = stats.entities,
        triples = stats.triples,
        duration_ms = stats.duration_ms,
        "Batch finished"
    );
    for (kind, count) in &stats.entity_types {
        info!(entity_type = %kind, count, "Entity mentions");
    }
    for failure in &report.failures {
        warn!(error = %failure, "Article left out");
    }
    if report.interrupted {
        warn!(
            processed = stats.articles_processed,
            total = stats.articles_total,
            "Run interrupted, saving partial knowledge base"
        );
    }
}
