//! Batch runner.
//!
//! Processes a corpus on a bounded pool of concurrent articles:
//!   1. Stop scheduling new articles once the shutdown flag is raised
//!   2. Process each article on its own task under an optional timeout
//!   3. Collect records in corpus order, whatever order articles finish in
//!   4. Isolate failing articles, or abort on the first one in strict mode
//!   5. Emit progress events via broadcast channel

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use biokb_common::{ArticleRecord, ArticleRef, KbError, KnowledgeBase};
use biokb_ner::normalize_entity_label;
use futures::{future, StreamExt};
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use crate::models::CorpusArticle;
use crate::processor::DocumentProcessor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Articles processed concurrently.
    pub workers: usize,
    pub article_timeout: Option<Duration>,
    /// Abort the run on the first failing article instead of skipping it.
    pub strict: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            workers: 4,
            article_timeout: Some(Duration::from_secs(300)),
            strict: false,
        }
    }
}

// ── Progress events ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ArticleOutcome {
    Processed { sentences: usize },
    SkippedNoAbstract,
    Failed { error: String },
}

/// Emitted once per finished article (cloneable for broadcast).
#[derive(Debug, Clone, Serialize)]
pub struct BatchProgress {
    pub ordinal: usize,
    pub pmid: Option<String>,
    pub completed: usize,
    pub total: usize,
    pub outcome: ArticleOutcome,
}

// ── Result summary ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchStats {
    pub articles_total: usize,
    pub articles_processed: usize,
    pub articles_skipped: usize,
    pub articles_failed: usize,
    pub sentences: usize,
    pub tokens: usize,
    pub entities: usize,
    pub triples: usize,
    /// Entity mentions per normalized entity type.
    pub entity_types: BTreeMap<String, usize>,
    pub duration_ms: u64,
}

#[derive(Debug)]
pub struct BatchReport {
    pub knowledge_base: KnowledgeBase,
    pub skipped_no_abstract: Vec<ArticleRef>,
    pub failures: Vec<KbError>,
    pub stats: BatchStats,
    /// Shutdown was requested before every article was scheduled.
    pub interrupted: bool,
}

fn collect_stats(kb: &KnowledgeBase, stats: &mut BatchStats) {
    for article in kb.articles() {
        for sentence in &article.sentences {
            stats.sentences += 1;
            stats.tokens += sentence.tokens.len();
            stats.entities += sentence.entities.len();
            stats.triples += sentence.triples.len();
            for entity in &sentence.entities {
                let kind = normalize_entity_label(entity.label()).as_str();
                *stats.entity_types.entry(kind.to_string()).or_default() += 1;
            }
        }
    }
}

/// Aborts the article task when the runner stops waiting for it.
struct ArticleTask(JoinHandle<crate::Result<Option<ArticleRecord>>>);

impl Drop for ArticleTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

async fn process_one(
    processor: Arc<DocumentProcessor>,
    article: CorpusArticle,
    article_ref: &ArticleRef,
    timeout: Option<Duration>,
) -> Result<Option<ArticleRecord>, KbError> {
    let mut task = ArticleTask(tokio::spawn(async move { processor.process(&article).await }));
    let joined = match timeout {
        Some(limit) => tokio::time::timeout(limit, &mut task.0).await.map_err(|_| KbError::Timeout {
            article: article_ref.clone(),
            limit,
        })?,
        None => (&mut task.0).await,
    };
    let result = joined.map_err(|e| KbError::Annotation {
        article: article_ref.clone(),
        message: format!("article task failed: {e}"),
    })?;
    result.map_err(|e| KbError::Annotation {
        article: article_ref.clone(),
        message: e.to_string(),
    })
}

// ── Runner ────────────────────────────────────────────────────────────────────

/// Process `articles` and build the knowledge base in corpus order.
///
/// In lenient mode a failing or timed-out article is logged, recorded in
/// [`BatchReport::failures`] and left out. In strict mode the first failure
/// is returned and in-flight articles are dropped.
#[instrument(skip_all, fields(articles = articles.len(), workers = options.workers, strict = options.strict))]
pub async fn run_batch(
    articles: Vec<CorpusArticle>,
    processor: Arc<DocumentProcessor>,
    options: &PipelineOptions,
    shutdown: watch::Receiver<bool>,
    progress_tx: Option<broadcast::Sender<BatchProgress>>,
) -> Result<BatchReport, KbError> {
    let started = Instant::now();
    let total = articles.len();
    let timeout = options.article_timeout;
    let stop = shutdown.clone();

    let mut stats = BatchStats { articles_total: total, ..Default::default() };
    let mut kb = KnowledgeBase::new();
    let mut skipped = Vec::new();
    let mut failures = Vec::new();
    let mut completed = 0;

    let results = futures::stream::iter(articles.into_iter().enumerate())
        .take_while(move |_| future::ready(!*stop.borrow()))
        .map(|(ordinal, article)| {
            let processor = Arc::clone(&processor);
            async move {
                let article_ref = ArticleRef::new(ordinal, article.pmid.clone());
                let outcome = process_one(processor, article, &article_ref, timeout).await;
                (article_ref, outcome)
            }
        })
        .buffered(options.workers.max(1));
    let mut results = std::pin::pin!(results);

    while let Some((article_ref, outcome)) = results.next().await {
        completed += 1;
        let event = match outcome {
            Ok(Some(record)) => {
                let sentences = record.sentences.len();
                kb.push(record);
                stats.articles_processed += 1;
                ArticleOutcome::Processed { sentences }
            }
            Ok(None) => {
                skipped.push(article_ref.clone());
                stats.articles_skipped += 1;
                ArticleOutcome::SkippedNoAbstract
            }
            Err(e) if options.strict => {
                warn!(article = %article_ref, error = %e, "Article failed, aborting run");
                return Err(e);
            }
            Err(e) => {
                warn!(article = %article_ref, error = %e, "Article failed, skipping");
                let error = e.to_string();
                failures.push(e);
                stats.articles_failed += 1;
                ArticleOutcome::Failed { error }
            }
        };

        if let Some(tx) = &progress_tx {
            let _ = tx.send(BatchProgress {
                ordinal: article_ref.ordinal,
                pmid: article_ref.pmid,
                completed,
                total,
                outcome: event,
            });
        }
    }

    let interrupted = completed < total && *shutdown.borrow();
    if interrupted {
        warn!(completed, total, "Shutdown requested, remaining articles not processed");
    }

    collect_stats(&kb, &mut stats);
    stats.duration_ms = started.elapsed().as_millis() as u64;

    info!(
        processed = stats.articles_processed,
        skipped = stats.articles_skipped,
        failed = stats.articles_failed,
        sentences = stats.sentences,
        entities = stats.entities,
        triples = stats.triples,
        duration_ms = stats.duration_ms,
        "Batch complete"
    );

    Ok(BatchReport {
        knowledge_base: kb,
        skipped_no_abstract: skipped,
        failures,
        stats,
        interrupted,
    })
}
