//! Terminal progress bar fed by the batch progress channel.

use biokb_ingestion::{ArticleOutcome, BatchProgress};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

const TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec}) {msg}";

/// Drive a progress bar until the sender side is dropped.
pub fn spawn(total: usize, mut events: broadcast::Receiver<BatchProgress>, visible: bool) -> JoinHandle<()> {
    let pb = if visible { ProgressBar::new(total as u64) } else { ProgressBar::hidden() };
    pb.set_style(
        ProgressStyle::default_bar()
            .template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    pb.set_position(event.completed as u64);
                    pb.set_message(describe(&event));
                }
                // Missed events only cost intermediate positions
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
        pb.finish_with_message("done");
    })
}

fn describe(event: &BatchProgress) -> String {
    let article = event.pmid.as_deref().unwrap_or("(no PMID)");
    match &event.outcome {
        ArticleOutcome::Processed { sentences } => format!("PMID {article}: {sentences} sentences"),
        ArticleOutcome::SkippedNoAbstract => format!("PMID {article}: no abstract"),
        ArticleOutcome::Failed { .. } => format!("PMID {article}: failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(outcome: ArticleOutcome) -> BatchProgress {
        BatchProgress { ordinal: 0, pmid: Some("1001".into()), completed: 1, total: 2, outcome }
    }

    #[test]
    fn test_describe_outcomes() {
        assert_eq!(describe(&event(ArticleOutcome::Processed { sentences: 2 })), "PMID 1001: 2 sentences");
        assert_eq!(describe(&event(ArticleOutcome::SkippedNoAbstract)), "PMID 1001: no abstract");
        assert_eq!(
            describe(&event(ArticleOutcome::Failed { error: "boom".into() })),
            "PMID 1001: failed"
        );
    }

    #[tokio::test]
    async fn test_bar_task_ends_when_sender_drops() {
        let (tx, rx) = broadcast::channel(4);
        let handle = spawn(2, rx, false);
        tx.send(event(ArticleOutcome::SkippedNoAbstract)).unwrap();
        drop(tx);
        handle.await.unwrap();
    }
}
