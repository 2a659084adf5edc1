use async_trait::async_trait;
use biokb_common::Triple;

use crate::Result;

/// Extracts subject-predicate-object triples from raw sentence text.
#[async_trait]
pub trait RelationExtractor: Send + Sync {
    fn name(&self) -> &str;

    async fn extract_triples(&self, sentence: &str) -> Result<Vec<Triple>>;

    /// Called once when the owning session is released.
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}
