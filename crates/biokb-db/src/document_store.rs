//! Document stores for article records.

use async_trait::async_trait;
use biokb_common::ArticleRecord;
use mongodb::{Client, Collection};
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::error::Result;

/// A collection that receives each article record as its own document.
///
/// Inserts never upsert or deduplicate: saving the same article twice
/// stores two documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn describe(&self) -> String;

    /// Insert every record, returning the number of documents stored.
    async fn insert_articles(&self, articles: &[ArticleRecord]) -> Result<usize>;
}

/// MongoDB collection store.
pub struct MongoStore {
    collection: Collection<ArticleRecord>,
}

impl MongoStore {
    /// Build a client for `uri`. The server is first contacted on insert.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        let collection = client.database(database).collection::<ArticleRecord>(collection);
        info!(database, collection = collection.name(), "MongoDB client ready");
        Ok(Self { collection })
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn describe(&self) -> String {
        format!("mongodb {}.{}", self.collection.namespace().db, self.collection.name())
    }

    #[instrument(skip(self, articles), fields(documents = articles.len()))]
    async fn insert_articles(&self, articles: &[ArticleRecord]) -> Result<usize> {
        // Unordered: one rejected document does not stop the others
        let result = self.collection.insert_many(articles).ordered(false).await?;
        Ok(result.inserted_ids.len())
    }
}

/// In-process store, mostly for tests and dry runs.
#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<Vec<ArticleRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn documents(&self) -> Vec<ArticleRecord> {
        self.documents.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.documents.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.lock().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    async fn insert_articles(&self, articles: &[ArticleRecord]) -> Result<usize> {
        self.documents.lock().await.extend_from_slice(articles);
        Ok(articles.len())
    }
}
