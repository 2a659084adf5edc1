//! biokb persistence layer.
//!
//! The knowledge base is first archived as one pretty-printed JSON file and
//! then, read back from that file, bulk-inserted into a document store. The
//! archive is always complete before the store is contacted, so a store
//! failure leaves a file that can be re-imported.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use biokb_common::KnowledgeBase;
//! use biokb_db::{MongoStore, PersistenceSink};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoStore::connect("mongodb://localhost:27017/", "BIOMEDICAL_ARTICLES", "MedicalKnowledgeBase").await?;
//!     let sink = PersistenceSink::new("biomedical_knowledge_base.json", Some(Arc::new(store)));
//!     sink.save(&KnowledgeBase::new()).await?;
//!     Ok(())
//! }
//! ```

pub mod document_store;
pub mod error;
pub mod json_store;
pub mod sink;

pub use document_store::{DocumentStore, MemoryStore, MongoStore};
pub use error::{DbError, Result};
pub use json_store::{read_knowledge_base, write_knowledge_base};
pub use sink::{PersistenceSink, SaveReport};

pub const DEFAULT_JSON_PATH: &str = "biomedical_knowledge_base.json";
pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017/";
pub const DEFAULT_DATABASE: &str = "BIOMEDICAL_ARTICLES";
pub const DEFAULT_COLLECTION: &str = "MedicalKnowledgeBase";
