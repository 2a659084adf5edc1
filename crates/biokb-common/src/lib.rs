//! biokb-common: shared record types and the run-level error used across all biokb crates.

pub mod error;
pub mod records;

// Re-export commonly used types
pub use error::{ArticleRef, KbError, Result};
pub use records::{
    ArticleRecord, EntityMention, KnowledgeBase, PosTag, SentenceRecord, Triple, DEFAULT_TITLE,
};
