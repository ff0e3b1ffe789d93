//! Purchase-order field extraction module.

mod extractor;
pub mod rules;

pub use extractor::FieldExtractor;

use crate::models::record::Record;

/// Trait for turning one document's text into records.
///
/// Implementations are pure: the same text always yields the same records,
/// and at least one record is returned.
pub trait DocumentExtractor {
    /// Extract the records of one document.
    fn extract(&self, text: &str, doc_id: &str) -> Vec<Record>;
}
