//! Purchase-order extractor combining field rules and allocation blocks.

use tracing::debug;

use crate::models::record::{AllocationBlock, Record};

use super::rules::{extract_common_fields, scan_allocations};
use super::DocumentExtractor;

/// Extracts one record per allocation block of a purchase order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldExtractor;

impl FieldExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract the records of one document.
    ///
    /// Document-level fields are copied into every record. A document without
    /// allocation blocks still yields a single record with empty block fields.
    pub fn extract(&self, text: &str, doc_id: &str) -> Vec<Record> {
        let blocks = scan_allocations(text);
        let common = extract_common_fields(text);

        let missing = common.missing();
        if !missing.is_empty() {
            debug!("{}: missing fields {:?}", doc_id, missing);
        }
        debug!(
            "{}: {} allocation block(s) in {} characters",
            doc_id,
            blocks.len(),
            text.len()
        );

        if blocks.is_empty() {
            return vec![Record::new(doc_id, common, AllocationBlock::default())];
        }

        blocks
            .into_iter()
            .map(|block| Record::new(doc_id, common.clone(), block))
            .collect()
    }
}

impl DocumentExtractor for FieldExtractor {
    fn extract(&self, text: &str, doc_id: &str) -> Vec<Record> {
        FieldExtractor::extract(self, text, doc_id)
    }
}
