//! Core library for purchase-order extraction.
//!
//! This crate provides:
//! - Document-level field rules (order number, dates, amounts, market, address)
//! - Budgetary allocation block scanning, one record per block
//! - PDF text extraction and batch drivers (folders, file lists, zip archives)
//! - Dataset export to CSV, XLSX and JSON

pub mod error;
pub mod export;
pub mod models;
pub mod order;
pub mod pdf;

#[cfg(feature = "native")]
pub mod batch;

pub use error::{PoError, Result};
pub use export::{to_csv_string, write_dataset, ExportFormat};
pub use models::record::{AllocationBlock, CommonField, CommonFields, Dataset, Record};
pub use order::{DocumentExtractor, FieldExtractor};
pub use pdf::TextSource;

#[cfg(feature = "native")]
pub use batch::{BatchProcessor, BatchReport, DocumentInput, DocumentSource};
#[cfg(feature = "native")]
pub use pdf::PdfExtractor;

/// Extract the records of one document with the default extractor.
pub fn extract(text: &str, doc_id: &str) -> Vec<Record> {
    FieldExtractor::new().extract(text, doc_id)
}
