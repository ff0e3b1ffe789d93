//! Error types for the poextract-core library.
//!
//! Field extraction never fails: a missing field is an empty string in the
//! resulting record. Everything here belongs to the I/O around it.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the poextract library.
#[derive(Error, Debug)]
pub enum PoError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Dataset export error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// Batch input error.
    #[error("batch error: {0}")]
    Batch(#[from] BatchError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF text extraction.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors raised while writing a dataset.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "native")]
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The requested format is not compiled into this build.
    #[error("unsupported export format: {0}")]
    Unsupported(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the batch drivers while collecting documents.
#[derive(Error, Debug)]
pub enum BatchError {
    /// Input path does not exist.
    #[error("input not found: {0}")]
    NotFound(PathBuf),

    /// The archive could not be opened or read.
    #[error("failed to read archive {path}: {reason}")]
    Archive { path: PathBuf, reason: String },

    /// The file type is not handled by the batch drivers.
    #[error("unsupported input: {0}")]
    Unsupported(PathBuf),

    /// A document could not be turned into text.
    #[error("failed to read {doc_id}: {source}")]
    Document {
        doc_id: String,
        #[source]
        source: Box<PoError>,
    },
}

/// Result type for the poextract library.
pub type Result<T> = std::result::Result<T, PoError>;
