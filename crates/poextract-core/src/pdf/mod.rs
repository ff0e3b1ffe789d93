//! PDF text extraction module.
//!
//! The extractor only needs one linear string per document; page layout is
//! not interpreted.

#[cfg(feature = "native")]
mod extractor;

#[cfg(feature = "native")]
pub use extractor::PdfExtractor;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for document text sources.
pub trait TextSource {
    /// Load a document from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the document.
    fn page_count(&self) -> u32;

    /// Extract the text of all pages, in page order.
    fn extract_text(&self) -> Result<String>;
}

/// Read the text of a PDF held in memory.
#[cfg(feature = "native")]
pub fn pdf_to_text(data: &[u8]) -> Result<String> {
    let mut extractor = PdfExtractor::new();
    extractor.load(data)?;
    extractor.extract_text()
}
