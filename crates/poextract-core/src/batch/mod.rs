//! Batch drivers.
//!
//! Documents come from a folder, an explicit file list or a zip archive. Each
//! one is turned into text, passed through a [`DocumentExtractor`] and its
//! records are appended to a single [`Dataset`] in processing order.

mod archive;
mod scan;

pub use archive::read_archive;
pub use scan::{accept_file_name, discover_files};

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{BatchError, PoError, Result};
use crate::models::config::{PoConfig, ScanConfig};
use crate::models::record::Dataset;
use crate::order::DocumentExtractor;
use crate::pdf::pdf_to_text;

/// Kind of input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// PDF, text obtained through the PDF collaborator.
    Pdf,
    /// Plain UTF-8 text, already extracted.
    Text,
}

impl DocumentKind {
    /// Detect the kind from a file name extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "txt" => Some(DocumentKind::Text),
            _ => None,
        }
    }
}

/// Where a document's bytes live.
#[derive(Debug, Clone)]
pub enum DocumentContent {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// One document queued for extraction.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    /// Label attached to every record (base file name).
    pub doc_id: String,
    /// Human readable location, for logs and failure reports.
    pub origin: String,
    pub kind: DocumentKind,
    pub content: DocumentContent,
}

impl DocumentInput {
    /// Queue a file from disk.
    pub fn from_path(path: &Path, kind: DocumentKind) -> Self {
        let doc_id = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            doc_id,
            origin: path.display().to_string(),
            kind,
            content: DocumentContent::Path(path.to_path_buf()),
        }
    }

    fn bytes(&self) -> std::io::Result<Cow<'_, [u8]>> {
        match &self.content {
            DocumentContent::Path(path) => fs::read(path).map(Cow::Owned),
            DocumentContent::Bytes(data) => Ok(Cow::Borrowed(data)),
        }
    }

    /// Obtain the document's linear text.
    pub fn read_text(&self) -> Result<String> {
        let data = self.bytes()?;
        match self.kind {
            DocumentKind::Pdf => Ok(pdf_to_text(&data)?),
            DocumentKind::Text => match String::from_utf8(data.into_owned()) {
                Ok(text) => Ok(text),
                Err(e) => {
                    warn!("{} is not valid UTF-8, decoding lossily", self.origin);
                    Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
                }
            },
        }
    }

    /// File name used for the text dump of this document.
    fn text_dump_name(&self) -> String {
        let stem = Path::new(&self.doc_id)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.doc_id.clone());
        format!("{}.txt", stem)
    }
}

/// A set of documents to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Every accepted file of a folder, up to the configured depth.
    Directory(PathBuf),
    /// Explicit files, processed in the given order.
    Files(Vec<PathBuf>),
    /// Every accepted entry of a zip archive.
    Archive(PathBuf),
}

impl DocumentSource {
    /// Classify a path: folder, `.zip` archive, or single file.
    pub fn from_path(path: &Path) -> Self {
        if path.is_dir() {
            return DocumentSource::Directory(path.to_path_buf());
        }
        let is_zip = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("zip"));
        if is_zip {
            DocumentSource::Archive(path.to_path_buf())
        } else {
            DocumentSource::Files(vec![path.to_path_buf()])
        }
    }

    /// Folder next to which outputs are written by default.
    pub fn base_dir(&self) -> PathBuf {
        let parent_of = |p: &Path| {
            p.parent()
                .filter(|d| !d.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        };
        match self {
            DocumentSource::Directory(root) => root.clone(),
            DocumentSource::Archive(path) => parent_of(path),
            DocumentSource::Files(files) => files
                .first()
                .map(|p| parent_of(p))
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    /// Resolve the documents of this source.
    ///
    /// `exclude` is skipped while walking a folder.
    pub fn collect(
        &self,
        config: &ScanConfig,
        exclude: Option<&Path>,
    ) -> std::result::Result<Vec<DocumentInput>, BatchError> {
        match self {
            DocumentSource::Directory(root) => Ok(discover_files(root, config, exclude)?
                .into_iter()
                .map(|(path, kind)| DocumentInput::from_path(&path, kind))
                .collect()),
            DocumentSource::Archive(path) => read_archive(path, config),
            DocumentSource::Files(files) => files
                .iter()
                .map(|path| {
                    if !path.is_file() {
                        return Err(BatchError::NotFound(path.clone()));
                    }
                    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
                    let kind = DocumentKind::from_file_name(&name)
                        .ok_or_else(|| BatchError::Unsupported(path.clone()))?;
                    Ok(DocumentInput::from_path(path, kind))
                })
                .collect(),
        }
    }
}

/// A document that could not be read.
#[derive(Debug, Clone)]
pub struct Failure {
    pub origin: String,
    pub error: String,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Records of every readable document, in processing order.
    pub dataset: Dataset,
    /// Documents skipped because their text could not be obtained.
    pub failures: Vec<Failure>,
    /// Number of documents whose records are in the dataset.
    pub processed: usize,
}

/// Runs an extractor over many documents.
pub struct BatchProcessor<E> {
    extractor: E,
    continue_on_error: bool,
    text_dir: Option<PathBuf>,
}

impl<E: DocumentExtractor> BatchProcessor<E> {
    /// Create a processor that stops at the first unreadable document.
    pub fn new(extractor: E) -> Self {
        Self {
            extractor,
            continue_on_error: false,
            text_dir: None,
        }
    }

    /// Build a processor from configuration, dumping text next to `base_dir`.
    pub fn from_config(extractor: E, config: &PoConfig, base_dir: &Path) -> Self {
        let processor = Self::new(extractor).with_continue_on_error(config.batch.continue_on_error);
        if config.export.save_text {
            processor.with_text_dir(base_dir.join(&config.export.text_dir_name))
        } else {
            processor
        }
    }

    /// Record unreadable documents instead of failing.
    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    /// Save the text of every PDF into `dir`.
    pub fn with_text_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.text_dir = Some(dir.into());
        self
    }

    pub fn text_dir(&self) -> Option<&Path> {
        self.text_dir.as_deref()
    }

    /// Process `inputs` in order, calling `on_document` after each one.
    pub fn process<F>(&self, inputs: &[DocumentInput], mut on_document: F) -> Result<BatchReport>
    where
        F: FnMut(&DocumentInput),
    {
        let mut report = BatchReport::default();

        for input in inputs {
            match input.read_text() {
                Ok(text) => {
                    if text.trim().is_empty() {
                        warn!("No text in {}", input.origin);
                    }
                    if input.kind == DocumentKind::Pdf {
                        self.save_text(input, &text);
                    }

                    let records = self.extractor.extract(&text, &input.doc_id);
                    debug!("{}: {} record(s)", input.origin, records.len());
                    report.dataset.push_document(records);
                    report.processed += 1;
                }
                Err(e) if self.continue_on_error => {
                    warn!("Failed to process {}: {}", input.origin, e);
                    report.failures.push(Failure {
                        origin: input.origin.clone(),
                        error: e.to_string(),
                    });
                }
                Err(e) => {
                    return Err(PoError::Batch(BatchError::Document {
                        doc_id: input.doc_id.clone(),
                        source: Box::new(e),
                    }));
                }
            }
            on_document(input);
        }

        info!(
            "Processed {} documents into {} records ({} failed)",
            report.processed,
            report.dataset.len(),
            report.failures.len()
        );
        Ok(report)
    }

    fn save_text(&self, input: &DocumentInput, text: &str) {
        let Some(dir) = &self.text_dir else {
            return;
        };
        let path = dir.join(input.text_dump_name());
        let written = fs::create_dir_all(dir).and_then(|_| fs::write(&path, text));
        match written {
            Ok(()) => debug!("Saved text of {} to {}", input.origin, path.display()),
            Err(e) => warn!("Could not save text to {}: {}", path.display(), e),
        }
    }
}

/// Collect and process a source with the given configuration.
pub fn run_source<E: DocumentExtractor>(
    extractor: E,
    source: &DocumentSource,
    config: &PoConfig,
) -> Result<BatchReport> {
    let base_dir = source.base_dir();
    let processor = BatchProcessor::from_config(extractor, config, &base_dir);
    let inputs = source.collect(&config.scan, processor.text_dir())?;
    processor.process(&inputs, |_| {})
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::FieldExtractor;
    use pretty_assertions::assert_eq;

    const ORDER_A: &str = "Bon de commande 100\n\
                           Imputation budgétaire\n111-X P1 01 1000001 1000000001 A1\n\
                           Imputation budgétaire\n222-Y P2 02 2000002 2000000002 A2\n";
    const ORDER_B: &str = "Bon de commande 200\nMontant TTC : 99,90\n";

    fn text_config() -> PoConfig {
        let mut config = PoConfig::default();
        config.scan.include_text_files = true;
        config
    }

    #[test]
    fn test_document_kind() {
        assert_eq!(DocumentKind::from_file_name("a.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_file_name("a.txt"), Some(DocumentKind::Text));
        assert_eq!(DocumentKind::from_file_name("a"), None);
    }

    #[test]
    fn test_source_from_path() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            DocumentSource::from_path(dir.path()),
            DocumentSource::Directory(dir.path().to_path_buf())
        );
        assert!(matches!(
            DocumentSource::from_path(Path::new("in/orders.ZIP")),
            DocumentSource::Archive(_)
        ));
        let single = DocumentSource::from_path(Path::new("in/a.pdf"));
        assert_eq!(single.base_dir(), PathBuf::from("in"));
    }

    #[test]
    fn test_directory_batch_accumulates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), ORDER_A).unwrap();
        fs::write(dir.path().join("b.txt"), ORDER_B).unwrap();

        let source = DocumentSource::Directory(dir.path().to_path_buf());
        let report = run_source(FieldExtractor::new(), &source, &text_config()).unwrap();

        assert_eq!(report.processed, 2);
        let records = report.dataset.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].doc_id, "a.txt");
        assert_eq!(records[0].allocation.element_code, "A1");
        assert_eq!(records[1].allocation.element_code, "A2");
        assert_eq!(records[1].common.order_number, "100");
        assert_eq!(records[2].doc_id, "b.txt");
        assert_eq!(records[2].common.amount_incl_tax, "99,90");
        assert!(records[2].allocation.is_empty());
    }

    #[test]
    fn test_unreadable_document_stops_batch() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.pdf");
        fs::write(&bad, b"not a pdf").unwrap();

        let source = DocumentSource::Files(vec![bad]);
        let result = run_source(FieldExtractor::new(), &source, &PoConfig::default());
        assert!(matches!(
            result,
            Err(PoError::Batch(BatchError::Document { .. }))
        ));
    }

    #[test]
    fn test_continue_on_error_records_failure() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.pdf");
        let good = dir.path().join("good.txt");
        fs::write(&bad, b"not a pdf").unwrap();
        fs::write(&good, ORDER_B).unwrap();

        let mut config = text_config();
        config.batch.continue_on_error = true;

        let source = DocumentSource::Files(vec![bad, good]);
        let report = run_source(FieldExtractor::new(), &source, &config).unwrap();

        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].origin.ends_with("bad.pdf"));
        assert_eq!(report.dataset.len(), 1);
        assert_eq!(report.dataset.records()[0].doc_id, "good.txt");
    }

    #[test]
    fn test_unsupported_file() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("scan.png");
        fs::write(&image, b"png").unwrap();

        let source = DocumentSource::Files(vec![image]);
        assert!(matches!(
            source.collect(&ScanConfig::default(), None),
            Err(BatchError::Unsupported(_))
        ));
    }

    #[test]
    fn test_progress_callback_and_text_dump_skipped_for_text_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, ORDER_A).unwrap();
        let dump_dir = dir.path().join("dumps");

        let processor = BatchProcessor::new(FieldExtractor::new()).with_text_dir(&dump_dir);
        let inputs = vec![DocumentInput::from_path(&path, DocumentKind::Text)];

        let mut seen = Vec::new();
        let report = processor
            .process(&inputs, |input| seen.push(input.doc_id.clone()))
            .unwrap();

        assert_eq!(seen, vec!["a.txt".to_string()]);
        assert_eq!(report.dataset.len(), 2);
        assert!(!dump_dir.exists());
    }

    #[test]
    fn test_pdf_folder_with_text_dump() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = crate::pdf::fixtures::pdf_with_lines(&[
            "Bon de commande 4500123",
            "Montant HT : 1.234,56",
        ]);
        fs::write(dir.path().join("bc.pdf"), pdf).unwrap();

        let mut config = text_config();
        config.export.save_text = true;
        let source = DocumentSource::Directory(dir.path().to_path_buf());

        let report = run_source(FieldExtractor::new(), &source, &config).unwrap();
        assert_eq!(report.processed, 1);
        let record = &report.dataset.records()[0];
        assert_eq!(record.doc_id, "bc.pdf");
        assert_eq!(record.common.order_number, "4500123");
        assert_eq!(record.common.amount_excl_tax, "1.234,56");

        let dump = dir.path().join("txt_extraits").join("bc.txt");
        let dumped = fs::read_to_string(&dump).unwrap();
        assert!(dumped.contains("4500123"));

        // The dump folder is not picked up as input on the next run
        let again = run_source(FieldExtractor::new(), &source, &config).unwrap();
        assert_eq!(again.processed, 1);
        assert_eq!(again.dataset.len(), 1);
    }

    #[test]
    fn test_text_dump_name() {
        let input = DocumentInput {
            doc_id: "BC 2024.001.pdf".to_string(),
            origin: "x".to_string(),
            kind: DocumentKind::Pdf,
            content: DocumentContent::Bytes(Vec::new()),
        };
        assert_eq!(input.text_dump_name(), "BC 2024.001.txt");
    }
}
