//! Zip archive input.

use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use super::scan::accept_file_name;
use super::{DocumentContent, DocumentInput};
use crate::error::BatchError;
use crate::models::config::ScanConfig;

/// Upper bound on the buffer reserved from an entry's declared size.
const MAX_PREALLOC: u64 = 16 << 20;

/// Read every accepted document of a `.zip` archive into memory.
///
/// Entries are kept in archive order. Corrupt entries are skipped.
pub fn read_archive(path: &Path, config: &ScanConfig) -> Result<Vec<DocumentInput>, BatchError> {
    if !path.is_file() {
        return Err(BatchError::NotFound(path.to_path_buf()));
    }

    let archive_error = |reason: String| BatchError::Archive {
        path: path.to_path_buf(),
        reason,
    };

    let file = std::fs::File::open(path).map_err(|e| archive_error(e.to_string()))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| archive_error(e.to_string()))?;

    let mut documents = Vec::new();
    for i in 0..archive.len() {
        let mut entry = match archive.by_index(i) {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping corrupt zip entry {}: {}", i, e);
                continue;
            }
        };
        if entry.is_dir() {
            continue;
        }

        let entry_name = entry.name().to_string();
        let base_name = entry_name
            .rsplit('/')
            .next()
            .unwrap_or(entry_name.as_str())
            .to_string();

        let Some(kind) = accept_file_name(&base_name, config) else {
            continue;
        };

        // The declared size is untrusted
        let mut data = Vec::with_capacity(entry.size().min(MAX_PREALLOC) as usize);
        if let Err(e) = entry.read_to_end(&mut data) {
            warn!("Skipping unreadable zip entry {}: {}", entry_name, e);
            continue;
        }

        documents.push(DocumentInput {
            doc_id: base_name,
            origin: format!("{}!{}", path.display(), entry_name),
            kind,
            content: DocumentContent::Bytes(data),
        });
    }

    info!("Read {} documents from {}", documents.len(), path.display());
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::DocumentKind;
    use std::io::Write;

    #[test]
    fn test_read_archive() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("orders.zip");

        let file = std::fs::File::create(&zip_path).unwrap();
        let mut zip_writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);
        zip_writer.start_file("2024/bc_001.pdf", options).unwrap();
        zip_writer.write_all(b"%PDF-1.4").unwrap();
        zip_writer.start_file("2024/preuve_001.pdf", options).unwrap();
        zip_writer.write_all(b"%PDF-1.4").unwrap();
        zip_writer.start_file("readme.md", options).unwrap();
        zip_writer.write_all(b"# orders").unwrap();
        zip_writer.finish().unwrap();

        let documents = read_archive(&zip_path, &ScanConfig::default()).unwrap();

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].doc_id, "bc_001.pdf");
        assert_eq!(documents[0].kind, DocumentKind::Pdf);
        assert!(documents[0].origin.ends_with("!2024/bc_001.pdf"));
        assert!(matches!(&documents[0].content, DocumentContent::Bytes(b) if b == b"%PDF-1.4"));
    }

    #[test]
    fn test_oversized_declared_entry() {
        let mut buffer = std::io::Cursor::new(Vec::new());
        let mut zip_writer = zip::ZipWriter::new(&mut buffer);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        zip_writer.start_file("a.txt", options).unwrap();
        zip_writer.write_all(b"Bon de commande 1").unwrap();
        zip_writer.start_file("b.pdf", options).unwrap();
        zip_writer.write_all(b"%PDF-1.4").unwrap();
        zip_writer.finish().unwrap();
        let mut bytes = buffer.into_inner();

        // Uncompressed size of the first central directory record
        let header = bytes
            .windows(4)
            .position(|w| w == b"PK\x01\x02")
            .unwrap();
        bytes[header + 24..header + 28].copy_from_slice(&0xFFFF_FFFEu32.to_le_bytes());

        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("orders.zip");
        std::fs::write(&zip_path, &bytes).unwrap();

        let config = ScanConfig {
            include_text_files: true,
            ..ScanConfig::default()
        };
        let documents = read_archive(&zip_path, &config).unwrap();

        assert!(documents.iter().any(|d| d.doc_id == "b.pdf"));
        assert!(documents.len() <= 2);
    }

    #[test]
    fn test_not_an_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.zip");
        std::fs::write(&path, b"garbage").unwrap();

        assert!(matches!(
            read_archive(&path, &ScanConfig::default()),
            Err(BatchError::Archive { .. })
        ));
    }
}
