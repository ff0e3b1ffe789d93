//! Dataset serialization.

mod csv;
#[cfg(feature = "native")]
mod xlsx;

pub use self::csv::{to_csv_string, write_csv};
#[cfg(feature = "native")]
pub use self::xlsx::{to_xlsx_bytes, SHEET_NAME};

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::models::record::Dataset;

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Supported output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values with a header row.
    #[default]
    Csv,
    /// Excel workbook with a single sheet.
    Xlsx,
    /// JSON array of records.
    Json,
}

impl ExportFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Json => "json",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "xlsx" => Some(ExportFormat::Xlsx),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

/// Serialize `dataset` in `format` into `writer`.
pub fn write_dataset<W: Write>(dataset: &Dataset, format: ExportFormat, mut writer: W) -> Result<()> {
    match format {
        ExportFormat::Csv => write_csv(dataset, writer),
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, dataset)?;
            writer.flush()?;
            Ok(())
        }
        #[cfg(feature = "native")]
        ExportFormat::Xlsx => {
            writer.write_all(&to_xlsx_bytes(dataset)?)?;
            writer.flush()?;
            Ok(())
        }
        #[cfg(not(feature = "native"))]
        ExportFormat::Xlsx => Err(ExportError::Unsupported("xlsx".to_string())),
    }
}

/// Serialize `dataset` into the file at `path`.
pub fn write_dataset_to_path(
    dataset: &Dataset,
    format: ExportFormat,
    path: &std::path::Path,
) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_dataset(dataset, format, std::io::BufWriter::new(file))?;
    tracing::info!("Wrote {} records to {}", dataset.len(), path.display());
    Ok(())
}
