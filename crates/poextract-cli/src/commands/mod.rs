//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod extract;

use poextract_core::ExportFormat;

/// Table formats accepted on the command line.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum TableFormat {
    /// Comma-separated values
    Csv,
    /// Excel workbook
    Xlsx,
    /// JSON array of records
    Json,
}

impl From<TableFormat> for ExportFormat {
    fn from(format: TableFormat) -> Self {
        match format {
            TableFormat::Csv => ExportFormat::Csv,
            TableFormat::Xlsx => ExportFormat::Xlsx,
            TableFormat::Json => ExportFormat::Json,
        }
    }
}
