//! Batch command - extract many purchase orders into one table.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use poextract_core::batch::{accept_file_name, BatchProcessor, DocumentSource};
use poextract_core::export::{write_dataset, write_dataset_to_path, ExportFormat};
use poextract_core::models::config::{PoConfig, ScanConfig};
use poextract_core::FieldExtractor;

use super::config::load_config;
use super::TableFormat;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Folder, zip archive, or glob pattern of files
    #[arg(required = true)]
    input: String,

    /// Output file, or "-" for stdout (default: <folder>/resultats_extraction.<ext>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from config, or the output file extension)
    #[arg(short, long, value_enum)]
    format: Option<TableFormat>,

    /// Save the extracted text of each PDF as a .txt file
    #[arg(long)]
    save_text: bool,

    /// Folder receiving the text files (default: <folder>/txt_extraits)
    #[arg(long)]
    text_dir: Option<PathBuf>,

    /// Deepest subfolder level to scan below the input folder
    #[arg(long)]
    max_depth: Option<usize>,

    /// Also process .txt files holding previously extracted text
    #[arg(long)]
    include_text: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

impl BatchArgs {
    /// Apply command-line overrides on top of the loaded configuration.
    fn apply(&self, config: &mut PoConfig) {
        if let Some(format) = self.format {
            config.export.format = format.into();
        } else if let Some(format) = self
            .output
            .as_deref()
            .and_then(|p| p.extension())
            .and_then(|e| e.to_str())
            .and_then(ExportFormat::from_extension)
        {
            config.export.format = format;
        }
        if let Some(depth) = self.max_depth {
            config.scan.max_depth = depth;
        }
        config.scan.include_text_files |= self.include_text;
        config.export.save_text |= self.save_text || self.text_dir.is_some();
        config.batch.continue_on_error |= self.continue_on_error;
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    args.apply(&mut config);

    let source = resolve_source(&args.input, &config.scan)?;
    let base_dir = source.base_dir();

    let mut processor = BatchProcessor::from_config(FieldExtractor::new(), &config, &base_dir);
    if let Some(dir) = &args.text_dir {
        processor = processor.with_text_dir(dir);
    }

    let inputs = source.collect(&config.scan, processor.text_dir())?;
    if inputs.is_empty() {
        anyhow::bail!("No documents found in {}", args.input);
    }

    eprintln!(
        "{} Found {} documents to process",
        style("ℹ").blue(),
        inputs.len()
    );

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let report = processor.process(&inputs, |input| {
        pb.set_message(input.doc_id.clone());
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    // Write the table
    let format = config.export.format;
    match args.output.as_deref() {
        Some(path) if path == Path::new("-") => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            write_dataset(&report.dataset, format, &mut lock)?;
            lock.flush()?;
        }
        output => {
            let path = output
                .map(Path::to_path_buf)
                .unwrap_or_else(|| base_dir.join(config.output_file()));
            write_dataset_to_path(&report.dataset, format, &path)?;
            eprintln!(
                "{} {} written to {}",
                style("✓").green(),
                format.extension().to_uppercase(),
                path.display()
            );
        }
    }

    if let Some(dir) = processor.text_dir() {
        info!("Extracted text saved under {}", dir.display());
    }

    eprintln!();
    eprintln!(
        "{} Processed {} documents into {} rows in {:?}",
        style("✓").green(),
        report.processed,
        report.dataset.len(),
        start.elapsed()
    );

    if !report.failures.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for failure in &report.failures {
            eprintln!("  - {}: {}", failure.origin, failure.error);
        }
    }

    Ok(())
}

/// Turn the input argument into a document source.
///
/// Anything containing glob metacharacters is expanded; matches go through
/// the same file-name rules as a folder scan.
fn resolve_source(input: &str, scan: &ScanConfig) -> anyhow::Result<DocumentSource> {
    if !input.contains(['*', '?', '[']) {
        let path = Path::new(input);
        if !path.exists() {
            anyhow::bail!("Input not found: {}", input);
        }
        return Ok(DocumentSource::from_path(path));
    }

    let mut files: Vec<PathBuf> = glob(input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .map(|n| accept_file_name(&n.to_string_lossy(), scan).is_some())
                .unwrap_or(false)
        })
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", input);
    }
    debug!("Pattern {} matched {} files", input, files.len());

    Ok(DocumentSource::Files(files))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_glob_applies_scan_rules() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.pdf", "preuve_c.pdf", "d.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let pattern = format!("{}/*", dir.path().display());
        let source = resolve_source(&pattern, &ScanConfig::default()).unwrap();

        assert_eq!(
            source,
            DocumentSource::Files(vec![dir.path().join("a.pdf"), dir.path().join("b.pdf")])
        );
    }

    #[test]
    fn test_resolve_missing_path() {
        assert!(resolve_source("/no/such/folder", &ScanConfig::default()).is_err());
    }
}
