//! Extract command - records of a single purchase order.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use poextract_core::batch::{DocumentInput, DocumentKind};
use poextract_core::export::{to_csv_string, write_dataset, ExportFormat};
use poextract_core::{Dataset, FieldExtractor, Record};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or previously extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Label stored in the `pdf` column (default: file name)
    #[arg(long)]
    doc_id: Option<String>,

    /// Also write the extracted text to this file
    #[arg(long)]
    save_text: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs) -> anyhow::Result<()> {
    let start = Instant::now();

    if !args.input.is_file() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let name = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let Some(kind) = DocumentKind::from_file_name(&name) else {
        anyhow::bail!("Unsupported file format: {}", args.input.display());
    };

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Reading text...");

    let mut input = DocumentInput::from_path(&args.input, kind);
    if let Some(doc_id) = &args.doc_id {
        input.doc_id = doc_id.clone();
    }

    let text = input.read_text()?;
    if text.trim().is_empty() {
        warn!("No text could be extracted from {}", args.input.display());
    }
    if let Some(path) = &args.save_text {
        fs::write(path, &text)?;
        debug!("Saved extracted text to {}", path.display());
    }

    pb.set_message("Extracting fields...");
    let records = FieldExtractor::new().extract(&text, &input.doc_id);
    pb.finish_and_clear();

    let output = format_records(&records, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_records(records: &[Record], format: OutputFormat) -> anyhow::Result<String> {
    let dataset: Dataset = records.iter().cloned().collect();
    match format {
        OutputFormat::Json => {
            let mut buf = Vec::new();
            write_dataset(&dataset, ExportFormat::Json, &mut buf)?;
            buf.push(b'\n');
            Ok(String::from_utf8(buf)?)
        }
        OutputFormat::Csv => Ok(to_csv_string(&dataset)?),
        OutputFormat::Text => Ok(format_text(records)),
    }
}

fn format_text(records: &[Record]) -> String {
    let mut output = String::new();
    let Some(first) = records.first() else {
        return output;
    };
    let common = &first.common;
    let or_dash = |value: &str| if value.is_empty() { "-".to_string() } else { value.to_string() };

    output.push_str(&format!("Document: {}\n", first.doc_id));
    output.push_str(&format!("Order:    {}\n", or_dash(&common.order_number)));
    output.push_str(&format!("Issued:   {}\n", or_dash(&common.issue_date)));
    output.push_str(&format!("Delivery: {}\n", or_dash(&common.delivery_date)));
    output.push_str(&format!("Item:     {}\n", or_dash(&common.designation)));
    output.push_str(&format!("Market:   {}\n", or_dash(&common.market_number)));
    output.push_str(&format!("Supplier: {}\n", or_dash(&common.address_line_1)));
    output.push('\n');

    output.push_str("Amounts:\n");
    output.push_str(&format!("  HT:  {}\n", or_dash(&common.amount_excl_tax)));
    output.push_str(&format!("  TVA: {}\n", or_dash(&common.amount_tax)));
    output.push_str(&format!("  TTC: {}\n", or_dash(&common.amount_incl_tax)));

    let blocks: Vec<_> = records
        .iter()
        .filter(|r| !r.allocation.is_empty())
        .collect();
    output.push('\n');
    if blocks.is_empty() {
        output.push_str("Allocations: none\n");
    } else {
        output.push_str(&format!("Allocations ({}):\n", blocks.len()));
        for record in blocks {
            let a = &record.allocation;
            output.push_str(&format!(
                "  {} {} {} {} {} {}\n",
                a.budget_account,
                a.heading_code,
                a.organizational_structure,
                a.program_authorization,
                a.destination_code,
                a.element_code
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_text_lists_allocations() {
        let text = "Bon de commande 7\nImputation budgétaire\n123-ABC P45 12 1234567 1234567890 A99";
        let records = FieldExtractor::new().extract(text, "t.pdf");
        let out = format_text(&records);

        assert!(out.contains("Order:    7"));
        assert!(out.contains("Issued:   -"));
        assert!(out.contains("Allocations (1):"));
        assert!(out.contains("123-ABC P45 12 1234567 1234567890 A99"));
    }

    #[test]
    fn test_format_csv_has_header() {
        let records = FieldExtractor::new().extract("", "t.pdf");
        let out = format_records(&records, OutputFormat::Csv).unwrap();
        assert!(out.starts_with("pdf,commande,"));
        assert_eq!(out.lines().count(), 2);
    }
}
