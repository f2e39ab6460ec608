//! blackout CLI - document redaction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Deserialize;

use blackout::{
    detect_format_from_path, redact_file, BatchProcessor, DirStore, ItemStatus, RedactionItem,
};

#[derive(Parser)]
#[command(name = "blackout")]
#[command(version)]
#[command(about = "Black out sensitive text regions in PDF and image documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Redact a single document
    Redact {
        /// Input document (PDF, JPEG, PNG, or TIFF)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Layout analysis JSON
        #[arg(short, long, value_name = "FILE")]
        layout: PathBuf,

        /// Entity analysis JSON
        #[arg(short, long, value_name = "FILE")]
        entities: PathBuf,

        /// Output file (defaults to <input>-redacted.<ext>)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Process a batch manifest against a directory store
    Batch {
        /// Manifest JSON listing the items to redact
        #[arg(value_name = "FILE")]
        manifest: PathBuf,

        /// Root directory of the object store
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        root: PathBuf,

        /// Write the batch report JSON to this file
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// Detect a document's format from its content
    Detect {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

/// Batch manifest: the list of items to process.
#[derive(Deserialize)]
struct Manifest {
    items: Vec<RedactionItem>,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Redact {
            input,
            layout,
            entities,
            output,
        } => cmd_redact(&input, &layout, &entities, output.as_deref()),
        Commands::Batch {
            manifest,
            root,
            report,
        } => cmd_batch(&manifest, &root, report.as_deref()),
        Commands::Detect { input } => cmd_detect(&input),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_redact(
    input: &Path,
    layout: &Path,
    entities: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| default_output_path(input));

    let redacted = redact_file(input, layout, entities, output.as_path())?;

    println!(
        "{} {} ({} page(s), {} region(s) blacked out)",
        "Saved".green(),
        output.display(),
        redacted.page_count,
        redacted.marks_applied
    );
    Ok(())
}

fn cmd_batch(
    manifest_path: &Path,
    root: &Path,
    report_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let manifest: Manifest = serde_json::from_slice(&fs::read(manifest_path)?)?;
    let store = DirStore::new(root);

    let report = BatchProcessor::new(&store).process(&manifest.items)?;

    for outcome in &report.outcomes {
        match &outcome.status {
            ItemStatus::Redacted {
                pages,
                marks,
                output_key,
            } => println!(
                "{} {} -> {} ({} page(s), {} mark(s))",
                "ok".green(),
                outcome.document_id,
                output_key,
                pages,
                marks
            ),
            ItemStatus::Failed { error } => {
                println!("{} {}: {}", "failed".red(), outcome.document_id, error)
            }
        }
    }
    println!(
        "{} {} succeeded, {} failed",
        "Batch complete:".bold(),
        report.succeeded(),
        report.failed()
    );

    if let Some(path) = report_path {
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        println!("{} {}", "Report written to".green(), path.display());
    }

    if !report.is_complete_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_detect(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let format = detect_format_from_path(input)?;
    println!("{}", format.mime_type());
    Ok(())
}

/// Default output path: `scan.pdf` -> `scan-redacted.pdf`.
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let name = match input.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}-redacted.{}", stem, ext),
        None => format!("{}-redacted", stem),
    };
    input.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("scans/report.pdf")),
            Path::new("scans/report-redacted.pdf")
        );
        assert_eq!(
            default_output_path(Path::new("report")),
            Path::new("report-redacted")
        );
    }

    #[test]
    fn test_manifest_parses() {
        let json = r#"{"items": [{
            "document_key": "wf/orig-doc/scan.png",
            "layout_key": "wf/layout.json",
            "entities_key": "wf/entities.json",
            "document_id": "wf",
            "retain_original": true
        }]}"#;
        let manifest: Manifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.items.len(), 1);
        assert!(manifest.items[0].retain_original);
    }
}
