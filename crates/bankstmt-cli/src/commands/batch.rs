//! Batch command - normalize every statement matching a glob pattern.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use bankstmt_core::{DocumentKind, ProcessedStatement};

use super::process::{OutputFormat, format_statement};
use super::{load_config, process_file};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of input files
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    processed: Option<ProcessedStatement>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file() && DocumentKind::from_path(p) != DocumentKind::Unknown)
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        match process_file(&path, config.clone()).await {
            Ok(processed) => {
                for warning in &processed.warnings {
                    warn!("{}: {}", path.display(), warning);
                }
                results.push(ProcessResult {
                    path,
                    processed: Some(processed),
                    error: None,
                });
            }
            Err(e) => {
                let error_msg = format!("{:#}", e);
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        processed: None,
                        error: Some(error_msg),
                    });
                } else {
                    overall_pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_and_clear();

    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            if let Some(processed) = &result.processed {
                let output_path = output_path_for(&result.path, output_dir, args.format);
                fs::write(&output_path, format_statement(processed, args.format, args.pretty)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// `<output_dir>/<input file name>.<format extension>`.
fn output_path_for(input: &Path, output_dir: &Path, format: OutputFormat) -> PathBuf {
    let name = input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("statement");
    output_dir.join(format!("{}.{}", name, format.extension()))
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "file",
        "status",
        "bank",
        "statement_date",
        "num_transactions",
        "balanced",
        "doc_point",
        "strategy",
        "error",
    ])?;

    for result in results {
        let file = result.path.display().to_string();

        if let Some(processed) = &result.processed {
            let header = &processed.statement.header;
            let footer = &processed.statement.footer;
            wtr.write_record([
                file.as_str(),
                "success",
                &header.bank,
                &header.statement_date,
                &footer.num_transactions.to_string(),
                &footer.balanced.to_string(),
                &footer.doc_point,
                processed.strategy.map(|s| s.as_str()).unwrap_or(""),
                "",
            ])?;
        } else {
            wtr.write_record([
                file.as_str(),
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_keeps_input_extension() {
        let path = output_path_for(Path::new("in/july.pdf"), Path::new("out"), OutputFormat::Json);
        assert_eq!(path, PathBuf::from("out/july.pdf.json"));
    }

    #[test]
    fn test_summary_rows() {
        let dir = tempfile::tempdir().unwrap();
        let summary = dir.path().join("summary.csv");
        let results = vec![ProcessResult {
            path: PathBuf::from("broken.pdf"),
            processed: None,
            error: Some("extraction failed".to_string()),
        }];

        write_summary(&summary, &results).unwrap();
        let written = fs::read_to_string(&summary).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(
            lines[0],
            "file,status,bank,statement_date,num_transactions,balanced,doc_point,strategy,error"
        );
        assert_eq!(lines[1], "broken.pdf,error,,,,,,,extraction failed");
    }
}
