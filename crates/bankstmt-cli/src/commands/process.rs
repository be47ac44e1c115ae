//! Process command - normalize a single statement file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use bankstmt_core::ProcessedStatement;

use super::{load_config, process_file};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (CSV, spreadsheet or PDF)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per transaction
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!("Normalizing {}", args.input.display()));

    let result = process_file(&args.input, config).await;
    pb.finish_and_clear();
    let processed = result?;

    for warning in &processed.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    let output = format_statement(&processed, args.format, args.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_statement(
    processed: &ProcessedStatement,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(processed)?),
        OutputFormat::Json => Ok(serde_json::to_string(processed)?),
        OutputFormat::Csv => format_csv(processed),
        OutputFormat::Text => Ok(format_text(processed)),
    }
}

fn format_csv(processed: &ProcessedStatement) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["date", "description", "amount", "currency", "row_point"])?;

    for transaction in &processed.statement.transactions {
        wtr.write_record([
            &transaction.date,
            &transaction.description,
            &transaction.amount,
            &transaction.currency,
            &transaction.row_point,
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(processed: &ProcessedStatement) -> String {
    let header = &processed.statement.header;
    let footer = &processed.statement.footer;
    let mut output = String::new();

    output.push_str(&format!("Bank: {}\n", header.bank));
    output.push_str(&format!("Account: {}\n", header.bank_account));
    output.push_str(&format!("Customer: {}\n", header.customer_account_number));
    output.push_str(&format!("Statement date: {}\n", header.statement_date));
    output.push_str(&format!("Currency: {}\n", header.currency));
    output.push_str(&format!("Opening balance: {}\n", header.opening_balance));
    output.push_str(&format!("Closing balance: {}\n", header.closing_balance));
    output.push('\n');

    output.push_str(&format!("Transactions ({}):\n", footer.num_transactions));
    for t in &processed.statement.transactions {
        output.push_str(&format!(
            "  {:<10}  {:>12} {}  {}\n",
            t.date, t.amount, t.currency, t.description
        ));
    }
    output.push('\n');

    output.push_str(&format!("Total: {}\n", footer.total_amount_parsed));
    output.push_str(&format!("Balanced: {}\n", if footer.balanced { "yes" } else { "no" }));
    output.push_str(&format!("Confidence: {}\n", footer.doc_point));
    if let Some(strategy) = processed.strategy {
        output.push_str(&format!("Extracted with: {}\n", strategy));
    }

    output
}
