//! Process command - extract data from a single statement file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use stmtx_core::models::config::{ParseMode, StmtConfig};
use stmtx_core::models::statement::{Field, StatementRecord};
use stmtx_core::pdf::{read_document_text, DocumentText};
use stmtx_core::statement::{ExtractionResult, StatementParser};
use stmtx_core::parse_statement_date;

use super::config::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Rule set selection mode (overrides the config file)
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Show which rule set won and which fields are missing
    #[arg(long)]
    show_status: bool,
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

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ModeArg {
    /// Generic rules only; always produces a record
    Generic,
    /// Issuer rule sets ranked by completeness
    Ranked,
}

impl From<ModeArg> for ParseMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Generic => ParseMode::Generic,
            ModeArg::Ranked => ParseMode::Ranked,
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(mode) = args.mode {
        config.extraction.mode = mode.into();
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Reading document...");
    let document = read_input(&args.input, &config)?;

    pb.set_message("Extracting statement fields...");
    let parser = StatementParser::from_config(&config)?;
    let result = parser.extract(&document.text);

    pb.finish_and_clear();

    let Some(record) = result.record.as_ref() else {
        anyhow::bail!(
            "Could not parse statement {}: no rule set recovered at least {} fields",
            args.input.display(),
            config.extraction.min_fields
        );
    };

    let output = format_record(record, args.format)?;

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

    if args.show_status {
        print_status(&document, &result);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Read a statement file and extract its text, enforcing the size limit.
pub fn read_input(path: &Path, config: &StmtConfig) -> anyhow::Result<DocumentText> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let size = fs::metadata(path)?.len();
    if size > config.pdf.max_file_size {
        anyhow::bail!(
            "File too large: {} bytes (limit {} bytes)",
            size,
            config.pdf.max_file_size
        );
    }

    let data = fs::read(path)?;
    let document = read_document_text(&data, &config.pdf);

    if document.is_low_text(config.pdf.min_text_length) {
        warn!(
            "Only {} characters extracted from {}; the document may be scanned, protected or corrupted",
            document.char_count(),
            path.display()
        );
    }

    Ok(document)
}

fn print_status(document: &DocumentText, result: &ExtractionResult) {
    println!();
    println!(
        "{} Document: {} ({:?}, {} characters)",
        style("ℹ").blue(),
        document.pdf_type,
        document.origin,
        document.char_count()
    );
    println!(
        "{} Rule set: {}",
        style("ℹ").blue(),
        result.rule_set.as_deref().unwrap_or("none")
    );
    println!(
        "{} Fields found: {}/{}",
        style("ℹ").blue(),
        result.score,
        Field::ALL.len()
    );
    println!(
        "{} Processing time: {}ms",
        style("ℹ").blue(),
        result.processing_time_ms
    );

    for warning in &result.warnings {
        println!("{} {}", style("⚠").yellow(), warning);
    }
}

pub fn format_record(record: &StatementRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &StatementRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(Field::ALL.iter().map(|f| f.key()))?;
    wtr.write_record(record.entries().map(|(_, value)| value))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// One line per field, marked found or missing.
pub fn format_text(record: &StatementRecord) -> String {
    let mut output = String::new();

    for field in Field::ALL {
        let value = record.get(field);
        let mark = if record.is_found(field) { "✓" } else { "✗" };
        output.push_str(&format!("{} {:<20} {}", mark, format!("{}:", field.key()), value));

        if field == Field::PaymentDueDate {
            if let Some(date) = parse_statement_date(value) {
                output.push_str(&format!(" ({})", iso_date(date)));
            }
        }
        output.push('\n');
    }

    output
}

fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
