//! Inspect command - show what the extractor sees in a document.

use std::path::PathBuf;

use clap::Args;
use console::style;

use stmtx_core::models::statement::Field;
use stmtx_core::statement::StatementParser;

use super::config::load_config;
use super::process::read_input;

/// Characters of extracted text shown in the preview.
const PREVIEW_CHARS: usize = 500;

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Input file (PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,
}

pub async fn run(args: InspectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let document = read_input(&args.input, &config)?;

    println!("{}", style(args.input.display()).bold());
    println!(
        "Characters extracted: {} ({} pages, {}, via {:?})",
        document.char_count(),
        document.page_count,
        document.pdf_type,
        document.origin
    );

    println!();
    println!("{}", style(format!("First {PREVIEW_CHARS} characters:")).bold());
    let preview: String = document.text.chars().take(PREVIEW_CHARS).collect();
    println!("{}", preview);

    if document.is_low_text(config.pdf.min_text_length) {
        println!();
        println!(
            "{} Very little text extracted. The document may be scanned, password protected or corrupted.",
            style("⚠").yellow()
        );
    }

    let parser = StatementParser::from_config(&config)?;

    println!();
    println!("{}", style("Issuer keywords:").bold());
    let hits = parser.library().issuers().matches(&document.text);
    if hits.is_empty() {
        println!("  none");
    }
    for (name, matched) in &hits {
        println!("  {} {} (matched {:?})", style("✓").green(), name, matched);
    }

    let result = parser.extract(&document.text);

    println!();
    println!("{}", style("Parsed record:").bold());
    match &result.record {
        Some(record) => {
            for field in Field::ALL {
                let mark = if record.is_found(field) {
                    style("✓").green()
                } else {
                    style("✗").red()
                };
                println!("  {} {}: {}", mark, field.key(), record.get(field));
            }
        }
        None => println!("  {} could not parse", style("✗").red()),
    }

    println!();
    println!(
        "Fields found: {}/{} (rule set: {})",
        result.score,
        Field::ALL.len(),
        result.rule_set.as_deref().unwrap_or("none")
    );

    Ok(())
}
