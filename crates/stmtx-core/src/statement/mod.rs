//! Credit-card statement field extraction module.

mod parser;
pub mod ranking;
pub mod rules;

pub use parser::{ExtractionResult, StatementParser};
pub use ranking::{best_candidate, select_best, Candidate};

use std::path::Path;

use tracing::debug;

use crate::models::statement::StatementRecord;

/// Parse the statement at `path` with the default generic parser.
///
/// Only reading the file can fail; unreadable documents produce an
/// all-sentinel record.
pub fn parse_statement(path: impl AsRef<Path>) -> crate::Result<Option<StatementRecord>> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    debug!("Read {} bytes from {}", data.len(), path.display());

    let parser = StatementParser::new()?;
    Ok(parser.parse_document(&data))
}
