//! Statement record builder over a compiled pattern library.

use std::time::Instant;

use tracing::{debug, info};

use super::ranking::{best_candidate, select_best, Candidate, DEFAULT_MIN_FIELDS};
use super::rules::{Extracted, PatternLibrary};
use crate::error::ExtractionError;
use crate::models::config::{ParseMode, PdfConfig, StmtConfig};
use crate::models::statement::StatementRecord;
use crate::pdf::read_document_text;

/// Result of statement extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// The selected record, `None` when ranking found nothing complete enough.
    pub record: Option<StatementRecord>,
    /// Per-field outcomes of the selected record, or of the best rejected one.
    pub fields: Vec<Extracted>,
    /// Rule set that produced `fields`.
    pub rule_set: Option<String>,
    /// Number of fields holding an extracted value.
    pub score: usize,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// The record, or [`ExtractionError::NoData`].
    pub fn require_record(self) -> Result<StatementRecord, ExtractionError> {
        self.record.ok_or(ExtractionError::NoData)
    }
}

/// Builds statement records from raw text.
///
/// Holds only immutable compiled patterns, so one parser can serve any
/// number of threads.
pub struct StatementParser {
    library: PatternLibrary,
    mode: ParseMode,
    min_fields: usize,
    pdf: PdfConfig,
}

impl StatementParser {
    /// Create a generic-mode parser over the standard pattern library.
    pub fn new() -> Result<Self, ExtractionError> {
        Ok(Self {
            library: PatternLibrary::standard()?,
            mode: ParseMode::Generic,
            min_fields: DEFAULT_MIN_FIELDS,
            pdf: PdfConfig::default(),
        })
    }

    /// Create a parser configured from `config`.
    pub fn from_config(config: &StmtConfig) -> Result<Self, ExtractionError> {
        Ok(Self::new()?
            .with_mode(config.extraction.mode)
            .with_min_fields(config.extraction.min_fields)
            .with_pdf_config(config.pdf.clone()))
    }

    /// Replace the pattern library.
    pub fn with_library(mut self, library: PatternLibrary) -> Self {
        self.library = library;
        self
    }

    /// Set the rule set selection mode.
    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the ranked-mode completeness threshold.
    pub fn with_min_fields(mut self, min_fields: usize) -> Self {
        self.min_fields = min_fields;
        self
    }

    /// Set the settings used when reading documents.
    pub fn with_pdf_config(mut self, pdf: PdfConfig) -> Self {
        self.pdf = pdf;
        self
    }

    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// Build a record with the generic rules. Never fails.
    pub fn build(&self, text: &str) -> StatementRecord {
        let bank = self.library.issuers().detect(text);
        self.library.generic().apply(text, bank).record
    }

    /// Run every rule set the current mode calls for, in priority order.
    pub fn candidates(&self, text: &str) -> Vec<Candidate> {
        let bank = self.library.issuers().detect(text);
        debug!("Detected issuer: {}", bank);

        if self.mode == ParseMode::Generic {
            return vec![self.library.generic().apply(text, bank)];
        }

        let mut candidates: Vec<Candidate> = self
            .library
            .rule_sets_for(bank)
            .map(|set| set.apply(text, bank))
            .collect();

        if candidates.is_empty() {
            candidates = self
                .library
                .rule_sets()
                .iter()
                .map(|set| set.apply(text, bank))
                .collect();
        }

        candidates.push(self.library.generic().apply(text, bank));
        candidates
    }

    /// Extract a statement record from text with a full report.
    pub fn extract(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut warnings = Vec::new();

        info!("Parsing statement from {} characters of text", text.len());

        if text.trim().is_empty() {
            warnings.push("No text to extract from".to_string());
        }

        let candidates = self.candidates(text);

        let (record, chosen) = match self.mode {
            ParseMode::Generic => {
                let chosen = candidates.into_iter().next();
                (chosen.as_ref().map(|c| c.record.clone()), chosen)
            }
            ParseMode::Ranked => match select_best(candidates.clone(), self.min_fields) {
                Some(best) => (Some(best.record.clone()), Some(best)),
                None => {
                    warnings.push(format!(
                        "No rule set recovered at least {} fields",
                        self.min_fields
                    ));
                    // Rejected best, kept for the field report
                    (None, best_candidate(candidates))
                }
            },
        };

        let (fields, rule_set, score) = match chosen {
            Some(c) => {
                let score = c.score();
                (c.fields, Some(c.rule_set), score)
            }
            None => (Vec::new(), None, 0),
        };

        for outcome in &fields {
            match &outcome.rule {
                Some(rule) => debug!("{} found via {}", outcome.field, rule),
                None => warnings.push(format!("Could not extract {}", outcome.field)),
            }
        }

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Extracted {} of {} fields in {} ms",
            score,
            fields.len(),
            processing_time_ms
        );

        ExtractionResult {
            record,
            fields,
            rule_set,
            score,
            warnings,
            processing_time_ms,
        }
    }

    /// Parse raw statement text.
    ///
    /// Generic mode always returns a record; ranked mode returns `None` when
    /// no rule set reaches the completeness threshold.
    pub fn parse_text(&self, text: &str) -> Option<StatementRecord> {
        self.extract(text).record
    }

    /// Parse a PDF (or plain-text) document.
    pub fn parse_document(&self, data: &[u8]) -> Option<StatementRecord> {
        let document = read_document_text(data, &self.pdf);
        self.parse_text(&document.text)
    }
}
