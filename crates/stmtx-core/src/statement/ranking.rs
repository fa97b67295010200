//! Completeness ranking across alternative records.

use tracing::debug;

use super::rules::Extracted;
use crate::models::statement::StatementRecord;

/// Minimum recovered fields for a ranked result.
pub const DEFAULT_MIN_FIELDS: usize = 2;

/// A record produced by one rule set.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Name of the rule set that produced it.
    pub rule_set: String,
    pub record: StatementRecord,
    /// Per-field outcomes in record order.
    pub fields: Vec<Extracted>,
}

impl Candidate {
    pub fn new(rule_set: String, record: StatementRecord, fields: Vec<Extracted>) -> Self {
        Self {
            rule_set,
            record,
            fields,
        }
    }

    /// Number of fields holding an extracted value.
    pub fn score(&self) -> usize {
        self.record.score()
    }

    /// Whether the record is complete enough to report.
    pub fn meets(&self, min_score: usize) -> bool {
        self.score() >= min_score
    }
}

/// The highest-scoring candidate; ties go to the earlier one.
pub fn best_candidate(candidates: Vec<Candidate>) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;

    for candidate in candidates {
        debug!("Candidate {} scored {}", candidate.rule_set, candidate.score());
        match &best {
            Some(current) if current.score() >= candidate.score() => {}
            _ => best = Some(candidate),
        }
    }

    best
}

/// The best candidate, or `None` if it scores below `min_score`.
pub fn select_best(candidates: Vec<Candidate>, min_score: usize) -> Option<Candidate> {
    best_candidate(candidates).filter(|c| c.meets(min_score))
}
