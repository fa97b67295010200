//! Billing cycle and payment due date extraction.
//!
//! Dates are kept exactly as printed on the statement. The parse helpers at
//! the bottom are for consumers that want calendar values; the extractor
//! never calls them.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use super::patterns::{
    BILLING_BARE, BILLING_LABELLED, BILLING_NUMERIC, DUE_LABELLED, DUE_LONG, DUE_NUMERIC,
};
use super::{Normalization, PatternRule, RuleList, Validity};
use crate::error::ExtractionError;
use crate::models::statement::Field;

lazy_static! {
    static ref SINGLE_DATE: Regex = Regex::new(
        r"^(\d{1,2})[\s/\-]+([A-Za-z]+|\d{1,2})[\s/\-]+(\d{4}|\d{2})$"
    ).unwrap();

    static ref RANGE_SEPARATOR: Regex = Regex::new(
        r"(?i)\s+to\s+|\s*–\s*|\s+-\s+"
    ).unwrap();
}

/// Generic billing cycle rules: labelled range, numeric range, bare range.
pub fn billing_cycle_rules() -> Result<RuleList, ExtractionError> {
    let rule = |name: &str, pattern: &str| {
        PatternRule::new(name, pattern, Normalization::DatePassthrough, Validity::NonEmpty)
    };

    Ok(RuleList::new(Field::BillingCycle)
        .with_rule(rule("billing_cycle.labelled", BILLING_LABELLED)?)
        .with_rule(rule("billing_cycle.numeric", BILLING_NUMERIC)?)
        .with_rule(rule("billing_cycle.bare", BILLING_BARE)?))
}

/// Generic payment due date rules.
pub fn due_date_rules() -> Result<RuleList, ExtractionError> {
    let rule = |name: &str, pattern: &str| {
        PatternRule::new(name, pattern, Normalization::DatePassthrough, Validity::NonEmpty)
    };

    Ok(RuleList::new(Field::PaymentDueDate)
        .with_rule(rule("due_date.labelled", DUE_LABELLED)?)
        .with_rule(rule("due_date.numeric", DUE_NUMERIC)?)
        .with_rule(rule("due_date.long", DUE_LONG)?))
}

/// Best-effort calendar parse of a date as printed on a statement.
///
/// Accepts `15 Jan 2025`, `15-January-2025`, `15/Jan/25` and day-first
/// numeric forms such as `15/01/2025`.
pub fn parse_statement_date(s: &str) -> Option<NaiveDate> {
    let caps = SINGLE_DATE.captures(s.trim())?;

    let day: u32 = caps[1].parse().ok()?;
    let month = match caps[2].parse::<u32>() {
        Ok(m) => m,
        Err(_) => month_from_name(&caps[2])?,
    };
    let year = parse_year(&caps[3])?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Split a verbatim billing cycle into its start and end dates.
pub fn parse_billing_cycle(s: &str) -> Option<(NaiveDate, NaiveDate)> {
    let mut parts = RANGE_SEPARATOR.splitn(s.trim(), 2);
    let start = parse_statement_date(parts.next()?)?;
    let end = parse_statement_date(parts.next()?)?;
    Some((start, end))
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    if s.len() == 2 {
        // Two-digit year: 00-50 is 2000s, 51-99 is 1900s
        if year <= 50 {
            Some(2000 + year)
        } else {
            Some(1900 + year)
        }
    } else {
        Some(year)
    }
}

fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let prefix = lower.get(..3)?;

    let month = match prefix {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };

    Some(month)
}
