//! Amount normalization and total-due extraction.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{
    TOTAL_BARE, TOTAL_CURRENCY_FIRST, TOTAL_LABELLED, TOTAL_LABELLED_REJECT,
    TOTAL_PROXIMITY_ANCHOR, TOTAL_PROXIMITY_TOKEN,
};
use super::{ExtractionMatch, FieldExtractor, Normalization, PatternRule, RuleList, Validity};
use crate::error::ExtractionError;
use crate::models::statement::{Field, CURRENCY_SYMBOL};

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    static ref AMOUNT_SHAPE: Regex = Regex::new(r"^₹[\d,.]*\d[\d,.]*$").unwrap();
}

/// Lines searched by the proximity fallback, counting the anchor line.
const PROXIMITY_WINDOW: usize = 3;

/// Collapse whitespace and prefix the currency glyph if it is missing.
pub fn format_amount(raw: &str) -> String {
    let compact = WHITESPACE.replace_all(raw, "");
    if compact.starts_with(CURRENCY_SYMBOL) {
        compact.into_owned()
    } else {
        format!("{CURRENCY_SYMBOL}{compact}")
    }
}

/// Whether `value` is a `₹`-prefixed digit run with optional `,`/`.` separators.
pub fn is_amount_shape(value: &str) -> bool {
    AMOUNT_SHAPE.is_match(value)
}

/// Numeric value of a normalized amount such as `₹1,23,456.50`.
pub fn parse_amount(value: &str) -> Option<Decimal> {
    let cleaned: String = value
        .trim()
        .trim_start_matches(CURRENCY_SYMBOL)
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let cleaned = cleaned.trim_end_matches('.');

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(cleaned).ok()
}

/// Last-resort amount search near a label line.
///
/// Finds lines matching the anchor and looks for the first currency-shaped
/// token on that line or the lines right after it.
pub struct ProximityRule {
    name: String,
    anchor: Regex,
    token: Regex,
    window: usize,
}

impl ProximityRule {
    pub fn new(
        name: impl Into<String>,
        anchor: &str,
        token: &str,
        window: usize,
    ) -> Result<Self, ExtractionError> {
        let name = name.into();
        let compile = |pattern: &str| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| ExtractionError::InvalidPattern {
                    rule: name.clone(),
                    source,
                })
        };

        Ok(Self {
            anchor: compile(anchor)?,
            token: compile(token)?,
            name,
            window: window.max(1),
        })
    }

    /// The `total (amount) due` neighbourhood scan.
    pub fn total_due() -> Result<Self, ExtractionError> {
        Self::new(
            "total_due.proximity",
            TOTAL_PROXIMITY_ANCHOR,
            TOTAL_PROXIMITY_TOKEN,
            PROXIMITY_WINDOW,
        )
    }
}

impl FieldExtractor for ProximityRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn extract(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let lines: Vec<&str> = text.lines().collect();

        for (i, line) in lines.iter().enumerate() {
            if !self.anchor.is_match(line) {
                continue;
            }

            let end = (i + self.window).min(lines.len());
            let neighbourhood = lines[i..end].join("\n");

            if let Some(caps) = self.token.captures(&neighbourhood) {
                let value = format_amount(&caps[1]);
                if Validity::AmountShape.accepts(&value) {
                    return Some(ExtractionMatch::new(value, &caps[0]));
                }
            }
        }

        None
    }
}

/// Generic total-due rules, most specific label first.
pub fn total_due_rules() -> Result<RuleList, ExtractionError> {
    let rule = |name: &str, pattern: &str| {
        PatternRule::new(name, pattern, Normalization::AmountFormat, Validity::AmountShape)
    };

    Ok(RuleList::new(Field::TotalDue)
        .with_rule(rule("total_due.labelled", TOTAL_LABELLED)?.with_reject(TOTAL_LABELLED_REJECT)?)
        .with_rule(rule("total_due.total", TOTAL_BARE)?)
        .with_rule(rule("total_due.currency_first", TOTAL_CURRENCY_FIRST)?)
        .with_rule(ProximityRule::total_due()?))
}
