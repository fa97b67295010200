//! Rule-based field extractors for credit-card statements.
//!
//! Each field owns an ordered [`RuleList`]. Rules are tried in declared
//! order and the first one producing a structurally valid value wins.

pub mod amounts;
pub mod cards;
pub mod dates;
pub mod issuer;
pub mod library;
pub mod names;
pub mod patterns;
pub mod ruleset;

pub use amounts::{format_amount, is_amount_shape, parse_amount, ProximityRule};
pub use dates::{parse_billing_cycle, parse_statement_date};
pub use issuer::{IssuerDetector, IssuerSignature};
pub use library::PatternLibrary;
pub use ruleset::{Extracted, IssuerProfile, RuleList, RuleSet};

use regex::{Regex, RegexBuilder};

use crate::error::ExtractionError;

/// Trait for a single extraction strategy within a field's rule list.
pub trait FieldExtractor: Send + Sync {
    /// Short identifier used in logs and extraction reports.
    fn name(&self) -> &str;

    /// Extract a normalized, validated value from the text.
    fn extract(&self, text: &str) -> Option<ExtractionMatch<String>>;
}

/// A value produced by a rule, with the text it came from.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Position of the whole match in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// How a captured value is cleaned up before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Strip surrounding whitespace.
    Trim,
    /// Remove all whitespace and prefix the currency glyph.
    AmountFormat,
    /// Strip surrounding whitespace; the date text is kept verbatim.
    DatePassthrough,
}

impl Normalization {
    pub fn apply(&self, raw: &str) -> String {
        match self {
            Normalization::Trim | Normalization::DatePassthrough => raw.trim().to_string(),
            Normalization::AmountFormat => format_amount(raw),
        }
    }
}

/// Structural check a normalized value must pass to count as a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    /// Any non-blank value.
    NonEmpty,
    /// More than `n` characters.
    LongerThan(usize),
    /// Only ASCII digits, between `min` and `max` of them.
    Digits { min: usize, max: usize },
    /// A `₹`-prefixed digit sequence with optional `,` and `.` separators.
    AmountShape,
}

impl Validity {
    pub fn accepts(&self, value: &str) -> bool {
        if value.trim().is_empty() {
            return false;
        }

        match *self {
            Validity::NonEmpty => true,
            Validity::LongerThan(n) => value.chars().count() > n,
            Validity::Digits { min, max } => {
                (min..=max).contains(&value.len()) && value.chars().all(|c| c.is_ascii_digit())
            }
            Validity::AmountShape => is_amount_shape(value),
        }
    }
}

/// A regex rule with exactly one capturing group.
///
/// Patterns are compiled case-insensitive with multi-line anchors; `\s`
/// crosses line breaks so labels and values may sit on adjacent lines.
pub struct PatternRule {
    name: String,
    pattern: Regex,
    normalization: Normalization,
    validity: Validity,
    reject: Option<Regex>,
}

impl PatternRule {
    /// Compile a rule.
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        normalization: Normalization,
        validity: Validity,
    ) -> Result<Self, ExtractionError> {
        let name = name.into();
        let pattern = compile(&name, pattern, true)?;
        Ok(Self {
            name,
            pattern,
            normalization,
            validity,
            reject: None,
        })
    }

    /// Compile a rule whose pattern is matched case-sensitively.
    pub fn case_sensitive(
        name: impl Into<String>,
        pattern: &str,
        normalization: Normalization,
        validity: Validity,
    ) -> Result<Self, ExtractionError> {
        let name = name.into();
        let pattern = compile(&name, pattern, false)?;
        Ok(Self {
            name,
            pattern,
            normalization,
            validity,
            reject: None,
        })
    }

    /// Skip any match whose full text matches `pattern`.
    ///
    /// A skipped match is not a match: searching resumes one character after
    /// its start.
    pub fn with_reject(mut self, pattern: &str) -> Result<Self, ExtractionError> {
        self.reject = Some(compile(&self.name, pattern, true)?);
        Ok(self)
    }

    fn is_rejected(&self, matched: &str) -> bool {
        self.reject.as_ref().is_some_and(|r| r.is_match(matched))
    }
}

impl FieldExtractor for PatternRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn extract(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let mut start = 0;

        while start <= text.len() {
            let caps = self.pattern.captures_at(text, start)?;
            let whole = caps.get(0)?;

            if self.is_rejected(whole.as_str()) {
                let step = text[whole.start()..].chars().next().map_or(1, char::len_utf8);
                start = whole.start() + step;
                continue;
            }

            let raw = caps.get(1).map_or("", |m| m.as_str());
            let value = self.normalization.apply(raw);

            // Only the first admissible match is considered; a failed
            // validation hands over to the next rule.
            if !self.validity.accepts(&value) {
                return None;
            }

            return Some(
                ExtractionMatch::new(value, whole.as_str())
                    .with_position(whole.start(), whole.end()),
            );
        }

        None
    }
}

fn compile(rule: &str, pattern: &str, case_insensitive: bool) -> Result<Regex, ExtractionError> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .multi_line(true)
        .build()
        .map_err(|source| ExtractionError::InvalidPattern {
            rule: rule.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_normalization() {
        assert_eq!(Normalization::AmountFormat.apply(" 12, 345.67 "), "₹12,345.67");
        assert_eq!(Normalization::AmountFormat.apply("₹ 1 000"), "₹1000");
        assert_eq!(Normalization::DatePassthrough.apply(" 15 Jan 2025\n"), "15 Jan 2025");
    }

    #[test]
    fn test_digit_validity() {
        let four = Validity::Digits { min: 4, max: 4 };
        assert!(four.accepts("4521"));
        assert!(!four.accepts("452"));
        assert!(!four.accepts("45210"));
        assert!(!four.accepts("45a1"));

        let amex = Validity::Digits { min: 4, max: 5 };
        assert!(amex.accepts("10005"));
    }

    #[test]
    fn test_blank_capture_is_rejected() {
        assert!(!Validity::NonEmpty.accepts("   "));
        assert!(!Validity::LongerThan(3).accepts("Bob"));
        assert!(Validity::LongerThan(3).accepts("Bobby"));
    }

    #[test]
    fn test_pattern_rule_is_case_insensitive() {
        let rule = PatternRule::new(
            "card",
            r"card\s*number[:\s]*(\d{4})",
            Normalization::Trim,
            Validity::NonEmpty,
        )
        .unwrap();

        let m = rule.extract("CARD NUMBER: 4521").unwrap();
        assert_eq!(m.value, "4521");
        assert_eq!(m.position, Some((0, 17)));
    }

    #[test]
    fn test_pattern_rule_invalid_value_yields_none() {
        let rule = PatternRule::new(
            "digits",
            r"no[:\s]*(\d+)",
            Normalization::Trim,
            Validity::Digits { min: 4, max: 4 },
        )
        .unwrap();

        assert!(rule.extract("No: 123456").is_none());
        assert_eq!(rule.extract("No: 1234").unwrap().value, "1234");
    }

    #[test]
    fn test_reject_skips_to_later_match() {
        let rule = PatternRule::new(
            "due",
            r"payment\s*due[^\d\r\n]{0,20}(\d+)",
            Normalization::Trim,
            Validity::NonEmpty,
        )
        .unwrap()
        .with_reject(r"^payment\s*due\s*date")
        .unwrap();

        let text = "Payment Due Date: 15 Jan\nPayment Due: 900";
        assert_eq!(rule.extract(text).unwrap().value, "900");
        assert!(rule.extract("Payment Due Date: 15 Jan").is_none());
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = PatternRule::new("broken", r"(\d{4}", Normalization::Trim, Validity::NonEmpty)
            .err()
            .unwrap();
        assert!(err.to_string().contains("broken"));
    }
}
