//! Ordered rule lists and issuer rule sets.

use tracing::trace;

use super::patterns::{
    labelled, CARD_LABELS, SUFFIX_AMOUNT, SUFFIX_CARD_DIGITS, SUFFIX_CARD_DIGITS_WIDE,
    SUFFIX_DATE, SUFFIX_DATE_RANGE, SUFFIX_SAME_LINE,
};
use super::{FieldExtractor, Normalization, PatternRule, Validity};
use crate::error::ExtractionError;
use crate::models::statement::{Field, StatementRecord, UNKNOWN_BANK};
use crate::statement::ranking::Candidate;

/// Outcome of running one field's rule list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    /// Field the value belongs to.
    pub field: Field,
    /// Normalized value, or the field's sentinel.
    pub value: String,
    /// Whether a rule produced the value.
    pub found: bool,
    /// Name of the winning rule.
    pub rule: Option<String>,
}

impl Extracted {
    pub fn not_found(field: Field) -> Self {
        Self {
            field,
            value: field.sentinel().to_string(),
            found: false,
            rule: None,
        }
    }
}

/// The ordered strategies for one field.
pub struct RuleList {
    field: Field,
    rules: Vec<Box<dyn FieldExtractor>>,
}

impl RuleList {
    pub fn new(field: Field) -> Self {
        Self {
            field,
            rules: Vec::new(),
        }
    }

    /// Append a rule; it is tried after every rule already in the list.
    pub fn with_rule(mut self, rule: impl FieldExtractor + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run the rules in order and return the first valid value.
    pub fn extract(&self, text: &str) -> Extracted {
        for rule in &self.rules {
            if let Some(m) = rule.extract(text) {
                trace!("{} matched {} chars via {}", self.field, m.source.len(), rule.name());
                return Extracted {
                    field: self.field,
                    value: m.value,
                    found: true,
                    rule: Some(rule.name().to_string()),
                };
            }
        }

        Extracted::not_found(self.field)
    }
}

/// Label vocabulary for an issuer's statement layout.
///
/// Each label entry is a regex alternation; the value part of every rule is
/// shared across issuers.
#[derive(Debug, Clone, Copy)]
pub struct IssuerProfile {
    /// Registry key, e.g. `hdfc`.
    pub key: &'static str,
    /// Canonical issuer names (as reported by the detector) this profile serves.
    pub issuers: &'static [&'static str],
    pub cardholder_labels: &'static str,
    /// Accept 4 or 5 trailing card digits instead of exactly 4.
    pub wide_card_digits: bool,
    pub billing_labels: &'static str,
    pub total_labels: &'static str,
    pub due_labels: &'static str,
}

/// A complete set of rule lists producing a statement record.
pub struct RuleSet {
    name: String,
    issuers: Vec<String>,
    lists: Vec<RuleList>,
}

impl RuleSet {
    /// Create an empty rule set. A set with no issuers is generic.
    pub fn new(name: impl Into<String>, issuers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            issuers,
            lists: Vec::new(),
        }
    }

    /// Install the rule list for its field, replacing any previous one.
    pub fn with_list(mut self, list: RuleList) -> Self {
        self.lists.retain(|l| l.field() != list.field());
        self.lists.push(list);
        self
    }

    /// Build the single-rule-per-field set described by a profile.
    pub fn from_profile(profile: &IssuerProfile) -> Result<Self, ExtractionError> {
        let key = profile.key;
        let (card_suffix, card_max) = if profile.wide_card_digits {
            (SUFFIX_CARD_DIGITS_WIDE, 5)
        } else {
            (SUFFIX_CARD_DIGITS, 4)
        };

        let set = Self::new(key, profile.issuers.iter().map(|s| s.to_string()).collect())
            .with_list(RuleList::new(Field::Cardholder).with_rule(PatternRule::new(
                format!("{key}.cardholder"),
                &labelled(profile.cardholder_labels, SUFFIX_SAME_LINE),
                Normalization::Trim,
                Validity::NonEmpty,
            )?))
            .with_list(RuleList::new(Field::CardLast4).with_rule(PatternRule::new(
                format!("{key}.card"),
                &labelled(CARD_LABELS, card_suffix),
                Normalization::Trim,
                Validity::Digits { min: 4, max: card_max },
            )?))
            .with_list(RuleList::new(Field::BillingCycle).with_rule(PatternRule::new(
                format!("{key}.billing_cycle"),
                &labelled(profile.billing_labels, SUFFIX_DATE_RANGE),
                Normalization::DatePassthrough,
                Validity::NonEmpty,
            )?))
            .with_list(RuleList::new(Field::TotalDue).with_rule(PatternRule::new(
                format!("{key}.total_due"),
                &labelled(profile.total_labels, SUFFIX_AMOUNT),
                Normalization::AmountFormat,
                Validity::AmountShape,
            )?))
            .with_list(RuleList::new(Field::PaymentDueDate).with_rule(PatternRule::new(
                format!("{key}.due_date"),
                &labelled(profile.due_labels, SUFFIX_DATE),
                Normalization::DatePassthrough,
                Validity::NonEmpty,
            )?));

        Ok(set)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn issuers(&self) -> &[String] {
        &self.issuers
    }

    pub fn is_generic(&self) -> bool {
        self.issuers.is_empty()
    }

    /// Whether this set is specialised for the named issuer.
    pub fn applies_to(&self, issuer: &str) -> bool {
        self.issuers.iter().any(|i| i == issuer)
    }

    pub fn list(&self, field: Field) -> Option<&RuleList> {
        self.lists.iter().find(|l| l.field() == field)
    }

    /// Extract every field from `text`, stamping `bank` as the issuer.
    pub fn apply(&self, text: &str, bank: &str) -> Candidate {
        let mut record = StatementRecord::empty();
        let mut fields = Vec::with_capacity(Field::ALL.len());

        record.set(Field::Bank, bank.to_string());
        fields.push(Extracted {
            field: Field::Bank,
            value: bank.to_string(),
            found: bank != UNKNOWN_BANK,
            rule: (bank != UNKNOWN_BANK).then(|| "issuer".to_string()),
        });

        for field in &Field::ALL[1..] {
            let outcome = match self.list(*field) {
                Some(list) => list.extract(text),
                None => Extracted::not_found(*field),
            };
            record.set(*field, outcome.value.clone());
            fields.push(outcome);
        }

        Candidate::new(self.name.clone(), record, fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn digits_rule(name: &str, pattern: &str) -> PatternRule {
        PatternRule::new(name, pattern, Normalization::Trim, Validity::Digits { min: 4, max: 4 })
            .unwrap()
    }

    #[test]
    fn test_rule_list_respects_order() {
        let list = RuleList::new(Field::CardLast4)
            .with_rule(digits_rule("first", r"primary[:\s]*(\d+)"))
            .with_rule(digits_rule("second", r"secondary[:\s]*(\d+)"));

        let out = list.extract("Secondary: 9876\nPrimary: 1234");
        assert_eq!(out.value, "1234");
        assert_eq!(out.rule.as_deref(), Some("first"));

        let out = list.extract("Secondary: 9876");
        assert_eq!(out.value, "9876");
        assert_eq!(out.rule.as_deref(), Some("second"));
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_match_trace_omits_value() {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .without_time()
            .with_writer(move || writer.clone())
            .finish();

        let list = RuleList::new(Field::CardLast4).with_rule(digits_rule("masked", r"x{4}(\d+)"));
        let out = tracing::subscriber::with_default(subscriber, || list.extract("xxxx7319"));
        assert_eq!(out.value, "7319");

        let logged = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("via masked"));
        assert!(!logged.contains("7319"));
    }

    #[test]
    fn test_rule_list_advances_past_invalid_length() {
        let list = RuleList::new(Field::CardLast4)
            .with_rule(digits_rule("loose", r"card[:\s]*(\d+)"))
            .with_rule(digits_rule("masked", r"x{4}(\d+)"));

        let out = list.extract("Card: 123456\nxxxx4521");
        assert!(out.found);
        assert_eq!(out.value, "4521");
        assert_eq!(out.rule.as_deref(), Some("masked"));
    }

    #[test]
    fn test_rule_list_sentinel_when_exhausted() {
        let list = RuleList::new(Field::TotalDue)
            .with_rule(digits_rule("never", r"nothing here (\d+)"));

        let out = list.extract("");
        assert!(!out.found);
        assert_eq!(out.value, "₹0.00");
        assert_eq!(out.rule, None);
    }

    #[test]
    fn test_with_list_replaces_field() {
        let set = RuleSet::new("custom", vec![])
            .with_list(RuleList::new(Field::CardLast4).with_rule(digits_rule("a", r"a(\d{4})")))
            .with_list(RuleList::new(Field::CardLast4).with_rule(digits_rule("b", r"b(\d{4})")));

        assert_eq!(set.list(Field::CardLast4).unwrap().rule_names(), vec!["b"]);
        assert!(set.is_generic());
    }

    #[test]
    fn test_apply_fills_missing_lists_with_sentinels() {
        let set = RuleSet::new("partial", vec!["HDFC Bank".to_string()])
            .with_list(RuleList::new(Field::CardLast4).with_rule(digits_rule("a", r"ending (\d{4})")));

        let candidate = set.apply("card ending 7781", "HDFC Bank");
        assert_eq!(candidate.record.card_last4, "7781");
        assert_eq!(candidate.record.cardholder, "Not Found");
        assert_eq!(candidate.record.bank, "HDFC Bank");
        assert_eq!(candidate.fields.len(), 6);
        assert!(set.applies_to("HDFC Bank"));
    }
}
