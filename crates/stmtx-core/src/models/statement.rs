//! Credit-card statement record and field identifiers.

use serde::{Deserialize, Serialize};

/// Sentinel for text, card and date fields that were not recovered.
pub const NOT_FOUND: &str = "Not Found";

/// Sentinel for the amount field when no amount was recovered.
pub const ZERO_AMOUNT: &str = "₹0.00";

/// Sentinel for the issuer field when no signature matched.
pub const UNKNOWN_BANK: &str = "Unknown Bank";

/// Currency glyph prefixed to every normalized amount.
pub const CURRENCY_SYMBOL: char = '₹';

/// The six fields of a statement record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Bank,
    Cardholder,
    CardLast4,
    BillingCycle,
    TotalDue,
    PaymentDueDate,
}

impl Field {
    /// All fields in record order.
    pub const ALL: [Field; 6] = [
        Field::Bank,
        Field::Cardholder,
        Field::CardLast4,
        Field::BillingCycle,
        Field::TotalDue,
        Field::PaymentDueDate,
    ];

    /// Stable, case-sensitive key used in serialized records.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Bank => "Bank",
            Field::Cardholder => "Cardholder",
            Field::CardLast4 => "Card Last 4 Digits",
            Field::BillingCycle => "Billing Cycle",
            Field::TotalDue => "Total Due",
            Field::PaymentDueDate => "Payment Due Date",
        }
    }

    /// Value reported when the field was not recovered.
    pub fn sentinel(&self) -> &'static str {
        match self {
            Field::Bank => UNKNOWN_BANK,
            Field::TotalDue => ZERO_AMOUNT,
            _ => NOT_FOUND,
        }
    }

    /// Whether `value` is this field's sentinel.
    pub fn is_sentinel(&self, value: &str) -> bool {
        value == self.sentinel()
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Structured data extracted from one statement.
///
/// Every field holds either an extracted value or its sentinel; a record is
/// never partial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRecord {
    /// Issuer name.
    #[serde(rename = "Bank")]
    pub bank: String,

    /// Cardholder name.
    #[serde(rename = "Cardholder")]
    pub cardholder: String,

    /// Last four (or five, for Amex-style numbers) card digits.
    #[serde(rename = "Card Last 4 Digits")]
    pub card_last4: String,

    /// Billing cycle date range, verbatim.
    #[serde(rename = "Billing Cycle")]
    pub billing_cycle: String,

    /// Total amount due, `₹`-prefixed.
    #[serde(rename = "Total Due")]
    pub total_due: String,

    /// Payment due date, verbatim.
    #[serde(rename = "Payment Due Date")]
    pub payment_due_date: String,
}

impl StatementRecord {
    /// Create a record with every field at its sentinel.
    pub fn empty() -> Self {
        Self {
            bank: UNKNOWN_BANK.to_string(),
            cardholder: NOT_FOUND.to_string(),
            card_last4: NOT_FOUND.to_string(),
            billing_cycle: NOT_FOUND.to_string(),
            total_due: ZERO_AMOUNT.to_string(),
            payment_due_date: NOT_FOUND.to_string(),
        }
    }

    /// Value of a field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Bank => &self.bank,
            Field::Cardholder => &self.cardholder,
            Field::CardLast4 => &self.card_last4,
            Field::BillingCycle => &self.billing_cycle,
            Field::TotalDue => &self.total_due,
            Field::PaymentDueDate => &self.payment_due_date,
        }
    }

    pub(crate) fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Bank => &mut self.bank,
            Field::Cardholder => &mut self.cardholder,
            Field::CardLast4 => &mut self.card_last4,
            Field::BillingCycle => &mut self.billing_cycle,
            Field::TotalDue => &mut self.total_due,
            Field::PaymentDueDate => &mut self.payment_due_date,
        };
        *slot = value;
    }

    /// Whether a field holds an extracted value rather than its sentinel.
    pub fn is_found(&self, field: Field) -> bool {
        !field.is_sentinel(self.get(field))
    }

    /// Number of fields holding an extracted value.
    pub fn score(&self) -> usize {
        Field::ALL.iter().filter(|f| self.is_found(**f)).count()
    }

    /// Fields still at their sentinel.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .iter()
            .copied()
            .filter(|f| !self.is_found(*f))
            .collect()
    }

    /// `(key, value)` pairs in record order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        Field::ALL.into_iter().map(move |f| (f.key(), self.get(f)))
    }
}

impl Default for StatementRecord {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_record_is_all_sentinels() {
        let record = StatementRecord::empty();
        assert_eq!(record.score(), 0);
        assert_eq!(record.missing_fields().len(), 6);
        assert_eq!(record.total_due, "₹0.00");
        assert_eq!(record.bank, "Unknown Bank");
        assert_eq!(record.cardholder, "Not Found");
    }

    #[test]
    fn test_score_counts_found_fields() {
        let mut record = StatementRecord::empty();
        record.set(Field::CardLast4, "4521".to_string());
        record.set(Field::TotalDue, "₹12,345.67".to_string());
        assert_eq!(record.score(), 2);
        assert!(record.is_found(Field::CardLast4));
        assert!(!record.is_found(Field::Bank));
    }

    #[test]
    fn test_serialized_keys() {
        let record = StatementRecord::empty();
        let json = serde_json::to_value(&record).unwrap();
        let obj = json.as_object().unwrap();

        for field in Field::ALL {
            assert!(obj.contains_key(field.key()), "missing key {}", field.key());
        }
        assert_eq!(json["Card Last 4 Digits"], "Not Found");
        assert_eq!(json["Total Due"], "₹0.00");
    }

    #[test]
    fn test_entries_order() {
        let keys: Vec<&str> = StatementRecord::empty().entries().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "Bank",
                "Cardholder",
                "Card Last 4 Digits",
                "Billing Cycle",
                "Total Due",
                "Payment Due Date"
            ]
        );
    }
}
