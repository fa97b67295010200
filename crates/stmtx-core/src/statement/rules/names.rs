//! Cardholder name extraction.

use super::patterns::{
    labelled, CARDHOLDER_BARE_NAME, CARDHOLDER_GREETING, CARDHOLDER_LABELS, SUFFIX_NEXT_LINE,
    SUFFIX_SAME_LINE,
};
use super::{Normalization, PatternRule, RuleList, Validity};
use crate::error::ExtractionError;
use crate::models::statement::Field;

/// Names of three characters or fewer are treated as noise.
const MIN_NAME_LEN: usize = 3;

/// Generic cardholder rules: same-line label, next-line label, greeting,
/// then a bare capitalized name.
pub fn cardholder_rules() -> Result<RuleList, ExtractionError> {
    let validity = Validity::LongerThan(MIN_NAME_LEN);

    Ok(RuleList::new(Field::Cardholder)
        .with_rule(PatternRule::new(
            "cardholder.same_line",
            &labelled(CARDHOLDER_LABELS, SUFFIX_SAME_LINE),
            Normalization::Trim,
            validity,
        )?)
        .with_rule(PatternRule::new(
            "cardholder.next_line",
            &labelled(CARDHOLDER_LABELS, SUFFIX_NEXT_LINE),
            Normalization::Trim,
            validity,
        )?)
        .with_rule(PatternRule::new(
            "cardholder.greeting",
            CARDHOLDER_GREETING,
            Normalization::Trim,
            validity,
        )?)
        .with_rule(PatternRule::case_sensitive(
            "cardholder.bare_name",
            CARDHOLDER_BARE_NAME,
            Normalization::Trim,
            validity,
        )?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> String {
        cardholder_rules().unwrap().extract(text).value
    }

    #[test]
    fn test_same_line_label() {
        assert_eq!(extract("Cardholder Name: PRIYA SHARMA\nCard No: xxxx 1234"), "PRIYA SHARMA");
        assert_eq!(extract("Primary Card Member: Rahul Verma"), "Rahul Verma");
    }

    #[test]
    fn test_next_line_label() {
        assert_eq!(extract("Customer Name\nANIL KUMAR\nAddress"), "ANIL KUMAR");
    }

    #[test]
    fn test_greeting_line() {
        assert_eq!(extract("statement\nDear Meera Iyer,\nthank you"), "Meera Iyer,");
    }

    #[test]
    fn test_greeting_needs_word_start() {
        // "items" must not read as the "Ms" salutation
        assert_eq!(extract("all items listed"), "Not Found");
    }

    #[test]
    fn test_bare_name_fallback_is_case_sensitive() {
        assert_eq!(extract("statement for\nSunil Mehta\n"), "Sunil Mehta");
        assert_eq!(extract("no names here at all"), "Not Found");
    }

    #[test]
    fn test_short_value_falls_through() {
        // "Name: Al" is too short; the greeting rule supplies the value
        assert_eq!(extract("Name: Al\nDear Alan Rao"), "Alan Rao");
    }
}
