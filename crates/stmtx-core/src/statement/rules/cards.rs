//! Last-four card digit extraction.

use super::patterns::{labelled, CARD_ACCOUNT, CARD_LABELS, CARD_MASKED, SUFFIX_CARD_DIGITS};
use super::{Normalization, PatternRule, RuleList, Validity};
use crate::error::ExtractionError;
use crate::models::statement::Field;

/// Generic card rules: labelled number, bare mask, then `Card`/`A/C`.
pub fn card_rules() -> Result<RuleList, ExtractionError> {
    let validity = Validity::Digits { min: 4, max: 4 };

    Ok(RuleList::new(Field::CardLast4)
        .with_rule(PatternRule::new(
            "card.labelled",
            &labelled(CARD_LABELS, SUFFIX_CARD_DIGITS),
            Normalization::Trim,
            validity,
        )?)
        .with_rule(PatternRule::new(
            "card.masked",
            CARD_MASKED,
            Normalization::Trim,
            validity,
        )?)
        .with_rule(PatternRule::new(
            "card.account",
            CARD_ACCOUNT,
            Normalization::Trim,
            validity,
        )?))
}
