//! Regex sources for statement field extraction.
//!
//! These are plain pattern strings; [`PatternLibrary`](super::PatternLibrary)
//! compiles them once and owns the result.

// Cardholder
pub const CARDHOLDER_LABELS: &str =
    r"Name|Card\s*Holder(?:\s*Name)?|Customer\s*Name|Primary\s*Card\s*Member|Card\s*Member";

pub const CARDHOLDER_GREETING: &str = r"\b(?:Dear|Mr\.?|Mrs\.?|Ms\.?)\s+([^\r\n]+)";

/// Two or three capitalized words, matched case-sensitively.
///
/// Every other rule folds case. Folding it here would let any two words of
/// running text, such as `thank you`, pass as a name.
pub const CARDHOLDER_BARE_NAME: &str =
    r"([A-Z][a-zA-Z]+\s+[A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)?)";

// Card digits
pub const CARD_LABELS: &str = r"Card\s*(?:Number|No\.?|#)|ending\s*(?:in|with)|xxxx";

pub const CARD_MASKED: &str = r"[xX*]{4,12}[\s\-]?(\d{4})";

pub const CARD_ACCOUNT: &str = r"(?:Card|A/C)[:\s]*[xX*\s\-]*?(\d{4})";

// Billing cycle
pub const BILLING_LABELLED: &str = r"(?:Statement\s*(?:Period|Date)|Billing\s*(?:Period|Cycle|From))[:\s]*(?:\n\s*)?(\d{1,2}[/-]\w{3,9}[/-]\d{2,4}\s*(?:to|-|–)\s*\d{1,2}[/-]\w{3,9}[/-]\d{2,4}|\d{1,2}\s+\w{3,9}\s+\d{4}\s*(?:to|-|–)\s*\d{1,2}\s+\w{3,9}\s+\d{4})";

pub const BILLING_NUMERIC: &str = r"(?:From|Period)[:\s]*(?:\n\s*)?(\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\s*(?:to|-|–)\s*\d{1,2}[/-]\d{1,2}[/-]\d{2,4})";

pub const BILLING_BARE: &str =
    r"(\d{1,2}\s+\w{3,9}\s+\d{4}\s*(?:to|-|–)\s*\d{1,2}\s+\w{3,9}\s+\d{4})";

// Total due
pub const TOTAL_LABELLED: &str = r"(?:Total\s*(?:Amount\s*)?Due|Amount\s*Payable|Outstanding|New\s*Balance|Payment\s*Due)[^\d\r\n]{0,20}(?:\n\s*)?(?:Rs\.?|INR|₹)?\s*([\d,]+\.?\d*)";

/// Keeps `Payment Due Date` lines out of [`TOTAL_LABELLED`].
pub const TOTAL_LABELLED_REJECT: &str = r"^Payment\s*Due\s*Date";

pub const TOTAL_BARE: &str = r"Total[^\d\r\n]{0,20}(?:\n\s*)?(?:Rs\.?|INR|₹)?\s*([\d,]+\.?\d*)";

pub const TOTAL_CURRENCY_FIRST: &str = r"(?:Rs\.?|INR|₹)\s*([\d,]+\.?\d*)\s*(?:Due|Payable)";

pub const TOTAL_PROXIMITY_ANCHOR: &str = r"total\s*(?:amount\s*)?due";

pub const TOTAL_PROXIMITY_TOKEN: &str = r"(\d{1,3}(?:[, ]\d{2,3})+(?:\.\d{1,2})?|\d+\.\d{1,2}|\d{4,})";

// Payment due date
pub const DUE_LABELLED: &str = r"(?:Payment\s*Due\s*(?:Date|By|On)|Due\s*(?:Date|By|On)|Pay\s*By)[:\s]*(?:\n\s*)?(\d{1,2}[/-]\w{3,9}[/-]\d{2,4}|\d{1,2}\s+\w{3,9}\s+\d{4})";

pub const DUE_NUMERIC: &str = r"(?:Due\s*Date)[:\s]*(?:\n\s*)?(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})";

pub const DUE_LONG: &str = r"(?:Pay\s*By|Due)[:\s]*(?:\n\s*)?(\d{1,2}\s+\w{3,9}\s+\d{4})";

// Value suffixes appended to label alternations.
pub const SUFFIX_SAME_LINE: &str = r"[:\s]+([^\r\n]+)";

pub const SUFFIX_NEXT_LINE: &str = r"\s*[:]*\s*\r?\n\s*([^\r\n]+)";

pub const SUFFIX_CARD_DIGITS: &str = r"[:\s]*[xX*\s\-]*?(\d{4})";

pub const SUFFIX_CARD_DIGITS_WIDE: &str = r"[:\s]*[xX*\s\-]*?(\d{4,5})";

pub const SUFFIX_DATE_RANGE: &str = r"[:\s]*(?:\n\s*)?(\d{1,2}[/-]\w{3}[/-]\d{2,4}\s*(?:to|-|–)\s*\d{1,2}[/-]\w{3}[/-]\d{2,4}|\d{1,2}\s+\w{3,9}\s+\d{4}\s*(?:to|-|–)\s*\d{1,2}\s+\w{3,9}\s+\d{4})";

pub const SUFFIX_AMOUNT: &str = r"[:\s]*(?:\n\s*)?(?:Rs\.?|INR|₹)?\s*([\d,]+\.?\d*)";

pub const SUFFIX_DATE: &str = r"[:\s]*(?:\n\s*)?(\d{1,2}[/-]\w{3}[/-]\d{2,4}|\d{1,2}\s+\w{3,9}\s+\d{4})";

/// Wrap a label alternation in a non-capturing group and append a value suffix.
pub fn labelled(labels: &str, suffix: &str) -> String {
    format!("(?:{labels}){suffix}")
}
