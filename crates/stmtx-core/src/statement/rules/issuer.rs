//! Card issuer detection.

use regex::{Regex, RegexBuilder};

use crate::error::ExtractionError;
use crate::models::statement::UNKNOWN_BANK;

/// Known issuer signatures, most specific first.
///
/// Short abbreviations are word-bounded so that, for example, `Citizen`
/// does not read as Citibank. `Union Bank` and `State Bank` remain plain
/// phrase matches and can still collide with prose that names those
/// institutions in passing.
pub const DEFAULT_SIGNATURES: &[(&str, &str)] = &[
    (r"HDFC\s*Bank", "HDFC Bank"),
    (r"ICICI\s*Bank", "ICICI Bank"),
    (r"SBI\s*Card", "SBI Card"),
    (r"State\s*Bank", "State Bank of India"),
    (r"Axis\s*Bank", "Axis Bank"),
    (r"American\s*Express|\bAMEX\b", "American Express"),
    (r"Punjab\s*National\s*Bank|\bPNB\b", "Punjab National Bank"),
    (r"Kotak\s*Mahindra", "Kotak Mahindra Bank"),
    (r"\bYes\s*Bank", "Yes Bank"),
    (r"IndusInd\s*Bank", "IndusInd Bank"),
    (r"\bCiti(?:\s*bank)?\b", "Citibank"),
    (r"Standard\s*Chartered", "Standard Chartered"),
    (r"\bHSBC\b", "HSBC"),
    (r"\bRBL\s*Bank", "RBL Bank"),
    (r"Bank\s*of\s*Baroda|\bBOB\b", "Bank of Baroda"),
    (r"Canara\s*Bank", "Canara Bank"),
    (r"Union\s*Bank", "Union Bank of India"),
    (r"IDFC\s*First", "IDFC FIRST Bank"),
];

/// A pattern identifying one issuer.
#[derive(Debug, Clone)]
pub struct IssuerSignature {
    pattern: Regex,
    name: String,
}

impl IssuerSignature {
    pub fn new(pattern: &str, name: impl Into<String>) -> Result<Self, ExtractionError> {
        let name = name.into();
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| ExtractionError::InvalidPattern {
                rule: format!("issuer:{name}"),
                source,
            })?;
        Ok(Self { pattern, name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// The text that matched, if any.
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern.find(text).map(|m| m.as_str())
    }
}

/// Ordered issuer signature list; first match wins.
#[derive(Debug, Clone)]
pub struct IssuerDetector {
    signatures: Vec<IssuerSignature>,
}

impl IssuerDetector {
    /// Detector over [`DEFAULT_SIGNATURES`].
    pub fn standard() -> Result<Self, ExtractionError> {
        let signatures = DEFAULT_SIGNATURES
            .iter()
            .map(|(pattern, name)| IssuerSignature::new(pattern, *name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { signatures })
    }

    pub fn new(signatures: Vec<IssuerSignature>) -> Self {
        Self { signatures }
    }

    /// Append a signature after the existing ones.
    pub fn with_signature(mut self, signature: IssuerSignature) -> Self {
        self.signatures.push(signature);
        self
    }

    pub fn signatures(&self) -> &[IssuerSignature] {
        &self.signatures
    }

    /// Canonical name of the first matching issuer, or `Unknown Bank`.
    pub fn detect(&self, text: &str) -> &str {
        let upper = text.to_uppercase();
        self.signatures
            .iter()
            .find(|s| s.is_match(&upper))
            .map_or(UNKNOWN_BANK, |s| s.name())
    }

    /// Every matching signature in declared order, with the matched text.
    pub fn matches(&self, text: &str) -> Vec<(&str, String)> {
        let upper = text.to_uppercase();
        self.signatures
            .iter()
            .filter_map(|s| s.find(&upper).map(|m| (s.name(), m.to_string())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> String {
        IssuerDetector::standard().unwrap().detect(text).to_string()
    }

    #[test]
    fn test_detect_known_issuers() {
        assert_eq!(detect("Welcome to HDFC Bank credit cards"), "HDFC Bank");
        assert_eq!(detect("icici bank statement"), "ICICI Bank");
        assert_eq!(detect("AMERICAN EXPRESS BANKING CORP"), "American Express");
        assert_eq!(detect("Your AMEX card"), "American Express");
        assert_eq!(detect("IDFC FIRST Bank Ltd"), "IDFC FIRST Bank");
    }

    #[test]
    fn test_declared_order_wins() {
        // Both signatures match; SBI Card is declared before State Bank
        assert_eq!(detect("SBI Card, a State Bank of India venture"), "SBI Card");
        assert_eq!(detect("State Bank of India"), "State Bank of India");
    }

    #[test]
    fn test_abbreviations_need_word_boundaries() {
        assert_eq!(detect("Citizen services helpline"), "Unknown Bank");
        assert_eq!(detect("Citi Bank N.A."), "Citibank");
        assert_eq!(detect("SNPNBX reference"), "Unknown Bank");
        assert_eq!(detect("Issued by PNB"), "Punjab National Bank");
        assert_eq!(detect("Bobby Singh"), "Unknown Bank");
    }

    #[test]
    fn test_unknown_and_empty() {
        assert_eq!(detect(""), "Unknown Bank");
        assert_eq!(detect("Some Credit Union statement"), "Unknown Bank");
    }

    #[test]
    fn test_matches_lists_all_hits() {
        let detector = IssuerDetector::standard().unwrap();
        let hits = detector.matches("HDFC Bank co-branded with Citibank");
        let names: Vec<&str> = hits.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["HDFC Bank", "Citibank"]);
        assert_eq!(hits[0].1, "HDFC BANK");
    }
}
