//! The compiled pattern catalogue.

use tracing::debug;

use super::amounts::total_due_rules;
use super::cards::card_rules;
use super::dates::{billing_cycle_rules, due_date_rules};
use super::issuer::IssuerDetector;
use super::names::cardholder_rules;
use super::ruleset::{IssuerProfile, RuleSet};
use crate::error::ExtractionError;

/// Name of the generic rule set.
pub const GENERIC: &str = "generic";

const DUE_DATE_BY: &str = r"Payment\s*Due\s*(?:Date|By)|Due\s*Date";

/// Layouts of issuers with dedicated rule sets.
pub const ISSUER_PROFILES: &[IssuerProfile] = &[
    IssuerProfile {
        key: "hdfc",
        issuers: &["HDFC Bank"],
        cardholder_labels: r"Name|Cardholder",
        wide_card_digits: false,
        billing_labels: r"Statement\s*Period|Billing\s*Cycle|Statement\s*Date",
        total_labels: r"Total\s*(?:Amount\s*)?Due|Payment\s*Due",
        due_labels: DUE_DATE_BY,
    },
    IssuerProfile {
        key: "icici",
        issuers: &["ICICI Bank"],
        cardholder_labels: r"Name|Customer\s*Name",
        wide_card_digits: false,
        billing_labels: r"Statement\s*Period|Bill\s*Period",
        total_labels: r"Total\s*(?:Amount\s*)?Due|Minimum\s*Amount\s*Due",
        due_labels: r"Payment\s*Due\s*(?:Date|on)|Due\s*Date",
    },
    IssuerProfile {
        key: "sbi",
        issuers: &["SBI Card", "State Bank of India"],
        cardholder_labels: r"Name|Card\s*Member",
        wide_card_digits: false,
        billing_labels: r"Statement\s*Period|Billing\s*Period",
        total_labels: r"Total\s*(?:Amount\s*)?Due|Outstanding",
        due_labels: r"Payment\s*Due\s*(?:Date|By)|Due\s*(?:Date|on)",
    },
    IssuerProfile {
        key: "axis",
        issuers: &["Axis Bank"],
        cardholder_labels: r"Name|Primary\s*Card\s*Member",
        wide_card_digits: false,
        billing_labels: r"Statement\s*(?:Period|Date)|Billing\s*Cycle",
        total_labels: r"Total\s*(?:Amount\s*)?Due|Amount\s*Payable",
        due_labels: DUE_DATE_BY,
    },
    IssuerProfile {
        key: "amex",
        issuers: &["American Express"],
        cardholder_labels: r"Name|Card\s*Member",
        wide_card_digits: true,
        billing_labels: r"Statement\s*(?:Period|Closing\s*Date)|Billing\s*Period",
        total_labels: r"Total\s*(?:Amount\s*)?Due|New\s*Balance|Payment\s*Due",
        due_labels: DUE_DATE_BY,
    },
    IssuerProfile {
        key: "pnb",
        issuers: &["Punjab National Bank"],
        cardholder_labels: r"Name|Card\s*Holder|Customer\s*Name",
        wide_card_digits: false,
        billing_labels: r"Statement\s*(?:Period|Date)|Billing\s*(?:Period|Cycle)",
        total_labels: r"Total\s*(?:Amount\s*)?Due|Outstanding|Amount\s*Payable",
        due_labels: DUE_DATE_BY,
    },
];

/// Immutable catalogue of everything the parser matches against.
///
/// Built once and handed to [`StatementParser`](crate::statement::StatementParser).
pub struct PatternLibrary {
    issuers: IssuerDetector,
    generic: RuleSet,
    specialised: Vec<RuleSet>,
}

impl PatternLibrary {
    /// Standard detector, generic rules and every built-in issuer profile.
    pub fn standard() -> Result<Self, ExtractionError> {
        let mut library = Self::new(IssuerDetector::standard()?, generic_rule_set()?);
        for profile in ISSUER_PROFILES {
            library = library.with_rule_set(RuleSet::from_profile(profile)?);
        }

        debug!(
            "Built pattern library with {} signatures and {} issuer rule sets",
            library.issuers.signatures().len(),
            library.specialised.len()
        );
        Ok(library)
    }

    pub fn new(issuers: IssuerDetector, generic: RuleSet) -> Self {
        Self {
            issuers,
            generic,
            specialised: Vec::new(),
        }
    }

    /// Register an issuer-specific rule set.
    pub fn with_rule_set(mut self, rule_set: RuleSet) -> Self {
        self.specialised.push(rule_set);
        self
    }

    pub fn issuers(&self) -> &IssuerDetector {
        &self.issuers
    }

    pub fn generic(&self) -> &RuleSet {
        &self.generic
    }

    pub fn rule_sets(&self) -> &[RuleSet] {
        &self.specialised
    }

    /// Registered rule sets specialised for `issuer`.
    pub fn rule_sets_for<'a>(&'a self, issuer: &'a str) -> impl Iterator<Item = &'a RuleSet> {
        self.specialised.iter().filter(move |r| r.applies_to(issuer))
    }
}

/// The rule set used in the default mode.
pub fn generic_rule_set() -> Result<RuleSet, ExtractionError> {
    Ok(RuleSet::new(GENERIC, Vec::new())
        .with_list(cardholder_rules()?)
        .with_list(card_rules()?)
        .with_list(billing_cycle_rules()?)
        .with_list(total_due_rules()?)
        .with_list(due_date_rules()?))
}
