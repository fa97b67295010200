//! Core library for credit-card statement field extraction.
//!
//! This crate provides:
//! - PDF text extraction (pdf-extract with a lopdf fallback)
//! - Issuer detection over known bank signatures
//! - Rule-based extraction of cardholder, card digits, billing cycle, total due
//!   and payment due date
//! - Completeness ranking across issuer-specific rule sets

pub mod error;
pub mod models;
pub mod pdf;
pub mod statement;

pub use error::{ExtractionError, PdfError, Result, StmtError};
pub use models::config::{ExtractionConfig, ParseMode, PdfConfig, StmtConfig};
pub use models::statement::{Field, StatementRecord, NOT_FOUND, UNKNOWN_BANK, ZERO_AMOUNT};
pub use pdf::{read_document_text, DocumentText, PdfProcessor, PdfType};
pub use statement::rules::{parse_amount, parse_billing_cycle, parse_statement_date};
pub use statement::{parse_statement, ExtractionResult, StatementParser};
