use std::fs;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use pretty_assertions::assert_eq;

use stmtx_core::pdf::{PdfExtractor, TextOrigin};
use stmtx_core::{
    parse_statement, read_document_text, ParseMode, PdfConfig, PdfProcessor, PdfType,
    StatementParser, StatementRecord, StmtError,
};

const AMEX_STATEMENT: &str = "\
American Express Banking Corp.
Card Member: RAHUL VERMA
Card Number XXXX-XXXXXX-31005
Statement Period: 16 Nov 2024 to 15 Dec 2024
New Balance Rs. 8,450.00
Payment Due Date: 05 Jan 2025
";

const SBI_STATEMENT: &str = "\
SBI Card
Dear Meera Iyer
Your statement for card ending in 7781 is ready.
Billing Period 01/11/2024 - 30/11/2024
Total Due
INR 23,450.00
Pay By: 18-Dec-2024
";

/// Build a one-page PDF with each line in its own text object.
fn statement_pdf(lines: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut operations = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
        operations.push(Operation::new("Td", vec![40.into(), (780 - 14 * i as i64).into()]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        operations.push(Operation::new("ET", vec![]));
    }
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut data = Vec::new();
    doc.save_to(&mut data).unwrap();
    data
}

/// A PDF whose page and Pages node name each other as `Parent`.
fn cyclic_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Parent" => page_id,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut data = Vec::new();
    doc.save_to(&mut data).unwrap();
    data
}

#[test]
fn parse_statement_reads_text_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("amex.txt");
    fs::write(&path, AMEX_STATEMENT).unwrap();

    let record = parse_statement(&path).unwrap().unwrap();
    let expected = StatementRecord {
        bank: "American Express".to_string(),
        cardholder: "RAHUL VERMA".to_string(),
        card_last4: "3100".to_string(),
        billing_cycle: "16 Nov 2024 to 15 Dec 2024".to_string(),
        total_due: "₹8,450.00".to_string(),
        payment_due_date: "05 Jan 2025".to_string(),
    };
    assert_eq!(record, expected);
}

#[test]
fn parse_statement_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = parse_statement(dir.path().join("missing.pdf")).unwrap_err();
    assert!(matches!(err, StmtError::Io(_)));
}

#[test]
fn ranked_mode_uses_issuer_card_width() {
    let parser = StatementParser::new().unwrap().with_mode(ParseMode::Ranked);
    let result = parser.extract(AMEX_STATEMENT);

    assert_eq!(result.rule_set.as_deref(), Some("amex"));
    assert_eq!(result.record.unwrap().card_last4, "31005");
}

#[test]
fn generic_rules_handle_split_layouts() {
    let record = StatementParser::new().unwrap().build(SBI_STATEMENT);

    assert_eq!(record.bank, "SBI Card");
    assert_eq!(record.cardholder, "Meera Iyer");
    assert_eq!(record.card_last4, "7781");
    assert_eq!(record.billing_cycle, "01/11/2024 - 30/11/2024");
    assert_eq!(record.total_due, "₹23,450.00");
    assert_eq!(record.payment_due_date, "18-Dec-2024");
}

#[test]
fn record_serializes_with_display_keys() {
    let record = StatementParser::new().unwrap().build("");
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "Bank": "Unknown Bank",
            "Cardholder": "Not Found",
            "Card Last 4 Digits": "Not Found",
            "Billing Cycle": "Not Found",
            "Total Due": "₹0.00",
            "Payment Due Date": "Not Found",
        })
    );
}

#[test]
fn pdf_text_layer_is_extracted() {
    let data = statement_pdf(&[
        "HDFC Bank Credit Card Statement",
        "Card Number: XXXX XXXX XXXX 4521",
        "Total Due: Rs. 12,345.67",
    ]);

    let document = read_document_text(&data, &PdfConfig::default());
    assert_eq!(document.page_count, 1);
    assert_ne!(document.origin, TextOrigin::PlainText);
    assert!(document.text.contains("HDFC"));

    let record = StatementParser::new().unwrap().parse_document(&data).unwrap();
    assert_eq!(record.bank, "HDFC Bank");
    assert_eq!(record.card_last4, "4521");
}

#[test]
fn unreadable_pdf_yields_sentinels() {
    let data = b"%PDF-1.7\n%garbage without objects".to_vec();

    let document = read_document_text(&data, &PdfConfig::default());
    assert_eq!(document.pdf_type, PdfType::Empty);

    let parser = StatementParser::new().unwrap();
    assert_eq!(parser.parse_document(&data), Some(StatementRecord::empty()));
    assert_eq!(parser.with_mode(ParseMode::Ranked).parse_document(&data), None);
}

#[test]
fn page_tree_cycle_yields_sentinels() {
    let data = cyclic_pdf();

    let document = read_document_text(&data, &PdfConfig::default());
    assert!(document.text.trim().is_empty());
    assert_eq!(document.pdf_type, PdfType::Empty);

    let parser = StatementParser::new().unwrap();
    assert_eq!(parser.parse_document(&data), Some(StatementRecord::empty()));
}

#[test]
fn extract_all_reports_pages() {
    let data = statement_pdf(&["HDFC Bank Credit Card Statement"]);

    let mut extractor = PdfExtractor::new();
    extractor.load(&data).unwrap();
    let content = extractor.extract_all().unwrap();

    assert_eq!(content.pages.len(), 1);
    assert_eq!(content.pages[0].number, 1);
    assert_eq!(content.pages[0].image_count, 0);
    assert!(content.text.contains("HDFC"));
}
