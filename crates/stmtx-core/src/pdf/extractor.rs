//! PDF text extraction using pdf-extract with a lopdf fallback.

use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashSet;
use std::panic;
use tracing::{debug, trace, warn};

use super::{PdfProcessor, PdfType, Result};
use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// PDF text extractor over a lopdf document.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    use_fallback: bool,
    min_text_length: usize,
}

/// Which extractor produced a document's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOrigin {
    /// Input was not a PDF and was decoded as UTF-8.
    PlainText,
    /// pdf-extract over the whole document.
    PdfExtract,
    /// lopdf page-by-page extraction.
    Lopdf,
    /// Nothing could be extracted.
    Unavailable,
}

/// Extracted content from a PDF.
#[derive(Debug, Clone)]
pub struct PdfContent {
    /// Type of PDF content.
    pub pdf_type: PdfType,
    /// Extracted text (if any).
    pub text: String,
    /// Extractor that produced `text`.
    pub origin: TextOrigin,
    /// Pages with their content.
    pub pages: Vec<PdfPage>,
}

/// Content from a single PDF page.
#[derive(Debug, Clone)]
pub struct PdfPage {
    /// Page number (1-indexed).
    pub number: u32,
    /// Embedded images on this page.
    pub image_count: usize,
}

/// Text of an input document, ready for field extraction.
#[derive(Debug, Clone)]
pub struct DocumentText {
    pub text: String,
    pub pdf_type: PdfType,
    pub origin: TextOrigin,
    /// Zero for plain-text input.
    pub page_count: u32,
}

impl DocumentText {
    fn unavailable() -> Self {
        Self {
            text: String::new(),
            pdf_type: PdfType::Empty,
            origin: TextOrigin::Unavailable,
            page_count: 0,
        }
    }

    /// Number of characters of extracted text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the text is too short to be a text-layer statement.
    pub fn is_low_text(&self, min_text_length: usize) -> bool {
        self.text.trim().chars().count() < min_text_length
    }
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            use_fallback: true,
            min_text_length: PdfConfig::default().min_text_length,
        }
    }

    /// Create an extractor using the given PDF settings.
    pub fn from_config(config: &PdfConfig) -> Self {
        Self::new()
            .with_fallback(config.use_fallback)
            .with_min_text_length(config.min_text_length)
    }

    /// Enable or disable the lopdf fallback.
    pub fn with_fallback(mut self, use_fallback: bool) -> Self {
        self.use_fallback = use_fallback;
        self
    }

    /// Text length below which a document is not classified as text.
    pub fn with_min_text_length(mut self, min_text_length: usize) -> Self {
        self.min_text_length = min_text_length;
        self
    }

    /// Extract all content from the loaded PDF.
    pub fn extract_all(&self) -> Result<PdfContent> {
        let doc = self.document()?;

        let page_count = doc.get_pages().len() as u32;
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        let mut pages = Vec::with_capacity(page_count as usize);
        let mut total_images = 0;

        for page_num in 1..=page_count {
            let image_count = self.count_images(page_num).unwrap_or(0);
            total_images += image_count;

            pages.push(PdfPage {
                number: page_num,
                image_count,
            });
        }

        let (text, origin) = match self.extract_text_with_origin() {
            Ok(found) => found,
            Err(e) => {
                warn!("No text extracted from PDF: {}", e);
                (String::new(), TextOrigin::Unavailable)
            }
        };

        let text_len = text.trim().chars().count();
        let pdf_type = PdfType::classify(text_len, total_images, self.min_text_length);

        debug!(
            "PDF analysis: {} pages, {} chars text, {} images -> {:?}",
            page_count, text_len, total_images, pdf_type
        );

        Ok(PdfContent {
            pdf_type,
            text,
            origin,
            pages,
        })
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))
    }

    /// Full-document text along with the extractor that produced it.
    pub fn extract_text_with_origin(&self) -> Result<(String, TextOrigin)> {
        match self.extract_with_pdf_extract() {
            Ok(text) if !text.trim().is_empty() => return Ok((text, TextOrigin::PdfExtract)),
            Ok(text) => {
                debug!("pdf-extract returned no text");
                if !self.use_fallback {
                    return Ok((text, TextOrigin::PdfExtract));
                }
            }
            Err(e) => {
                warn!("pdf-extract failed: {}", e);
                if !self.use_fallback {
                    return Err(e);
                }
            }
        }

        debug!("Falling back to lopdf text extraction");
        let text = self.extract_with_lopdf()?;
        Ok((text, TextOrigin::Lopdf))
    }

    fn extract_with_pdf_extract(&self) -> Result<String> {
        // pdf-extract climbs Parent links without a visited set
        if let Some((id, generation)) = find_parent_cycle(self.document()?) {
            return Err(PdfError::PageTreeCycle(id, generation));
        }

        let data = self.raw_data.as_slice();

        // pdf-extract panics on some malformed font programs
        match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data)) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(PdfError::TextExtraction(e.to_string())),
            Err(_) => Err(PdfError::TextExtraction(
                "pdf-extract aborted while decoding".to_string(),
            )),
        }
    }

    fn extract_with_lopdf(&self) -> Result<String> {
        let doc = self.document()?;
        let mut text = String::new();
        let mut failures = 0;

        for page_num in doc.get_pages().keys() {
            match doc.extract_text(&[*page_num]) {
                Ok(page_text) => {
                    text.push_str(&page_text);
                    text.push('\n');
                }
                Err(e) => {
                    trace!("lopdf could not read page {}: {}", page_num, e);
                    failures += 1;
                }
            }
        }

        if text.trim().is_empty() && failures > 0 {
            return Err(PdfError::TextExtraction(format!(
                "lopdf failed on {failures} page(s)"
            )));
        }

        Ok(text)
    }

    /// Get resources dictionary for a page, handling inheritance
    fn get_page_resources<'a>(
        &self,
        doc: &'a Document,
        page_id: ObjectId,
    ) -> Option<&'a Dictionary> {
        let chain = match parent_chain(doc, page_id) {
            Ok(chain) => chain,
            Err(cycle) => {
                trace!("Page tree cycle at {:?}", cycle);
                return None;
            }
        };

        chain.into_iter().find_map(|dict| {
            let resources = dict.get(b"Resources").ok()?;
            match doc.dereference(resources) {
                Ok((_, Object::Dictionary(res_dict))) => Some(res_dict),
                _ => None,
            }
        })
    }

    fn is_image(obj: &Object) -> bool {
        match obj {
            Object::Stream(stream) => stream
                .dict
                .get(b"Subtype")
                .and_then(|s| s.as_name())
                .is_ok_and(|name| name == b"Image"),
            _ => false,
        }
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {e}")))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn count_images(&self, page: u32) -> Result<usize> {
        let doc = self.document()?;

        let pages = doc.get_pages();
        let page_id = pages.get(&page).ok_or(PdfError::InvalidPage(page))?;

        let Some(resources) = self.get_page_resources(doc, *page_id) else {
            return Ok(0);
        };

        let mut count = 0;
        if let Ok(xobjects) = resources.get(b"XObject") {
            if let Ok((_, Object::Dictionary(xobj_dict))) = doc.dereference(xobjects) {
                for (_name, obj_ref) in xobj_dict.iter() {
                    if let Ok((_, obj)) = doc.dereference(obj_ref) {
                        if Self::is_image(obj) {
                            count += 1;
                        }
                    }
                }
            }
        }

        trace!("Page {} has {} images", page, count);
        Ok(count)
    }
}

/// Dictionaries from `node_id` up through its `Parent` links.
///
/// Fails with the first node reached twice.
fn parent_chain(
    doc: &Document,
    node_id: ObjectId,
) -> std::result::Result<Vec<&Dictionary>, ObjectId> {
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut next = Some(node_id);

    while let Some(id) = next {
        if !seen.insert(id) {
            return Err(id);
        }
        let Ok(dict) = doc.get_dictionary(id) else {
            break;
        };
        next = dict.get(b"Parent").and_then(Object::as_reference).ok();
        chain.push(dict);
    }

    Ok(chain)
}

/// First page tree node that is its own ancestor, if any.
pub fn find_parent_cycle(doc: &Document) -> Option<ObjectId> {
    doc.get_pages()
        .values()
        .find_map(|&page_id| parent_chain(doc, page_id).err())
}

/// Read the text of a statement document.
///
/// Bytes without a `%PDF-` header are decoded as (lossy) UTF-8. PDF failures
/// are logged and yield empty text; this function never fails.
pub fn read_document_text(data: &[u8], config: &PdfConfig) -> DocumentText {
    if !is_pdf(data) {
        let text = String::from_utf8_lossy(data).into_owned();
        let pdf_type = if text.trim().is_empty() {
            PdfType::Empty
        } else {
            PdfType::Text
        };
        debug!("Input is plain text ({} bytes)", data.len());
        return DocumentText {
            text,
            pdf_type,
            origin: TextOrigin::PlainText,
            page_count: 0,
        };
    }

    let mut extractor = PdfExtractor::from_config(config);
    if let Err(e) = extractor.load(data) {
        warn!("Could not open PDF: {}", e);
        return DocumentText::unavailable();
    }

    match extractor.extract_all() {
        Ok(content) => {
            if content.text.trim().is_empty() {
                warn!("PDF yielded no text ({})", content.pdf_type);
            }
            DocumentText {
                text: content.text,
                pdf_type: content.pdf_type,
                origin: content.origin,
                page_count: extractor.page_count(),
            }
        }
        Err(e) => {
            warn!("Could not extract PDF content: {}", e);
            DocumentText::unavailable()
        }
    }
}

/// Whether the bytes carry a PDF header within the first kilobyte.
pub(crate) fn is_pdf(data: &[u8]) -> bool {
    let head = &data[..data.len().min(1024)];
    head.windows(5).any(|w| w == b"%PDF-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Stream};

    /// One page under one Pages node, with resources on the Pages node.
    fn page_tree(pages_parent_is_page: bool) -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 1,
                "Height" => 1,
            },
            vec![0],
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        });

        let mut pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im1" => image_id },
            },
        };
        if pages_parent_is_page {
            pages.set("Parent", page_id);
        }
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        (doc, page_id)
    }

    fn loaded(doc: Document) -> PdfExtractor {
        let mut extractor = PdfExtractor::new();
        extractor.document = Some(doc);
        extractor
    }

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
        assert!(extractor.extract_all().is_err());
    }

    #[test]
    fn test_inherited_resources_count_images() {
        let (doc, _) = page_tree(false);
        assert_eq!(find_parent_cycle(&doc), None);

        let extractor = loaded(doc);
        assert_eq!(extractor.count_images(1).unwrap(), 1);
        assert!(matches!(extractor.count_images(2), Err(PdfError::InvalidPage(2))));
    }

    #[test]
    fn test_parent_cycle_is_detected() {
        let (doc, page_id) = page_tree(true);
        assert_eq!(find_parent_cycle(&doc), Some(page_id));

        let extractor = loaded(doc);
        assert_eq!(extractor.count_images(1).unwrap(), 0);
        assert!(matches!(
            extractor.extract_with_pdf_extract(),
            Err(PdfError::PageTreeCycle(..))
        ));
    }

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(b"%PDF-1.7\n..."));
        assert!(is_pdf(b"\r\n%PDF-1.4"));
        assert!(!is_pdf(b"Total Due: Rs. 100"));
        assert!(!is_pdf(b""));
    }

    #[test]
    fn test_plain_text_passthrough() {
        let doc = read_document_text(b"Card Number: XXXX 4521\n", &PdfConfig::default());
        assert_eq!(doc.origin, TextOrigin::PlainText);
        assert_eq!(doc.pdf_type, PdfType::Text);
        assert_eq!(doc.text, "Card Number: XXXX 4521\n");
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let doc = read_document_text(&[b'a', 0xff, b'b'], &PdfConfig::default());
        assert_eq!(doc.text, "a\u{fffd}b");
    }

    #[test]
    fn test_corrupt_pdf_yields_empty_text() {
        let doc = read_document_text(b"%PDF-1.4\nnot really a pdf", &PdfConfig::default());
        assert_eq!(doc.origin, TextOrigin::Unavailable);
        assert_eq!(doc.pdf_type, PdfType::Empty);
        assert!(doc.text.is_empty());
        assert!(doc.is_low_text(1));
    }

    #[test]
    fn test_empty_input() {
        let doc = read_document_text(b"", &PdfConfig::default());
        assert_eq!(doc.pdf_type, PdfType::Empty);
        assert_eq!(doc.char_count(), 0);
    }
}
