//! PDF text extraction module.

mod extractor;

pub use extractor::{
    find_parent_cycle, read_document_text, DocumentText, PdfContent, PdfExtractor, PdfPage,
    TextOrigin,
};

use crate::error::PdfError;

/// Type of PDF content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfType {
    /// Contains extractable text.
    Text,
    /// Contains only images (scanned document).
    Image,
    /// Contains both text and images.
    Hybrid,
    /// Empty or unreadable.
    Empty,
}

impl PdfType {
    /// Classify from the amount of text and number of embedded images.
    pub fn classify(text_len: usize, image_count: usize, min_text_len: usize) -> Self {
        match (text_len >= min_text_len && text_len > 0, image_count > 0) {
            (true, false) => PdfType::Text,
            (false, true) => PdfType::Image,
            (true, true) => PdfType::Hybrid,
            (false, false) => PdfType::Empty,
        }
    }
}

impl std::fmt::Display for PdfType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PdfType::Text => "text",
            PdfType::Image => "image",
            PdfType::Hybrid => "hybrid",
            PdfType::Empty => "empty",
        };
        write!(f, "{s}")
    }
}

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Count embedded images on a page.
    fn count_images(&self, page: u32) -> Result<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(PdfType::classify(500, 0, 100), PdfType::Text);
        assert_eq!(PdfType::classify(20, 3, 100), PdfType::Image);
        assert_eq!(PdfType::classify(500, 1, 100), PdfType::Hybrid);
        assert_eq!(PdfType::classify(0, 0, 0), PdfType::Empty);
        assert_eq!(PdfType::classify(99, 0, 100), PdfType::Empty);
    }
}
