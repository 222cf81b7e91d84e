mod pdf;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use pdf::extract_pdf;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("PDF extraction failed: {0}")]
    PdfError(String),
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A named document waiting to be extracted.
#[derive(Debug, Clone)]
pub struct DocumentSource {
    /// Display name, usually the file name.
    pub name: String,
    pub bytes: Vec<u8>,
}

impl DocumentSource {
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }

    /// Read a document from disk. A missing file is reported as
    /// [`ExtractionError::NotFound`] so callers can warn instead of failing.
    pub fn from_path(path: &Path) -> Result<Self, ExtractionError> {
        if !path.exists() {
            return Err(ExtractionError::NotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

/// A page of extracted text.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// 1-based page number.
    pub page_number: usize,
    /// The extracted text content. Empty for pages without a text layer.
    pub text: String,
}

/// Result of extracting text from a document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Original filename.
    pub filename: String,
    /// Extracted pages in document order.
    pub pages: Vec<PageContent>,
}

impl ExtractedDocument {
    /// Page texts concatenated in page order, with no separator.
    pub fn full_text(&self) -> String {
        self.pages.iter().map(|p| p.text.as_str()).collect()
    }

    /// Total character count across all pages.
    pub fn total_chars(&self) -> usize {
        self.pages.iter().map(|p| p.text.chars().count()).sum()
    }
}

/// Turns a document source into page text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, source: &DocumentSource) -> Result<ExtractedDocument, ExtractionError>;
}

/// Text-layer PDF extraction. No OCR: image-only pages come back empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, source: &DocumentSource) -> Result<ExtractedDocument, ExtractionError> {
        extract_document(source)
    }
}

/// Extract text from a document based on its file extension.
pub fn extract_document(source: &DocumentSource) -> Result<ExtractedDocument, ExtractionError> {
    let ext = source
        .name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    let pages = match ext.as_str() {
        "pdf" => extract_pdf(&source.bytes)?,
        other => return Err(ExtractionError::UnsupportedType(other.to_string())),
    };

    Ok(ExtractedDocument {
        filename: source.name.clone(),
        pages,
    })
}

/// In-memory PDFs for tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Build a PDF with one page per entry, each page showing its line of text.
    pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
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

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_pdf_extensions() {
        let source = DocumentSource::from_bytes("notes.txt", b"plain text".to_vec());
        let err = extract_document(&source).unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedType(ref t) if t == "txt"));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let bytes = fixtures::pdf_with_pages(&["Coconut"]);
        let source = DocumentSource::from_bytes("GRANDMA.PDF", bytes);
        let doc = extract_document(&source).unwrap();
        assert_eq!(doc.filename, "GRANDMA.PDF");
        assert!(doc.full_text().contains("Coconut"));
    }

    #[test]
    fn full_text_concatenates_without_separator() {
        let doc = ExtractedDocument {
            filename: "a.pdf".into(),
            pages: vec![
                PageContent { page_number: 1, text: "Dish A: rice. ".into() },
                PageContent { page_number: 2, text: String::new() },
                PageContent { page_number: 3, text: "Dish B: lentils.".into() },
            ],
        };
        assert_eq!(doc.full_text(), "Dish A: rice. Dish B: lentils.");
        assert_eq!(doc.total_chars(), 30);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookbook.pdf");
        let err = DocumentSource::from_path(&path).unwrap_err();
        assert!(matches!(err, ExtractionError::NotFound(p) if p == path));
    }

    #[test]
    fn from_path_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aaji.pdf");
        std::fs::write(&path, b"%PDF-1.5").unwrap();
        let source = DocumentSource::from_path(&path).unwrap();
        assert_eq!(source.name, "aaji.pdf");
        assert_eq!(source.bytes, b"%PDF-1.5");
    }
}
