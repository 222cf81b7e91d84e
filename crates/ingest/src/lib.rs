pub mod corpus;
pub mod document;

pub use corpus::{DocumentFailure, IngestReport, IngestStatus, Ingestor};
pub use document::{
    extract_document, DocumentSource, ExtractedDocument, ExtractionError, PageContent,
    PdfExtractor, TextExtractor,
};
