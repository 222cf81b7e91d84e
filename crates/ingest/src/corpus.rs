use std::path::PathBuf;

use chef_core::DocumentCorpus;
use tracing::{debug, info, warn};

use crate::document::{DocumentSource, ExtractionError, PdfExtractor, TextExtractor};

/// A document that contributed nothing because it could not be read.
#[derive(Debug)]
pub struct DocumentFailure {
    pub name: String,
    pub error: ExtractionError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStatus {
    /// The corpus already had text; no source was read.
    AlreadyPopulated,
    /// The corpus was filled. `truncated` is set when the budget cut text off.
    Populated { chars: usize, truncated: bool },
    /// Nothing usable was extracted; the corpus is still empty.
    NoText,
}

/// Outcome of one ingestion pass.
#[derive(Debug)]
pub struct IngestReport {
    pub status: IngestStatus,
    /// Documents that were extracted successfully (possibly with empty text).
    pub documents_read: usize,
    /// Per-document failures, in input order.
    pub failures: Vec<DocumentFailure>,
}

impl IngestReport {
    fn already_populated() -> Self {
        Self {
            status: IngestStatus::AlreadyPopulated,
            documents_read: 0,
            failures: Vec::new(),
        }
    }

    pub fn is_populated(&self) -> bool {
        matches!(self.status, IngestStatus::Populated { .. })
    }
}

/// Builds the session corpus from cookbook documents.
///
/// Documents are extracted in input order and their page text concatenated;
/// an unreadable document is skipped and reported, the rest still count.
pub struct Ingestor {
    extractor: Box<dyn TextExtractor>,
    max_chars: usize,
}

impl Ingestor {
    pub fn new(max_chars: usize) -> Self {
        Self::with_extractor(Box::new(PdfExtractor), max_chars)
    }

    pub fn with_extractor(extractor: Box<dyn TextExtractor>, max_chars: usize) -> Self {
        Self { extractor, max_chars }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Fill `corpus` from in-memory documents. A no-op while `corpus` is
    /// non-empty.
    pub fn ingest(&self, corpus: &mut DocumentCorpus, sources: Vec<DocumentSource>) -> IngestReport {
        if !corpus.is_empty() {
            debug!("Corpus already populated, skipping ingestion");
            return IngestReport::already_populated();
        }
        self.run(corpus, sources.into_iter().map(Ok).collect())
    }

    /// Fill `corpus` from files on disk. Missing or unreadable files are
    /// reported like any other document failure. Nothing is read while
    /// `corpus` is non-empty.
    pub fn ingest_paths(&self, corpus: &mut DocumentCorpus, paths: &[PathBuf]) -> IngestReport {
        if !corpus.is_empty() {
            debug!("Corpus already populated, skipping ingestion");
            return IngestReport::already_populated();
        }
        let items = paths
            .iter()
            .map(|path| {
                DocumentSource::from_path(path).map_err(|error| DocumentFailure {
                    name: path.display().to_string(),
                    error,
                })
            })
            .collect();
        self.run(corpus, items)
    }

    fn run(
        &self,
        corpus: &mut DocumentCorpus,
        items: Vec<Result<DocumentSource, DocumentFailure>>,
    ) -> IngestReport {
        let mut text = String::new();
        let mut documents_read = 0;
        let mut failures = Vec::new();

        for item in items {
            let source = match item {
                Ok(source) => source,
                Err(failure) => {
                    warn!(document = %failure.name, error = %failure.error, "Skipping document");
                    failures.push(failure);
                    continue;
                }
            };

            match self.extractor.extract(&source) {
                Ok(doc) => {
                    debug!(
                        document = %doc.filename,
                        pages = doc.pages.len(),
                        chars = doc.total_chars(),
                        "Extracted document"
                    );
                    text.push_str(&doc.full_text());
                    documents_read += 1;
                }
                Err(error) => {
                    warn!(document = %source.name, error = %error, "Skipping unreadable document");
                    failures.push(DocumentFailure {
                        name: source.name,
                        error,
                    });
                }
            }
        }

        let status = if corpus.populate(&text, self.max_chars) {
            let chars = corpus.char_count();
            let truncated = text.chars().count() > chars;
            info!(documents = documents_read, chars, truncated, "Cookbook corpus ready");
            IngestStatus::Populated { chars, truncated }
        } else {
            info!(documents = documents_read, failed = failures.len(), "No cookbook text extracted");
            IngestStatus::NoText
        };

        IngestReport {
            status,
            documents_read,
            failures,
        }
    }
}
