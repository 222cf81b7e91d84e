use std::path::PathBuf;

use chef_core::Session;
use chef_ingest::{IngestReport, Ingestor};
use tracing::info;

/// The cookbooks on the counter for this run.
///
/// Remembers the last set of files that filled the corpus so a new
/// conversation can memorize them again instead of starting empty.
pub struct Shelf {
    ingestor: Ingestor,
    paths: Vec<PathBuf>,
}

impl Shelf {
    pub fn new(ingestor: Ingestor) -> Self {
        Self {
            ingestor,
            paths: Vec::new(),
        }
    }

    /// Cookbooks that last filled the corpus.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Ingest `paths` into the session. They are remembered only if they
    /// produced cookbook text.
    pub fn memorize(&mut self, session: &mut Session, paths: &[PathBuf]) -> IngestReport {
        let report = self.ingestor.ingest_paths(session.corpus_mut(), paths);
        if report.is_populated() {
            self.paths = paths.to_vec();
        }
        report
    }

    /// Reset the session, then read the remembered cookbooks again.
    /// Returns `None` when nothing was remembered.
    pub fn start_over(&self, session: &mut Session) -> Option<IngestReport> {
        session.reset();
        if self.paths.is_empty() {
            return None;
        }
        info!(cookbooks = self.paths.len(), "Re-reading cookbooks for new conversation");
        Some(self.ingestor.ingest_paths(session.corpus_mut(), &self.paths))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chef_core::ConversationTurn;
    use chef_ingest::{
        DocumentSource, ExtractedDocument, ExtractionError, PageContent, TextExtractor,
    };

    /// Treats file bytes as a single page of UTF-8 text.
    struct PlainText;

    impl TextExtractor for PlainText {
        fn extract(&self, source: &DocumentSource) -> Result<ExtractedDocument, ExtractionError> {
            let text = String::from_utf8_lossy(&source.bytes).into_owned();
            Ok(ExtractedDocument {
                filename: source.name.clone(),
                pages: vec![PageContent { page_number: 1, text }],
            })
        }
    }

    fn shelf() -> Shelf {
        Shelf::new(Ingestor::with_extractor(Box::new(PlainText), 1_000))
    }

    #[test]
    fn start_over_rereads_cookbooks() {
        let dir = tempfile::tempdir().unwrap();
        let book = dir.path().join("aaji.pdf");
        std::fs::write(&book, "Ukadiche Modak").unwrap();

        let mut shelf = shelf();
        let mut session = Session::new();
        assert!(shelf.memorize(&mut session, &[book.clone()]).is_populated());
        session.log_mut().push(ConversationTurn::user("I'm homesick"));

        let report = shelf.start_over(&mut session).unwrap();
        assert!(report.is_populated());
        assert!(session.log().is_empty());
        assert_eq!(session.corpus().as_str(), "Ukadiche Modak");
        assert_eq!(shelf.paths(), &[book]);
    }

    #[test]
    fn start_over_without_cookbooks_leaves_corpus_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.pdf");

        let mut shelf = shelf();
        let mut session = Session::new();
        assert!(!shelf.memorize(&mut session, &[missing]).is_populated());
        assert!(shelf.paths().is_empty());

        assert!(shelf.start_over(&mut session).is_none());
        assert!(session.corpus().is_empty());
    }
}
