use std::any::Any;
use std::panic::{self, UnwindSafe};
use std::sync::{Mutex, PoisonError};

use super::{ExtractionError, PageContent};

/// Extract per-page text from PDF bytes, pages in document order.
///
/// Pages without a text layer are kept with empty text so page numbering stays
/// aligned with the source. pdf-extract panics on some malformed inputs; that
/// is caught and reported like any other parse failure, without the panic
/// message reaching stderr.
pub fn extract_pdf(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    let pages = match catch_quietly(|| pdf_extract::extract_text_from_mem_by_pages(bytes)) {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => return Err(ExtractionError::PdfError(e.to_string())),
        Err(payload) => {
            return Err(ExtractionError::PdfError(format!(
                "parser panicked: {}",
                panic_message(payload.as_ref())
            )))
        }
    };

    let pages: Vec<PageContent> = pages
        .into_iter()
        .enumerate()
        .map(|(i, text)| PageContent {
            page_number: i + 1,
            text,
        })
        .collect();

    if pages.iter().all(|p| p.text.trim().is_empty()) {
        tracing::debug!(pages = pages.len(), "PDF has no extractable text layer");
    }

    Ok(pages)
}

/// Serializes panic hook swaps across threads.
static HOOK_LOCK: Mutex<()> = Mutex::new(());

/// `catch_unwind` with the panic hook silenced for the duration of `f`.
fn catch_quietly<F, R>(f: F) -> std::thread::Result<R>
where
    F: FnOnce() -> R + UnwindSafe,
{
    let _guard = HOOK_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let result = panic::catch_unwind(f);
    panic::set_hook(previous);
    result
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::fixtures::pdf_with_pages;

    #[test]
    fn extracts_pages_in_order() {
        let bytes = pdf_with_pages(&["Ukadiche Modak", "Kokum Saar", "Varan Bhaat"]);
        let pages = extract_pdf(&bytes).unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].page_number, 1);
        assert!(pages[0].text.contains("Ukadiche Modak"));
        assert!(pages[1].text.contains("Kokum Saar"));
        assert!(pages[2].text.contains("Varan Bhaat"));
        assert_eq!(pages[2].page_number, 3);
    }

    #[test]
    fn garbage_bytes_are_an_error() {
        let err = extract_pdf(b"this is not a pdf at all").unwrap_err();
        assert!(matches!(err, ExtractionError::PdfError(_)));
    }

    #[test]
    fn parser_panic_is_caught() {
        let payload = catch_quietly(|| -> usize { panic!("bad xref") }).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "bad xref");

        assert_eq!(catch_quietly(|| 7).unwrap(), 7);
    }

    #[test]
    fn panic_message_downcasts() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
