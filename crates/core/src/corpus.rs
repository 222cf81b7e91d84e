/// Cut `text` to at most `max_chars` characters. The cut is a hard one on a
/// `char` boundary; words and pages are not respected.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Concatenated cookbook text for a session.
///
/// Written at most once: [`DocumentCorpus::populate`] refuses to overwrite a
/// non-empty corpus, and only [`crate::Session::reset`] empties it again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentCorpus {
    text: String,
}

impl DocumentCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Store `text`, truncated to `max_chars`. Returns `false` without touching
    /// anything if the corpus is already populated or `text` is empty.
    pub fn populate(&mut self, text: &str, max_chars: usize) -> bool {
        if !self.text.is_empty() || text.is_empty() {
            return false;
        }
        self.text = truncate_chars(text, max_chars).to_string();
        !self.text.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.text.clear();
    }
}
