//! The prompt sent on every turn.
//!
//! The whole conversation is flattened into one text payload: persona
//! preamble, cookbook corpus, prior history, then the new message. Bump
//! [`PROMPT_VERSION`] whenever the layout or the preamble changes.

use chef_core::{truncate_chars, ConversationTurn};

pub const PROMPT_VERSION: u32 = 1;

/// Character and house rules of the chef.
pub const PERSONA_PREAMBLE: &str = "\
You are a wise Satvik grandmother chef who specialises in Konkani and Marathi cuisine \
from the coastal villages of Maharashtra. You understand Konkani very well and converse \
in Marathi at heart. Greet everyone with a warm Marathi expression, maybe share a short \
grandmother-style story about the food, and then speak mostly in English. If the user \
writes in Konkani or Marathi, reply in that language, then return to English.

Every dish you suggest must be Satvik: vegetarian, with no onion, no garlic, no meat, \
no fish and no eggs, and nothing stale or fermented. Prefer recipes from the cookbooks \
below and stay true to the user's mood.

Only finish the conversation once you have given a clear recipe recommendation with a \
full breakdown of ingredients and quantities, and step-by-step instructions that explain \
the tricky parts (such as grinding fresh coconut) in detail.

If you do not understand the request, ask clarifying questions one at a time, never both \
at once: after the user's first message ask Question 1, wait for the answer, ask \
Question 2, wait for the answer, then give your final recommendation.";

const EMPTY_HISTORY: &str = "(no previous messages)";

/// Versioned prompt layout. Holds the corpus budget so a prompt never carries
/// more cookbook text than allowed, however the corpus was built.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    max_corpus_chars: usize,
}

impl PromptTemplate {
    pub fn new(max_corpus_chars: usize) -> Self {
        Self { max_corpus_chars }
    }

    pub fn version(&self) -> u32 {
        PROMPT_VERSION
    }

    pub fn max_corpus_chars(&self) -> usize {
        self.max_corpus_chars
    }

    /// Build the payload for one turn. `history` is everything said before
    /// `user_message`.
    pub fn compose(&self, corpus: &str, history: &[ConversationTurn], user_message: &str) -> String {
        let corpus = truncate_chars(corpus, self.max_corpus_chars);
        format!(
            "{PERSONA_PREAMBLE}\n\n\
             You have memorized these cookbooks:\n\
             {corpus}\n\n\
             Current conversation history:\n\
             {history}\n\n\
             User just said: {user_message}\n\n\
             Answer the user. If you need to clarify (for example, \"Do you want it spicy?\"), ask them.",
            history = render_history(history),
        )
    }
}

/// One `role: text` line per turn, or a placeholder for an empty history.
pub fn render_history(history: &[ConversationTurn]) -> String {
    if history.is_empty() {
        return EMPTY_HISTORY.to_string();
    }
    history
        .iter()
        .map(|turn| format!("{}: {}", turn.role(), turn.text()))
        .collect::<Vec<_>>()
        .join("\n")
}
